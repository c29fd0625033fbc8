//! Domain primitives shared by every Atelier crate.
//!
//! Holds identifier and timestamp aliases, the [`error::CoreError`] taxonomy,
//! generation defaults and the image lifecycle state machine, project
//! constants, and data-URL helpers for inline image payloads.

pub mod data_url;
pub mod error;
pub mod generation;
pub mod project;
pub mod types;
