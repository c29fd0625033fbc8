//! In-memory entity store for users, projects, and images.
//!
//! The store is volatile: everything lives for the lifetime of the process.
//! [`EntityStore`] is constructed once by the application and shared by
//! handle; the ownership guard in [`ownership`] is layered on top of it.

pub mod models;
pub mod ownership;
pub mod store;

pub use store::{EntityStore, StoreStats};
