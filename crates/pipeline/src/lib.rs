//! Image generation lifecycle orchestration.
//!
//! [`GenerationOrchestrator`] turns a generation request into a `pending`
//! image record, calls the provider, and settles the record as `completed`
//! or `failed`. Batches run strictly in order with a minimum spacing between
//! provider calls.

pub mod error;
pub mod orchestrator;
pub mod request;

pub use error::GenerationError;
pub use orchestrator::{GenerationOrchestrator, GenerationOutcome};
pub use request::{BatchGenerationRequest, EditImageRequest, ImageGenerationRequest};
