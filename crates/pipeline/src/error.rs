use atelier_core::error::CoreError;
use atelier_core::types::EntityId;
use atelier_provider::ProviderError;

/// Errors surfaced by the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Invalid input or an impossible state transition.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A single-image generation failed at the provider. The image record
    /// has already been persisted as `failed`.
    #[error("Generation failed for image {image_id}: {source}")]
    Provider {
        image_id: EntityId,
        source: ProviderError,
    },

    /// An edit call failed at the provider. Nothing was persisted.
    #[error("Image edit failed: {0}")]
    Edit(#[source] ProviderError),
}
