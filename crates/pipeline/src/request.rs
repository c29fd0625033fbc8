//! Inputs accepted by the orchestrator, before defaults are applied.

/// A single text-to-image request.
#[derive(Debug, Clone, Default)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub size: Option<String>,
    /// Images to request; `None` or `0` means one.
    pub n: Option<u32>,
    /// Raw project id as supplied by the caller; unparseable means none.
    pub project_id: Option<String>,
}

/// An ordered batch of prompts sharing model, size and project.
#[derive(Debug, Clone, Default)]
pub struct BatchGenerationRequest {
    pub prompts: Vec<String>,
    pub model: Option<String>,
    pub size: Option<String>,
    pub project_id: Option<String>,
}

/// An edit of an existing image. Never touches the store.
#[derive(Debug, Clone, Default)]
pub struct EditImageRequest {
    /// Source image as a URL or data URL.
    pub image: String,
    pub prompt: String,
    pub model: Option<String>,
    pub size: Option<String>,
    pub mask: Option<String>,
}
