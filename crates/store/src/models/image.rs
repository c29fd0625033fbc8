//! Image entity and its lifecycle transitions.

use atelier_core::data_url::is_data_url;
use atelier_core::error::CoreError;
use atelier_core::generation::ImageStatus;
use atelier_core::types::{EntityId, Timestamp};
use serde::Serialize;

/// Fallback error text when a failure is recorded without a message.
const UNKNOWN_FAILURE: &str = "image generation failed";

/// A single generated image and the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub id: EntityId,
    /// `None` when the request carried no usable project.
    pub project_id: Option<EntityId>,
    pub prompt: String,
    pub model: String,
    pub size: String,
    pub image_url: Option<String>,
    /// Inline payload as a `data:` URL, when the provider returned bytes.
    pub image_data: Option<String>,
    pub status: ImageStatus,
    pub error: Option<String>,
    pub generated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Image {
    /// Build a `pending` record with no id yet.
    pub fn pending(
        prompt: impl Into<String>,
        model: impl Into<String>,
        size: impl Into<String>,
        project_id: Option<EntityId>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: EntityId::nil(),
            project_id,
            prompt: prompt.into(),
            model: model.into(),
            size: size.into(),
            image_url: None,
            image_data: None,
            status: ImageStatus::Pending,
            error: None,
            generated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `completed`, recording the first result reference.
    ///
    /// Data URLs are kept as both the reference and the inline payload.
    pub fn mark_completed(&mut self, reference: String) -> Result<(), CoreError> {
        self.status = self.status.transition_to(ImageStatus::Completed)?;
        let now = chrono::Utc::now();
        if is_data_url(&reference) {
            self.image_data = Some(reference.clone());
        }
        self.image_url = Some(reference);
        self.error = None;
        self.generated_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Move to `failed` with a human-readable reason (never left empty).
    pub fn mark_failed(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.status = self.status.transition_to(ImageStatus::Failed)?;
        let message = message.into();
        self.error = Some(if message.trim().is_empty() {
            UNKNOWN_FAILURE.to_string()
        } else {
            message
        });
        self.updated_at = chrono::Utc::now();
        Ok(())
    }
}
