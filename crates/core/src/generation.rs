//! Generation defaults, request normalization, and the image lifecycle.
//!
//! An image record is created `pending` when a generation is requested and
//! moves exactly once to a terminal status (`completed` or `failed`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Generation defaults
// ---------------------------------------------------------------------------

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
/// Output resolution used when the caller does not supply one.
pub const DEFAULT_SIZE: &str = "1024x1024";
/// Number of images requested when the caller omits `n` (or sends 0).
pub const DEFAULT_COUNT: u32 = 1;
/// Minimum spacing between consecutive provider calls in a batch.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);
/// Error recorded when the provider succeeds but returns no usable result.
pub const NO_IMAGES_MESSAGE: &str = "provider returned no images";

// ---------------------------------------------------------------------------
// Image status
// ---------------------------------------------------------------------------

/// Lifecycle status of a generated image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Pending,
    Completed,
    Failed,
}

impl ImageStatus {
    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// `completed` and `failed` are terminal.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only `pending -> completed` and `pending -> failed` are allowed.
    pub fn can_transition_to(self, next: ImageStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed) | (Self::Pending, Self::Failed)
        )
    }

    /// Validate a transition, returning a [`CoreError::Conflict`] otherwise.
    pub fn transition_to(self, next: ImageStatus) -> Result<ImageStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::Conflict(format!(
                "Image status cannot move from '{}' to '{}'",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

impl std::fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request normalization
// ---------------------------------------------------------------------------

/// Reject missing or whitespace-only prompts.
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation("prompt is required".to_string()));
    }
    Ok(())
}

/// Resolve the model name, falling back to [`DEFAULT_MODEL`].
pub fn resolve_model(model: Option<&str>) -> String {
    non_blank(model).unwrap_or(DEFAULT_MODEL).to_string()
}

/// Resolve the size descriptor, falling back to [`DEFAULT_SIZE`].
pub fn resolve_size(size: Option<&str>) -> String {
    non_blank(size).unwrap_or(DEFAULT_SIZE).to_string()
}

/// Resolve the requested image count. `None` and `0` both mean the default.
pub fn resolve_count(n: Option<u32>) -> u32 {
    match n {
        Some(0) | None => DEFAULT_COUNT,
        Some(n) => n,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
