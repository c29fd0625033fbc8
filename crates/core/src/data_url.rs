//! `data:` URL helpers for inline image payloads.
//!
//! Providers may answer with base64 image bytes instead of a hosted URL.
//! Those payloads are wrapped into `data:image/png;base64,<payload>` strings
//! so downstream code handles every result as a single string reference.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// MIME type assumed for provider base64 payloads.
pub const INLINE_IMAGE_MIME: &str = "image/png";

/// Wrap a base64 payload as a PNG data URL.
pub fn to_png_data_url(b64: &str) -> String {
    format!("data:{INLINE_IMAGE_MIME};base64,{b64}")
}

/// Whether `value` looks like a `data:` URL.
pub fn is_data_url(value: &str) -> bool {
    value.starts_with("data:")
}

/// A borrowed, parsed base64 data URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub mime: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Parse `data:<mime>;base64,<payload>`. Returns `None` for anything else.
    pub fn parse(value: &'a str) -> Option<Self> {
        let rest = value.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let mime = header.strip_suffix(";base64")?;
        let mime = if mime.is_empty() { INLINE_IMAGE_MIME } else { mime };
        Some(Self { mime, payload })
    }

    /// Decode the payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, CoreError> {
        STANDARD
            .decode(self.payload)
            .map_err(|e| CoreError::Validation(format!("Invalid base64 image payload: {e}")))
    }
}
