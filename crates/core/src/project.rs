//! Project kinds and defaults.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status assigned to a project when none is given.
pub const DEFAULT_PROJECT_STATUS: &str = "active";

/// The layout a project is organized around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// One image at a time.
    #[default]
    Single,
    /// An ordered sequence of frames generated in batches.
    Storyboard,
}

/// All accepted wire names for [`ProjectType`].
pub const VALID_PROJECT_TYPES: &[&str] = &["single", "storyboard"];

impl ProjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Storyboard => "storyboard",
        }
    }
}

impl std::str::FromStr for ProjectType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "storyboard" => Ok(Self::Storyboard),
            other => Err(CoreError::Validation(format!(
                "Invalid project type '{other}'. Must be one of: {}",
                VALID_PROJECT_TYPES.join(", ")
            ))),
        }
    }
}
