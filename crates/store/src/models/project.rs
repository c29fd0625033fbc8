//! Project entity and update DTO.

use atelier_core::project::{ProjectType, DEFAULT_PROJECT_STATUS};
use atelier_core::types::{EntityId, Timestamp};
use serde::Serialize;

/// A container for images, owned by exactly one user for its whole life.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: EntityId,
    pub user_id: EntityId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Mutable fields of a project. The owner cannot change.
#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub title: String,
    pub description: Option<String>,
    pub project_type: ProjectType,
}

impl Project {
    /// Build an `active` project with no id yet.
    pub fn new(
        user_id: EntityId,
        title: impl Into<String>,
        description: Option<String>,
        project_type: ProjectType,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: EntityId::nil(),
            user_id,
            title: title.into(),
            description,
            project_type,
            status: DEFAULT_PROJECT_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update in place and bump `updated_at`.
    pub fn apply(&mut self, input: UpdateProject) {
        self.title = input.title;
        self.description = input.description;
        self.project_type = input.project_type;
        self.updated_at = chrono::Utc::now();
    }
}
