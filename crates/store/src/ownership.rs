//! Ownership checks for projects and images.
//!
//! A project belongs to its `user_id`; an image belongs to whoever owns its
//! project. Images without a project, or whose project has been deleted,
//! belong to nobody. Each check runs under a single read lock so the
//! image -> project -> user chain is evaluated against one consistent view.
//!
//! Callers must report a denial exactly like a missing resource so that other
//! users' records cannot be probed for existence.

use atelier_core::types::EntityId;

use crate::models::image::Image;
use crate::models::project::Project;
use crate::store::{Collections, EntityStore};

impl EntityStore {
    /// The project, if it exists and `user_id` owns it.
    pub async fn owned_project(&self, user_id: EntityId, project_id: EntityId) -> Option<Project> {
        let inner = self.inner.read().await;
        project_if_owned(&inner, user_id, project_id).cloned()
    }

    /// The image, if it exists and its project is owned by `user_id`.
    pub async fn owned_image(&self, user_id: EntityId, image_id: EntityId) -> Option<Image> {
        let inner = self.inner.read().await;
        let image = inner.images.get(&image_id)?;
        project_if_owned(&inner, user_id, image.project_id?)?;
        Some(image.clone())
    }

    pub async fn owns_project(&self, user_id: EntityId, project_id: EntityId) -> bool {
        self.owned_project(user_id, project_id).await.is_some()
    }

    pub async fn owns_image(&self, user_id: EntityId, image_id: EntityId) -> bool {
        self.owned_image(user_id, image_id).await.is_some()
    }

    /// Every image reachable through a project owned by `user_id`.
    pub async fn images_for_user(&self, user_id: EntityId) -> Vec<Image> {
        let inner = self.inner.read().await;
        inner
            .images
            .values()
            .filter(|image| {
                image
                    .project_id
                    .and_then(|pid| project_if_owned(&inner, user_id, pid))
                    .is_some()
            })
            .cloned()
            .collect()
    }
}

fn project_if_owned(
    inner: &Collections,
    user_id: EntityId,
    project_id: EntityId,
) -> Option<&Project> {
    inner
        .projects
        .get(&project_id)
        .filter(|project| project.user_id == user_id)
}
