use std::collections::HashMap;

use atelier_core::types::EntityId;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::image::Image;
use crate::models::project::Project;
use crate::models::user::User;

/// The three entity collections guarded together.
#[derive(Default)]
pub(crate) struct Collections {
    pub(crate) users: HashMap<EntityId, User>,
    pub(crate) projects: HashMap<EntityId, Project>,
    pub(crate) images: HashMap<EntityId, Image>,
}

/// Entity counts, reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub users: usize,
    pub projects: usize,
    pub images: usize,
}

/// Volatile holder of every user, project, and image record.
///
/// A single `RwLock` guards all three collections: reads run concurrently,
/// any write excludes every other access across all entity kinds. Each method
/// is atomic on its own; check-then-act sequences spanning several calls
/// (e.g. "email unused, then create") are not, and may race.
///
/// Per-collection locks or a sharded map would lift the cross-entity write
/// contention without changing this API.
///
/// Reads return clones. Updates replace the stored record wholesale and
/// silently do nothing for unknown ids; deletes of unknown ids are no-ops.
/// Uniqueness of email and username is the caller's responsibility.
pub struct EntityStore {
    pub(crate) inner: RwLock<Collections>,
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
        }
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Insert a user, assigning an id if it is nil. Returns the stored record.
    pub async fn create_user(&self, mut user: User) -> User {
        assign_id(&mut user.id);
        self.inner
            .write()
            .await
            .users
            .insert(user.id, user.clone());
        tracing::debug!(user_id = %user.id, "User created");
        user
    }

    pub async fn get_user(&self, id: EntityId) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    /// Linear scan for the first user with this email.
    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Linear scan for the first user with this username.
    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Replace an existing user. Returns `false` (and stores nothing) if the
    /// id is unknown.
    pub async fn update_user(&self, user: User) -> bool {
        replace(&mut self.inner.write().await.users, user.id, user)
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub async fn create_project(&self, mut project: Project) -> Project {
        assign_id(&mut project.id);
        self.inner
            .write()
            .await
            .projects
            .insert(project.id, project.clone());
        tracing::debug!(project_id = %project.id, user_id = %project.user_id, "Project created");
        project
    }

    pub async fn get_project(&self, id: EntityId) -> Option<Project> {
        self.inner.read().await.projects.get(&id).cloned()
    }

    /// All projects owned by `user_id`, in no particular order.
    pub async fn get_projects_by_user(&self, user_id: EntityId) -> Vec<Project> {
        self.inner
            .read()
            .await
            .projects
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn update_project(&self, project: Project) -> bool {
        replace(&mut self.inner.write().await.projects, project.id, project)
    }

    /// Remove a project. Its images are left in place.
    pub async fn delete_project(&self, id: EntityId) -> bool {
        let removed = self.inner.write().await.projects.remove(&id).is_some();
        if removed {
            tracing::debug!(project_id = %id, "Project deleted");
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    pub async fn create_image(&self, mut image: Image) -> Image {
        assign_id(&mut image.id);
        self.inner
            .write()
            .await
            .images
            .insert(image.id, image.clone());
        tracing::debug!(image_id = %image.id, status = %image.status, "Image record created");
        image
    }

    pub async fn get_image(&self, id: EntityId) -> Option<Image> {
        self.inner.read().await.images.get(&id).cloned()
    }

    /// All images attached to `project_id`, in no particular order.
    pub async fn get_images_by_project(&self, project_id: EntityId) -> Vec<Image> {
        self.inner
            .read()
            .await
            .images
            .values()
            .filter(|i| i.project_id == Some(project_id))
            .cloned()
            .collect()
    }

    pub async fn update_image(&self, image: Image) -> bool {
        replace(&mut self.inner.write().await.images, image.id, image)
    }

    pub async fn delete_image(&self, id: EntityId) -> bool {
        let removed = self.inner.write().await.images.remove(&id).is_some();
        if removed {
            tracing::debug!(image_id = %id, "Image deleted");
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    pub async fn stats(&self) -> StoreStats {
        let inner = self.inner.read().await;
        StoreStats {
            users: inner.users.len(),
            projects: inner.projects.len(),
            images: inner.images.len(),
        }
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

fn assign_id(id: &mut EntityId) {
    if id.is_nil() {
        *id = EntityId::new_v4();
    }
}

fn replace<T>(map: &mut HashMap<EntityId, T>, id: EntityId, value: T) -> bool {
    match map.get_mut(&id) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}
