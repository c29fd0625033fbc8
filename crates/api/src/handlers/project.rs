//! Handlers for the `/projects` resource.
//!
//! Every route is scoped to the caller: a project owned by someone else is
//! reported as not found.

use atelier_core::error::CoreError;
use atelier_core::project::ProjectType;
use atelier_core::types::EntityId;
use atelier_store::models::project::{Project, UpdateProject};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub project_type: String,
}

/// Request body for `PUT /projects/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
}

/// A project together with the number of images attached to it.
#[derive(Debug, Serialize)]
pub struct ProjectWithCount {
    #[serde(flatten)]
    pub project: Project,
    pub image_count: usize,
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;
    let project_type: ProjectType = input.project_type.parse()?;

    let project = state
        .store
        .create_project(Project::new(
            auth.user_id,
            input.title,
            non_empty(input.description),
            project_type,
        ))
        .await;
    tracing::info!(project_id = %project.id, user_id = %auth.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<ProjectWithCount>>> {
    let projects = state.store.get_projects_by_user(auth.user_id).await;

    let mut result = Vec::with_capacity(projects.len());
    for project in projects {
        let image_count = state.store.get_images_by_project(project.id).await.len();
        result.push(ProjectWithCount {
            project,
            image_count,
        });
    }
    Ok(Json(result))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Project>> {
    let project = find_owned(&state, &auth, id).await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    input.validate()?;
    let mut project = find_owned(&state, &auth, id).await?;

    let project_type = match input.project_type {
        Some(raw) => raw.parse()?,
        None => project.project_type,
    };
    let update = UpdateProject {
        title: input.title.unwrap_or_else(|| project.title.clone()),
        description: match input.description {
            Some(description) => non_empty(Some(description)),
            None => project.description.clone(),
        },
        project_type,
    };
    project.apply(update);

    state.store.update_project(project.clone()).await;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Images attached to the project are left in place.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    find_owned(&state, &auth, id).await?;
    state.store.delete_project(id).await;
    tracing::info!(project_id = %id, user_id = %auth.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_owned(state: &AppState, auth: &AuthUser, id: EntityId) -> AppResult<Project> {
    state
        .store
        .owned_project(auth.user_id, id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
