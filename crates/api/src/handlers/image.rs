//! Handlers for the `/images` resource.
//!
//! Images are reachable only through a project the caller owns. Images with
//! no project, or whose project was deleted, are reported as not found.

use atelier_core::data_url::{DataUrl, INLINE_IMAGE_MIME};
use atelier_core::error::CoreError;
use atelier_core::types::EntityId;
use atelier_store::models::image::Image;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /images`.
#[derive(Debug, Deserialize)]
pub struct ImageListQuery {
    /// Restrict the listing to one of the caller's projects.
    pub project_id: Option<String>,
}

/// GET /api/v1/images[?project_id=]
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ImageListQuery>,
) -> AppResult<Json<Vec<Image>>> {
    let raw = query
        .project_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let images = match raw {
        Some(raw) => {
            let project_id: EntityId = raw
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid project id '{raw}'")))?;
            if !state.store.owns_project(auth.user_id, project_id).await {
                return Err(AppError::Core(CoreError::NotFound {
                    entity: "Project",
                    id: project_id,
                }));
            }
            state.store.get_images_by_project(project_id).await
        }
        None => state.store.images_for_user(auth.user_id).await,
    };
    Ok(Json(images))
}

/// GET /api/v1/images/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EntityId>,
) -> AppResult<Json<Image>> {
    let image = find_owned(&state, &auth, id).await?;
    Ok(Json(image))
}

/// DELETE /api/v1/images/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    find_owned(&state, &auth, id).await?;
    state.store.delete_image(id).await;
    tracing::info!(image_id = %id, user_id = %auth.user_id, "Image deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/images/{id}/download
///
/// Serves an inline payload as bytes, redirects (307) to a hosted URL, or
/// returns 404 when the image has neither.
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EntityId>,
) -> AppResult<Response> {
    let image = find_owned(&state, &auth, id).await?;

    if let Some(data) = image.image_data.as_deref().filter(|d| !d.is_empty()) {
        let (mime, bytes) = match DataUrl::parse(data) {
            Some(parsed) => {
                let bytes = parsed.decode().map_err(|e| {
                    AppError::InternalError(format!("Stored payload for image {id}: {e}"))
                })?;
                (parsed.mime.to_string(), bytes)
            }
            None => (INLINE_IMAGE_MIME.to_string(), data.as_bytes().to_vec()),
        };
        let disposition = format!(
            "attachment; filename=\"image-{id}.{}\"",
            extension_for(&mime)
        );
        return Ok((
            [
                (header::CONTENT_TYPE, mime),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            bytes,
        )
            .into_response());
    }

    match image.image_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => Ok(Redirect::temporary(url).into_response()),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Image data",
            id,
        })),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_owned(state: &AppState, auth: &AuthUser, id: EntityId) -> AppResult<Image> {
    state
        .store
        .owned_image(auth.user_id, id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Image",
            id,
        }))
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}
