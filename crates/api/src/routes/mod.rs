pub mod auth;
pub mod generation;
pub mod health;
pub mod image;
pub mod project;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
///
/// /user/profile                        get, update own profile
///
/// /projects                            list, create
/// /projects/{id}                       get, update, delete
///
/// /generate/image                      single generation
/// /generate/batch                      paced batch generation
/// /generate/edit                       stateless edit
///
/// /images                              list (optional ?project_id=)
/// /images/{id}                         get, delete
/// /images/{id}/download                bytes or redirect
/// ```
///
/// Everything except `/auth/*` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/user", user::router())
        .nest("/projects", project::router())
        .nest("/generate", generation::router())
        .nest("/images", image::router())
}
