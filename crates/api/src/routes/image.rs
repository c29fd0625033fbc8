//! Route definitions for the `/images` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::image;
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// GET    /               -> list
/// GET    /{id}           -> get_by_id
/// DELETE /{id}           -> delete
/// GET    /{id}/download  -> download
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(image::list))
        .route("/{id}", get(image::get_by_id).delete(image::delete))
        .route("/{id}/download", get(image::download))
}
