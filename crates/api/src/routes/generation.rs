//! Route definitions for the `/generate` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Routes mounted at `/generate`.
///
/// ```text
/// POST /image -> generate_image
/// POST /batch -> generate_batch
/// POST /edit  -> edit_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/image", post(generation::generate_image))
        .route("/batch", post(generation::generate_batch))
        .route("/edit", post(generation::edit_image))
}
