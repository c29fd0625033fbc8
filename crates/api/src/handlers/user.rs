//! Handlers for the authenticated user's own profile.

use atelier_core::error::CoreError;
use atelier_store::models::user::User;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `PUT /user/profile`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    pub avatar: Option<String>,
}

/// GET /api/v1/user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<User>> {
    let user = load_user(&state, &auth).await?;
    Ok(Json(user))
}

/// PUT /api/v1/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<User>> {
    input.validate()?;
    let mut user = load_user(&state, &auth).await?;

    if let Some(username) = input.username {
        if username != user.username {
            let taken = state.store.get_user_by_username(&username).await;
            if taken.is_some_and(|other| other.id != user.id) {
                return Err(AppError::Core(CoreError::Conflict(
                    "Username is already taken".into(),
                )));
            }
            user.username = username;
        }
    }
    if let Some(avatar) = input.avatar {
        user.avatar = Some(avatar).filter(|a| !a.is_empty());
    }

    user.touch();
    state.store.update_user(user.clone()).await;
    Ok(Json(user))
}

/// The token may outlive its user; a missing record is a 404.
async fn load_user(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    state
        .store
        .get_user(auth.user_id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))
}
