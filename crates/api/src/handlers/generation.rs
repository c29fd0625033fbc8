//! Handlers for `/generate`: single, batch and edit.
//!
//! All three take the caller's identity from the token. Single and batch
//! requests persist image records through the orchestrator; edits do not.

use atelier_core::types::EntityId;
use atelier_pipeline::{
    BatchGenerationRequest, EditImageRequest, GenerationOutcome, ImageGenerationRequest,
};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /generate/image`.
#[derive(Debug, Deserialize)]
pub struct GenerateImageBody {
    pub prompt: String,
    pub model: Option<String>,
    pub size: Option<String>,
    pub n: Option<u32>,
    pub project_id: Option<String>,
}

/// Request body for `POST /generate/batch`.
#[derive(Debug, Deserialize)]
pub struct GenerateBatchBody {
    pub prompts: Vec<String>,
    pub model: Option<String>,
    pub size: Option<String>,
    pub project_id: Option<String>,
}

/// Request body for `POST /generate/edit`.
#[derive(Debug, Deserialize)]
pub struct EditImageBody {
    pub image: String,
    pub prompt: String,
    pub model: Option<String>,
    pub size: Option<String>,
    pub mask: Option<String>,
}

/// Response for single and batch generation.
#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub success: bool,
    /// Result references; for a batch, one per prompt with `""` for failures.
    pub images: Vec<String>,
    /// Ids of the image records, in the same order as the prompts.
    pub image_ids: Vec<EntityId>,
    pub message: String,
}

/// Response for an edit.
#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub success: bool,
    pub images: Vec<String>,
    pub message: String,
}

impl GenerationResponse {
    fn from_outcome(outcome: GenerationOutcome, message: String) -> Self {
        Self {
            success: outcome.success,
            images: outcome.images,
            image_ids: outcome.records.iter().map(|r| r.id).collect(),
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/generate/image
///
/// Returns 500 when the provider call fails; the record stays as `failed`.
pub async fn generate_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<GenerateImageBody>,
) -> AppResult<Json<GenerationResponse>> {
    let request = ImageGenerationRequest {
        prompt: input.prompt,
        model: input.model,
        size: input.size,
        n: input.n,
        project_id: input.project_id,
    };
    let outcome = state
        .orchestrator
        .generate_single(auth.user_id, request)
        .await?;

    Ok(Json(GenerationResponse::from_outcome(
        outcome,
        "Image generated successfully".to_string(),
    )))
}

/// POST /api/v1/generate/batch
///
/// Prompts run one after another with pacing; a failing prompt yields `""`
/// in its slot and the response is still 200.
pub async fn generate_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<GenerateBatchBody>,
) -> AppResult<Json<GenerationResponse>> {
    let request = BatchGenerationRequest {
        prompts: input.prompts,
        model: input.model,
        size: input.size,
        project_id: input.project_id,
    };
    let outcome = state
        .orchestrator
        .generate_batch(auth.user_id, request)
        .await?;

    let total = outcome.images.len();
    let succeeded = outcome.images.iter().filter(|r| !r.is_empty()).count();
    let message = format!("Batch finished: {succeeded} of {total} images generated");

    Ok(Json(GenerationResponse::from_outcome(outcome, message)))
}

/// POST /api/v1/generate/edit
pub async fn edit_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<EditImageBody>,
) -> AppResult<Json<EditResponse>> {
    let request = EditImageRequest {
        image: input.image,
        prompt: input.prompt,
        model: input.model,
        size: input.size,
        mask: input.mask,
    };
    let images = state.orchestrator.edit(request).await?;

    Ok(Json(EditResponse {
        success: true,
        images,
        message: "Image edited successfully".to_string(),
    }))
}
