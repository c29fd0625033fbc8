use std::sync::Arc;
use std::time::Duration;

use atelier_core::error::CoreError;
use atelier_core::generation::{
    resolve_count, resolve_model, resolve_size, validate_prompt, NO_IMAGES_MESSAGE,
};
use atelier_core::types::EntityId;
use atelier_provider::{EditRequest, GenerateRequest, ImageProvider, ProviderError};
use atelier_store::models::image::Image;
use atelier_store::EntityStore;

use crate::error::GenerationError;
use crate::request::{BatchGenerationRequest, EditImageRequest, ImageGenerationRequest};

/// Result of a generation call as reported to the caller.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Overall success. Stays `true` when the provider answered with no
    /// usable image and when individual batch entries failed.
    pub success: bool,
    /// Single: every reference returned. Batch: one entry per prompt, with
    /// `""` for prompts that produced nothing.
    pub images: Vec<String>,
    /// The settled image records, in request order.
    pub records: Vec<Image>,
}

/// One prompt driven from `pending` to a terminal status.
struct Attempt {
    image: Image,
    result: Result<Vec<String>, ProviderError>,
}

/// Drives image requests through the provider and records their lifecycle.
///
/// Generation runs on a spawned task that the caller awaits. Dropping the
/// caller's future (request timeout, client disconnect) leaves the task
/// running, so every record it created still reaches a terminal status and
/// the remaining batch prompts are still sent.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    store: Arc<EntityStore>,
    provider: Arc<dyn ImageProvider>,
    min_request_interval: Duration,
}

impl GenerationOrchestrator {
    /// `min_request_interval` is the pause inserted between consecutive
    /// prompts of a batch.
    pub fn new(
        store: Arc<EntityStore>,
        provider: Arc<dyn ImageProvider>,
        min_request_interval: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            min_request_interval,
        }
    }

    /// Generate one image for `owner_id`.
    ///
    /// The record is persisted before the provider is called and again once
    /// it is settled. A provider error is returned as
    /// [`GenerationError::Provider`] after the record is marked `failed`.
    pub async fn generate_single(
        &self,
        owner_id: EntityId,
        request: ImageGenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        validate_prompt(&request.prompt)?;

        let this = self.clone();
        tokio::spawn(async move { this.run_single(owner_id, request).await })
            .await
            .map_err(task_failed)?
    }

    async fn run_single(
        &self,
        owner_id: EntityId,
        request: ImageGenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let model = resolve_model(request.model.as_deref());
        let size = resolve_size(request.size.as_deref());
        let n = resolve_count(request.n);
        let project_id = self
            .resolve_project(owner_id, request.project_id.as_deref())
            .await;

        let attempt = self
            .attempt(request.prompt, model, size, n, project_id)
            .await?;

        match attempt.result {
            Ok(images) => Ok(GenerationOutcome {
                success: true,
                images,
                records: vec![attempt.image],
            }),
            Err(source) => Err(GenerationError::Provider {
                image_id: attempt.image.id,
                source,
            }),
        }
    }

    /// Generate one image per prompt, strictly in order.
    ///
    /// Each prompt is settled before the next starts, and the orchestrator
    /// sleeps for the minimum request interval between prompts (not after
    /// the last). A failing or blank prompt contributes `""` and never
    /// aborts the batch.
    pub async fn generate_batch(
        &self,
        owner_id: EntityId,
        request: BatchGenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        if request.prompts.is_empty() {
            return Err(CoreError::Validation("prompts must not be empty".to_string()).into());
        }

        let this = self.clone();
        tokio::spawn(async move { this.run_batch(owner_id, request).await })
            .await
            .map_err(task_failed)?
    }

    async fn run_batch(
        &self,
        owner_id: EntityId,
        request: BatchGenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let model = resolve_model(request.model.as_deref());
        let size = resolve_size(request.size.as_deref());
        let project_id = self
            .resolve_project(owner_id, request.project_id.as_deref())
            .await;

        let total = request.prompts.len();
        let mut images = Vec::with_capacity(total);
        let mut records = Vec::with_capacity(total);

        for (index, prompt) in request.prompts.into_iter().enumerate() {
            let (image, reference) = match validate_prompt(&prompt) {
                Ok(()) => {
                    let attempt = self
                        .attempt(prompt, model.clone(), size.clone(), 1, project_id)
                        .await?;
                    let reference = match &attempt.result {
                        Ok(refs) => refs.first().cloned().unwrap_or_default(),
                        Err(_) => String::new(),
                    };
                    (attempt.image, reference)
                }
                Err(rejected) => {
                    let image = self
                        .reject(prompt, model.clone(), size.clone(), project_id, rejected)
                        .await?;
                    (image, String::new())
                }
            };
            images.push(reference);
            records.push(image);

            if index + 1 < total && !self.min_request_interval.is_zero() {
                tokio::time::sleep(self.min_request_interval).await;
            }
        }

        let failed = images.iter().filter(|r| r.is_empty()).count();
        tracing::info!(
            owner_id = %owner_id,
            total,
            failed,
            "Batch generation finished"
        );

        Ok(GenerationOutcome {
            success: true,
            images,
            records,
        })
    }

    /// Edit an existing image. Stateless: no record is created or changed.
    pub async fn edit(&self, request: EditImageRequest) -> Result<Vec<String>, GenerationError> {
        validate_prompt(&request.prompt)?;
        if request.image.trim().is_empty() {
            return Err(CoreError::Validation("image is required".to_string()).into());
        }

        let provider_request = EditRequest {
            model: resolve_model(request.model.as_deref()),
            image: request.image,
            prompt: request.prompt,
            size: resolve_size(request.size.as_deref()),
            n: 1,
            mask: request.mask.filter(|m| !m.is_empty()),
        };

        self.provider
            .edit(&provider_request)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Image edit failed");
                GenerationError::Edit(e)
            })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Persist a pending record, call the provider, and persist the settled
    /// record regardless of outcome.
    async fn attempt(
        &self,
        prompt: String,
        model: String,
        size: String,
        n: u32,
        project_id: Option<EntityId>,
    ) -> Result<Attempt, GenerationError> {
        let mut image = self
            .store
            .create_image(Image::pending(
                prompt.clone(),
                model.clone(),
                size.clone(),
                project_id,
            ))
            .await;

        let request = GenerateRequest {
            model,
            prompt,
            size,
            n,
        };
        let result = self.provider.generate(&request).await;

        match &result {
            Ok(refs) => match refs.first() {
                Some(first) => {
                    image.mark_completed(first.clone())?;
                    tracing::info!(image_id = %image.id, results = refs.len(), "Image generated");
                }
                None => {
                    image.mark_failed(NO_IMAGES_MESSAGE)?;
                    tracing::warn!(image_id = %image.id, "Provider returned no images");
                }
            },
            Err(e) => {
                image.mark_failed(e.to_string())?;
                tracing::warn!(image_id = %image.id, error = %e, "Image generation failed");
            }
        }

        self.store.update_image(image.clone()).await;
        Ok(Attempt { image, result })
    }

    /// Record a batch prompt that cannot be sent as `failed` without calling
    /// the provider.
    async fn reject(
        &self,
        prompt: String,
        model: String,
        size: String,
        project_id: Option<EntityId>,
        reason: CoreError,
    ) -> Result<Image, GenerationError> {
        let mut image = Image::pending(prompt, model, size, project_id);
        image.mark_failed(reason.to_string())?;
        let image = self.store.create_image(image).await;
        tracing::warn!(image_id = %image.id, error = %reason, "Batch prompt rejected");
        Ok(image)
    }

    /// Parse and authorize the caller-supplied project id. Anything that is
    /// not a project owned by `owner_id` leaves the image unassociated.
    async fn resolve_project(&self, owner_id: EntityId, raw: Option<&str>) -> Option<EntityId> {
        let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
        let Ok(project_id) = uuid::Uuid::parse_str(raw) else {
            tracing::debug!(project_id = raw, "Ignoring unparseable project id");
            return None;
        };
        if self.store.owns_project(owner_id, project_id).await {
            Some(project_id)
        } else {
            tracing::debug!(%project_id, %owner_id, "Ignoring project not owned by requester");
            None
        }
    }
}

fn task_failed(e: tokio::task::JoinError) -> GenerationError {
    CoreError::Internal(format!("Generation task failed: {e}")).into()
}
