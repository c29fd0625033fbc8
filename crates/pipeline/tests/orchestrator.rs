//! Integration tests for the generation orchestrator.
//!
//! A scripted provider stands in for the HTTP client: each call pops the
//! next canned result and records the request it received.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use atelier_core::error::CoreError;
use atelier_core::generation::{ImageStatus, DEFAULT_MODEL, DEFAULT_SIZE, NO_IMAGES_MESSAGE};
use atelier_core::project::ProjectType;
use atelier_core::types::EntityId;
use atelier_pipeline::{
    BatchGenerationRequest, EditImageRequest, GenerationError, GenerationOrchestrator,
    ImageGenerationRequest,
};
use atelier_provider::{EditRequest, GenerateRequest, ImageProvider, ProviderError};
use atelier_store::models::project::Project;
use atelier_store::EntityStore;

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

type Scripted = Result<Vec<String>, ProviderError>;

#[derive(Default)]
struct ScriptedProvider {
    script: Mutex<VecDeque<Scripted>>,
    generate_calls: Mutex<Vec<(GenerateRequest, tokio::time::Instant)>>,
    edit_calls: Mutex<Vec<EditRequest>>,
    /// Time each generate call takes before answering.
    latency: Duration,
}

impl ScriptedProvider {
    fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        })
    }

    fn slow(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            latency,
            ..Default::default()
        })
    }

    fn next(&self) -> Scripted {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec!["https://cdn.test/default.png".into()]))
    }

    fn generate_requests(&self) -> Vec<GenerateRequest> {
        self.generate_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(r, _)| r.clone())
            .collect()
    }
}

#[async_trait]
impl ImageProvider for ScriptedProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<String>, ProviderError> {
        self.generate_calls
            .lock()
            .unwrap()
            .push((request.clone(), tokio::time::Instant::now()));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.next()
    }

    async fn edit(&self, request: &EditRequest) -> Result<Vec<String>, ProviderError> {
        self.edit_calls.lock().unwrap().push(request.clone());
        self.next()
    }
}

fn upstream_failure() -> ProviderError {
    ProviderError::Api {
        status: 500,
        body: "upstream failure".into(),
    }
}

fn orchestrator(
    provider: Arc<ScriptedProvider>,
    interval: Duration,
) -> (GenerationOrchestrator, Arc<EntityStore>) {
    let store = Arc::new(EntityStore::new());
    let orchestrator = GenerationOrchestrator::new(Arc::clone(&store), provider, interval);
    (orchestrator, store)
}

async fn seed_project(store: &EntityStore, owner: EntityId) -> Project {
    store
        .create_project(Project::new(owner, "board", None, ProjectType::Storyboard))
        .await
}

fn single(prompt: &str) -> ImageGenerationRequest {
    ImageGenerationRequest {
        prompt: prompt.into(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Single generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_success_completes_record() {
    let provider = ScriptedProvider::new(vec![Ok(vec![
        "https://cdn.test/1.png".into(),
        "https://cdn.test/2.png".into(),
    ])]);
    let (orchestrator, store) = orchestrator(Arc::clone(&provider), Duration::ZERO);
    let owner = EntityId::new_v4();
    let project = seed_project(&store, owner).await;

    let outcome = orchestrator
        .generate_single(
            owner,
            ImageGenerationRequest {
                prompt: "a fox".into(),
                n: Some(2),
                project_id: Some(project.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.images.len(), 2);
    let record = store.get_image(outcome.records[0].id).await.unwrap();
    assert_eq!(record.status, ImageStatus::Completed);
    assert_eq!(record.image_url.as_deref(), Some("https://cdn.test/1.png"));
    assert_eq!(record.project_id, Some(project.id));
    assert!(record.generated_at.is_some());
    assert!(record.error.is_none());

    let sent = provider.generate_requests();
    assert_eq!(sent[0].n, 2);
}

#[tokio::test]
async fn single_applies_defaults() {
    let provider = ScriptedProvider::new(vec![]);
    let (orchestrator, store) = orchestrator(Arc::clone(&provider), Duration::ZERO);

    let outcome = orchestrator
        .generate_single(EntityId::new_v4(), single("a fox"))
        .await
        .unwrap();

    let sent = provider.generate_requests();
    assert_eq!(sent[0].model, DEFAULT_MODEL);
    assert_eq!(sent[0].size, DEFAULT_SIZE);
    assert_eq!(sent[0].n, 1);

    let record = store.get_image(outcome.records[0].id).await.unwrap();
    assert_eq!(record.model, DEFAULT_MODEL);
    assert_eq!(record.size, DEFAULT_SIZE);
}

#[tokio::test]
async fn single_provider_failure_marks_failed_and_errors() {
    let provider = ScriptedProvider::new(vec![Err(upstream_failure())]);
    let (orchestrator, store) = orchestrator(provider, Duration::ZERO);

    let err = orchestrator
        .generate_single(EntityId::new_v4(), single("a fox"))
        .await
        .unwrap_err();

    let image_id = match err {
        GenerationError::Provider { image_id, .. } => image_id,
        other => panic!("expected provider error, got {other:?}"),
    };
    let record = store.get_image(image_id).await.unwrap();
    assert_eq!(record.status, ImageStatus::Failed);
    assert!(record.error.as_deref().unwrap().contains("upstream failure"));
    assert!(record.image_url.is_none());
    assert!(record.generated_at.is_none());
}

#[tokio::test]
async fn zero_results_still_report_success_but_record_fails() {
    let provider = ScriptedProvider::new(vec![Ok(vec![])]);
    let (orchestrator, store) = orchestrator(provider, Duration::ZERO);

    let outcome = orchestrator
        .generate_single(EntityId::new_v4(), single("a fox"))
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(outcome.images.is_empty());
    let record = store.get_image(outcome.records[0].id).await.unwrap();
    assert_eq!(record.status, ImageStatus::Failed);
    assert_eq!(record.error.as_deref(), Some(NO_IMAGES_MESSAGE));
}

#[tokio::test]
async fn blank_prompt_is_rejected_before_any_record() {
    let provider = ScriptedProvider::new(vec![]);
    let (orchestrator, store) = orchestrator(Arc::clone(&provider), Duration::ZERO);

    let err = orchestrator
        .generate_single(EntityId::new_v4(), single("  "))
        .await
        .unwrap_err();

    assert_matches!(err, GenerationError::Core(CoreError::Validation(_)));
    assert_eq!(store.stats().await.images, 0);
    assert!(provider.generate_requests().is_empty());
}

#[tokio::test]
async fn unusable_project_ids_leave_image_unassociated() {
    let provider = ScriptedProvider::new(vec![]);
    let (orchestrator, store) = orchestrator(provider, Duration::ZERO);
    let owner = EntityId::new_v4();
    let someone_else = EntityId::new_v4();
    let foreign = seed_project(&store, someone_else).await;

    for raw in [
        "not-a-uuid".to_string(),
        EntityId::new_v4().to_string(),
        foreign.id.to_string(),
    ] {
        let outcome = orchestrator
            .generate_single(
                owner,
                ImageGenerationRequest {
                    prompt: "a fox".into(),
                    project_id: Some(raw.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let record = store.get_image(outcome.records[0].id).await.unwrap();
        assert_eq!(record.project_id, None, "project id {raw} must not attach");
        assert_eq!(record.status, ImageStatus::Completed);
    }
}

#[tokio::test]
async fn settled_records_are_never_left_pending() {
    let provider = ScriptedProvider::new(vec![
        Ok(vec!["https://cdn.test/1.png".into()]),
        Err(upstream_failure()),
        Ok(vec![]),
    ]);
    let (orchestrator, store) = orchestrator(provider, Duration::ZERO);
    let owner = EntityId::new_v4();

    let mut ids = Vec::new();
    for _ in 0..3 {
        match orchestrator.generate_single(owner, single("x")).await {
            Ok(outcome) => ids.push(outcome.records[0].id),
            Err(GenerationError::Provider { image_id, .. }) => ids.push(image_id),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(store.stats().await.images, 3);
    for id in ids {
        let record = store.get_image(id).await.unwrap();
        assert!(record.status.is_terminal(), "record {id} left {}", record.status);
    }
}

// ---------------------------------------------------------------------------
// Batch generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_isolates_the_failing_prompt() {
    let provider = ScriptedProvider::new(vec![
        Ok(vec!["url1".into()]),
        Err(upstream_failure()),
        Ok(vec!["url3".into()]),
    ]);
    let (orchestrator, store) = orchestrator(Arc::clone(&provider), Duration::ZERO);
    let owner = EntityId::new_v4();
    let project = seed_project(&store, owner).await;

    let outcome = orchestrator
        .generate_batch(
            owner,
            BatchGenerationRequest {
                prompts: vec!["a".into(), "b".into(), "c".into()],
                project_id: Some(project.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.images, vec!["url1", "", "url3"]);

    let statuses: Vec<_> = outcome.records.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            ImageStatus::Completed,
            ImageStatus::Failed,
            ImageStatus::Completed
        ]
    );
    let prompts: Vec<_> = outcome.records.iter().map(|r| r.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["a", "b", "c"]);

    for record in &outcome.records {
        let stored = store.get_image(record.id).await.unwrap();
        assert_eq!(stored.status, record.status);
        assert_eq!(stored.project_id, Some(project.id));
    }
    assert_eq!(store.get_images_by_project(project.id).await.len(), 3);

    let sent: Vec<_> = provider
        .generate_requests()
        .into_iter()
        .map(|r| (r.prompt, r.n))
        .collect();
    assert_eq!(
        sent,
        vec![
            ("a".to_string(), 1),
            ("b".to_string(), 1),
            ("c".to_string(), 1)
        ]
    );
}

#[tokio::test]
async fn batch_zero_result_entry_is_empty_string() {
    let provider = ScriptedProvider::new(vec![Ok(vec![]), Ok(vec!["url2".into()])]);
    let (orchestrator, _store) = orchestrator(provider, Duration::ZERO);

    let outcome = orchestrator
        .generate_batch(
            EntityId::new_v4(),
            BatchGenerationRequest {
                prompts: vec!["a".into(), "b".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.images, vec!["", "url2"]);
    assert_eq!(outcome.records[0].status, ImageStatus::Failed);
    assert_eq!(outcome.records[0].error.as_deref(), Some(NO_IMAGES_MESSAGE));
}

#[tokio::test]
async fn empty_batch_is_a_validation_error() {
    let provider = ScriptedProvider::new(vec![]);
    let (orchestrator, store) = orchestrator(provider, Duration::ZERO);

    let err = orchestrator
        .generate_batch(EntityId::new_v4(), BatchGenerationRequest::default())
        .await
        .unwrap_err();

    assert_matches!(err, GenerationError::Core(CoreError::Validation(_)));
    assert_eq!(store.stats().await.images, 0);
}

#[tokio::test]
async fn batch_blank_prompt_fails_only_its_slot() {
    let provider = ScriptedProvider::new(vec![Ok(vec!["url1".into()]), Ok(vec!["url3".into()])]);
    let (orchestrator, store) = orchestrator(Arc::clone(&provider), Duration::ZERO);

    let outcome = orchestrator
        .generate_batch(
            EntityId::new_v4(),
            BatchGenerationRequest {
                prompts: vec!["a".into(), "  ".into(), "c".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.images, vec!["url1", "", "url3"]);

    let blank = store.get_image(outcome.records[1].id).await.unwrap();
    assert_eq!(blank.status, ImageStatus::Failed);
    assert!(blank.error.as_deref().unwrap().contains("prompt"));
    assert_eq!(store.stats().await.images, 3);

    let sent: Vec<_> = provider
        .generate_requests()
        .into_iter()
        .map(|r| r.prompt)
        .collect();
    assert_eq!(sent, vec!["a".to_string(), "c".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn batch_paces_between_prompts_only() {
    let provider = ScriptedProvider::new(vec![]);
    let interval = Duration::from_secs(1);
    let (orchestrator, _store) = orchestrator(Arc::clone(&provider), interval);

    let started = tokio::time::Instant::now();
    orchestrator
        .generate_batch(
            EntityId::new_v4(),
            BatchGenerationRequest {
                prompts: vec!["a".into(), "b".into(), "c".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Three prompts incur exactly two pauses.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "elapsed {elapsed:?}");

    let calls = provider.generate_calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    for pair in calls.windows(2) {
        assert!(pair[1].1 - pair[0].1 >= interval);
    }
}

#[tokio::test(start_paused = true)]
async fn single_prompt_batch_does_not_sleep() {
    let provider = ScriptedProvider::new(vec![]);
    let (orchestrator, _store) = orchestrator(provider, Duration::from_secs(1));

    let started = tokio::time::Instant::now();
    orchestrator
        .generate_batch(
            EntityId::new_v4(),
            BatchGenerationRequest {
                prompts: vec!["only".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_is_stateless_pass_through() {
    let provider = ScriptedProvider::new(vec![Ok(vec!["data:image/png;base64,QUJD".into()])]);
    let (orchestrator, store) = orchestrator(Arc::clone(&provider), Duration::ZERO);

    let images = orchestrator
        .edit(EditImageRequest {
            image: "https://cdn.test/src.png".into(),
            prompt: "add a moon".into(),
            mask: Some(String::new()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(images, vec!["data:image/png;base64,QUJD"]);
    assert_eq!(store.stats().await.images, 0);

    let calls = provider.edit_calls.lock().unwrap();
    assert_eq!(calls[0].model, DEFAULT_MODEL);
    assert_eq!(calls[0].n, 1);
    assert_eq!(calls[0].mask, None);
}

#[tokio::test]
async fn edit_failure_surfaces_as_edit_error() {
    let provider = ScriptedProvider::new(vec![Err(upstream_failure())]);
    let (orchestrator, store) = orchestrator(provider, Duration::ZERO);

    let err = orchestrator
        .edit(EditImageRequest {
            image: "https://cdn.test/src.png".into(),
            prompt: "add a moon".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_matches!(err, GenerationError::Edit(ProviderError::Api { status: 500, .. }));
    assert_eq!(store.stats().await.images, 0);
}

#[tokio::test]
async fn edit_requires_source_image() {
    let provider = ScriptedProvider::new(vec![]);
    let (orchestrator, _store) = orchestrator(provider, Duration::ZERO);

    let err = orchestrator
        .edit(EditImageRequest {
            prompt: "add a moon".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_matches!(err, GenerationError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Abandoned callers
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn dropped_batch_still_settles_every_prompt() {
    let provider = ScriptedProvider::slow(Duration::from_secs(20));
    let (orchestrator, store) = orchestrator(Arc::clone(&provider), Duration::from_secs(1));
    let owner = EntityId::new_v4();
    let project = seed_project(&store, owner).await;

    let batch = orchestrator.generate_batch(
        owner,
        BatchGenerationRequest {
            prompts: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            project_id: Some(project.id.to_string()),
            ..Default::default()
        },
    );
    let abandoned = tokio::time::timeout(Duration::from_secs(30), batch).await;
    assert!(abandoned.is_err(), "caller should have given up first");

    tokio::time::sleep(Duration::from_secs(600)).await;

    assert_eq!(provider.generate_requests().len(), 4);
    let records = store.get_images_by_project(project.id).await;
    assert_eq!(records.len(), 4);
    for record in records {
        assert_eq!(record.status, ImageStatus::Completed, "prompt {}", record.prompt);
    }
}

#[tokio::test(start_paused = true)]
async fn dropped_single_still_settles_its_record() {
    let provider = ScriptedProvider::slow(Duration::from_secs(20));
    let (orchestrator, store) = orchestrator(Arc::clone(&provider), Duration::ZERO);
    let owner = EntityId::new_v4();
    let project = seed_project(&store, owner).await;

    let abandoned = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.generate_single(
            owner,
            ImageGenerationRequest {
                prompt: "a fox".into(),
                project_id: Some(project.id.to_string()),
                ..Default::default()
            },
        ),
    )
    .await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_secs(60)).await;

    let records = store.get_images_by_project(project.id).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ImageStatus::Completed);
    assert_eq!(provider.generate_requests().len(), 1);
}
