use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flowgen_core::error::Result;
use flowgen_core::{
    DiagramGenerator, DiagramRecord, DiagramResponse, FlowgenError, HistoryRepository, ViewMode,
};
use tokio::sync::Notify;

use super::{DiagramSession, GenerateOutcome};

// Mock generator answering from a queue of canned results
struct MockGenerator {
    replies: Mutex<VecDeque<Result<DiagramResponse>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl MockGenerator {
    fn new(replies: Vec<Result<DiagramResponse>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    fn gated(replies: Vec<Result<DiagramResponse>>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(replies)
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiagramGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> Result<DiagramResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FlowgenError::generation("no reply queued")))
    }
}

// Mock repository keeping the last saved list in memory
#[derive(Default)]
struct MockRepository {
    stored: Mutex<Option<Vec<DiagramRecord>>>,
    load_error: bool,
    saves: AtomicUsize,
}

impl MockRepository {
    fn with_records(records: Vec<DiagramRecord>) -> Self {
        Self {
            stored: Mutex::new(Some(records)),
            ..Self::default()
        }
    }

    fn corrupted() -> Self {
        Self {
            load_error: true,
            ..Self::default()
        }
    }

    fn stored_ids(&self) -> Vec<String> {
        self.stored
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.id)
            .collect()
    }
}

#[async_trait]
impl HistoryRepository for MockRepository {
    async fn load(&self) -> Result<Vec<DiagramRecord>> {
        if self.load_error {
            return Err(FlowgenError::Serialization {
                format: "JSON".to_string(),
                message: "expected value at line 1".to_string(),
            });
        }
        Ok(self.stored.lock().unwrap().clone().unwrap_or_default())
    }

    async fn save(&self, records: &[DiagramRecord]) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = Some(records.to_vec());
        Ok(())
    }
}

fn response(title: &str) -> DiagramResponse {
    DiagramResponse {
        title: title.to_string(),
        diagram_source: "graph TD\nA-->B".to_string(),
        explanation: "Fluxo.".to_string(),
    }
}

fn record(id: &str, title: &str) -> DiagramRecord {
    DiagramRecord {
        id: id.to_string(),
        title: title.to_string(),
        diagram_source: "graph LR\nX-->Y".to_string(),
        explanation: String::new(),
        created_at: 1_700_000_000_000,
    }
}

async fn session(
    generator: MockGenerator,
    repository: MockRepository,
) -> (DiagramSession, Arc<MockGenerator>, Arc<MockRepository>) {
    let generator = Arc::new(generator);
    let repository = Arc::new(repository);
    let session = DiagramSession::load(generator.clone(), repository.clone()).await;
    (session, generator, repository)
}

#[tokio::test]
async fn test_blank_prompt_is_ignored_without_request() {
    let (session, generator, repository) =
        session(MockGenerator::new(vec![]), MockRepository::default()).await;
    session.set_prompt("   \n\t").await;

    assert_eq!(session.generate("").await, GenerateOutcome::Ignored);
    assert_eq!(session.submit().await, GenerateOutcome::Ignored);

    assert_eq!(generator.calls(), 0);
    assert_eq!(repository.saves.load(Ordering::SeqCst), 0);
    assert!(session.history().await.is_empty());
    assert_eq!(session.prompt().await, "   \n\t");
}

#[tokio::test]
async fn test_successful_generation_prepends_and_selects() {
    let (session, _, repository) = session(
        MockGenerator::new(vec![Ok(response("Login Flow"))]),
        MockRepository::with_records(vec![record("old", "Old")]),
    )
    .await;
    session.set_prompt("Fluxograma de login").await;

    let GenerateOutcome::Created(created) = session.submit().await else {
        panic!("expected a created record");
    };

    let history = session.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], created);
    assert_eq!(history[0].title, "Login Flow");
    assert_ne!(created.id, "old");
    assert_eq!(session.current().await, Some(created.clone()));
    assert_eq!(session.prompt().await, "");
    assert!(!session.is_busy());
    assert_eq!(repository.stored_ids(), vec![created.id, "old".to_string()]);
}

#[tokio::test]
async fn test_failed_generation_sets_fixed_message_only() {
    let (session, _, repository) = session(
        MockGenerator::new(vec![Err(FlowgenError::generation("HTTP 503: overloaded"))]),
        MockRepository::with_records(vec![record("a", "A")]),
    )
    .await;
    session.select("a").await;
    session.set_prompt("Mapa mental de IA").await;

    assert_eq!(session.submit().await, GenerateOutcome::Failed);

    assert_eq!(
        session.error().await.as_deref(),
        Some("Não foi possível gerar. Tente novamente.")
    );
    assert_eq!(session.history().await.len(), 1);
    assert_eq!(session.current_id().await.as_deref(), Some("a"));
    assert_eq!(session.prompt().await, "Mapa mental de IA");
    assert!(!session.is_busy());
    assert_eq!(repository.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_next_attempt_clears_previous_error() {
    let (session, _, _) = session(
        MockGenerator::new(vec![
            Err(FlowgenError::generation("boom")),
            Ok(response("Retry")),
        ]),
        MockRepository::default(),
    )
    .await;

    assert_eq!(session.generate("x").await, GenerateOutcome::Failed);
    assert!(session.error().await.is_some());
    assert!(matches!(
        session.generate("x").await,
        GenerateOutcome::Created(_)
    ));
    assert_eq!(session.error().await, None);
}

#[tokio::test]
async fn test_second_request_while_busy_is_rejected() {
    let gate = Arc::new(Notify::new());
    let (session, generator, _) = session(
        MockGenerator::gated(vec![Ok(response("First"))], gate.clone()),
        MockRepository::default(),
    )
    .await;
    let session = Arc::new(session);

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.generate("first").await })
    };
    while !session.is_busy() {
        tokio::task::yield_now().await;
    }

    assert_eq!(session.generate("second").await, GenerateOutcome::Busy);

    gate.notify_one();
    assert!(matches!(first.await.unwrap(), GenerateOutcome::Created(_)));
    assert!(!session.is_busy());
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_select_unknown_id_unsets_selection() {
    let (session, _, _) = session(
        MockGenerator::new(vec![]),
        MockRepository::with_records(vec![record("a", "A"), record("b", "B")]),
    )
    .await;

    assert_eq!(session.select("b").await.map(|r| r.id), Some("b".to_string()));
    assert_eq!(session.select("stale").await, None);
    assert_eq!(session.current().await, None);

    assert_eq!(session.select_index(0).await.map(|r| r.id), Some("a".to_string()));
    assert_eq!(session.select_index(9).await, None);
    assert_eq!(session.current_id().await, None);
}

#[tokio::test]
async fn test_delete_semantics() {
    let (session, _, repository) = session(
        MockGenerator::new(vec![]),
        MockRepository::with_records(vec![record("a", "A"), record("b", "B"), record("c", "C")]),
    )
    .await;

    // Unknown id: nothing changes, nothing saved.
    assert_eq!(session.delete("zzz").await, None);
    assert_eq!(session.history().await.len(), 3);
    assert_eq!(repository.saves.load(Ordering::SeqCst), 0);

    // Deleting another record keeps the selection.
    session.select("a").await;
    assert!(session.delete("b").await.is_some());
    assert_eq!(session.current_id().await.as_deref(), Some("a"));
    assert_eq!(repository.stored_ids(), vec!["a", "c"]);

    // Deleting the selected record clears it.
    assert!(session.delete("a").await.is_some());
    assert_eq!(session.current_id().await, None);
    assert_eq!(repository.stored_ids(), vec!["c"]);
}

#[tokio::test]
async fn test_corrupted_store_starts_empty() {
    let (session, _, _) = session(MockGenerator::new(vec![]), MockRepository::corrupted()).await;
    assert!(session.history().await.is_empty());
    assert_eq!(session.error().await, None);
}

#[tokio::test]
async fn test_duplicate_stored_ids_are_collapsed() {
    let (session, _, _) = session(
        MockGenerator::new(vec![]),
        MockRepository::with_records(vec![record("a", "first"), record("a", "second")]),
    )
    .await;
    let history = session.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].title, "first");
}

#[tokio::test]
async fn test_new_diagram_view_mode_and_copy() {
    let (session, _, _) = session(
        MockGenerator::new(vec![]),
        MockRepository::with_records(vec![record("a", "A")]),
    )
    .await;

    assert_eq!(session.copy_source().await, None);
    session.select("a").await;
    assert_eq!(session.copy_source().await.as_deref(), Some("graph LR\nX-->Y"));

    assert_eq!(session.view_mode().await, ViewMode::Preview);
    assert_eq!(session.toggle_view().await, ViewMode::Code);
    session.set_view_mode(ViewMode::Preview).await;
    assert_eq!(session.view_mode().await, ViewMode::Preview);

    session.new_diagram().await;
    assert_eq!(session.current().await, None);
    assert_eq!(session.history().await.len(), 1);
}

#[tokio::test]
async fn test_prompt_budget_label() {
    let (session, _, _) = session(MockGenerator::new(vec![]), MockRepository::default()).await;
    session.set_prompt("Fluxograma de login").await;
    assert_eq!(session.prompt_budget().await, "19/500");
}
