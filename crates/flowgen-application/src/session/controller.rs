use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use flowgen_core::generation::prompt_budget_label;
use flowgen_core::messages;
use flowgen_core::{DiagramGenerator, DiagramRecord, History, HistoryRepository, ViewMode};
use tokio::sync::RwLock;

/// Result of a generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Empty or whitespace-only prompt; nothing happened
    Ignored,
    /// Another generation is still in flight; nothing happened
    Busy,
    /// A new record was prepended and selected
    Created(DiagramRecord),
    /// The collaborator failed; the fixed error message is set
    Failed,
}

#[derive(Debug, Default)]
struct SessionState {
    history: History,
    /// Non-owning reference into `history`
    current_id: Option<String>,
    prompt: String,
    error: Option<String>,
    view_mode: ViewMode,
}

/// Clears the busy flag when dropped, on every exit path.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the history, the current selection and the prompt draft.
///
/// State is only reachable through the operations below, so ids stay unique
/// and the history is re-saved after every mutation.
pub struct DiagramSession {
    generator: Arc<dyn DiagramGenerator>,
    repository: Arc<dyn HistoryRepository>,
    state: RwLock<SessionState>,
    busy: AtomicBool,
}

impl DiagramSession {
    /// Creates a session with the history loaded from `repository`.
    ///
    /// Unreadable stored data is logged and treated as an empty history.
    pub async fn load(
        generator: Arc<dyn DiagramGenerator>,
        repository: Arc<dyn HistoryRepository>,
    ) -> Self {
        let history = match repository.load().await {
            Ok(records) => History::from_records(records),
            Err(e) => {
                tracing::warn!("[Session] Stored history is unreadable, starting empty: {}", e);
                History::new()
            }
        };
        tracing::info!("[Session] Loaded {} diagrams", history.len());

        Self {
            generator,
            repository,
            state: RwLock::new(SessionState {
                history,
                ..SessionState::default()
            }),
            busy: AtomicBool::new(false),
        }
    }

    /// Generates a diagram from `prompt`.
    ///
    /// On success the new record is prepended, selected, and the prompt
    /// draft is cleared. On failure only the fixed error message changes.
    pub async fn generate(&self, prompt: &str) -> GenerateOutcome {
        if prompt.trim().is_empty() {
            return GenerateOutcome::Ignored;
        }
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("[Session] Generation already in progress, ignoring request");
            return GenerateOutcome::Busy;
        };

        self.state.write().await.error = None;

        match self.generator.generate(prompt).await {
            Ok(response) => {
                let record = DiagramRecord::from_response(response);
                let mut state = self.state.write().await;
                state.history.prepend(record.clone());
                state.current_id = Some(record.id.clone());
                state.prompt.clear();
                tracing::info!("[Session] Created diagram '{}' ({})", record.title, record.id);
                self.persist(state.history.records()).await;
                GenerateOutcome::Created(record)
            }
            Err(e) => {
                tracing::warn!("[Session] Generation failed: {}", e);
                self.state.write().await.error = Some(messages::GENERATION_FAILED.to_string());
                GenerateOutcome::Failed
            }
        }
    }

    /// Generates from the current prompt draft.
    pub async fn submit(&self) -> GenerateOutcome {
        let prompt = self.state.read().await.prompt.clone();
        self.generate(&prompt).await
    }

    pub async fn set_prompt(&self, prompt: impl Into<String>) {
        self.state.write().await.prompt = prompt.into();
    }

    pub async fn prompt(&self) -> String {
        self.state.read().await.prompt.clone()
    }

    /// Prompt counter, e.g. `"19/500"`.
    pub async fn prompt_budget(&self) -> String {
        prompt_budget_label(&self.state.read().await.prompt)
    }

    /// Makes the record with `id` current. A stale id unsets the selection.
    pub async fn select(&self, id: &str) -> Option<DiagramRecord> {
        let mut state = self.state.write().await;
        let record = state.history.get(id).cloned();
        state.current_id = record.as_ref().map(|r| r.id.clone());
        if record.is_none() {
            tracing::debug!("[Session] Selected unknown diagram {}", id);
        }
        record
    }

    /// Selects by position in the most-recent-first list.
    pub async fn select_index(&self, index: usize) -> Option<DiagramRecord> {
        let id = self
            .state
            .read()
            .await
            .history
            .get_index(index)
            .map(|r| r.id.clone());
        match id {
            Some(id) => self.select(&id).await,
            None => {
                self.state.write().await.current_id = None;
                None
            }
        }
    }

    /// Removes the record with `id`. Unknown ids are a no-op.
    ///
    /// Returns the removed record.
    pub async fn delete(&self, id: &str) -> Option<DiagramRecord> {
        let mut state = self.state.write().await;
        let removed = state.history.remove(id)?;
        if state.current_id.as_deref() == Some(id) {
            state.current_id = None;
        }
        tracing::info!("[Session] Deleted diagram '{}' ({})", removed.title, removed.id);
        self.persist(state.history.records()).await;
        Some(removed)
    }

    /// Clears the selection so a new diagram can be described.
    pub async fn new_diagram(&self) {
        self.state.write().await.current_id = None;
    }

    pub async fn current(&self) -> Option<DiagramRecord> {
        let state = self.state.read().await;
        state
            .current_id
            .as_deref()
            .and_then(|id| state.history.get(id))
            .cloned()
    }

    pub async fn current_id(&self) -> Option<String> {
        self.state.read().await.current_id.clone()
    }

    /// Snapshot of the history, most recent first.
    pub async fn history(&self) -> Vec<DiagramRecord> {
        self.state.read().await.history.records().to_vec()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn view_mode(&self) -> ViewMode {
        self.state.read().await.view_mode
    }

    pub async fn set_view_mode(&self, mode: ViewMode) {
        self.state.write().await.view_mode = mode;
    }

    pub async fn toggle_view(&self) -> ViewMode {
        let mut state = self.state.write().await;
        state.view_mode = state.view_mode.toggle();
        state.view_mode
    }

    /// Source of the current diagram, for the clipboard.
    pub async fn copy_source(&self) -> Option<String> {
        self.current().await.map(|record| record.diagram_source)
    }

    /// Saves the full list; called with the state lock held so saves land
    /// in mutation order. Failures are logged only.
    async fn persist(&self, records: &[DiagramRecord]) {
        if let Err(e) = self.repository.save(records).await {
            tracing::error!("[Session] Failed to save history: {}", e);
        }
    }
}
