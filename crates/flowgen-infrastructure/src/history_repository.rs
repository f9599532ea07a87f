//! JSON-file implementation of the history slot.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use flowgen_core::diagram::{DiagramRecord, HistoryRepository};
use flowgen_core::error::{FlowgenError, Result};

use crate::storage::AtomicJsonFile;

/// The single fixed key the history list is stored under.
pub const HISTORY_KEY: &str = "flowgen_history";

/// Stores the whole history list as one JSON array in `<key>.json`.
#[derive(Clone)]
pub struct JsonHistoryRepository {
    file: Arc<AtomicJsonFile<Vec<DiagramRecord>>>,
}

impl JsonHistoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryRepository {
    async fn load(&self) -> Result<Vec<DiagramRecord>> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| FlowgenError::internal(format!("Failed to join task: {}", e)))??;

        let records = loaded.unwrap_or_default();
        tracing::debug!("[History] Loaded {} records", records.len());
        Ok(records)
    }

    async fn save(&self, records: &[DiagramRecord]) -> Result<()> {
        let file = self.file.clone();
        let records = records.to_vec();
        let count = records.len();
        tokio::task::spawn_blocking(move || file.save(&records))
            .await
            .map_err(|e| FlowgenError::internal(format!("Failed to join task: {}", e)))??;

        tracing::debug!("[History] Saved {} records", count);
        Ok(())
    }
}
