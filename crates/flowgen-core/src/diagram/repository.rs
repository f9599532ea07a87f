//! History repository trait.

use async_trait::async_trait;

use crate::diagram::model::DiagramRecord;
use crate::error::Result;

/// Persistent slot holding the serialized history list.
///
/// The whole list is written on every save; there is no partial update and
/// no schema versioning.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Loads the stored history, most recent first.
    ///
    /// An absent slot loads as an empty list. Corrupted content is reported
    /// as a serialization error so the caller can decide to start empty.
    async fn load(&self) -> Result<Vec<DiagramRecord>>;

    /// Replaces the stored history with `records`.
    async fn save(&self, records: &[DiagramRecord]) -> Result<()>;
}
