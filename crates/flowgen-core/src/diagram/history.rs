use std::collections::HashSet;

use crate::diagram::model::DiagramRecord;

/// Ordered list of generated diagrams, most recent first.
///
/// Insertion order is display order and no two records share an id.
/// Mutation only goes through [`History::prepend`] and [`History::remove`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    records: Vec<DiagramRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from stored records, dropping later duplicates of an
    /// id already seen.
    pub fn from_records(records: Vec<DiagramRecord>) -> Self {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .filter(|record| seen.insert(record.id.clone()))
            .collect();
        Self { records }
    }

    /// Inserts a record at the front.
    ///
    /// A record whose id is already present replaces the older entry so the
    /// id stays unique.
    pub fn prepend(&mut self, record: DiagramRecord) {
        self.records.retain(|existing| existing.id != record.id);
        self.records.insert(0, record);
    }

    /// Removes the record with the given id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<DiagramRecord> {
        let index = self.position(id)?;
        Some(self.records.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&DiagramRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Returns the record at the given display index.
    pub fn get_index(&self, index: usize) -> Option<&DiagramRecord> {
        self.records.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagramRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DiagramRecord] {
        &self.records
    }
}
