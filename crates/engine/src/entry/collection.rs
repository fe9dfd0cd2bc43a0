use super::record::EntryRecord;
use super::snapshot::EntrySnapshot;
use crate::error::{EngineError, FieldError};
use crate::model::Field;

/// Ordered metric entries of one form. Positions are not stable identities:
/// removing an entry shifts every later one down by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCollection {
    entries: Vec<EntryRecord>,
    valid: bool,
}

impl Default for EntryCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryCollection {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            valid: true,
        }
    }

    pub fn add_entry(&mut self) -> usize {
        self.push(EntryRecord::new())
    }

    pub fn push(&mut self, record: EntryRecord) -> usize {
        self.entries.push(record);
        self.revalidate();
        self.entries.len() - 1
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<EntryRecord, EngineError> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);
        self.revalidate();
        Ok(removed)
    }

    pub fn update_field(&mut self, index: usize, field: Field, value: &str) -> Result<(), EngineError> {
        self.check_index(index)?;
        self.entries[index].set(field, value);
        self.revalidate();
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&EntryRecord> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every entry is valid. An empty collection is valid.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> Vec<FieldError> {
        self.entries
            .iter()
            .enumerate()
            .flat_map(|(i, e)| e.errors(i))
            .collect()
    }

    pub fn snapshot(&self) -> Vec<EntrySnapshot> {
        self.entries.iter().map(EntryRecord::snapshot).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.revalidate();
    }

    fn check_index(&self, index: usize) -> Result<(), EngineError> {
        if index < self.entries.len() {
            return Ok(());
        }
        tracing::error!(index, len = self.entries.len(), "entry index out of range");
        Err(EngineError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    fn revalidate(&mut self) {
        self.valid = self.entries.iter().all(EntryRecord::is_valid);
    }
}
