use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::spec::Field;

/// Index record for one saved snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotEntry {
    pub name: String,
    #[serde(rename = "savedAt", with = "time::serde::rfc3339")]
    #[schemars(with = "String")]
    pub saved_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overwrite {
    #[default]
    Deny,
    Allow,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot name cannot be empty")]
    EmptyName,
    #[error("snapshot name '{0}' may not contain path separators or control characters")]
    InvalidName(String),
    #[error("a snapshot named '{0}' already exists")]
    AlreadyExists(String),
    #[error("no snapshot named '{0}'")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Named, timestamped copies of the flat field list.
pub trait SnapshotStore {
    fn save(
        &mut self,
        name: &str,
        fields: &[Field],
        overwrite: Overwrite,
    ) -> Result<SnapshotEntry, StoreError>;

    /// Returns `None` when no snapshot has that name.
    fn load(&self, name: &str) -> Result<Option<Vec<Field>>, StoreError>;

    fn list(&self) -> Result<Vec<SnapshotEntry>, StoreError>;

    /// Returns whether a snapshot was removed.
    fn delete(&mut self, name: &str) -> Result<bool, StoreError>;
}

/// Trims and checks a user supplied snapshot name.
pub fn validate_name(name: &str) -> Result<&str, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    let bad_char = name
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control());
    if bad_char || name == "." || name == ".." {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Ordered list of saved snapshots, kept in save order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SnapshotIndex {
    entries: Vec<SnapshotEntry>,
}

impl SnapshotIndex {
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Records a save, refreshing the timestamp in place for a known name.
    pub fn record(&mut self, name: &str, saved_at: OffsetDateTime) -> SnapshotEntry {
        let entry = SnapshotEntry {
            name: name.to_string(),
            saved_at,
        };
        match self.entries.iter_mut().find(|existing| existing.name == name) {
            Some(existing) => existing.saved_at = saved_at,
            None => self.entries.push(entry.clone()),
        }
        entry
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.name != name);
        self.entries.len() != before
    }
}

/// In-process store keeping snapshots as serialized JSON.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    index: SnapshotIndex,
    snapshots: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(
        &mut self,
        name: &str,
        fields: &[Field],
        overwrite: Overwrite,
    ) -> Result<SnapshotEntry, StoreError> {
        let name = validate_name(name)?;
        if overwrite == Overwrite::Deny && self.index.contains(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        let json = serde_json::to_string(fields)?;
        self.snapshots.insert(name.to_string(), json);
        Ok(self.index.record(name, OffsetDateTime::now_utc()))
    }

    fn load(&self, name: &str) -> Result<Option<Vec<Field>>, StoreError> {
        let name = validate_name(name)?;
        self.snapshots
            .get(name)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(StoreError::from)
    }

    fn list(&self) -> Result<Vec<SnapshotEntry>, StoreError> {
        Ok(self.index.entries().to_vec())
    }

    fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let name = validate_name(name)?;
        self.snapshots.remove(name);
        Ok(self.index.remove(name))
    }
}
