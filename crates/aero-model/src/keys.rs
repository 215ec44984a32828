use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::error::ModelError;

/// Normalizes a business key: trimmed and upper-cased.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Business key to store-generated identifier lookup for one run.
///
/// Keys are normalized on insert and on lookup, so `ab123` and `AB123`
/// resolve to the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntityKeyMap {
    entries: BTreeMap<String, Uuid>,
}

impl EntityKeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key -> id`, replacing an earlier id for the same key.
    pub fn insert(&mut self, key: &str, id: Uuid) -> Result<Option<Uuid>, ModelError> {
        let normalized = normalize_key(key);
        if normalized.is_empty() {
            return Err(ModelError::EmptyBusinessKey);
        }
        Ok(self.entries.insert(normalized, id))
    }

    pub fn get(&self, key: &str) -> Option<Uuid> {
        self.entries.get(&normalize_key(key)).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Uuid)> {
        self.entries.iter().map(|(key, id)| (key.as_str(), *id))
    }
}
