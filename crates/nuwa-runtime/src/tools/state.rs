//! Session state store
//!
//! A key-value store owned by the registry, not by any execution. Tools use
//! it to persist facts across scripts within a session, and `render` turns
//! the whole store into deterministic text suitable for inclusion in an
//! upstream prompt.

use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Custom textual rendering for one state entry
pub type StateRenderer = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Optional presentation metadata attached to a state entry
#[derive(Clone, Default)]
pub struct StateMetadata {
    /// Human-readable label shown instead of the raw key
    pub description: Option<String>,
    /// Overrides the default value rendering
    pub renderer: Option<StateRenderer>,
}

impl fmt::Debug for StateMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMetadata")
            .field("description", &self.description)
            .field("renderer", &self.renderer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[derive(Clone, Debug)]
struct StateEntry {
    value: Value,
    metadata: StateMetadata,
}

/// Key-value store persisting across executions within one session
#[derive(Clone, Debug, Default)]
pub struct StateStore {
    entries: HashMap<String, StateEntry>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Set a value, keeping any metadata already attached to the key
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(entry) => entry.value = value,
            None => {
                self.entries.insert(
                    key,
                    StateEntry {
                        value,
                        metadata: StateMetadata::default(),
                    },
                );
            }
        }
    }

    /// Set a value together with its presentation metadata
    pub fn set_with_metadata(
        &mut self,
        key: impl Into<String>,
        value: Value,
        metadata: StateMetadata,
    ) {
        self.entries
            .insert(key.into(), StateEntry { value, metadata });
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key).map(|e| e.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the store as deterministic text, one `label: value` line per
    /// entry, sorted by key. Labels and value rendering honor metadata.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "(empty)".to_string();
        }

        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort_unstable();

        let mut out = String::new();
        for key in keys {
            let entry = &self.entries[key];
            let label = entry
                .metadata
                .description
                .as_deref()
                .unwrap_or(key.as_str());
            let rendered = match &entry.metadata.renderer {
                Some(renderer) => renderer(&entry.value),
                None => entry.value.to_string(),
            };
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(label);
            out.push_str(": ");
            out.push_str(&rendered);
        }
        out
    }
}
