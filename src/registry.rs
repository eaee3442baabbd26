//! Open documents and their state managers.
//!
//! DESIGN
//! ======
//! One [`StateManager`] per open overlay document, keyed by document id.
//! Managers are created with the registry's config, seeded at `open`, and
//! disposed at `close`, which hands the final state to the caller for saving.
//! Nothing here persists anything.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::config::EditorConfig;
use crate::element::Element;
use crate::store::{RuntimeState, StateManager};

pub type DocumentId = String;

#[derive(Debug, Default)]
pub struct DocumentRegistry {
    managers: HashMap<DocumentId, StateManager>,
    config: EditorConfig,
}

impl DocumentRegistry {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self { managers: HashMap::new(), config }
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Open `id` seeded with `elements`. Reopening an open document reseeds
    /// it and drops its history.
    pub fn open(&mut self, id: &str, elements: Vec<Element>) -> &mut StateManager {
        let mut manager = manager_for(&self.config);
        manager.load(elements);
        tracing::debug!(document_id = %id, elements = manager.state().len(), "document opened");
        match self.managers.entry(id.to_string()) {
            Entry::Occupied(mut slot) => {
                tracing::warn!(document_id = %id, "document already open; reseeding");
                slot.insert(manager);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(manager),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&StateManager> {
        self.managers.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut StateManager> {
        self.managers.get_mut(id)
    }

    /// The manager for `id`, created empty on first access.
    pub fn get_or_create(&mut self, id: &str) -> &mut StateManager {
        let config = self.config;
        self.managers.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(document_id = %id, "creating empty document");
            manager_for(&config)
        })
    }

    /// Dispose `id`, committing any open transaction, and return its final
    /// state for the saver. `None` when the document was not open.
    pub fn close(&mut self, id: &str) -> Option<RuntimeState> {
        let mut manager = self.managers.remove(id)?;
        manager.commit_transaction();
        tracing::debug!(document_id = %id, "document closed");
        Some(manager.snapshot())
    }

    #[must_use]
    pub fn is_open(&self, id: &str) -> bool {
        self.managers.contains_key(id)
    }

    pub fn document_ids(&self) -> impl Iterator<Item = &DocumentId> {
        self.managers.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

fn manager_for(config: &EditorConfig) -> StateManager {
    StateManager::new()
        .with_history_limit(config.history_limit)
        .strict(config.strict_invariants)
}
