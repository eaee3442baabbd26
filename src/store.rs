//! Transactional state manager: the single live source of truth for one
//! open overlay.
//!
//! DESIGN
//! ======
//! Every mutation is an [`Action`] carrying before/after images of the
//! elements it touches. The manager applies the `after` images immediately
//! and records the action; undo applies the `before` images. A transaction
//! groups every action dispatched between `start_transaction` and
//! `commit_transaction` into one history entry, so a whole drag undoes in a
//! single step.
//!
//! The manager re-stamps actions before recording them: `before` images are
//! taken from the live state (never trusted from the caller), unchanged ids
//! are dropped, and membership changes carry the z-order before and after so
//! undo restores stacking exactly.
//!
//! TRADE-OFFS
//! ==========
//! Selection is UI state and is not part of history. It is pruned whenever
//! elements disappear, including through undo.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::consts::HISTORY_LIMIT;
use crate::element::{Element, ElementId};
use crate::error::{EditorError, EditorResult};

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selected_ids: Vec<ElementId>,
    pub last_selected_id: Option<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty()
    }
}

/// Elements, their stacking order and the current selection.
///
/// Invariants: `z_order` is a permutation of the keys of `elements`, and
/// every selected id is a key of `elements`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeState {
    pub elements: HashMap<ElementId, Element>,
    pub z_order: Vec<ElementId>,
    #[serde(default)]
    pub selection: Selection,
}

impl RuntimeState {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements bottom to top.
    pub fn ordered(&self) -> impl Iterator<Item = &Element> {
        self.z_order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Owned elements bottom to top with `z_index` restamped from the order.
    #[must_use]
    pub fn ordered_elements(&self) -> Vec<Element> {
        self.ordered()
            .zip(0_i64..)
            .map(|(e, z)| Element { z_index: z, ..e.clone() })
            .collect()
    }

    /// Currently selected elements in selection order.
    pub fn selected(&self) -> impl Iterator<Item = &Element> {
        self.selection.selected_ids.iter().filter_map(|id| self.elements.get(id))
    }

    /// Describe the first broken invariant, if any.
    #[must_use]
    pub fn invariant_violation(&self) -> Option<String> {
        if self.z_order.len() != self.elements.len() {
            return Some(format!("zOrder has {} ids for {} elements", self.z_order.len(), self.elements.len()));
        }
        let mut seen = HashSet::with_capacity(self.z_order.len());
        for id in &self.z_order {
            if !self.elements.contains_key(id) {
                return Some(format!("zOrder references unknown element {id}"));
            }
            if !seen.insert(id) {
                return Some(format!("zOrder lists {id} twice"));
            }
        }
        if let Some(id) = self.selection.selected_ids.iter().find(|id| !self.elements.contains_key(*id)) {
            return Some(format!("selection references unknown element {id}"));
        }
        None
    }

    /// Rebuild `z_order` and the selection from `elements`.
    ///
    /// Valid z-order entries keep their relative order; missing ids are
    /// appended by `z_index`, then id.
    pub fn heal(&mut self) {
        let mut seen = HashSet::with_capacity(self.elements.len());
        let mut order: Vec<ElementId> = self
            .z_order
            .iter()
            .filter(|id| self.elements.contains_key(*id) && seen.insert((*id).clone()))
            .cloned()
            .collect();

        let mut missing: Vec<&Element> = self.elements.values().filter(|e| !seen.contains(&e.id)).collect();
        missing.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        order.extend(missing.into_iter().map(|e| e.id.clone()));
        self.z_order = order;

        self.prune_selection();
    }

    fn prune_selection(&mut self) {
        let elements = &self.elements;
        self.selection.selected_ids.retain(|id| elements.contains_key(id));
        if self.selection.last_selected_id.as_ref().is_some_and(|id| !elements.contains_key(id)) {
            self.selection.last_selected_id = self.selection.selected_ids.last().cloned();
        }
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Remove,
    Update,
    Batch,
}

/// A recorded or proposed mutation.
///
/// An id with only an `after` image is an insertion, only a `before` image a
/// removal, both an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub kind: ActionKind,
    pub element_ids: Vec<ElementId>,
    #[serde(default)]
    pub before: HashMap<ElementId, Element>,
    #[serde(default)]
    pub after: HashMap<ElementId, Element>,
    /// Stamped by the manager when membership changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_order_before: Option<Vec<ElementId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_order_after: Option<Vec<ElementId>>,
}

impl Action {
    fn empty(kind: ActionKind) -> Self {
        Self {
            kind,
            element_ids: Vec::new(),
            before: HashMap::new(),
            after: HashMap::new(),
            z_order_before: None,
            z_order_after: None,
        }
    }

    /// Insert `element`, appended on top of the stack.
    #[must_use]
    pub fn add(element: Element) -> Self {
        let mut action = Self::empty(ActionKind::Add);
        action.element_ids.push(element.id.clone());
        action.after.insert(element.id.clone(), element);
        action
    }

    /// Remove `element` (its current image).
    #[must_use]
    pub fn remove(element: Element) -> Self {
        let mut action = Self::empty(ActionKind::Remove);
        action.element_ids.push(element.id.clone());
        action.before.insert(element.id.clone(), element);
        action
    }

    /// Replace `before` with `after` (same id).
    #[must_use]
    pub fn update(before: Element, after: Element) -> Self {
        let mut action = Self::empty(ActionKind::Update);
        action.element_ids.push(after.id.clone());
        action.before.insert(before.id.clone(), before);
        action.after.insert(after.id.clone(), after);
        action
    }

    /// All-or-nothing update of a set of elements.
    #[must_use]
    pub fn batch(before: Vec<Element>, after: Vec<Element>) -> Self {
        let mut action = Self::empty(ActionKind::Batch);
        for e in &after {
            action.element_ids.push(e.id.clone());
        }
        for e in &before {
            if !action.element_ids.contains(&e.id) {
                action.element_ids.push(e.id.clone());
            }
        }
        action.before = before.into_iter().map(|e| (e.id.clone(), e)).collect();
        action.after = after.into_iter().map(|e| (e.id.clone(), e)).collect();
        action
    }

    /// Remove every element in `state`.
    #[must_use]
    pub fn clear_all(state: &RuntimeState) -> Self {
        let mut action = Self::empty(ActionKind::Batch);
        for e in state.ordered() {
            action.element_ids.push(e.id.clone());
            action.before.insert(e.id.clone(), e.clone());
        }
        action
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.element_ids.is_empty()
    }

    #[must_use]
    pub fn changes_membership(&self) -> bool {
        self.element_ids.iter().any(|id| self.before.contains_key(id) != self.after.contains_key(id))
    }

    /// The action that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let kind = match self.kind {
            ActionKind::Add => ActionKind::Remove,
            ActionKind::Remove => ActionKind::Add,
            other => other,
        };
        Self {
            kind,
            element_ids: self.element_ids.iter().rev().cloned().collect(),
            before: self.after.clone(),
            after: self.before.clone(),
            z_order_before: self.z_order_after.clone(),
            z_order_after: self.z_order_before.clone(),
        }
    }
}

// =============================================================================
// MANAGER
// =============================================================================

/// Actions committed together; undone and redone as one step.
pub type HistoryEntry = Vec<Action>;

#[derive(Debug, Clone)]
pub struct StateManager {
    state: RuntimeState,
    open: Option<HistoryEntry>,
    history: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    history_limit: usize,
    strict: bool,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RuntimeState::default(),
            open: None,
            history: Vec::new(),
            redo_stack: Vec::new(),
            history_limit: HISTORY_LIMIT,
            strict: false,
        }
    }

    /// Seed from stored elements. Stacking follows `z_index`, then id.
    /// Duplicate ids keep the first occurrence.
    #[must_use]
    pub fn with_elements(elements: Vec<Element>) -> Self {
        let mut manager = Self::new();
        manager.load(elements);
        manager
    }

    /// Adopt an existing state, repairing it if needed.
    #[must_use]
    pub fn from_state(mut state: RuntimeState) -> Self {
        for element in state.elements.values_mut() {
            element.set_angle(element.angle);
        }
        if let Some(problem) = state.invariant_violation() {
            tracing::warn!(%problem, "seed state inconsistent; healing");
            state.heal();
        }
        Self { state, ..Self::new() }
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Strict mode reports invariant violations from `dispatch` as errors
    /// (the state is still healed).
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace the whole state and clear history.
    pub fn load(&mut self, elements: Vec<Element>) {
        let mut state = RuntimeState::default();
        for element in elements {
            if state.elements.contains_key(&element.id) {
                tracing::warn!(element_id = %element.id, "duplicate id in seed; keeping first");
                continue;
            }
            state.elements.insert(element.id.clone(), element.normalized());
        }
        state.heal();
        self.state = state;
        self.open = None;
        self.history.clear();
        self.redo_stack.clear();
    }

    #[must_use]
    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    /// Owned copy for the external saver.
    #[must_use]
    pub fn snapshot(&self) -> RuntimeState {
        self.state.clone()
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.open.is_some()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty() || self.open.as_ref().is_some_and(|b| !b.is_empty())
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Open a transaction. No-op when one is already open.
    pub fn start_transaction(&mut self) {
        if self.open.is_none() {
            self.open = Some(Vec::new());
        }
    }

    /// Close the open transaction as one history entry. An empty batch
    /// records nothing.
    pub fn commit_transaction(&mut self) {
        let Some(batch) = self.open.take() else {
            return;
        };
        if !batch.is_empty() {
            self.push_history(batch);
        }
    }

    /// Revert and discard everything dispatched in the open transaction.
    pub fn rollback_transaction(&mut self) {
        let Some(batch) = self.open.take() else {
            return;
        };
        tracing::debug!(actions = batch.len(), "rolling back transaction");
        for action in batch.iter().rev() {
            apply(&mut self.state, &action.inverse());
        }
        self.heal_quietly();
    }

    fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        if self.history.len() > self.history_limit {
            let excess = self.history.len() - self.history_limit;
            self.history.drain(..excess);
        }
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Apply `action` now and record it.
    ///
    /// Targets that do not exist are skipped; an action that changes nothing
    /// is not recorded.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` in strict mode when the state had to be healed
    /// after applying the action.
    pub fn dispatch(&mut self, action: Action) -> EditorResult<()> {
        let mut recorded = self.stamp(&action);
        if recorded.is_empty() {
            tracing::trace!(kind = ?action.kind, "action changes nothing; not recorded");
            return Ok(());
        }

        let membership = recorded.changes_membership();
        if membership {
            recorded.z_order_before = Some(self.state.z_order.clone());
        }
        apply(&mut self.state, &recorded);
        if membership {
            recorded.z_order_after = Some(self.state.z_order.clone());
        }

        self.redo_stack.clear();
        match self.open.as_mut() {
            Some(batch) => batch.push(recorded),
            None => self.push_history(vec![recorded]),
        }

        self.verify()
    }

    /// Build the action that will actually be applied against the live state.
    fn stamp(&self, action: &Action) -> Action {
        let mut recorded = Action::empty(action.kind);
        for id in &action.element_ids {
            if recorded.element_ids.contains(id) {
                continue;
            }
            let next = action.after.get(id).map(|e| e.clone().normalized());
            if let Some(next) = next.as_ref().filter(|e| e.id != *id) {
                tracing::warn!(element_id = %id, image_id = %next.id, "after image id differs from its key; skipped");
                continue;
            }
            let current = self.state.elements.get(id);
            match (action.before.contains_key(id), next, current) {
                (false, Some(next), None) => {
                    recorded.after.insert(id.clone(), next);
                }
                (false, Some(_), Some(_)) => {
                    tracing::warn!(element_id = %id, "insert of existing id; skipped");
                    continue;
                }
                (true, None, Some(cur)) => {
                    recorded.before.insert(id.clone(), cur.clone());
                }
                (true, Some(next), Some(cur)) => {
                    if *cur == next {
                        continue;
                    }
                    recorded.before.insert(id.clone(), cur.clone());
                    recorded.after.insert(id.clone(), next);
                }
                (true, _, None) => {
                    tracing::debug!(element_id = %id, "target element missing; skipped");
                    continue;
                }
                (false, None, _) => continue,
            }
            recorded.element_ids.push(id.clone());
        }
        recorded
    }

    fn verify(&mut self) -> EditorResult<()> {
        let Some(problem) = self.state.invariant_violation() else {
            return Ok(());
        };
        tracing::error!(%problem, "state invariant violated; healing");
        self.state.heal();
        if self.strict {
            return Err(EditorError::InvariantViolation(problem));
        }
        Ok(())
    }

    fn heal_quietly(&mut self) {
        if let Some(problem) = self.state.invariant_violation() {
            tracing::error!(%problem, "state invariant violated; healing");
            self.state.heal();
        }
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Revert the most recent history entry. Commits an open transaction
    /// first. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.commit_transaction();
        let Some(entry) = self.history.pop() else {
            return false;
        };
        for action in entry.iter().rev() {
            apply(&mut self.state, &action.inverse());
        }
        self.heal_quietly();
        self.redo_stack.push(entry);
        true
    }

    /// Re-apply the most recently undone entry.
    pub fn redo(&mut self) -> bool {
        self.commit_transaction();
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        for action in &entry {
            apply(&mut self.state, action);
        }
        self.heal_quietly();
        self.push_history(entry);
        true
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Select only `id`. Returns false when the element does not exist.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.state.contains(id) {
            tracing::debug!(element_id = %id, "select: no such element");
            return false;
        }
        self.state.selection = Selection { selected_ids: vec![id.to_string()], last_selected_id: Some(id.to_string()) };
        true
    }

    /// Add `id` to the selection, or remove it if already selected.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if !self.state.contains(id) {
            tracing::debug!(element_id = %id, "toggle_selection: no such element");
            return false;
        }
        let selection = &mut self.state.selection;
        if selection.contains(id) {
            selection.selected_ids.retain(|s| s != id);
            if selection.last_selected_id.as_deref() == Some(id) {
                selection.last_selected_id = selection.selected_ids.last().cloned();
            }
        } else {
            selection.selected_ids.push(id.to_string());
            selection.last_selected_id = Some(id.to_string());
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.state.selection = Selection::default();
    }
}

/// Apply `action`'s `after` images to `state`.
fn apply(state: &mut RuntimeState, action: &Action) {
    for id in &action.element_ids {
        match (action.before.contains_key(id), action.after.get(id)) {
            (false, Some(next)) => {
                if state.elements.contains_key(id) {
                    tracing::warn!(element_id = %id, "insert of existing id; skipped");
                    continue;
                }
                state.elements.insert(id.clone(), next.clone());
                state.z_order.push(id.clone());
            }
            (true, None) => {
                if state.elements.remove(id).is_none() {
                    tracing::debug!(element_id = %id, "remove target missing; skipped");
                    continue;
                }
                state.z_order.retain(|z| z != id);
            }
            (true, Some(next)) => match state.elements.get_mut(id) {
                Some(slot) => *slot = next.clone(),
                None => tracing::debug!(element_id = %id, "update target missing; skipped"),
            },
            (false, None) => {}
        }
    }
    if let Some(order) = &action.z_order_after {
        state.z_order.clone_from(order);
    }
    state.prune_selection();
}
