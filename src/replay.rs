//! Headless replay of recorded gestures.
//!
//! A replay script seeds a document, optionally selects elements, then drives
//! the [`GestureController`] through a list of pointer gestures and finishes
//! with a number of undo and redo steps. Pointer samples are spaced one frame
//! interval apart on a synthetic clock, so every sample reaches the store and
//! the result does not depend on wall-clock timing.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::io::Read;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::coords::Point;
use crate::element::{Element, ElementId};
use crate::error::EditorResult;
use crate::gesture::{GestureController, GestureStart};
use crate::store::StateManager;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplayScript {
    pub elements: Vec<Element>,
    /// Replaces the caller's config when present.
    pub config: Option<EditorConfig>,
    /// Ids to select before the first gesture; the first becomes primary.
    pub selection: Vec<ElementId>,
    pub gestures: Vec<GestureScript>,
    pub undo: usize,
    pub redo: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureScript {
    #[serde(flatten)]
    pub start: GestureStart,
    /// Pointer samples between down and up, in screen pixels.
    #[serde(default)]
    pub moves: Vec<Point>,
    /// Pointer-up position. Defaults to the last move (or the start).
    #[serde(default)]
    pub end: Option<Point>,
    /// Release without committing (pointer cancelled).
    #[serde(default)]
    pub abandon: bool,
}

/// Parse a script from `reader` and run it.
///
/// # Errors
///
/// `Script` for malformed JSON, or any error raised while replaying.
pub fn run_reader<R: Read>(reader: R, config: EditorConfig) -> EditorResult<Vec<Element>> {
    let script: ReplayScript = serde_json::from_reader(reader)?;
    run(&script, config)
}

/// Run `script` and return the final elements bottom to top.
///
/// # Errors
///
/// Strict-mode invariant failures raised by the store.
pub fn run(script: &ReplayScript, config: EditorConfig) -> EditorResult<Vec<Element>> {
    let config = script.config.unwrap_or(config);
    let mut manager = StateManager::with_elements(script.elements.clone())
        .with_history_limit(config.history_limit)
        .strict(config.strict_invariants);
    let mut controller = GestureController::new(config);

    for id in &script.selection {
        if !manager.toggle_selection(id) {
            tracing::warn!(element_id = %id, "selection id not in script elements");
        }
    }

    let mut clock = Instant::now();
    for (index, gesture) in script.gestures.iter().enumerate() {
        if !controller.begin(&mut manager, gesture.start.clone()) {
            tracing::warn!(index, element_id = %gesture.start.element_id, "gesture skipped");
            continue;
        }
        for pointer in &gesture.moves {
            clock += config.frame_interval;
            controller.update_at(&mut manager, *pointer, clock)?;
        }
        if gesture.abandon {
            controller.abandon(&mut manager);
            continue;
        }
        let release = gesture.end.or_else(|| gesture.moves.last().copied()).unwrap_or(gesture.start.pointer);
        clock += config.frame_interval;
        controller.end_at(&mut manager, release, clock)?;
    }

    let undone = (0..script.undo).take_while(|_| manager.undo()).count();
    let redone = (0..script.redo).take_while(|_| manager.redo()).count();
    tracing::info!(
        gestures = script.gestures.len(),
        undone,
        redone,
        history = manager.history_len(),
        "replay finished"
    );

    Ok(manager.state().ordered_elements())
}
