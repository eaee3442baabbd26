//! Gesture controller: pointer-down / move / up to committed state.
//!
//! This module owns the state machine that sits between raw pointer events
//! and the [`StateManager`]. `begin` captures everything the gesture needs
//! (the element's starting image, the viewport, an optional group snapshot)
//! and opens a transaction. Each `update` derives a candidate from the
//! starting image and the cumulative pointer delta, runs it through snapping
//! and the boundary policy, and offers it to the dispatch throttle. `end`
//! dispatches the final candidate and commits, so the whole gesture is one
//! undo step; `abandon` rolls it back.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::bounds::{ElementBox, element_box};
use crate::config::EditorConfig;
use crate::coords::{Point, Viewport};
use crate::element::{Element, ElementId, signed_angle_delta};
use crate::error::EditorResult;
use crate::group::GroupSnapshot;
use crate::ops::{MoveConfig, ResizeConfig, ResizeHandle, RotateConfig, move_element, resize_element, rotate_element};
use crate::snap::{AlignmentGuide, SnappingState, apply_snapping_with, detect_alignment_within};
use crate::store::{Action, RuntimeState, StateManager};
use crate::throttle::DispatchThrottle;

/// What the pointer is doing to the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum GestureOp {
    Move,
    Resize { handle: ResizeHandle },
    Rotate,
}

/// Modifier keys held at pointer-down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Alt / Option: suppress guide snapping and rotation soft snap.
    #[serde(default)]
    pub alt: bool,
}

/// Pointer-down context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureStart {
    pub element_id: ElementId,
    #[serde(flatten)]
    pub op: GestureOp,
    /// Pointer position in screen pixels.
    pub pointer: Point,
    /// Preview rect and scale measured at pointer-down.
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    Idle,
    Moving,
    Resizing,
    Rotating,
}

#[derive(Debug, Clone)]
struct ActiveGesture {
    op: GestureOp,
    start: Element,
    start_pointer: Point,
    viewport: Viewport,
    modifiers: Modifiers,
    group: Option<GroupSnapshot>,
    /// Boxes of the elements that do not move, for guide detection.
    siblings: Vec<ElementBox>,
    /// Angle most recently produced by a rotate update.
    last_angle: Option<f64>,
}

#[derive(Debug)]
pub struct GestureController {
    config: EditorConfig,
    active: Option<ActiveGesture>,
    snapping: SnappingState,
    throttle: DispatchThrottle<Vec<Element>>,
    guides: Vec<AlignmentGuide>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl GestureController {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            active: None,
            snapping: SnappingState::default(),
            throttle: DispatchThrottle::new(config.frame_interval),
            guides: Vec::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> GestureMode {
        match self.active.as_ref().map(|a| a.op) {
            None => GestureMode::Idle,
            Some(GestureOp::Move) => GestureMode::Moving,
            Some(GestureOp::Resize { .. }) => GestureMode::Resizing,
            Some(GestureOp::Rotate) => GestureMode::Rotating,
        }
    }

    /// True while the active gesture drives a multi-element group.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.group.is_some())
    }

    /// Guides found on the most recent move update, for the renderer.
    #[must_use]
    pub fn guides(&self) -> &[AlignmentGuide] {
        &self.guides
    }

    #[must_use]
    pub fn snapping(&self) -> &SnappingState {
        &self.snapping
    }

    /// Pointer-down. Returns false (and stays idle) when the target does not
    /// exist. A gesture still in progress is abandoned first.
    ///
    /// The gesture owns the manager's transaction from here on. If the caller
    /// already opened one, the gesture's actions join it and `end` commits
    /// (or `abandon` rolls back) the whole batch.
    pub fn begin(&mut self, manager: &mut StateManager, start: GestureStart) -> bool {
        if self.active.is_some() {
            tracing::warn!("begin while a gesture is active; abandoning it");
            self.abandon(manager);
        }

        let state = manager.state();
        let Some(element) = state.get(&start.element_id).cloned() else {
            tracing::debug!(element_id = %start.element_id, "gesture target missing; staying idle");
            return false;
        };

        let group = match start.op {
            GestureOp::Move | GestureOp::Rotate => capture_group(state, &element.id),
            GestureOp::Resize { .. } => None,
        };
        let siblings = state
            .ordered()
            .filter(|e| e.id != element.id)
            .filter(|e| group.as_ref().is_none_or(|g| g.member_ids().all(|m| *m != e.id)))
            .map(element_box)
            .collect();

        tracing::debug!(element_id = %element.id, op = ?start.op, group = group.is_some(), "gesture begin");
        self.active = Some(ActiveGesture {
            op: start.op,
            start: element,
            start_pointer: start.pointer,
            viewport: start.viewport,
            modifiers: start.modifiers,
            group,
            siblings,
            last_angle: None,
        });
        self.reset_frame_state();
        if manager.in_transaction() {
            tracing::warn!(element_id = %start.element_id, "gesture joins an open transaction; end will commit it");
        }
        manager.start_transaction();
        true
    }

    /// Pointer-move at the current time.
    ///
    /// # Errors
    ///
    /// Propagates strict-mode invariant failures from the store.
    pub fn update(&mut self, manager: &mut StateManager, pointer: Point) -> EditorResult<bool> {
        self.update_at(manager, pointer, Instant::now())
    }

    /// Pointer-move at `now`. Returns true when a candidate was dispatched.
    ///
    /// # Errors
    ///
    /// Propagates strict-mode invariant failures from the store.
    pub fn update_at(&mut self, manager: &mut StateManager, pointer: Point, now: Instant) -> EditorResult<bool> {
        let Some(candidate) = self.candidate(manager.state(), pointer) else {
            return Ok(false);
        };
        match self.throttle.offer_at(candidate, now) {
            Some(ready) => dispatch_candidate(manager, ready),
            None => Ok(false),
        }
    }

    /// Frame tick at the current time.
    ///
    /// # Errors
    ///
    /// Propagates strict-mode invariant failures from the store.
    pub fn tick(&mut self, manager: &mut StateManager) -> EditorResult<bool> {
        self.tick_at(manager, Instant::now())
    }

    /// Frame tick at `now`: dispatch a held candidate whose frame has come.
    /// Hosts call this once per display frame while a gesture is active.
    /// Returns true when a candidate was dispatched.
    ///
    /// # Errors
    ///
    /// Propagates strict-mode invariant failures from the store.
    pub fn tick_at(&mut self, manager: &mut StateManager, now: Instant) -> EditorResult<bool> {
        if self.active.is_none() {
            return Ok(false);
        }
        match self.throttle.take_due_at(now) {
            Some(ready) => dispatch_candidate(manager, ready),
            None => Ok(false),
        }
    }

    /// Pointer-up at the current time.
    ///
    /// # Errors
    ///
    /// Propagates strict-mode invariant failures from the store. The
    /// transaction is committed either way.
    pub fn end(&mut self, manager: &mut StateManager, pointer: Point) -> EditorResult<()> {
        self.end_at(manager, pointer, Instant::now())
    }

    /// Pointer-up at `now`: dispatch the final candidate and commit.
    ///
    /// # Errors
    ///
    /// Propagates strict-mode invariant failures from the store. The
    /// transaction is committed either way.
    pub fn end_at(&mut self, manager: &mut StateManager, pointer: Point, now: Instant) -> EditorResult<()> {
        if self.active.is_none() {
            return Ok(());
        }
        let last = match self.candidate(manager.state(), pointer) {
            Some(candidate) => Some(candidate),
            None => self.throttle.flush_at(now),
        };
        let result = match last {
            Some(candidate) => dispatch_candidate(manager, candidate).map(|_| ()),
            None => Ok(()),
        };

        self.active = None;
        self.reset_frame_state();
        manager.commit_transaction();
        tracing::debug!("gesture end");
        result
    }

    /// Drop the gesture and revert everything it dispatched.
    pub fn abandon(&mut self, manager: &mut StateManager) {
        if self.active.take().is_some() {
            tracing::debug!("gesture abandoned");
            manager.rollback_transaction();
        }
        self.reset_frame_state();
    }

    fn reset_frame_state(&mut self) {
        self.snapping.reset();
        self.throttle.reset();
        self.guides.clear();
    }

    /// Elements as they should look for a pointer at `pointer`, or `None` when
    /// this frame produces no change.
    fn candidate(&mut self, state: &RuntimeState, pointer: Point) -> Option<Vec<Element>> {
        let active = self.active.as_mut()?;
        if !state.contains(&active.start.id) {
            tracing::debug!(element_id = %active.start.id, "gesture target vanished; ignoring update");
            return None;
        }
        let gone = active.group.as_ref().and_then(|g| g.member_ids().find(|id| !state.contains(id)).cloned());
        if let Some(gone) = gone {
            tracing::warn!(element_id = %gone, "group member vanished; continuing as single element");
            active.group = None;
        }

        let delta = pointer - active.start_pointer;
        let boundary = self.config.boundary;
        match active.op {
            GestureOp::Move => {
                let moved = move_element(&active.start, delta, &MoveConfig { viewport: active.viewport, boundary });
                let start_center = Point::new(active.start.x, active.start.y);
                let raw = start_center + moved.device_delta;

                let snapped = if active.modifiers.alt {
                    self.guides.clear();
                    None
                } else {
                    let mut at_raw = active.start.clone();
                    at_raw.x = raw.x;
                    at_raw.y = raw.y;
                    self.guides = detect_alignment_within(
                        &element_box(&at_raw),
                        &active.siblings,
                        active.viewport.scale_factor,
                        self.config.guide_threshold_px,
                    );
                    let result =
                        apply_snapping_with(raw.x, raw.y, &self.guides, &mut self.snapping, self.config.escape_threshold_px);
                    result.is_snapped.then_some(Point::new(result.x, result.y))
                };

                match (&active.group, snapped) {
                    (Some(group), snapped) => {
                        let target = snapped.unwrap_or(raw);
                        Some(group.translated(target - start_center, &boundary))
                    }
                    (None, Some(target)) => {
                        let p = boundary.apply(target);
                        Some(vec![Element { x: p.x, y: p.y, ..moved.element }])
                    }
                    (None, None) => Some(vec![moved.element]),
                }
            }
            GestureOp::Resize { handle } => {
                let initial = active.start.data.resizable_size()?;
                let config = ResizeConfig {
                    speed: self.config.resize_speed,
                    ..ResizeConfig::new(active.viewport, handle).with_initial_size(initial)
                };
                let outcome = resize_element(&active.start, delta, &config);
                Some(vec![outcome.element])
            }
            GestureOp::Rotate => {
                let config = RotateConfig {
                    last_applied: active.last_angle,
                    snap_enabled: !active.modifiers.alt,
                    snap_threshold_deg: self.config.rotation_snap_threshold_deg,
                    smoothing_deg: self.config.rotation_smoothing_deg,
                    ..RotateConfig::new(active.viewport, active.start_pointer, active.start.angle)
                };
                let outcome = rotate_element(&active.start, delta, &config);
                if !outcome.applied {
                    return None;
                }
                active.last_angle = Some(outcome.angle);
                match &active.group {
                    Some(group) => {
                        let turn = signed_angle_delta(outcome.angle, active.start.angle);
                        Some(group.rotated(turn, &boundary))
                    }
                    None => Some(vec![outcome.element]),
                }
            }
        }
    }
}

/// Group snapshot when `primary_id` is part of a 2+ selection.
fn capture_group(state: &RuntimeState, primary_id: &str) -> Option<GroupSnapshot> {
    if state.selection.len() < 2 || !state.selection.contains(primary_id) {
        return None;
    }
    let members: Vec<Element> = state.selected().cloned().collect();
    match GroupSnapshot::capture(primary_id, &members) {
        Ok(group) => Some(group),
        Err(err) => {
            tracing::warn!(%err, "group capture failed; using single element");
            None
        }
    }
}

/// Send `candidate` to the store as one action. Returns false when nothing
/// would change.
fn dispatch_candidate(manager: &mut StateManager, candidate: Vec<Element>) -> EditorResult<bool> {
    let state = manager.state();
    let mut before = Vec::with_capacity(candidate.len());
    let mut after = Vec::with_capacity(candidate.len());
    for next in candidate {
        let Some(current) = state.get(&next.id) else {
            tracing::debug!(element_id = %next.id, "candidate target missing; skipped");
            continue;
        };
        if *current == next {
            continue;
        }
        before.push(current.clone());
        after.push(next);
    }

    if before.is_empty() {
        return Ok(false);
    }
    let action = if before.len() == 1 {
        match (before.pop(), after.pop()) {
            (Some(b), Some(a)) => Action::update(b, a),
            _ => return Ok(false),
        }
    } else {
        Action::batch(before, after)
    };
    manager.dispatch(action)?;
    Ok(true)
}
