//! Single-element operations.
//!
//! Each operation is a pure function `(element, pointer_delta, config) ->
//! outcome`. The pointer delta arrives in screen pixels and is converted to
//! device pixels before any math; resize and rotate then work in the
//! element's own rotated frame where the handle semantics require it.
//!
//! | Operation | Delta | Notes |
//! |-----------|-------|-------|
//! | [`drag::move_element`] | since the reference position | follows the raw pointer vector |
//! | [`resize::resize_element`] | since gesture start | local frame, aspect locked |
//! | [`rotate::rotate_element`] | since gesture start | pivot is the element center |

pub mod drag;
pub mod resize;
pub mod rotate;

pub use drag::{MoveConfig, MoveOutcome, move_element};
pub use resize::{ResizeConfig, ResizeHandle, ResizeOutcome, resize_element};
pub use rotate::{RotateConfig, RotateOutcome, rotate_element};
