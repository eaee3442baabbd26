//! Geometry and transactional-state core for the overlay editor.
//!
//! The editor positions, rotates and resizes overlay elements (metrics, text,
//! dividers, clock, date) on a circular LCD preview. This crate turns raw
//! pointer movement into committed element state: screen/device coordinate
//! math, the per-operation algorithms, multi-select group transforms,
//! alignment snapping, and an action-based store with undo/redo. Rendering,
//! preset import/export and persistence live with the host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`matrix`] | 2D affine matrices, composition and decomposition |
//! | [`coords`] | Screen ↔ device conversion for one gesture |
//! | [`element`] | Element model and angle helpers |
//! | [`bounds`] | Element dimensions and rotation-aware boxes |
//! | [`ops`] | Move, resize and rotate for a single element |
//! | [`group`] | Rigid multi-element move and rotate |
//! | [`snap`] | Alignment guides and sticky snapping |
//! | [`boundary`] | Position policy applied to every result |
//! | [`store`] | Runtime state, actions, transactions, undo/redo |
//! | [`throttle`] | Frame-rate gate for dispatches |
//! | [`gesture`] | Pointer-down/move/up state machine |
//! | [`registry`] | One state manager per open document |
//! | [`replay`] | Headless gesture replay from JSON |
//! | [`config`] | Tuning knobs and `OVERLAY_*` overrides |
//! | [`error`] | Error taxonomy |
//! | [`consts`] | Shared numeric constants |

pub mod boundary;
pub mod bounds;
pub mod config;
pub mod consts;
pub mod coords;
pub mod element;
pub mod error;
pub mod gesture;
pub mod group;
pub mod matrix;
pub mod ops;
pub mod registry;
pub mod replay;
pub mod snap;
pub mod store;
pub mod throttle;
