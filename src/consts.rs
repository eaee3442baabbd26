//! Shared numeric constants for the overlay core.

// ── Matrix ──────────────────────────────────────────────────────

/// Determinants below this magnitude are treated as singular.
pub const SINGULAR_DET_EPSILON: f64 = 1e-10;

/// Default tolerance for [`crate::matrix::matrices_equal`].
pub const MATRIX_EQ_EPSILON: f64 = 1e-6;

// ── Resize ──────────────────────────────────────────────────────

/// Multiplier applied to the pointer delta before it is added to the size.
pub const RESIZE_SPEED: f64 = 0.6;

/// Size bounds for metric elements, in device pixels.
pub const METRIC_SIZE_MIN: f64 = 20.0;
pub const METRIC_SIZE_MAX: f64 = 500.0;

/// Size bounds for text elements, in device pixels.
pub const TEXT_SIZE_MIN: f64 = 6.0;
pub const TEXT_SIZE_MAX: f64 = 200.0;

// ── Rotate ──────────────────────────────────────────────────────

/// Angles the rotation soft-snap pulls toward are multiples of this step.
pub const ROTATION_SNAP_STEP_DEG: f64 = 45.0;

/// Soft-snap capture distance in degrees.
pub const ROTATION_SNAP_THRESHOLD_DEG: f64 = 3.0;

/// Rotation updates smaller than this (wrap-aware) are dropped as jitter.
pub const ROTATION_SMOOTHING_DEG: f64 = 0.75;

// ── Snapping ────────────────────────────────────────────────────

/// Alignment guide capture distance in screen pixels.
pub const GUIDE_THRESHOLD_PX: f64 = 5.0;

/// Raw distance from a pinned guide, in device pixels, that releases the pin.
pub const SNAP_ESCAPE_THRESHOLD_PX: f64 = 15.0;

// ── Dimensions ──────────────────────────────────────────────────

/// Average glyph advance as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Line box height as a fraction of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Glyph count assumed for a rendered metric value (e.g. `"65°C"`).
pub const METRIC_VALUE_GLYPHS: f64 = 4.0;

// ── Device ──────────────────────────────────────────────────────

/// One frame at 60 Hz, in microseconds.
pub const FRAME_INTERVAL_MICROS: u64 = 16_667;

/// Default square LCD resolution in device pixels.
pub const DEVICE_SIZE_PX: f64 = 480.0;

/// Undo history depth kept by a state manager.
pub const HISTORY_LIMIT: usize = 100;
