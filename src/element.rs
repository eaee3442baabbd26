//! Element model: overlay elements, their type-specific payloads, and angle
//! normalization.
//!
//! An [`Element`] is one item placed on the LCD preview. Its `(x, y)` is the
//! device-pixel center; `angle` is a clockwise rotation in degrees, stored
//! normalized into `[0, 360)` and omitted from the serialized form when 0.
//! The type-specific payload is the closed [`ElementData`] enum, so every
//! consumer matches it exhaustively.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};

use crate::consts::{METRIC_SIZE_MAX, METRIC_SIZE_MIN, TEXT_SIZE_MAX, TEXT_SIZE_MIN};

/// Unique identifier for an element within one overlay.
pub type ElementId = String;

/// Generate a fresh element id.
#[must_use]
pub fn new_element_id() -> ElementId {
    uuid::Uuid::new_v4().to_string()
}

/// The kind of an overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Metric,
    Text,
    Divider,
    Clock,
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    /// Sensor key rendered by this element (e.g. `"cpu_temp"`).
    pub metric: String,
    /// Font size in device pixels.
    pub size: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub text: String,
    /// Font size in device pixels.
    pub size: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerData {
    /// Length along the divider's own x-axis.
    pub length: f64,
    pub thickness: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockData {
    pub size: f64,
    pub color: String,
    /// Display pattern, e.g. `"HH:mm"`.
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateData {
    pub size: f64,
    pub color: String,
    /// Display pattern, e.g. `"YYYY-MM-DD"`.
    pub format: String,
}

/// Type-specific payload, tagged by element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementData {
    Metric(MetricData),
    Text(TextData),
    Divider(DividerData),
    Clock(ClockData),
    Date(DateData),
}

impl ElementData {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Metric(_) => ElementKind::Metric,
            Self::Text(_) => ElementKind::Text,
            Self::Divider(_) => ElementKind::Divider,
            Self::Clock(_) => ElementKind::Clock,
            Self::Date(_) => ElementKind::Date,
        }
    }

    /// The resizable size field, for kinds that have one.
    #[must_use]
    pub fn resizable_size(&self) -> Option<f64> {
        match self {
            Self::Metric(m) => Some(m.size),
            Self::Text(t) => Some(t.size),
            Self::Divider(_) | Self::Clock(_) | Self::Date(_) => None,
        }
    }

    /// Inclusive size bounds for resizable kinds.
    #[must_use]
    pub fn size_bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Metric(_) => Some((METRIC_SIZE_MIN, METRIC_SIZE_MAX)),
            Self::Text(_) => Some((TEXT_SIZE_MIN, TEXT_SIZE_MAX)),
            Self::Divider(_) | Self::Clock(_) | Self::Date(_) => None,
        }
    }

    /// Replace the resizable size. Returns false for kinds without one.
    pub fn set_resizable_size(&mut self, size: f64) -> bool {
        match self {
            Self::Metric(m) => {
                m.size = size;
                true
            }
            Self::Text(t) => {
                t.size = size;
                true
            }
            Self::Divider(_) | Self::Clock(_) | Self::Date(_) => false,
        }
    }
}

/// An overlay element as stored in the runtime state and in presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// Center x in device pixels.
    pub x: f64,
    /// Center y in device pixels.
    pub y: f64,
    /// Clockwise rotation in degrees, `[0, 360)`.
    #[serde(default, skip_serializing_if = "angle_is_zero")]
    pub angle: f64,
    pub z_index: i64,
    #[serde(flatten)]
    pub data: ElementData,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn angle_is_zero(angle: &f64) -> bool {
    *angle == 0.0
}

impl Element {
    /// New element with a fresh id, no rotation and z-index 0.
    #[must_use]
    pub fn new(data: ElementData, x: f64, y: f64) -> Self {
        Self { id: new_element_id(), x, y, angle: 0.0, z_index: 0, data }
    }

    /// Same as [`Element::new`] with a caller-chosen id.
    #[must_use]
    pub fn with_id(id: impl Into<ElementId>, data: ElementData, x: f64, y: f64) -> Self {
        Self { id: id.into(), x, y, angle: 0.0, z_index: 0, data }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// Store `angle_deg` normalized into `[0, 360)`.
    pub fn set_angle(&mut self, angle_deg: f64) {
        self.angle = normalize_angle(angle_deg);
    }

    /// The same element with its stored angle brought into `[0, 360)`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.set_angle(self.angle);
        self
    }

    /// Builder form of [`Element::set_angle`].
    #[must_use]
    pub fn rotated(mut self, angle_deg: f64) -> Self {
        self.set_angle(angle_deg);
        self
    }

    #[must_use]
    pub fn is_resizable(&self) -> bool {
        self.data.resizable_size().is_some()
    }

    /// True when position, angle and payload all match `other` exactly.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn same_geometry(&self, other: &Element) -> bool {
        self.x == other.x && self.y == other.y && self.angle == other.angle && self.data == other.data
    }
}

/// Normalize degrees into `[0, 360)`. Non-finite input maps to 0.
#[must_use]
pub fn normalize_angle(angle_deg: f64) -> f64 {
    if !angle_deg.is_finite() {
        return 0.0;
    }
    let wrapped = angle_deg.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Smallest absolute difference between two angles, in `[0, 180]`.
#[must_use]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let delta = (a - b).abs().rem_euclid(360.0);
    delta.min(360.0 - delta)
}

/// Signed shortest rotation from `start` to `current`, in `(-180, 180]`.
#[must_use]
pub fn signed_angle_delta(current: f64, start: f64) -> f64 {
    let delta = current - start;
    if !delta.is_finite() {
        return 0.0;
    }
    let mut wrapped = delta.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped -= 360.0;
    }
    wrapped
}
