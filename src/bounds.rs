//! Dimension calculator: element width/height derived from the payload, and
//! the axis-aligned boxes built from them.
//!
//! Text-like kinds are sized from their font size with a fixed glyph advance
//! and line height; the renderer's exact metrics are out of reach here, and
//! snapping only needs consistent estimates.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use serde::{Deserialize, Serialize};

use crate::consts::{GLYPH_WIDTH_RATIO, LINE_HEIGHT_RATIO, METRIC_VALUE_GLYPHS};
use crate::coords::Point;
use crate::element::{Element, ElementData, ElementId};
use crate::matrix::rotate_vector;

/// Unrotated width and height in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Derive an element's unrotated size from its payload.
#[must_use]
pub fn dimensions(data: &ElementData) -> Dimensions {
    match data {
        ElementData::Metric(m) => {
            let glyphs = METRIC_VALUE_GLYPHS + m.label.as_ref().map_or(0.0, |l| glyph_count(l) + 1.0);
            text_box(glyphs, m.size)
        }
        ElementData::Text(t) => text_box(glyph_count(&t.text).max(1.0), t.size),
        ElementData::Divider(d) => Dimensions { width: d.length.max(0.0), height: d.thickness.max(0.0) },
        ElementData::Clock(c) => text_box(glyph_count(&c.format).max(1.0), c.size),
        ElementData::Date(d) => text_box(glyph_count(&d.format).max(1.0), d.size),
    }
}

#[allow(clippy::cast_precision_loss)]
fn glyph_count(s: &str) -> f64 {
    s.chars().count() as f64
}

fn text_box(glyphs: f64, size: f64) -> Dimensions {
    let size = size.max(0.0);
    Dimensions { width: glyphs * size * GLYPH_WIDTH_RATIO, height: size * LINE_HEIGHT_RATIO }
}

/// Axis-aligned box around an element center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBox {
    pub id: ElementId,
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl ElementBox {
    #[must_use]
    pub fn left(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.center.y + self.height / 2.0
    }
}

/// Axis-aligned box of the element as drawn, rotation included.
///
/// Rotated elements use loose bounds: the four rotated corners of the
/// unrotated box, re-boxed on the device axes.
#[must_use]
pub fn element_box(element: &Element) -> ElementBox {
    let dims = dimensions(&element.data);
    let (width, height) = if element.angle == 0.0 {
        (dims.width, dims.height)
    } else {
        rotated_extent(dims, element.angle)
    };
    ElementBox { id: element.id.clone(), center: Point::new(element.x, element.y), width, height }
}

fn rotated_extent(dims: Dimensions, angle_deg: f64) -> (f64, f64) {
    let hw = dims.width / 2.0;
    let hh = dims.height / 2.0;
    let mut max_x = 0.0_f64;
    let mut max_y = 0.0_f64;
    for (cx, cy) in [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)] {
        let p = rotate_vector(cx, cy, angle_deg);
        max_x = max_x.max(p.x.abs());
        max_y = max_y.max(p.y.abs());
    }
    (max_x * 2.0, max_y * 2.0)
}
