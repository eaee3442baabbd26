//! Editor tuning knobs with typed defaults, overridable from `OVERLAY_*`
//! environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryPolicy;
use crate::consts::{
    DEVICE_SIZE_PX, FRAME_INTERVAL_MICROS, GUIDE_THRESHOLD_PX, HISTORY_LIMIT, RESIZE_SPEED, ROTATION_SMOOTHING_DEG,
    ROTATION_SNAP_THRESHOLD_DEG, SNAP_ESCAPE_THRESHOLD_PX,
};
use crate::error::{EditorError, EditorResult};

const MAX_FRAME_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Alignment guide reach, in screen pixels.
    pub guide_threshold_px: f64,
    /// Distance a pinned axis must be pulled before it releases, in device pixels.
    pub escape_threshold_px: f64,
    pub frame_interval: Duration,
    pub resize_speed: f64,
    pub rotation_snap_threshold_deg: f64,
    pub rotation_smoothing_deg: f64,
    pub history_limit: usize,
    pub strict_invariants: bool,
    pub boundary: BoundaryPolicy,
    pub device_width: f64,
    pub device_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            guide_threshold_px: GUIDE_THRESHOLD_PX,
            escape_threshold_px: SNAP_ESCAPE_THRESHOLD_PX,
            frame_interval: Duration::from_micros(FRAME_INTERVAL_MICROS),
            resize_speed: RESIZE_SPEED,
            rotation_snap_threshold_deg: ROTATION_SNAP_THRESHOLD_DEG,
            rotation_smoothing_deg: ROTATION_SMOOTHING_DEG,
            history_limit: HISTORY_LIMIT,
            strict_invariants: false,
            boundary: BoundaryPolicy::Unconstrained,
            device_width: DEVICE_SIZE_PX,
            device_height: DEVICE_SIZE_PX,
        }
    }
}

impl EditorConfig {
    /// Read overrides from the process environment.
    ///
    /// # Errors
    ///
    /// `Config` when a variable is set but cannot be parsed or is out of range.
    pub fn from_env() -> EditorResult<Self> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(err) => {
                tracing::warn!(key, %err, "ignoring unreadable environment variable");
                None
            }
        })
    }

    /// Read overrides through `lookup`; unset keys keep their defaults.
    ///
    /// # Errors
    ///
    /// `Config` when a value cannot be parsed or is out of range.
    pub fn from_lookup<F>(lookup: F) -> EditorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let device_width = positive(&lookup, "OVERLAY_DEVICE_WIDTH", d.device_width)?;
        let device_height = positive(&lookup, "OVERLAY_DEVICE_HEIGHT", d.device_height)?;

        let boundary = match lookup("OVERLAY_BOUNDARY") {
            None => d.boundary,
            Some(mode) => parse_boundary(mode.trim(), device_width, device_height)?,
        };

        let history_limit = parse_or(&lookup, "OVERLAY_HISTORY_LIMIT", d.history_limit)?;
        if history_limit == 0 {
            return Err(EditorError::Config("OVERLAY_HISTORY_LIMIT must be at least 1".into()));
        }
        let frame_interval = match lookup("OVERLAY_FRAME_INTERVAL_MS") {
            None => d.frame_interval,
            Some(_) => {
                let ms: u64 = parse_or(&lookup, "OVERLAY_FRAME_INTERVAL_MS", 0)?;
                if ms > MAX_FRAME_INTERVAL_MS {
                    return Err(EditorError::Config(format!("OVERLAY_FRAME_INTERVAL_MS out of range: {ms}")));
                }
                Duration::from_millis(ms)
            }
        };

        Ok(Self {
            guide_threshold_px: non_negative(&lookup, "OVERLAY_GUIDE_THRESHOLD_PX", d.guide_threshold_px)?,
            escape_threshold_px: non_negative(&lookup, "OVERLAY_ESCAPE_THRESHOLD_PX", d.escape_threshold_px)?,
            frame_interval,
            resize_speed: positive(&lookup, "OVERLAY_RESIZE_SPEED", d.resize_speed)?,
            rotation_snap_threshold_deg: non_negative(&lookup, "OVERLAY_ROTATION_SNAP_DEG", d.rotation_snap_threshold_deg)?,
            rotation_smoothing_deg: non_negative(&lookup, "OVERLAY_ROTATION_SMOOTHING_DEG", d.rotation_smoothing_deg)?,
            history_limit,
            strict_invariants: parse_flag(&lookup, "OVERLAY_STRICT_INVARIANTS", d.strict_invariants)?,
            boundary,
            device_width,
            device_height,
        })
    }
}

/// Parse a boundary mode name for a `width × height` device.
///
/// # Errors
///
/// `Config` for unknown modes.
pub fn parse_boundary(mode: &str, width: f64, height: f64) -> EditorResult<BoundaryPolicy> {
    match mode {
        "unconstrained" => Ok(BoundaryPolicy::Unconstrained),
        "clamp-to-display" => Ok(BoundaryPolicy::clamp_to_display(width, height)),
        other => Err(EditorError::Config(format!("unknown boundary mode: {other:?}"))),
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> EditorResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| EditorError::Config(format!("{key}={raw:?}: {err}"))),
    }
}

fn non_negative<F>(lookup: &F, key: &str, default: f64) -> EditorResult<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EditorError::Config(format!("{key} must be a non-negative number, got {value}")))
    }
}

fn positive<F>(lookup: &F, key: &str, default: f64) -> EditorResult<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EditorError::Config(format!("{key} must be a positive number, got {value}")))
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> EditorResult<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(EditorError::Config(format!("{key}={raw:?}: expected a boolean"))),
    }
}
