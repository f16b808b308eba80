// src/analysis/trajectory.rs

use crate::types::{Corner, CornerMotion, CornerSet};

/// Used when the driver has no usable fps estimate yet
pub const DEFAULT_FPS: f32 = 30.0;

/// Whole frames covered by the prediction horizon
pub fn frames_ahead(fps: f32, horizon_seconds: f32) -> f32 {
    let fps = if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        DEFAULT_FPS
    };
    (fps * horizon_seconds).trunc()
}

/// Linear extrapolation of every corner. No acceleration term.
pub fn predict(
    corners: &CornerSet,
    motion: &CornerMotion,
    fps: f32,
    horizon_seconds: f32,
) -> CornerSet {
    let frames = frames_ahead(fps, horizon_seconds);
    CornerSet(Corner::ALL.map(|c| corners[c].advanced(motion[c.index()], frames)))
}
