// src/analysis/diagnostics.rs
//
// Debug-only breakdown of a danger decision. Uses an fps-derived window
// (five seconds of frames, clamped to [10, 150]) instead of the configured
// one, so its numbers can disagree with the classifier. Never feed this
// back into verdicts.

use super::motion_estimator::{corner_motion_vectors, total_speed};
use super::trajectory::{predict, DEFAULT_FPS};
use crate::geometry::{line_intersects_box, sweep_intersects};
use crate::tracking::{TrackedObject, MAX_HISTORY_FRAMES};
use crate::types::{BoundingBox, Corner, CornerMotion, CornerSet, Edge};
use serde::Serialize;
use tracing::debug;

const MIN_DIAGNOSTIC_WINDOW: usize = 10;
const DIAGNOSTIC_WINDOW_SECONDS: f32 = 5.0;

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub object_id: u32,
    pub class_label: String,
    pub fps: f32,
    pub window: usize,
    pub available: usize,
    pub corners: Option<CornerSet>,
    pub motion: Option<CornerMotion>,
    pub total_movement: f32,
    /// Path length of the box center across the window
    pub center_travel: f32,
    pub movement_threshold: f32,
    pub predicted: Option<CornerSet>,
    pub corner_hits: Vec<(Corner, bool)>,
    pub edge_sweeps: Vec<(Edge, bool)>,
}

pub fn diagnostic_window(fps: f32) -> usize {
    let fps = if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        DEFAULT_FPS
    };
    ((fps * DIAGNOSTIC_WINDOW_SECONDS) as usize).clamp(MIN_DIAGNOSTIC_WINDOW, MAX_HISTORY_FRAMES)
}

pub fn diagnose(
    obj: &TrackedObject,
    fps: f32,
    crash: &BoundingBox,
    movement_threshold: f32,
    seconds_to_predict: f32,
) -> Diagnostics {
    let window = diagnostic_window(fps);
    let mut report = Diagnostics {
        object_id: obj.id,
        class_label: obj.class_label.clone(),
        fps,
        window,
        available: obj.history.total_count(),
        corners: None,
        motion: None,
        total_movement: 0.0,
        center_travel: 0.0,
        movement_threshold,
        predicted: None,
        corner_hits: Vec::new(),
        edge_sweeps: Vec::new(),
    };

    if report.available < window {
        debug!(
            "[diag] object {}: not enough history ({}/{})",
            obj.id, report.available, window
        );
        return report;
    }

    let boxes = obj.history.last_n(window);
    let Some(current) = boxes.last() else {
        return report;
    };
    let corners = current.corners();
    let motion = corner_motion_vectors(&boxes);
    report.corners = Some(corners);
    report.motion = Some(motion);
    report.total_movement = total_speed(&motion);
    report.center_travel = obj.history.movement_magnitude(window);

    if report.total_movement < movement_threshold {
        debug!(
            "[diag] object {}: movement {:.2} below threshold {:.2}",
            obj.id, report.total_movement, movement_threshold
        );
        return report;
    }

    let predicted = predict(&corners, &motion, fps, seconds_to_predict);
    report.predicted = Some(predicted);

    for corner in Corner::ALL {
        let hit = line_intersects_box(corners[corner], predicted[corner], crash);
        debug!(
            "[diag] object {} corner {}: {:?} -> {:?}, hits crash: {}",
            obj.id,
            corner.code(),
            corners[corner],
            predicted[corner],
            hit
        );
        report.corner_hits.push((corner, hit));
    }

    for edge in Edge::ALL {
        let (a, b) = edge.corners();
        let sweeps = sweep_intersects(crash, corners[a], predicted[a], corners[b], predicted[b]);
        debug!("[diag] object {} sweep {} edge: {}", obj.id, edge.as_str(), sweeps);
        report.edge_sweeps.push((edge, sweeps));
    }

    report
}
