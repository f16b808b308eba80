// src/analysis/danger_classifier.rs
//
// Per-object, per-frame collision verdict.
//
// Pipeline:
//   history window → corner motion → linear prediction → geometry tests
//
// Preconditions short-circuit with a non-dangerous verdict. The geometry
// tests run in a fixed order (direct hit, sweep, containment) and the first
// match wins, so the same input always yields the same reason code.

use super::motion_estimator::{corner_motion_vectors, total_speed};
use super::trajectory::predict;
use crate::geometry::{line_intersects_box, sweep_intersects};
use crate::tracking::TrackedObject;
use crate::types::{
    BoundingBox, Corner, CornerSet, DangerReason, Edge, PredictionConfig, Verdict,
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Verdict plus the geometry behind it, for overlays and debugging.
/// Corner sets are only present when the classifier got far enough to
/// compute them.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub verdict: Verdict,
    pub corners: Option<CornerSet>,
    pub predicted: Option<CornerSet>,
}

impl Assessment {
    fn rejected(reason: DangerReason) -> Self {
        Self {
            verdict: Verdict::safe(reason),
            corners: None,
            predicted: None,
        }
    }
}

pub struct DangerClassifier {
    required_frames: usize,
    movement_threshold: f32,
    seconds_to_predict: f32,
    critical_objects: HashSet<String>,
}

impl DangerClassifier {
    pub fn new(config: &PredictionConfig) -> Self {
        Self {
            required_frames: config.position_history_frames,
            movement_threshold: config.movement_threshold,
            seconds_to_predict: config.seconds_to_predict,
            critical_objects: config.critical_objects.iter().cloned().collect(),
        }
    }

    pub fn is_critical(&self, class_label: &str) -> bool {
        self.critical_objects.contains(class_label)
    }

    pub fn classify(&self, obj: &TrackedObject, fps: f32, crash: &BoundingBox) -> Verdict {
        self.assess(obj, fps, crash).verdict
    }

    pub fn assess(&self, obj: &TrackedObject, fps: f32, crash: &BoundingBox) -> Assessment {
        if obj.history.total_count() < self.required_frames {
            return Assessment::rejected(DangerReason::InsufficientHistory);
        }
        if !self.is_critical(&obj.class_label) {
            return Assessment::rejected(DangerReason::NotCriticalObject);
        }

        let window = obj.history.last_n(self.required_frames);
        let current = match window.last() {
            Some(b) => *b,
            None => return Assessment::rejected(DangerReason::InsufficientHistory),
        };
        let corners = current.corners();

        let motion = corner_motion_vectors(&window);
        if !motion.iter().all(|v| v.is_finite()) {
            return Assessment::rejected(DangerReason::InvalidMotionVectors);
        }

        let speed = total_speed(&motion);
        if speed < self.movement_threshold {
            return Assessment {
                verdict: Verdict::safe(DangerReason::InsufficientMovement),
                corners: Some(corners),
                predicted: None,
            };
        }

        let predicted = predict(&corners, &motion, fps, self.seconds_to_predict);
        if !predicted.is_finite() {
            return Assessment {
                verdict: Verdict::safe(DangerReason::InvalidPredictions),
                corners: Some(corners),
                predicted: None,
            };
        }

        let verdict = evaluate_trajectory(&corners, &predicted, crash);
        if verdict.is_dangerous {
            debug!(
                "Object {} ({}) dangerous: {} (speed={:.1}px/frame)",
                obj.id, obj.class_label, verdict.reason, speed
            );
        }

        Assessment {
            verdict,
            corners: Some(corners),
            predicted: Some(predicted),
        }
    }
}

/// Geometry decision for one object: direct corner hits, then edge sweeps,
/// then whole-zone containment.
pub fn evaluate_trajectory(
    corners: &CornerSet,
    predicted: &CornerSet,
    crash: &BoundingBox,
) -> Verdict {
    for corner in Corner::ALL {
        if line_intersects_box(corners[corner], predicted[corner], crash) {
            return Verdict::dangerous(DangerReason::VectorHit(corner));
        }
    }

    for edge in Edge::ALL {
        let (a, b) = edge.corners();
        if sweep_intersects(crash, corners[a], predicted[a], corners[b], predicted[b]) {
            return Verdict::dangerous(DangerReason::SweepThrough(edge));
        }
    }

    if let Some(envelope) = BoundingBox::envelope(predicted.points()) {
        if envelope.contains_box(crash) {
            return Verdict::dangerous(DangerReason::WillContainCrashZone);
        }
    }

    Verdict::safe(DangerReason::NoDangerDetected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, RejectionKind};

    fn config() -> PredictionConfig {
        PredictionConfig {
            position_history_frames: 6,
            movement_threshold: 3.0,
            seconds_to_predict: 2.0,
            critical_objects: vec!["car".into(), "person".into()],
            ..PredictionConfig::default()
        }
    }

    fn object_with(label: &str, boxes: &[BoundingBox]) -> TrackedObject {
        let mut obj = TrackedObject::new(1, label, 30);
        for b in boxes {
            obj.history.add(*b);
        }
        obj
    }

    fn moving(start: BoundingBox, dx: f32, dy: f32, n: usize) -> Vec<BoundingBox> {
        (0..n)
            .map(|i| {
                let k = i as f32;
                BoundingBox::new(
                    start.x1() + dx * k,
                    start.y1() + dy * k,
                    start.x2() + dx * k,
                    start.y2() + dy * k,
                )
            })
            .collect()
    }

    #[test]
    fn test_static_object_has_insufficient_movement() {
        let boxes = vec![BoundingBox::new(100.0, 100.0, 140.0, 140.0); 6];
        let obj = object_with("car", &boxes);
        let crash = BoundingBox::new(300.0, 90.0, 400.0, 200.0);
        assert_eq!(
            DangerClassifier::new(&config()).classify(&obj, 30.0, &crash),
            Verdict::safe(DangerReason::InsufficientMovement)
        );
    }

    #[test]
    fn test_approaching_object_hits_crash_zone() {
        let start = BoundingBox::new(100.0, 100.0, 140.0, 140.0);
        let obj = object_with("car", &moving(start, 50.0, 0.0, 6));
        let crash = BoundingBox::new(300.0, 90.0, 400.0, 200.0);
        let verdict = DangerClassifier::new(&config()).classify(&obj, 30.0, &crash);
        assert!(verdict.is_dangerous);
        assert!(verdict.reason.as_str().starts_with("vector_hit_"));
        // Top-left is tested first
        assert_eq!(verdict.reason, DangerReason::VectorHit(Corner::TopLeft));
    }

    #[test]
    fn test_non_critical_class_is_ignored() {
        let start = BoundingBox::new(100.0, 100.0, 140.0, 140.0);
        let obj = object_with("bird", &moving(start, 50.0, 0.0, 6));
        let crash = BoundingBox::new(300.0, 90.0, 400.0, 200.0);
        assert_eq!(
            DangerClassifier::new(&config()).classify(&obj, 30.0, &crash),
            Verdict::safe(DangerReason::NotCriticalObject)
        );
    }

    #[test]
    fn test_short_history_checked_before_class() {
        let start = BoundingBox::new(100.0, 100.0, 140.0, 140.0);
        let obj = object_with("bird", &moving(start, 50.0, 0.0, 3));
        let crash = BoundingBox::new(300.0, 90.0, 400.0, 200.0);
        assert_eq!(
            DangerClassifier::new(&config()).classify(&obj, 30.0, &crash),
            Verdict::safe(DangerReason::InsufficientHistory)
        );
    }

    #[test]
    fn test_object_moving_away_is_safe() {
        let start = BoundingBox::new(100.0, 100.0, 140.0, 140.0);
        let obj = object_with("person", &moving(start, -5.0, -5.0, 6));
        let crash = BoundingBox::new(300.0, 300.0, 400.0, 400.0);
        let assessment = DangerClassifier::new(&config()).assess(&obj, 30.0, &crash);
        assert_eq!(
            assessment.verdict,
            Verdict::safe(DangerReason::NoDangerDetected)
        );
        assert!(assessment.predicted.is_some());
    }

    #[test]
    fn test_only_the_configured_window_is_used() {
        // Old fast movement followed by a stationary window
        let start = BoundingBox::new(100.0, 100.0, 140.0, 140.0);
        let mut boxes = moving(start, 50.0, 0.0, 10);
        let last = *boxes.last().unwrap();
        boxes.extend(std::iter::repeat(last).take(6));
        let obj = object_with("car", &boxes);
        let crash = BoundingBox::new(900.0, 90.0, 1000.0, 200.0);
        assert_eq!(
            DangerClassifier::new(&config()).classify(&obj, 30.0, &crash).reason,
            DangerReason::InsufficientMovement
        );
    }

    #[test]
    fn test_sweep_when_corner_paths_straddle_zone() {
        let corners = BoundingBox::new(0.0, 0.0, 100.0, 20.0).corners();
        let predicted = BoundingBox::new(0.0, 200.0, 100.0, 220.0).corners();
        let crash = BoundingBox::new(45.0, 100.0, 55.0, 110.0);
        assert_eq!(
            evaluate_trajectory(&corners, &predicted, &crash),
            Verdict::dangerous(DangerReason::SweepThrough(Edge::Top))
        );
    }

    #[test]
    fn test_containment_when_prediction_engulfs_zone() {
        // Box already surrounds the zone and grows outward, so no corner
        // path or edge sweep touches it.
        let corners = CornerSet([
            Point::new(-10.0, -10.0),
            Point::new(110.0, -10.0),
            Point::new(-10.0, 110.0),
            Point::new(110.0, 110.0),
        ]);
        let predicted = CornerSet([
            Point::new(-20.0, -20.0),
            Point::new(120.0, -20.0),
            Point::new(-20.0, 120.0),
            Point::new(120.0, 120.0),
        ]);
        let crash = BoundingBox::new(40.0, 40.0, 60.0, 60.0);
        assert_eq!(
            evaluate_trajectory(&corners, &predicted, &crash),
            Verdict::dangerous(DangerReason::WillContainCrashZone)
        );
    }

    #[test]
    fn test_zero_fps_uses_default() {
        let start = BoundingBox::new(100.0, 100.0, 140.0, 140.0);
        let obj = object_with("car", &moving(start, 50.0, 0.0, 6));
        let crash = BoundingBox::new(300.0, 90.0, 400.0, 200.0);
        let assessment = DangerClassifier::new(&config()).assess(&obj, 0.0, &crash);
        assert!(assessment.verdict.is_dangerous);
        let predicted = assessment.predicted.unwrap();
        assert_eq!(predicted[Corner::TopLeft], Point::new(350.0 + 3000.0, 100.0));
    }

    #[test]
    fn test_infinite_corner_motion_is_rejected() {
        // Finite boxes whose corners jump across the whole f32 range
        let mut boxes = vec![BoundingBox::new(-f32::MAX, 0.0, 0.0, 10.0); 5];
        boxes.push(BoundingBox::new(f32::MAX, 0.0, f32::MAX, 10.0));
        let obj = object_with("car", &boxes);
        let crash = BoundingBox::new(300.0, 90.0, 400.0, 200.0);

        let assessment = DangerClassifier::new(&config()).assess(&obj, 30.0, &crash);
        assert_eq!(
            assessment.verdict,
            Verdict::safe(DangerReason::InvalidMotionVectors)
        );
        assert_eq!(
            assessment.verdict.reason.rejection(),
            Some(RejectionKind::DegenerateMotion)
        );
        assert!(assessment.predicted.is_none());
    }

    #[test]
    fn test_overflowing_prediction_is_rejected() {
        // 1e37 px/frame is finite, but 60 frames of it is not
        let start = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let obj = object_with("person", &moving(start, 1e37, 0.0, 6));
        let crash = BoundingBox::new(300.0, 90.0, 400.0, 200.0);

        let assessment = DangerClassifier::new(&config()).assess(&obj, 30.0, &crash);
        assert_eq!(
            assessment.verdict,
            Verdict::safe(DangerReason::InvalidPredictions)
        );
        assert_eq!(
            assessment.verdict.reason.rejection(),
            Some(RejectionKind::InvalidPrediction)
        );
        assert!(assessment.corners.is_some());
        assert!(assessment.predicted.is_none());
    }
}
