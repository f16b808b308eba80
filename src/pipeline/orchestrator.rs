// src/pipeline/orchestrator.rs
//
// One call per frame: refresh zones, feed every detection into its history,
// classify, publish alert intents, then prune ids that were not seen.

use super::event_bus::{AlertIntent, EventBus, PipelineEvent};
use super::frame_context::{FrameInput, FrameReport, ObjectResult};
use super::metrics::PipelineMetrics;
use crate::analysis::{diagnose, DangerClassifier};
use crate::tracking::ObjectTable;
use crate::types::Config;
use crate::zones::ZoneCache;
use std::collections::HashSet;
use tracing::{debug, warn};

pub struct FrameProcessor {
    config: Config,
    zones: ZoneCache,
    objects: ObjectTable,
    classifier: DangerClassifier,
    bus: EventBus,
    metrics: PipelineMetrics,
}

impl FrameProcessor {
    pub fn new(config: Config, metrics: PipelineMetrics) -> Self {
        let objects = ObjectTable::new(config.prediction.history_capacity());
        let classifier = DangerClassifier::new(&config.prediction);
        let bus = EventBus::new(config.alert.max_pending);
        Self {
            config,
            zones: ZoneCache::new(),
            objects,
            classifier,
            bus,
            metrics,
        }
    }

    pub fn process(&mut self, frame: &FrameInput) -> FrameReport {
        let previous_zones = self.zones.current();
        let zones = self.zones.get_or_compute(
            frame.frame_width,
            frame.frame_height,
            &self.config.zones,
        );
        if previous_zones != Some(zones) {
            self.bus.publish(PipelineEvent::ZonesChanged {
                frame_id: frame.frame_id,
                zones,
            });
        }

        let mut seen: HashSet<u32> = HashSet::with_capacity(frame.detections.len());
        let mut results = Vec::with_capacity(frame.detections.len());

        for det in &frame.detections {
            if !seen.insert(det.id) {
                warn!(
                    "Frame {}: duplicate detection for id {}, ignoring",
                    frame.frame_id, det.id
                );
                continue;
            }

            let obj = self.objects.observe(det.id, &det.class_label, det.bbox);
            let assessment = self.classifier.assess(obj, frame.fps, &zones.crash);
            self.metrics.inc(&self.metrics.objects_evaluated);

            if self.config.logging.diagnostics {
                let report = diagnose(
                    obj,
                    frame.fps,
                    &zones.crash,
                    self.config.prediction.movement_threshold,
                    self.config.prediction.seconds_to_predict,
                );
                match serde_json::to_string(&report) {
                    Ok(json) => debug!("[diag] {}", json),
                    Err(e) => warn!("Failed to serialize diagnostics: {}", e),
                }
            }

            if assessment.verdict.is_dangerous {
                self.metrics.inc(&self.metrics.dangerous_verdicts);
                self.bus.publish(PipelineEvent::DangerDetected(AlertIntent {
                    frame_id: frame.frame_id,
                    object_id: obj.id,
                    class_label: obj.class_label.clone(),
                    reason: assessment.verdict.reason,
                }));
            }

            results.push(ObjectResult {
                id: obj.id,
                class_label: obj.class_label.clone(),
                assessment,
            });
        }

        let pruned = self.objects.prune(&seen);
        if !pruned.is_empty() {
            self.metrics
                .add(&self.metrics.objects_pruned, pruned.len() as u64);
            self.bus.publish(PipelineEvent::ObjectsPruned {
                frame_id: frame.frame_id,
                ids: pruned.clone(),
            });
        }

        self.metrics.inc(&self.metrics.total_frames);

        FrameReport {
            frame_id: frame.frame_id,
            zones,
            objects: results,
            pruned,
        }
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DetectionInput;
    use crate::types::{BoundingBox, DangerReason};

    fn frame(frame_id: u64, detections: Vec<DetectionInput>) -> FrameInput {
        FrameInput {
            frame_id,
            fps: 30.0,
            frame_width: 1280,
            frame_height: 720,
            detections,
        }
    }

    fn det(id: u32, label: &str, x: f32, y: f32) -> DetectionInput {
        DetectionInput {
            id,
            class_label: label.into(),
            bbox: BoundingBox::new(x, y, x + 60.0, y + 60.0),
        }
    }

    #[test]
    fn test_car_heading_into_crash_zone_raises_alert() {
        let metrics = PipelineMetrics::new();
        let mut processor = FrameProcessor::new(Config::default(), metrics.clone());

        // Crash zone on 1280x720 defaults is [320, 368, 960, 720]
        let mut last = None;
        for i in 0..6u64 {
            let y = 100.0 + 20.0 * i as f32;
            last = Some(processor.process(&frame(i, vec![det(1, "car", 600.0, y)])));
        }
        let report = last.unwrap();
        assert!(report.has_danger());

        let alerts = processor.events().drain_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].object_id, 1);
        assert_eq!(alerts[0].frame_id, 5);
        assert!(alerts[0].reason.as_str().starts_with("vector_hit_"));
        assert_eq!(metrics.summary().dangerous_verdicts, 1);
    }

    #[test]
    fn test_absent_ids_are_pruned() {
        let mut processor = FrameProcessor::new(Config::default(), PipelineMetrics::new());
        processor.process(&frame(0, vec![det(1, "car", 0.0, 0.0), det(2, "dog", 100.0, 0.0)]));
        let report = processor.process(&frame(1, vec![det(2, "dog", 102.0, 0.0)]));

        assert_eq!(report.pruned, vec![1]);
        assert!(processor.objects().get(1).is_none());
        assert_eq!(processor.metrics().summary().objects_pruned, 1);
    }

    #[test]
    fn test_zones_published_once_per_geometry() {
        let mut processor = FrameProcessor::new(Config::default(), PipelineMetrics::new());
        processor.process(&frame(0, vec![]));
        processor.process(&frame(1, vec![]));
        let zone_events = processor
            .events()
            .drain()
            .into_iter()
            .filter(|e| matches!(e, PipelineEvent::ZonesChanged { .. }))
            .count();
        assert_eq!(zone_events, 1);
    }

    #[test]
    fn test_duplicate_ids_in_one_frame_are_ignored() {
        let mut processor = FrameProcessor::new(Config::default(), PipelineMetrics::new());
        let report = processor.process(&frame(
            0,
            vec![det(9, "car", 0.0, 0.0), det(9, "car", 500.0, 0.0)],
        ));
        assert_eq!(report.objects.len(), 1);
        assert_eq!(
            processor.objects().get(9).unwrap().history.total_count(),
            1
        );
        assert_eq!(
            report.objects[0].assessment.verdict.reason,
            DangerReason::InsufficientHistory
        );
    }

    #[test]
    fn test_diagnostics_do_not_change_verdicts() {
        let mut config = Config::default();
        config.logging.diagnostics = true;
        let mut with_diag = FrameProcessor::new(config, PipelineMetrics::new());
        let mut plain = FrameProcessor::new(Config::default(), PipelineMetrics::new());

        for i in 0..8u64 {
            let f = frame(i, vec![det(3, "person", 600.0, 100.0 + 15.0 * i as f32)]);
            let a = with_diag.process(&f);
            let b = plain.process(&f);
            assert_eq!(
                a.objects[0].assessment.verdict,
                b.objects[0].assessment.verdict
            );
        }
    }
}
