// src/pipeline/frame_context.rs
//
// Per-frame input handed over by the capture/tracking driver, and the
// per-frame report handed back.

use crate::analysis::Assessment;
use crate::types::BoundingBox;
use crate::zones::Zones;
use serde::{Deserialize, Serialize};

/// One tracked detection. `id` is stable across frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionInput {
    pub id: u32,
    pub class_label: String,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameInput {
    pub frame_id: u64,
    /// Smoothed fps estimate; 0 or missing falls back to the default
    #[serde(default)]
    pub fps: f32,
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(default)]
    pub detections: Vec<DetectionInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectResult {
    pub id: u32,
    pub class_label: String,
    pub assessment: Assessment,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame_id: u64,
    pub zones: Zones,
    pub objects: Vec<ObjectResult>,
    pub pruned: Vec<u32>,
}

impl FrameReport {
    pub fn dangerous(&self) -> impl Iterator<Item = &ObjectResult> {
        self.objects
            .iter()
            .filter(|o| o.assessment.verdict.is_dangerous)
    }

    pub fn has_danger(&self) -> bool {
        self.dangerous().next().is_some()
    }
}
