// src/lib.rs
//
// Trajectory-based collision prediction for tracked objects in front of a
// camera-equipped vehicle. The frame driver feeds one box per tracked id per
// frame; the core answers with a verdict and a reason code.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod geometry;
pub mod pipeline;
pub mod tracking;
pub mod types;
pub mod zones;

pub use analysis::{Assessment, DangerClassifier};
pub use pipeline::{FrameInput, FrameProcessor, FrameReport};
pub use tracking::{ObjectTable, PositionHistory, TrackedObject};
pub use types::{BoundingBox, Config, Corner, DangerReason, Point, Verdict};
pub use zones::{ZoneCache, Zones};
