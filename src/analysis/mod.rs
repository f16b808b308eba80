// src/analysis/mod.rs
//
// Collision prediction for a single tracked object.
//
// Signal flow:
//   PositionHistory window → motion_estimator → trajectory ─┐
//   Crash zone ──────────────────────────────────────────────┼→ danger_classifier → Verdict
//                                                            │
//   (debug only) diagnostics ← same inputs, fps-derived window
//
// Driven once per object per frame by pipeline::FrameProcessor.

pub mod danger_classifier;
pub mod diagnostics;
pub mod motion_estimator;
pub mod trajectory;

// Re-exports for ergonomic access from the pipeline and main.rs
pub use danger_classifier::{evaluate_trajectory, Assessment, DangerClassifier};
pub use diagnostics::{diagnose, diagnostic_window, Diagnostics};
pub use motion_estimator::{corner_motion_vectors, total_speed};
pub use trajectory::{frames_ahead, predict, DEFAULT_FPS};
