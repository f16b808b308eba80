// src/analysis/motion_estimator.rs
//
// Average per-frame velocity of each box corner. Corners are estimated
// independently: an approaching object grows, so its corners spread apart
// even when its center barely moves.

use crate::types::{BoundingBox, Corner, CornerMotion, MotionVector};

/// Per-corner mean displacement across consecutive boxes of `window`
/// (oldest first). Fewer than two samples yields four zero vectors.
pub fn corner_motion_vectors(window: &[BoundingBox]) -> CornerMotion {
    if window.len() < 2 {
        return [MotionVector::ZERO; 4];
    }

    let transitions = (window.len() - 1) as f32;
    let mut sums = [(0.0f32, 0.0f32); 4];
    for pair in window.windows(2) {
        let prev = pair[0].corners();
        let next = pair[1].corners();
        for corner in Corner::ALL {
            let sum = &mut sums[corner.index()];
            sum.0 += next[corner].x - prev[corner].x;
            sum.1 += next[corner].y - prev[corner].y;
        }
    }

    sums.map(|(dx, dy)| MotionVector::new(dx / transitions, dy / transitions))
}

/// Summed corner speed in pixels/frame
pub fn total_speed(motion: &CornerMotion) -> f32 {
    motion.iter().map(MotionVector::magnitude).sum()
}
