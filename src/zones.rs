// src/zones.rs
//
// Vehicle strip and crash zone derived from frame size and the configured
// ratios. Pixel math is done on whole pixels so zone edges line up with
// the frame grid.

use crate::types::{BoundingBox, ZoneConfig};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Zones {
    /// Bottom strip of the frame occupied by the ego vehicle
    pub vehicle: BoundingBox,
    /// Region directly ahead of the bumper where a collision would occur
    pub crash: BoundingBox,
}

fn clamp_ratio(r: f64) -> f64 {
    if r.is_finite() {
        r.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Whole pixels of `extent * ratio`, never more than `extent`. Done in f64
/// so 720 * 0.7 truncates to 503 rather than rounding up to 504.
fn scaled(extent: u32, ratio: f64) -> u32 {
    ((extent as f64 * clamp_ratio(ratio)) as u32).min(extent)
}

pub fn compute(
    frame_w: u32,
    frame_h: u32,
    vehicle_y_ratio: f64,
    crash_x_ratio: f64,
    crash_y_ratio: f64,
) -> Zones {
    let vehicle_h = scaled(frame_h, vehicle_y_ratio);
    let vehicle = BoundingBox::new(
        0.0,
        frame_h.saturating_sub(vehicle_h) as f32,
        frame_w as f32,
        frame_h as f32,
    );

    let crash_w = scaled(frame_w, crash_x_ratio);
    let crash_h = scaled(vehicle_h, crash_y_ratio);
    let crash_x1 = frame_w.saturating_sub(crash_w) / 2;
    let crash = BoundingBox::new(
        crash_x1 as f32,
        frame_h.saturating_sub(crash_h) as f32,
        (crash_x1 + crash_w) as f32,
        frame_h as f32,
    );

    Zones { vehicle, crash }
}

/// Zones for the current session, recomputed only when the frame size or
/// the ratios change.
#[derive(Debug, Default)]
pub struct ZoneCache {
    key: Option<(u32, u32, ZoneConfig)>,
    zones: Option<Zones>,
}

impl ZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, frame_w: u32, frame_h: u32, cfg: &ZoneConfig) -> Zones {
        let key = (frame_w, frame_h, *cfg);
        if let (Some(cached_key), Some(zones)) = (&self.key, self.zones) {
            if *cached_key == key {
                return zones;
            }
        }

        let zones = compute(
            frame_w,
            frame_h,
            cfg.vehicle_box_y_ratio,
            cfg.crash_zone_x_ratio,
            cfg.crash_zone_y_ratio,
        );
        info!(
            "Zones computed for {}x{}: vehicle={:?} crash={:?}",
            frame_w,
            frame_h,
            zones.vehicle.as_array(),
            zones.crash.as_array()
        );
        self.key = Some(key);
        self.zones = Some(zones);
        zones
    }

    pub fn current(&self) -> Option<Zones> {
        self.zones
    }
}
