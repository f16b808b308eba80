// src/config.rs

use crate::tracking::MAX_HISTORY_FRAMES;
use crate::types::{Config, PredictionConfig};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

impl Config {
    /// Load a YAML config. Missing keys fall back to their defaults, then the
    /// merged result is validated once.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map
        let config: Config = if contents.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(contents)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let z = &self.zones;
        for (name, value) in [
            ("zones.vehicle_box_y_ratio", z.vehicle_box_y_ratio),
            ("zones.crash_zone_x_ratio", z.crash_zone_x_ratio),
            ("zones.crash_zone_y_ratio", z.crash_zone_y_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be within [0, 1], got {}", name, value);
            }
        }

        let p = &self.prediction;
        if p.position_history_frames < 2 || p.position_history_frames > MAX_HISTORY_FRAMES {
            bail!(
                "prediction.position_history_frames must be within [2, {}], got {}",
                MAX_HISTORY_FRAMES,
                p.position_history_frames
            );
        }
        if !p.movement_threshold.is_finite() || p.movement_threshold < 0.0 {
            bail!(
                "prediction.movement_threshold must be a non-negative number, got {}",
                p.movement_threshold
            );
        }
        if !p.seconds_to_predict.is_finite() || p.seconds_to_predict < 0.0 {
            bail!(
                "prediction.seconds_to_predict must be a non-negative number, got {}",
                p.seconds_to_predict
            );
        }
        if p.critical_objects.is_empty() {
            warn!("prediction.critical_objects is empty, no object will ever be flagged");
        }
        if self.alert.max_pending == 0 {
            bail!("alert.max_pending must be at least 1");
        }

        info!(
            "Config validated: window={} frames, threshold={:.2} px/frame, horizon={:.1}s, {} critical classes",
            p.position_history_frames,
            p.movement_threshold,
            p.seconds_to_predict,
            p.critical_objects.len()
        );
        Ok(())
    }
}

impl PredictionConfig {
    /// Per-object buffer size: large enough for the evaluation window,
    /// never above the hard ceiling
    pub fn history_capacity(&self) -> usize {
        self.history_length
            .max(self.position_history_frames)
            .min(MAX_HISTORY_FRAMES)
    }
}
