// src/alert.rs
//
// Driver-side consumer of alert intents. Runs as its own task so the frame
// loop never waits on it; the cooldown gate keeps one approaching object
// from triggering an alert on every frame.

use crate::pipeline::{AlertIntent, PipelineMetrics};
use crate::types::AlertConfig;
use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Admits at most one alert per `cooldown_frames` window
#[derive(Debug, Clone)]
pub struct AlertGate {
    cooldown_frames: u64,
    last_fired: Option<u64>,
}

impl AlertGate {
    pub fn new(cooldown_frames: u64) -> Self {
        Self {
            cooldown_frames,
            last_fired: None,
        }
    }

    pub fn admit(&mut self, frame_id: u64) -> bool {
        if let Some(last) = self.last_fired {
            if frame_id.saturating_sub(last) < self.cooldown_frames {
                return false;
            }
        }
        self.last_fired = Some(frame_id);
        true
    }
}

pub struct AlertDispatcher {
    tx: mpsc::Sender<AlertIntent>,
    handle: JoinHandle<()>,
}

impl AlertDispatcher {
    pub fn spawn(config: &AlertConfig, metrics: PipelineMetrics) -> Self {
        let (tx, mut rx) = mpsc::channel::<AlertIntent>(config.max_pending.max(1));
        let enabled = config.enabled;
        let mut gate = AlertGate::new(config.cooldown_frames);

        let handle = tokio::spawn(async move {
            while let Some(intent) = rx.recv().await {
                if !enabled || !gate.admit(intent.frame_id) {
                    debug!(
                        "Alert suppressed: frame {} object {} ({})",
                        intent.frame_id, intent.object_id, intent.reason
                    );
                    metrics.inc(&metrics.alerts_suppressed);
                    continue;
                }

                warn!(
                    "🚨 [{}] DANGER frame {}: {} #{} ({})",
                    chrono::Utc::now().format("%H:%M:%S%.3f"),
                    intent.frame_id,
                    intent.class_label.to_uppercase(),
                    intent.object_id,
                    intent.reason
                );
                metrics.inc(&metrics.alerts_dispatched);
            }
            info!("Alert dispatcher stopped");
        });

        Self { tx, handle }
    }

    pub async fn send(&self, intent: AlertIntent) -> Result<()> {
        self.tx
            .send(intent)
            .await
            .context("alert dispatcher is no longer running")
    }

    /// Close the channel and wait for queued intents to be handled
    pub async fn shutdown(self) -> Result<()> {
        drop(self.tx);
        self.handle.await.context("alert dispatcher task panicked")
    }
}
