// src/pipeline/event_bus.rs
//
// Boundary between the prediction core and whatever reacts to it. The core
// publishes events; the alert dispatcher (or any other consumer) drains
// them. Nothing here knows about threads or audio devices.

use crate::types::DangerReason;
use crate::zones::Zones;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::warn;

/// Request to warn the driver about one object on one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertIntent {
    pub frame_id: u64,
    pub object_id: u32,
    pub class_label: String,
    pub reason: DangerReason,
}

#[derive(Debug, Clone, Serialize)]
pub enum PipelineEvent {
    DangerDetected(AlertIntent),

    ObjectsPruned {
        frame_id: u64,
        ids: Vec<u32>,
    },

    ZonesChanged {
        frame_id: u64,
        zones: Zones,
    },
}

pub struct EventBus {
    events: VecDeque<PipelineEvent>,
    max_pending: usize,
}

impl EventBus {
    pub fn new(max_pending: usize) -> Self {
        let max_pending = max_pending.max(1);
        Self {
            events: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    pub fn publish(&mut self, event: PipelineEvent) {
        if self.events.len() >= self.max_pending {
            warn!(
                "Event bus full ({} events), dropping oldest",
                self.max_pending
            );
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<PipelineEvent> {
        self.events.drain(..).collect()
    }

    /// Drain only the alert intents, discarding bookkeeping events
    pub fn drain_alerts(&mut self) -> Vec<AlertIntent> {
        self.drain()
            .into_iter()
            .filter_map(|e| match e {
                PipelineEvent::DangerDetected(intent) => Some(intent),
                _ => None,
            })
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.events.len()
    }
}
