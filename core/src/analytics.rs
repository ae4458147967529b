use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::channel::DeliveryOutcome;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct MetricPoint {
    pub slot: u64,
    pub acks: u32,
    pub nacks: u32,
    pub smoothed_reliability: f64,
}

/// Rolling per-slot delivery history plus cumulative counters.
pub struct MetricsCollector {
    pub history: VecDeque<MetricPoint>,
    pub max_points: usize,
    total_acks: u64,
    total_nacks: u64,
    dropped: u64,
    current_reliability: Option<f64>,
}

impl MetricsCollector {
    pub fn new(max_points: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(max_points),
            max_points,
            total_acks: 0,
            total_nacks: 0,
            dropped: 0,
            current_reliability: None,
        }
    }

    pub fn record_slot(&mut self, slot: u64, outcomes: &[DeliveryOutcome]) {
        let acks = outcomes.iter().filter(|o| o.ack).count() as u32;
        let nacks = outcomes.len() as u32 - acks;
        self.total_acks += u64::from(acks);
        self.total_nacks += u64::from(nacks);

        // Empty groups carry no signal; keep the previous estimate.
        if !outcomes.is_empty() {
            let raw = f64::from(acks) / outcomes.len() as f64;
            let alpha = 0.1;
            self.current_reliability = Some(match self.current_reliability {
                Some(prev) => prev * (1.0 - alpha) + raw * alpha,
                None => raw,
            });
        }

        self.history.push_back(MetricPoint {
            slot,
            acks,
            nacks,
            smoothed_reliability: self.current_reliability.unwrap_or(0.0),
        });

        if self.history.len() > self.max_points {
            self.history.pop_front();
        }
    }

    pub fn record_drop(&mut self) {
        self.dropped += 1;
    }

    pub fn total_acks(&self) -> u64 {
        self.total_acks
    }

    pub fn total_nacks(&self) -> u64 {
        self.total_nacks
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Fraction of all per-recipient trials that were acknowledged.
    pub fn observed_reliability(&self) -> Option<f64> {
        let total = self.total_acks + self.total_nacks;
        (total > 0).then(|| self.total_acks as f64 / total as f64)
    }
}
