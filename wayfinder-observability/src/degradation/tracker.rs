//! Bounded history of degradations and their recovery.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use wayfinder_core::models::DegradationEvent;

use crate::tracing_setup::events;

/// History kept before the oldest entries are evicted.
pub const DEFAULT_TRACKER_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

impl TrackedDegradation {
    fn is_active_for(&self, component: &str) -> bool {
        self.recovery_status == RecoveryStatus::Active && self.event.component == component
    }
}

/// Degradations in arrival order. When full, the oldest recovered entry is
/// evicted first, then the oldest active one.
#[derive(Debug, Clone)]
pub struct DegradationTracker {
    history: Vec<TrackedDegradation>,
    capacity: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRACKER_CAPACITY)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, event: DegradationEvent) {
        events::degradation_triggered(&event.component, &event.failure, &event.fallback_used);
        if self.history.len() >= self.capacity {
            let victim = self
                .history
                .iter()
                .position(|t| t.recovery_status == RecoveryStatus::Recovered)
                .unwrap_or(0);
            self.history.remove(victim);
        }
        self.history.push(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    pub fn record_all(&mut self, events: impl IntoIterator<Item = DegradationEvent>) {
        events.into_iter().for_each(|event| self.record(event));
    }

    /// Close every active degradation of `component`; returns how many closed.
    pub fn mark_recovered(&mut self, component: &str) -> usize {
        let now = Utc::now();
        let closed = self
            .history
            .iter_mut()
            .filter(|t| t.is_active_for(component))
            .map(|t| {
                t.recovery_status = RecoveryStatus::Recovered;
                t.recovered_at = Some(now);
            })
            .count();
        if closed > 0 {
            events::degradation_recovered(component);
        }
        closed
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.history
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.history
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.history.iter().any(|t| t.is_active_for(component))
    }

    /// Events for `component` newer than `window_secs` seconds.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - Duration::seconds(window_secs);
        self.history
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > cutoff)
            .count()
    }

    /// Time since the oldest still-active degradation of `component`.
    pub fn degraded_duration(&self, component: &str) -> Option<Duration> {
        self.history
            .iter()
            .filter(|t| t.is_active_for(component))
            .map(|t| t.event.timestamp)
            .min()
            .map(|since| Utc::now() - since)
    }
}
