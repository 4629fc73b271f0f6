//! Query performance logging: query text, scope, latency, per-class result
//! counts, and whether any class fell back to lexical matching.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wayfinder_core::config::defaults::DEFAULT_QUERY_LOG_CAPACITY;
use wayfinder_core::models::SearchScope;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    pub scope: SearchScope,
    pub latency: Duration,
    pub organization_count: usize,
    pub program_count: usize,
    pub used_fallback: bool,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create a new entry with the timestamp set to now.
    pub fn new(
        query: impl Into<String>,
        scope: SearchScope,
        latency: Duration,
        organization_count: usize,
        program_count: usize,
        used_fallback: bool,
    ) -> Self {
        Self {
            query: query.into(),
            scope,
            latency,
            organization_count,
            program_count,
            used_fallback,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn result_count(&self) -> usize {
        self.organization_count + self.program_count
    }
}

/// Bounded query log; the oldest entries are evicted first.
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: VecDeque<QueryLogEntry>,
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUERY_LOG_CAPACITY)
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query = %entry.query,
            scope = ?entry.scope,
            latency_ms = entry.latency.as_millis() as u64,
            organizations = entry.organization_count,
            programs = entry.program_count,
            used_fallback = entry.used_fallback,
            "query logged"
        );

        if self.max_entries == 0 {
            return;
        }
        while self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter()
    }

    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(|e| e.latency).sum();
        total / self.entries.len() as u32
    }

    /// Latency at the given percentile (0.0 to 1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(|e| e.latency).collect();
        latencies.sort();
        let idx = ((p.clamp(0.0, 1.0) * (latencies.len() - 1) as f64).round() as usize)
            .min(latencies.len() - 1);
        latencies[idx]
    }

    /// Share of logged queries that used the lexical fallback.
    pub fn fallback_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let fallbacks = self.entries.iter().filter(|e| e.used_fallback).count();
        fallbacks as f64 / self.entries.len() as f64
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}
