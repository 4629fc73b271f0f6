//! Degradation tracking and query log behaviour.

use std::time::Duration;

use wayfinder_core::config::ObservabilityConfig;
use wayfinder_core::models::{DegradationEvent, SearchScope};
use wayfinder_observability::tracing_setup::build_filter;
use wayfinder_observability::{DegradationTracker, QueryLog, QueryLogEntry, RecoveryStatus};

fn event(component: &str) -> DegradationEvent {
    DegradationEvent::now(component, "index unavailable", "lexical")
}

#[test]
fn tracker_records_and_recovers() {
    let mut tracker = DegradationTracker::new();
    tracker.record(event("vector_index"));
    tracker.record(event("vector_index"));
    tracker.record(event("embeddings"));

    assert_eq!(tracker.active_degradations().len(), 3);
    assert!(tracker.is_degraded("vector_index"));
    assert_eq!(tracker.count_recent("vector_index", 60), 2);
    assert!(tracker.degraded_duration("vector_index").is_some());

    assert_eq!(tracker.mark_recovered("vector_index"), 2);
    assert!(!tracker.is_degraded("vector_index"));
    assert!(tracker.is_degraded("embeddings"));
    assert!(tracker.degraded_duration("vector_index").is_none());

    let recovered = tracker
        .events()
        .iter()
        .filter(|t| t.recovery_status == RecoveryStatus::Recovered)
        .count();
    assert_eq!(recovered, 2);
    assert_eq!(tracker.mark_recovered("vector_index"), 0);
}

#[test]
fn record_all_tracks_every_event() {
    let mut tracker = DegradationTracker::new();
    tracker.record_all(vec![event("a"), event("b")]);
    assert_eq!(tracker.events().len(), 2);
}

#[test]
fn full_tracker_evicts_recovered_entries_first() {
    let mut tracker = DegradationTracker::with_capacity(2);
    tracker.record(event("a"));
    tracker.record(event("b"));
    tracker.mark_recovered("b");

    tracker.record(event("c"));
    assert_eq!(components(&tracker), vec!["a", "c"]);

    tracker.record(event("d"));
    assert_eq!(components(&tracker), vec!["c", "d"]);
}

fn components(tracker: &DegradationTracker) -> Vec<&str> {
    tracker
        .events()
        .iter()
        .map(|t| t.event.component.as_str())
        .collect()
}

fn entry(ms: u64, fallback: bool) -> QueryLogEntry {
    QueryLogEntry::new("q", SearchScope::All, Duration::from_millis(ms), 1, 2, fallback)
}

#[test]
fn query_log_is_bounded() {
    let mut log = QueryLog::with_capacity(3);
    for ms in 1..=5 {
        log.record(entry(ms, false));
    }
    assert_eq!(log.count(), 3);
    let kept: Vec<u128> = log.entries().map(|e| e.latency.as_millis()).collect();
    assert_eq!(kept, vec![3, 4, 5]);
}

#[test]
fn query_log_statistics() {
    let mut log = QueryLog::new();
    assert_eq!(log.avg_latency(), Duration::ZERO);
    assert_eq!(log.fallback_rate(), 0.0);

    log.record(entry(10, true));
    log.record(entry(20, false));
    log.record(entry(30, false));
    log.record(entry(40, true));

    assert_eq!(log.avg_latency(), Duration::from_millis(25));
    assert_eq!(log.latency_percentile(0.0), Duration::from_millis(10));
    assert_eq!(log.latency_percentile(1.0), Duration::from_millis(40));
    assert!((log.fallback_rate() - 0.5).abs() < f64::EPSILON);
    assert!(log.entries().all(|e| e.result_count() == 3));
}

#[test]
fn zero_capacity_log_keeps_nothing() {
    let mut log = QueryLog::with_capacity(0);
    log.record(entry(1, false));
    assert_eq!(log.count(), 0);
}

#[test]
fn filter_falls_back_on_bad_level() {
    let config = ObservabilityConfig {
        log_level: "not a [valid directive".to_string(),
        ..Default::default()
    };
    // Must not panic regardless of WAYFINDER_LOG.
    let _ = build_filter(&config);
}
