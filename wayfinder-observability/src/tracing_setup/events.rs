//! Structured log events for key operations.

pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

pub fn degradation_recovered(component: &str) {
    tracing::info!(
        event = "degradation_recovered",
        component = %component,
        "degradation recovered"
    );
}

pub fn index_rebuilt(class: &str, indexed: usize, skipped: usize) {
    tracing::info!(
        event = "index_rebuilt",
        class = %class,
        indexed = indexed,
        skipped = skipped,
        "vector index rebuilt"
    );
}

pub fn stale_entry_dropped(class: &str, entity_id: i64) {
    tracing::warn!(
        event = "stale_entry_dropped",
        class = %class,
        entity_id = entity_id,
        "index entry has no live entity"
    );
}
