//! Span definitions per operation: retrieval, embedding, index rebuild.

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($query:expr, $scope:expr) => {
        tracing::info_span!("wayfinder.retrieval", query = %$query, scope = ?$scope)
    };
}

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($provider:expr, $dimension:expr) => {
        tracing::info_span!("wayfinder.embedding", provider = %$provider, dimension = $dimension)
    };
}

/// Create an index rebuild span.
#[macro_export]
macro_rules! rebuild_span {
    ($class:expr) => {
        tracing::info_span!("wayfinder.rebuild", class = %$class)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RETRIEVAL: &str = "wayfinder.retrieval";
    pub const EMBEDDING: &str = "wayfinder.embedding";
    pub const REBUILD: &str = "wayfinder.rebuild";
}
