/// Wayfinder system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Score assigned to every lexical fallback match. There is no geometric
/// distance on that path, so the score is a constant.
pub const LEXICAL_FALLBACK_SCORE: f64 = 0.5;

/// Upper bound of cosine distance.
pub const MAX_COSINE_DISTANCE: f64 = 2.0;

/// Page size used when scanning stored embeddings.
pub const EMBEDDING_SCAN_PAGE_SIZE: usize = 256;

/// Maximum number of entities handled per backfill batch.
pub const MAX_BACKFILL_BATCH_SIZE: usize = 1000;

/// Message returned to the end user when response generation fails.
pub const APOLOGY_MESSAGE: &str =
    "I'm sorry, I encountered an error while processing your query.";
