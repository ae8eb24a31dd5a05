use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of the snippet stored with an event.
pub const SNIPPET_MAX_CHARS: usize = 280;

/// A single raw entry pulled from a syndication feed.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub summary: Option<String>,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// A detected acquisition, keyed by the source article URL.
///
/// Rows are written once and never updated; `url` is the dedupe key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AcquisitionEvent {
    pub detected_at: DateTime<Utc>,
    pub source_feed: String,
    pub acquirer: Option<String>,
    pub target: Option<String>,
    pub url: String,
    pub snippet: String,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub confidence: f64,
}

/// Per-run accounting, logged when a pass over all feeds completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub emitted: usize,
    pub dropped: usize,
    pub skipped: usize,
}

impl RunStats {
    pub fn merge(mut self, other: RunStats) -> RunStats {
        self.processed += other.processed;
        self.emitted += other.emitted;
        self.dropped += other.dropped;
        self.skipped += other.skipped;
        self
    }
}

/// Truncate text to `SNIPPET_MAX_CHARS` characters, on a char boundary.
pub fn truncate_snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SNIPPET_MAX_CHARS {
        return trimmed.to_string();
    }
    trimmed.chars().take(SNIPPET_MAX_CHARS).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;
