use crate::types::{AcquisitionEvent, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS acquisition_events (
    url         TEXT PRIMARY KEY,
    detected_at TEXT NOT NULL,
    source_feed TEXT NOT NULL,
    acquirer    TEXT,
    target      TEXT,
    snippet     TEXT NOT NULL,
    amount      REAL,
    currency    TEXT,
    confidence  REAL NOT NULL
)
"#;

/// Durable store of detected events, keyed by source URL.
///
/// The URL uniqueness constraint is the dedupe gate for the whole pipeline:
/// concurrent or repeated runs racing on the same article cannot produce a
/// second row.
pub struct EventStore {
    pool: SqlitePool,
}

impl EventStore {
    /// Open (and create if missing) the store at `database_url`, e.g.
    /// `sqlite://mna_watch.db` or `sqlite::memory:` in tests.
    pub async fn open(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        info!("Event store ready at {}", database_url);
        Ok(Self { pool })
    }

    pub async fn exists(&self, url: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM acquisition_events WHERE url = ?1")
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Insert an event. A duplicate URL is absorbed as a no-op; the return
    /// value tells whether this call actually created the row.
    pub async fn save(&self, event: &AcquisitionEvent) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO acquisition_events
                (url, detected_at, source_feed, acquirer, target, snippet, amount, currency, confidence)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(url) DO NOTHING
            "#,
        )
        .bind(&event.url)
        .bind(event.detected_at)
        .bind(&event.source_feed)
        .bind(&event.acquirer)
        .bind(&event.target)
        .bind(&event.snippet)
        .bind(event.amount)
        .bind(&event.currency)
        .bind(event.confidence)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        if !inserted {
            debug!("Duplicate event for {} absorbed", event.url);
        }
        Ok(inserted)
    }

    pub async fn event_count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM acquisition_events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// Most recently detected events, for run verification and audit.
    pub async fn recent(&self, limit: i64) -> Result<Vec<AcquisitionEvent>> {
        let events = sqlx::query_as::<_, AcquisitionEvent>(
            "SELECT * FROM acquisition_events ORDER BY detected_at DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_event(url: &str) -> AcquisitionEvent {
        AcquisitionEvent {
            detected_at: Utc::now(),
            source_feed: "https://example.com/feed.xml".to_string(),
            acquirer: Some("Acme Holdings".to_string()),
            target: Some("Widget Inc".to_string()),
            url: url.to_string(),
            snippet: "Acme Corp to acquire Widget Inc for $120 million".to_string(),
            amount: Some(120_000_000.0),
            currency: Some("USD".to_string()),
            confidence: 1.0,
        }
    }

    #[tokio::test]
    async fn save_then_exists_round_trips() {
        let store = EventStore::open("sqlite::memory:").await.unwrap();
        let event = sample_event("https://news.example.com/a");
        assert!(!store.exists(&event.url).await.unwrap());
        assert!(store.save(&event).await.unwrap());
        assert!(store.exists(&event.url).await.unwrap());
        assert_eq!(store.event_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_save_is_a_silent_noop() {
        let store = EventStore::open("sqlite::memory:").await.unwrap();
        let event = sample_event("https://news.example.com/a");
        assert!(store.save(&event).await.unwrap());
        assert!(!store.save(&event).await.unwrap());
        assert!(!store.save(&event).await.unwrap());
        assert_eq!(store.event_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn recent_returns_stored_fields() {
        let store = EventStore::open("sqlite::memory:").await.unwrap();
        store.save(&sample_event("https://news.example.com/a")).await.unwrap();
        let events = store.recent(10).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].acquirer.as_deref(), Some("Acme Holdings"));
        assert_eq!(events[0].target.as_deref(), Some("Widget Inc"));
        assert_eq!(events[0].amount, Some(120_000_000.0));
        assert_eq!(events[0].currency.as_deref(), Some("USD"));
        assert_eq!(events[0].confidence, 1.0);
    }
}
