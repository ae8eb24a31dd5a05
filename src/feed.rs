use crate::config::FetchConfig;
use crate::types::{FeedEntry, Result, WatchError};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use chrono::Utc;
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Polls syndication feeds and yields raw entries in feed order.
pub struct FeedSource {
    client: Client,
    config: FetchConfig,
}

impl FeedSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;
        Ok(Self { client, config: config.clone() })
    }

    /// One pass over the feed's current contents. A malformed or unreachable
    /// feed yields an empty list rather than failing the whole run.
    pub async fn poll(&self, feed_url: &str) -> Vec<FeedEntry> {
        match self.fetch(feed_url).await {
            Ok(content) => match parse_entries(&content) {
                Ok(entries) => {
                    info!("Polled {}: {} entries", feed_url, entries.len());
                    entries
                }
                Err(e) => {
                    warn!("Malformed feed {}: {}", feed_url, e);
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("Failed to fetch feed {}: {}", feed_url, e);
                Vec::new()
            }
        }
    }

    async fn fetch(&self, feed_url: &str) -> Result<String> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 8),
            multiplier: 2.0,
            ..Default::default()
        };

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            match self.fetch_once(feed_url).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            debug!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, feed_url, delay);
                            tokio::time::sleep(delay).await;
                        }
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| WatchError::Parse("no fetch attempts made".to_string())))
    }

    async fn fetch_once(&self, feed_url: &str) -> Result<String> {
        let response = self.client.get(feed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::Parse(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }
        Ok(response.text().await?)
    }
}

/// Parse RSS/Atom content into feed entries, preserving document order.
/// Entries without a link are kept with an empty one; they carry no dedupe
/// key, so the orchestrator skips them, but the run still counts them.
pub fn parse_entries(content: &str) -> Result<Vec<FeedEntry>> {
    let feed = parser::parse(content.as_bytes())
        .map_err(|e| WatchError::Parse(format!("failed to parse feed: {e}")))?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| FeedEntry {
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            summary: entry.summary.map(|s| s.content),
            link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
            published_at: entry.published.map(|dt| dt.with_timezone(&Utc)),
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Deal News</title>
    <item>
      <title>Acme Corp to acquire Widget Inc for $120 million</title>
      <description>Acme moves into widgets.</description>
      <link>https://news.example.com/acme-widget</link>
      <pubDate>Mon, 17 Aug 2026 09:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Markets close flat</title>
      <description>Quiet session.</description>
      <link>https://news.example.com/markets-flat</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_entries_in_feed_order() {
        let entries = parse_entries(SAMPLE_RSS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Acme Corp to acquire Widget Inc for $120 million");
        assert_eq!(entries[0].link, "https://news.example.com/acme-widget");
        assert_eq!(entries[0].summary.as_deref(), Some("Acme moves into widgets."));
        assert!(entries[0].published_at.is_some());
        assert_eq!(entries[1].title, "Markets close flat");
    }

    #[test]
    fn linkless_entries_survive_with_empty_link() {
        const LINKLESS_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Deal News</title>
    <item>
      <title>Acme Corp to acquire Widget Inc</title>
      <description>No article link in this item.</description>
    </item>
  </channel>
</rss>"#;
        let entries = parse_entries(LINKLESS_RSS).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Acme Corp to acquire Widget Inc");
        assert!(entries[0].link.is_empty());
    }

    #[test]
    fn malformed_content_is_a_parse_error() {
        assert!(parse_entries("this is not xml at all").is_err());
    }

    #[tokio::test]
    async fn unreachable_feed_polls_empty() {
        let source = FeedSource::new(&FetchConfig {
            max_retries: 0,
            timeout_seconds: 2,
            ..FetchConfig::default()
        })
        .unwrap();
        // Port 9 (discard) refuses connections immediately.
        let entries = source.poll("http://127.0.0.1:9/feed.xml").await;
        assert!(entries.is_empty());
    }
}
