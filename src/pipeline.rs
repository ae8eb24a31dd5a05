use crate::aliases::AliasRegistry;
use crate::amount::extract_amount;
use crate::article::{strip_html, ArticleFetcher};
use crate::classify::is_acquisition;
use crate::config::WatchConfig;
use crate::extract::extract_target;
use crate::feed::FeedSource;
use crate::notify::Notifier;
use crate::score::confidence;
use crate::store::EventStore;
use crate::types::{truncate_snippet, AcquisitionEvent, FeedEntry, Result, RunStats};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// The threshold filter only applies to amounts in this currency; there is
/// no conversion, so figures in other currencies always pass.
const EXPECTED_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Entry carries no usable link, so it has no dedupe key.
    MissingLink,
    /// URL already durably recorded, possibly by a concurrent worker.
    AlreadySeen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    NotAcquisition,
    NoAcquirerMatch,
    BelowThreshold,
}

/// Terminal state for one feed entry.
#[derive(Debug, Clone)]
pub enum Outcome {
    Emitted(AcquisitionEvent),
    Dropped(DropReason),
    Skipped(SkipReason),
}

/// Wires feed polling, classification, extraction, scoring, dedupe and
/// notification together. Per-entry text processing is pure; the store is
/// the only shared mutable resource, and its writes are idempotent on URL.
pub struct Pipeline {
    config: WatchConfig,
    registry: AliasRegistry,
    feeds: FeedSource,
    articles: ArticleFetcher,
    store: EventStore,
    notifier: Arc<dyn Notifier>,
}

impl Pipeline {
    pub fn new(config: WatchConfig, store: EventStore, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let registry = AliasRegistry::new(&config.acquirers, config.acquirer_match_threshold)?;
        let feeds = FeedSource::new(&config.fetch)?;
        let articles = ArticleFetcher::new(&config.fetch)?;
        Ok(Self { config, registry, feeds, articles, store, notifier })
    }

    /// One pass over all configured feeds. Feeds are polled concurrently up
    /// to the configured limit; entries within a feed are processed in feed
    /// order. Always completes with counts, never raises to the caller.
    pub async fn run(&self) -> RunStats {
        let stats = stream::iter(self.config.feeds.clone())
            .map(|feed_url| async move { self.run_feed(&feed_url).await })
            .buffer_unordered(self.config.fetch.max_concurrent_feeds.max(1))
            .fold(RunStats::default(), |acc, feed_stats| async move { acc.merge(feed_stats) })
            .await;

        info!(
            "Run complete: {} processed, {} emitted, {} dropped, {} skipped",
            stats.processed, stats.emitted, stats.dropped, stats.skipped
        );
        stats
    }

    async fn run_feed(&self, feed_url: &str) -> RunStats {
        let mut stats = RunStats::default();
        for entry in self.feeds.poll(feed_url).await {
            stats.processed += 1;
            match self.process_entry(feed_url, &entry).await {
                Ok(Outcome::Emitted(event)) => {
                    info!(
                        "Emitted event: {} acquires {} ({})",
                        event.acquirer.as_deref().unwrap_or("?"),
                        event.target.as_deref().unwrap_or("?"),
                        event.url
                    );
                    stats.emitted += 1;
                }
                Ok(Outcome::Dropped(reason)) => {
                    debug!("Dropped {} ({:?})", entry.link, reason);
                    stats.dropped += 1;
                }
                Ok(Outcome::Skipped(reason)) => {
                    debug!("Skipped {} ({:?})", entry.link, reason);
                    stats.skipped += 1;
                }
                Err(e) => {
                    // Entry stays unrecorded, so the next poll retries it.
                    warn!("Entry {} failed, will retry on next poll: {}", entry.link, e);
                    stats.skipped += 1;
                }
            }
        }
        stats
    }

    /// State machine for one entry: SKIP before any network work, article
    /// fetch only when title+summary alone fail classification, EMIT only
    /// after the event is durably saved.
    pub async fn process_entry(&self, feed_url: &str, entry: &FeedEntry) -> Result<Outcome> {
        let link = entry.link.trim();
        if link.is_empty() || Url::parse(link).is_err() {
            return Ok(Outcome::Skipped(SkipReason::MissingLink));
        }
        if self.store.exists(link).await? {
            return Ok(Outcome::Skipped(SkipReason::AlreadySeen));
        }

        let summary = entry.summary.as_deref().map(strip_html).unwrap_or_default();
        let mut text = format!("{} {}", entry.title, summary);

        if !is_acquisition(&text) {
            // Cheap signals first; the expensive article fetch only runs
            // when the headline and summary are inconclusive.
            let body = self.articles.fetch_text(link).await;
            if body.is_empty() {
                return Ok(Outcome::Dropped(DropReason::NotAcquisition));
            }
            text.push(' ');
            text.push_str(&body);
            if !is_acquisition(&text) {
                return Ok(Outcome::Dropped(DropReason::NotAcquisition));
            }
        }

        let Some(alias_match) = self.registry.best_match(&text) else {
            return Ok(Outcome::Dropped(DropReason::NoAcquirerMatch));
        };

        let target = extract_target(
            Some(&alias_match.alias),
            &entry.title,
            &text,
            self.config.target_reject_threshold,
        );
        let parsed_amount = extract_amount(&text);

        if let (Some(minimum), Some(parsed)) = (self.config.min_amount_usd, &parsed_amount) {
            if parsed.currency == EXPECTED_CURRENCY && parsed.amount < minimum {
                return Ok(Outcome::Dropped(DropReason::BelowThreshold));
            }
        }

        let confidence = confidence(parsed_amount.is_some(), target.is_some());
        let (amount, currency) = match parsed_amount {
            Some(parsed) => (Some(parsed.amount), Some(parsed.currency)),
            None => (None, None),
        };
        let event = AcquisitionEvent {
            detected_at: Utc::now(),
            source_feed: feed_url.to_string(),
            acquirer: Some(alias_match.canonical),
            target,
            url: link.to_string(),
            snippet: truncate_snippet(&format!("{} {}", entry.title, summary)),
            amount,
            currency,
            confidence,
        };

        if !self.store.save(&event).await? {
            // A concurrent worker beat us to this URL.
            return Ok(Outcome::Skipped(SkipReason::AlreadySeen));
        }
        if let Err(e) = self.notifier.notify(&event).await {
            // The event is already durably recorded; delivery is best-effort.
            warn!("Notifier delivery failed for {}: {}", event.url, e);
        }

        Ok(Outcome::Emitted(event))
    }

    pub async fn event_count(&self) -> Result<i64> {
        self.store.event_count().await
    }
}
