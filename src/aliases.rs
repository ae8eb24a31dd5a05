use crate::fuzzy::partial_ratio;
use crate::types::{Result, WatchError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One tracked acquirer as it appears in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquirerAliases {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone)]
struct AliasEntry {
    canonical: String,
    alias: String,
}

/// A successful fuzzy match of free text against the registry.
///
/// `alias` is the textual variant that actually matched; downstream target
/// extraction anchors on it, while events carry the `canonical` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasMatch {
    pub canonical: String,
    pub alias: String,
    pub score: u8,
}

/// Immutable registry of tracked acquirer names, loaded once per run.
#[derive(Debug)]
pub struct AliasRegistry {
    entries: Vec<AliasEntry>,
    threshold: u8,
}

impl AliasRegistry {
    /// Build the registry from config records. The canonical name itself is
    /// always matchable in addition to its aliases. An empty alias list is a
    /// startup error: with nothing to match, every entry would be dropped
    /// silently.
    pub fn new(acquirers: &[AcquirerAliases], threshold: u8) -> Result<Self> {
        let mut entries = Vec::new();
        for acquirer in acquirers {
            if acquirer.name.trim().is_empty() {
                continue;
            }
            entries.push(AliasEntry {
                canonical: acquirer.name.clone(),
                alias: acquirer.name.clone(),
            });
            for alias in &acquirer.aliases {
                if alias.trim().is_empty() {
                    continue;
                }
                entries.push(AliasEntry {
                    canonical: acquirer.name.clone(),
                    alias: alias.clone(),
                });
            }
        }

        if entries.is_empty() {
            return Err(WatchError::Config(
                "acquirer alias list is empty, nothing could ever match".to_string(),
            ));
        }

        debug!("Loaded alias registry with {} entries", entries.len());
        Ok(Self { entries, threshold })
    }

    /// Find the best-scoring alias mentioned in `text`.
    ///
    /// Only aliases at or above the registry threshold qualify; the highest
    /// score wins and ties keep the first-seen entry, so results are stable
    /// for a fixed alias list.
    pub fn best_match(&self, text: &str) -> Option<AliasMatch> {
        let mut best: Option<AliasMatch> = None;
        for entry in &self.entries {
            let score = partial_ratio(&entry.alias, text);
            if score < self.threshold {
                continue;
            }
            let better = match &best {
                Some(current) => score > current.score,
                None => true,
            };
            if better {
                best = Some(AliasMatch {
                    canonical: entry.canonical.clone(),
                    alias: entry.alias.clone(),
                    score,
                });
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
