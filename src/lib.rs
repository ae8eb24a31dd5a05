pub mod aliases;
pub mod amount;
pub mod article;
pub mod classify;
pub mod config;
pub mod extract;
pub mod feed;
pub mod fuzzy;
pub mod notify;
pub mod pipeline;
pub mod score;
pub mod store;
pub mod types;

pub use aliases::{AcquirerAliases, AliasMatch, AliasRegistry};
pub use amount::{extract_amount, ParsedAmount};
pub use classify::is_acquisition;
pub use config::{FetchConfig, TelegramConfig, WatchConfig};
pub use extract::extract_target;
pub use notify::{LogNotifier, Notifier, TelegramNotifier};
pub use pipeline::{DropReason, Outcome, Pipeline, SkipReason};
pub use score::confidence;
pub use store::EventStore;
pub use types::{AcquisitionEvent, FeedEntry, Result, RunStats, WatchError};
