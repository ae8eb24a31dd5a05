use clap::Parser;
use mna_watch::{EventStore, LogNotifier, Notifier, Pipeline, TelegramNotifier, WatchConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "mna-watch", about = "Watches news feeds for M&A announcements")]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Re-poll continuously at this interval instead of running once
    #[arg(long)]
    interval_minutes: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    // Alias or feed misconfiguration is fatal here, before any polling.
    let config = WatchConfig::load(&args.config)?;
    let store = EventStore::open(&config.database_url).await?;

    let notifier: Arc<dyn Notifier> = match &config.telegram {
        Some(telegram) => Arc::new(TelegramNotifier::new(telegram)?),
        None => {
            warn!("No Telegram credentials configured; alerts will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let pipeline = Pipeline::new(config, store, notifier)?;

    match args.interval_minutes {
        None => {
            pipeline.run().await;
            info!("Total events on record: {}", pipeline.event_count().await?);
        }
        Some(minutes) => loop {
            pipeline.run().await;
            info!("Sleeping for {} minutes", minutes);
            tokio::time::sleep(std::time::Duration::from_secs(minutes * 60)).await;
        },
    }

    Ok(())
}
