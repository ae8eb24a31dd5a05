use crate::config::TelegramConfig;
use crate::types::{AcquisitionEvent, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Downstream delivery boundary. The pipeline's only contract with a
/// notifier is "deliver this structured event"; delivery failure never
/// affects whether the event was recorded as seen.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &AcquisitionEvent) -> Result<()>;
}

/// Fallback when no chat credentials are configured: log the alert preview.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &AcquisitionEvent) -> Result<()> {
        info!("Alert preview:\n{}", render_alert(event));
        Ok(())
    }
}

/// Delivers alerts to a Telegram chat, with a minimum gap between sends so
/// a noisy feed cannot flood the chat.
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
    min_gap: Duration,
    last_sent: Mutex<Option<Instant>>,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(20)).build()?;
        Ok(Self {
            client,
            token: config.token.clone(),
            chat_id: config.chat_id.clone(),
            min_gap: Duration::from_secs(config.min_send_gap_secs),
            last_sent: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, event: &AcquisitionEvent) -> Result<()> {
        {
            let mut last_sent = self.last_sent.lock().await;
            if let Some(previous) = *last_sent {
                if previous.elapsed() < self.min_gap {
                    debug!("Throttled alert for {} (inside send window)", event.url);
                    return Ok(());
                }
            }
            *last_sent = Some(Instant::now());
        }

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let text = render_alert(event);
        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text.as_str()),
            ("disable_web_page_preview", "true"),
        ];
        let response = self.client.post(&url).form(&params).send().await?;
        if !response.status().is_success() {
            warn!("Telegram send failed with HTTP {}", response.status());
        }
        Ok(())
    }
}

/// Compact human-readable alert line, Slovak like the rest of the chat.
pub fn render_alert(event: &AcquisitionEvent) -> String {
    let acquirer = event.acquirer.as_deref().unwrap_or("Neznámy kupec");
    let target = event.target.as_deref().unwrap_or("neznámu spoločnosť");
    let amount_line = match (&event.amount, &event.currency) {
        (Some(amount), Some(currency)) => format!("\n💰 Suma: {}", format_amount(*amount, currency)),
        _ => String::new(),
    };
    format!(
        "🔔 M&A Alert: {acquirer} preberá {target}{amount_line}\n📊 Confidence: {:.0} %\n🔗 {}",
        event.confidence * 100.0,
        event.url,
    )
}

fn format_amount(amount: f64, currency: &str) -> String {
    if amount >= 1_000_000_000.0 {
        format!("{:.1} mld. {}", amount / 1_000_000_000.0, currency)
    } else if amount >= 1_000_000.0 {
        format!("{:.1} mil. {}", amount / 1_000_000.0, currency)
    } else {
        format!("{amount:.0} {currency}")
    }
}
