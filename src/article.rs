use crate::config::FetchConfig;
use crate::types::Result;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// Retrieves article pages and reduces them to block-level text.
pub struct ArticleFetcher {
    client: Client,
}

impl ArticleFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the article body as plain text. Every failure path (timeout,
    /// non-2xx, parse error) returns an empty string; one dead link must
    /// never abort the run.
    pub async fn fetch_text(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(text) => text,
            Err(e) => {
                debug!("Article fetch failed for {}: {}", url, e);
                String::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            debug!("Article fetch got HTTP {} for {}", response.status(), url);
            return Ok(String::new());
        }
        let html = response.text().await?;
        Ok(extract_block_text(&html))
    }
}

/// Collect visible text from block-level elements, skipping markup, scripts
/// and navigation chrome.
pub fn extract_block_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("p, h1, h2, h3, li, blockquote").expect("valid block selector");

    let mut out = String::new();
    for element in document.select(&selector) {
        let text = element.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            out.push_str(&text);
            out.push('\n');
        }
    }
    out
}

/// Strip tags from an HTML fragment (feed summaries often carry markup).
pub fn strip_html(fragment: &str) -> String {
    if !fragment.contains('<') {
        return fragment.trim().to_string();
    }
    let parsed = Html::parse_fragment(fragment);
    let text = parsed.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_text_skips_scripts_and_nav() {
        let html = r#"
            <html><head><script>var tracking = 1;</script></head>
            <body>
              <nav><a href="/">Home</a></nav>
              <h1>Acme Corp to acquire Widget Inc</h1>
              <p>The deal is worth   $120 million.</p>
              <style>.x { color: red }</style>
            </body></html>"#;
        let text = extract_block_text(html);
        assert!(text.contains("Acme Corp to acquire Widget Inc"));
        assert!(text.contains("The deal is worth $120 million."));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn strip_html_flattens_fragments() {
        assert_eq!(
            strip_html("<p>Acme <b>buys</b> Widget</p>"),
            "Acme buys Widget"
        );
        assert_eq!(strip_html("plain summary"), "plain summary");
    }

    #[tokio::test]
    async fn unreachable_url_yields_empty_string() {
        let fetcher = ArticleFetcher::new(&FetchConfig {
            timeout_seconds: 2,
            ..FetchConfig::default()
        })
        .unwrap();
        assert_eq!(fetcher.fetch_text("http://127.0.0.1:9/article").await, "");
    }
}
