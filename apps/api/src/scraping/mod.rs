//! Page scraping: fetches a URL and reduces it to cleaned prose.

pub mod clean;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use thiserror::Error;

use crate::scraping::clean::clean_text;

/// Pages that clean down to fewer characters than this are treated as empty.
pub const MIN_CONTENT_CHARS: usize = 500;
const SCRAPE_TIMEOUT_SECS: u64 = 15;
/// Wide enough that html2text never wraps prose; `clean_text` flattens lines anyway.
const RENDER_WIDTH: usize = 1000;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
    image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Elements that never hold page prose. Hidden with their whole subtree.
const BOILERPLATE_CSS: &str = "script, style, nav, footer, header, form { display: none; }";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTML conversion failed: {0}")]
    Convert(String),

    #[error("page has only {chars} characters of content")]
    InsufficientContent { chars: usize },
}

#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Returns cleaned page text, or an error when the page is unreachable or too thin.
    async fn scrape(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Browser-impersonating HTTP scraper.
#[derive(Clone)]
pub struct HttpScraper {
    client: Client,
}

impl HttpScraper {
    pub fn new() -> Result<Self, ScrapeError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            header::REFERER,
            header::HeaderValue::from_static("https://www.google.com/"),
        );

        Ok(Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .default_headers(headers)
                .timeout(Duration::from_secs(SCRAPE_TIMEOUT_SECS))
                .build()?,
        })
    }
}

#[async_trait]
impl PageScraper for HttpScraper {
    async fn scrape(&self, url: &str) -> Result<String, ScrapeError> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        page_text(&html)
    }
}

/// Drops boilerplate elements, renders the rest to text and cleans it.
pub fn page_text(html: &str) -> Result<String, ScrapeError> {
    let rendered = html2text::config::plain()
        .add_css(BOILERPLATE_CSS)
        .and_then(|config| config.string_from_read(html.as_bytes(), RENDER_WIDTH))
        .map_err(|e| ScrapeError::Convert(e.to_string()))?;
    let cleaned = clean_text(&rendered);

    let chars = cleaned.chars().count();
    if chars < MIN_CONTENT_CHARS {
        return Err(ScrapeError::InsufficientContent { chars });
    }
    Ok(cleaned)
}
