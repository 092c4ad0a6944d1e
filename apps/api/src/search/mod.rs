//! Web search: ordered `{title, snippet, url}` hits for a free-text query.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use crate::models::company::SearchResult;

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const SEARCH_TIMEOUT_SECS: u64 = 15;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

static RESULT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<a([^>]*class="result__a"[^>]*)>(.*?)</a>"#).unwrap());
static RESULT_SNIPPET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<(?:a|div|td)[^>]*class="result__snippet"[^>]*>(.*?)</(?:a|div|td)>"#)
        .unwrap()
});
static HREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]*)""#).unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer, typically rate limiting.
    #[error("search service answered with status {status}")]
    Status { status: u16 },
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns at most `max_results` hits in rank order. An empty list is a valid answer.
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchResult>, SearchError>;
}

/// DuckDuckGo's JavaScript-free results page.
#[derive(Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
}

impl DuckDuckGoSearch {
    pub fn new() -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
                .build()?,
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .get(DDG_HTML_URL)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }
        let html = response.text().await?;

        let results = parse_results(&html, max_results);
        debug!("Search '{query}' returned {} results", results.len());
        Ok(results)
    }
}

/// Pulls result blocks out of the results page. A snippet belongs to the
/// nearest preceding result link.
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let links: Vec<_> = RESULT_LINK.captures_iter(html).collect();
    let mut results = Vec::new();

    for (i, caps) in links.iter().enumerate() {
        if results.len() >= max_results {
            break;
        }
        let (Some(whole), Some(attrs), Some(inner)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let Some(url) = HREF
            .captures(attrs.as_str())
            .and_then(|c| c.get(1))
            .and_then(|href| resolve_href(href.as_str()))
        else {
            continue;
        };

        let block_end = links
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(html.len(), |m| m.start());
        let snippet = RESULT_SNIPPET
            .captures(&html[whole.end()..block_end])
            .and_then(|c| c.get(1))
            .map(|m| inner_text(m.as_str()))
            .unwrap_or_default();

        results.push(SearchResult {
            title: inner_text(inner.as_str()),
            snippet,
            url,
        });
    }

    results
}

/// Unwraps `//duckduckgo.com/l/?uddg=<target>` redirects; drops ad links.
fn resolve_href(href: &str) -> Option<String> {
    let href = decode_entities(href);
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href
    };
    let url = Url::parse(&absolute).ok()?;

    if url.host_str().is_some_and(|h| h.ends_with("duckduckgo.com")) {
        if url.path() == "/y.js" {
            return None;
        }
        return url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }
    Some(url.to_string())
}

fn inner_text(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, "");
    decode_entities(text.split_whitespace().collect::<Vec<_>>().join(" ").as_str())
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <div class="result results_links">
          <h2 class="result__title">
            <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fcareers.acme.com%2Fjobs&amp;rut=abc">Acme <b>Careers</b> &amp; Jobs</a>
          </h2>
          <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">Join <b>Acme</b> &#x27;s cloud team.</a>
        </div>
        <div class="result results_links">
          <h2 class="result__title">
            <a rel="nofollow" class="result__a" href="https://duckduckgo.com/y.js?ad_provider=bing">Sponsored</a>
          </h2>
        </div>
        <div class="result results_links">
          <h2 class="result__title">
            <a rel="nofollow" class="result__a" href="https://news.example.com/acme">Acme expands in Pune</a>
          </h2>
        </div>
    "#;

    #[test]
    fn test_parse_results_unwraps_redirects_and_skips_ads() {
        let results = parse_results(RESULTS_PAGE, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Acme Careers & Jobs");
        assert_eq!(results[0].url, "https://careers.acme.com/jobs");
        assert_eq!(results[0].snippet, "Join Acme 's cloud team.");
        assert_eq!(results[1].url, "https://news.example.com/acme");
        assert_eq!(results[1].snippet, "");
    }

    #[test]
    fn test_parse_results_honors_max_results() {
        assert_eq!(parse_results(RESULTS_PAGE, 1).len(), 1);
    }

    #[test]
    fn test_parse_results_of_empty_page_is_empty() {
        assert!(parse_results("<html><body>No results.</body></html>", 5).is_empty());
    }
}
