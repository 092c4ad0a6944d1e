//! Recording fakes for the pipeline's collaborators. Test builds only.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{LanguageModel, LlmError};
use crate::models::company::SearchResult;
use crate::portfolio::PortfolioIndex;
use crate::scraping::{PageScraper, ScrapeError};
use crate::search::{SearchError, SearchProvider};

type Responder = Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>;

pub struct FakeLlm {
    respond: Responder,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn new(respond: impl Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn unavailable() -> Self {
        Self::new(|_| {
            Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
        })
    }

    /// Answers job-extraction prompts with `jobs_json` and everything else with `prose`.
    pub fn scripted(jobs_json: &str, prose: &str) -> Self {
        let jobs_json = jobs_json.to_string();
        let prose = prose.to_string();
        Self::new(move |prompt| {
            if prompt.contains("### VALID JSON") {
                Ok(jobs_json.clone())
            } else {
                Ok(prose.clone())
            }
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.prompts().pop().unwrap_or_default()
    }

    /// The most recent prompt containing `marker`.
    pub fn prompt_containing(&self, marker: &str) -> Option<String> {
        self.prompts().into_iter().rev().find(|p| p.contains(marker))
    }
}

#[async_trait]
impl LanguageModel for FakeLlm {
    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)(prompt)
    }
}

/// Serves canned page text per URL; unknown URLs are unreachable.
#[derive(Default)]
pub struct FakeScraper {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeScraper {
    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageScraper for FakeScraper {
    async fn scrape(&self, url: &str) -> Result<String, ScrapeError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or(ScrapeError::InsufficientContent { chars: 0 })
    }
}

/// Serves canned results per exact query string; `failing_on` queries error out.
#[derive(Default)]
pub struct FakeSearch {
    results: HashMap<String, Vec<SearchResult>>,
    failing: HashSet<String>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn with_results(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        if self.failing.contains(query) {
            return Err(SearchError::Status { status: 429 });
        }
        let mut results = self.results.get(query).cloned().unwrap_or_default();
        results.truncate(max_results);
        Ok(results)
    }
}

/// Returns the same links for any skills and records what it was asked.
#[derive(Default)]
pub struct FakePortfolio {
    links: Vec<String>,
    queries: Mutex<Vec<Vec<String>>>,
}

impl FakePortfolio {
    pub fn with_links(links: &[&str]) -> Self {
        Self {
            links: links.iter().map(|l| l.to_string()).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<Vec<String>> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PortfolioIndex for FakePortfolio {
    async fn query_links(&self, skills: &[String]) -> Vec<String> {
        self.queries.lock().unwrap().push(skills.to_vec());
        self.links.clone()
    }
}

pub fn result(title: &str, snippet: &str, url: &str) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        snippet: snippet.to_string(),
        url: url.to_string(),
    }
}
