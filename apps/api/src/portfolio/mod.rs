//! Portfolio lookup. Maps skill keywords to links of student project work.
//!
//! Default: `KeywordPortfolio` (token overlap against each entry's tech stack).
//! `Pipeline` holds an `Arc<dyn PortfolioIndex>` so a vector-store backend can
//! be swapped in without touching the orchestrator.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entries returned per skill, best first.
const MATCHES_PER_SKILL: usize = 2;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("could not read portfolio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("portfolio file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub techstack: String,
    pub links: String,
}

#[async_trait]
pub trait PortfolioIndex: Send + Sync {
    /// Links relevant to `skills`, deduplicated, in match order.
    async fn query_links(&self, skills: &[String]) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct KeywordPortfolio {
    entries: Vec<PortfolioEntry>,
}

impl KeywordPortfolio {
    pub fn new(entries: Vec<PortfolioEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PortfolioError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let entries: Vec<PortfolioEntry> = serde_json::from_str(&raw)?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PortfolioIndex for KeywordPortfolio {
    async fn query_links(&self, skills: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for skill in skills {
            for entry in best_matches(&self.entries, skill) {
                if seen.insert(entry.links.as_str()) {
                    links.push(entry.links.clone());
                }
            }
        }

        links
    }
}

/// Up to `MATCHES_PER_SKILL` entries with a positive score, highest first.
/// Ties keep file order.
fn best_matches<'a>(entries: &'a [PortfolioEntry], skill: &str) -> Vec<&'a PortfolioEntry> {
    let mut scored: Vec<(f32, &PortfolioEntry)> = entries
        .iter()
        .map(|entry| (match_score(&entry.techstack, skill), entry))
        .filter(|(score, _)| *score > 0.0)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(MATCHES_PER_SKILL)
        .map(|(_, entry)| entry)
        .collect()
}

/// 1.0 + coverage when the whole skill phrase appears in the tech stack,
/// otherwise the share of skill tokens found among the stack's tokens.
fn match_score(techstack: &str, skill: &str) -> f32 {
    let skill_tokens = tokens(skill);
    if skill_tokens.is_empty() {
        return 0.0;
    }
    let stack_tokens = tokens(techstack);
    let hits = skill_tokens
        .iter()
        .filter(|t| stack_tokens.contains(*t))
        .count();
    let coverage = hits as f32 / skill_tokens.len() as f32;

    let phrase = skill_tokens.join(" ");
    if hits == skill_tokens.len() && stack_tokens.join(" ").contains(&phrase) {
        1.0 + coverage
    } else {
        coverage
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
