//! Outreach Orchestrator — sequences scraping, search and the model calls for
//! each wizard action and writes the results into the caller's session.
//!
//! Flow per action:
//!   submit_profile: scrape institution → summarize (first 10k chars) → Main
//!   search_company: search (2 stages) → report → scrape career page → extract jobs
//!   draft_email:    skills → portfolio links → write mail → store draft
//!
//! Scrape, search and model failures are absorbed here; the session always
//! ends up with something to show.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LanguageModel;
use crate::models::company::{display_name, CompanyQuery, SearchResult};
use crate::models::job::JobRecord;
use crate::models::profile::{InstitutionProfile, Intent, RecipientDetails};
use crate::outreach::chain::{
    extract_jobs, generate_company_report, summarize_institution, write_mail, MailRequest,
};
use crate::portfolio::PortfolioIndex;
use crate::scraping::PageScraper;
use crate::search::SearchProvider;
use crate::session::{CompanyResearch, SessionError, SessionState, Step};

pub const PRIMARY_SEARCH_RESULTS: usize = 8;
pub const FALLBACK_SEARCH_RESULTS: usize = 5;
/// Results summarized into the company-report prompt.
pub const REPORT_SNIPPET_RESULTS: usize = 5;
/// Career pages at or below this many characters are replaced by search snippets.
pub const MIN_CAREER_PAGE_CHARS: usize = 300;
/// Words of the institution summary used as skills for a general pitch.
pub const OUTREACH_SKILL_WORDS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request / outcome types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub designation: String,
    pub institution_name: String,
    pub institution_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftEmailForm {
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_designation: String,
    #[serde(default)]
    pub intent: Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStatus {
    AnalysisComplete,
    /// The site could not be scraped; the wizard continues without a fresh summary.
    ScraperLimited,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Ready { display_name: String },
    /// No search hits at all; the previous results are left in place.
    NotFound { display_name: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// The collaborators every wizard action draws on. Cheap to clone.
#[derive(Clone)]
pub struct Pipeline {
    pub llm: Arc<dyn LanguageModel>,
    pub scraper: Arc<dyn PageScraper>,
    pub search: Arc<dyn SearchProvider>,
    pub portfolio: Arc<dyn PortfolioIndex>,
}

impl Pipeline {
    /// Validates the persona, summarizes the institution site and moves to Main.
    pub async fn submit_profile(
        &self,
        session: &mut SessionState,
        form: ProfileForm,
    ) -> Result<SetupStatus, AppError> {
        session.require_step("submit profile", Step::Setup)?;

        let mut profile = InstitutionProfile {
            name: form.name.trim().to_string(),
            designation: form.designation.trim().to_string(),
            institution_name: form.institution_name.trim().to_string(),
            institution_url: form.institution_url.trim().to_string(),
            institution_summary: String::new(),
        };
        if let Some(field) = profile.first_missing_field() {
            return Err(AppError::Validation(format!(
                "All professional credentials are required for persona initialization ('{field}' is missing)"
            )));
        }

        let status = match self.scraper.scrape(&profile.institution_url).await {
            Ok(text) => {
                profile.institution_summary = summarize_institution(self.llm.as_ref(), &text).await?;
                SetupStatus::AnalysisComplete
            }
            Err(e) => {
                warn!("Institution scrape failed for {}: {e}", profile.institution_url);
                // Keep whatever summary the previous profile had.
                profile.institution_summary = session.institution_summary().to_string();
                SetupStatus::ScraperLimited
            }
        };

        info!(
            "Session {} profile set for {} ({:?})",
            session.id, profile.institution_name, status
        );
        session.complete_setup(profile)?;
        Ok(status)
    }

    /// Researches a company and replaces the session's previous search results.
    pub async fn search_company(
        &self,
        session: &mut SessionState,
        query: &str,
    ) -> Result<SearchOutcome, AppError> {
        session.require_step("search company", Step::Main)?;

        let display_name = display_name(query);
        if display_name.is_empty() {
            return Err(AppError::Validation(
                "company name cannot be empty".to_string(),
            ));
        }

        let institution_name = session
            .profile
            .as_ref()
            .map(|p| p.institution_name.clone())
            .unwrap_or_default();
        let institution_summary = session.institution_summary().to_string();

        let results = self.career_search(&display_name).await;
        if results.is_empty() {
            warn!("No search results for {display_name}");
            return Ok(SearchOutcome::NotFound { display_name });
        }

        let search_snippets = report_snippets(&results);
        let report = generate_company_report(
            self.llm.as_ref(),
            &display_name,
            &search_snippets,
            &institution_summary,
        )
        .await?;

        let career_url = pick_career_url(&results).to_string();
        let scraped = match self.scraper.scrape(&career_url).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Career page scrape failed for {career_url}: {e}");
                None
            }
        };

        let institution_context = format!(
            "Institution: {institution_name}. Summary: {institution_summary}. Company: {display_name}."
        );
        let job_text = job_source_text(scraped, &results);
        let jobs = extract_jobs(self.llm.as_ref(), &job_text, &institution_context).await?;

        info!(
            "Session {} researched {display_name}: {} jobs from {career_url}",
            session.id,
            jobs.jobs().len()
        );

        session.replace_company(CompanyResearch {
            query: CompanyQuery {
                display_name: display_name.clone(),
                search_snippets,
                career_url,
            },
            report,
            jobs,
        });

        Ok(SearchOutcome::Ready { display_name })
    }

    /// Writes an email for the open draft and stores it in the session.
    pub async fn draft_email(
        &self,
        session: &mut SessionState,
        form: DraftEmailForm,
    ) -> Result<(), AppError> {
        session.require_step("draft email", Step::Main)?;

        let recipient = RecipientDetails {
            name: form.recipient_name.trim().to_string(),
            designation: form.recipient_designation.trim().to_string(),
        };

        let body = {
            let draft = session.outreach.as_ref().ok_or(SessionError::NoOutreach)?;
            let company = session.company.as_ref().ok_or(SessionError::NoCompany)?;
            let profile = session
                .profile
                .as_ref()
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Main step without a profile")))?;

            if recipient.name.is_empty() {
                return Err(AppError::Validation(
                    "Recipient name is required for executive persona".to_string(),
                ));
            }

            let skills = outreach_skills(draft.selected_job.as_ref(), &profile.institution_summary);
            let links = self.portfolio.query_links(&skills).await;

            write_mail(
                self.llm.as_ref(),
                MailRequest {
                    job: draft.selected_job.as_ref(),
                    links: &links,
                    user: profile,
                    recipient: &recipient,
                    intent: form.intent,
                    company_name: &company.query.display_name,
                    institution_summary: &profile.institution_summary,
                },
            )
            .await?
        };

        session.store_email(body)?;
        Ok(())
    }

    /// "{Company} careers jobs openings" first; "{Company} careers" if that finds nothing.
    async fn career_search(&self, display_name: &str) -> Vec<SearchResult> {
        let stages = [
            (
                format!("{display_name} careers jobs openings"),
                PRIMARY_SEARCH_RESULTS,
            ),
            (format!("{display_name} careers"), FALLBACK_SEARCH_RESULTS),
        ];

        for (query, max_results) in stages {
            match self.search.search(&query, max_results).await {
                Ok(results) if !results.is_empty() => return results,
                Ok(_) => info!("Search '{query}' returned nothing"),
                Err(e) => warn!("Search '{query}' failed: {e}"),
            }
        }
        Vec::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn report_snippets(results: &[SearchResult]) -> String {
    results
        .iter()
        .take(REPORT_SNIPPET_RESULTS)
        .map(|r| format!("- {}: {}", r.title, r.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First result that looks like a careers or jobs page, else the top result.
/// `results` must be non-empty.
fn pick_career_url(results: &[SearchResult]) -> &str {
    results
        .iter()
        .find(|r| {
            let url = r.url.to_lowercase();
            url.contains("career") || url.contains("job")
        })
        .or_else(|| results.first())
        .map_or("", |r| r.url.as_str())
}

/// The scraped page when it has real content, otherwise every search hit.
fn job_source_text(scraped: Option<String>, results: &[SearchResult]) -> String {
    match scraped {
        Some(text) if text.chars().count() > MIN_CAREER_PAGE_CHARS => text,
        _ => results
            .iter()
            .map(|r| format!("Title: {}\nSnippet: {}", r.title, r.snippet))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// The selected job's skills, or the opening words of the institution summary.
fn outreach_skills(job: Option<&JobRecord>, institution_summary: &str) -> Vec<String> {
    match job {
        Some(job) => job.skills.clone(),
        None => institution_summary
            .split_whitespace()
            .take(OUTREACH_SKILL_WORDS)
            .map(str::to_owned)
            .collect(),
    }
}
