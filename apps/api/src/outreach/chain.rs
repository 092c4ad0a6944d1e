//! The four model-backed operations of the outreach pipeline.
//!
//! Each one builds its prompt, calls the model once and normalizes the answer.
//! Model failures degrade to fixed text or an empty job list; only a prompt
//! template bug (`PromptError`) is returned to the caller.

use tracing::info;

use crate::llm_client::prompts::{PromptError, PromptVars};
use crate::llm_client::LanguageModel;
use crate::models::job::JobRecord;
use crate::models::profile::{InstitutionProfile, Intent, RecipientDetails};
use crate::outreach::normalizer::{self, JobExtraction};
use crate::outreach::prompts::{build_prompt, TemplateId, PARTNERSHIP_FOCUS, TARGET_ROLE_HEADING};
use crate::scraping::clean::truncate_chars;

/// Institution page text beyond this many characters is not sent to the model.
pub const SUMMARY_INPUT_CHARS: usize = 10_000;

pub const SUMMARY_UNAVAILABLE: &str = "Institution summary unavailable due to analysis error.";
pub const REPORT_UNAVAILABLE: &str = "Company report unavailable due to analysis error.";
pub const EMAIL_UNAVAILABLE: &str =
    "Email draft unavailable due to analysis error. Please try again shortly.";

/// Inputs for one outreach email.
#[derive(Debug, Clone, Copy)]
pub struct MailRequest<'a> {
    /// `None` pitches a general institutional partnership.
    pub job: Option<&'a JobRecord>,
    pub links: &'a [String],
    pub user: &'a InstitutionProfile,
    pub recipient: &'a RecipientDetails,
    pub intent: Intent,
    pub company_name: &'a str,
    pub institution_summary: &'a str,
}

/// Corporate-audience summary of an institution's website text.
pub async fn summarize_institution(
    llm: &dyn LanguageModel,
    cleaned_text: &str,
) -> Result<String, PromptError> {
    let page_data = truncate_chars(cleaned_text, SUMMARY_INPUT_CHARS);
    let prompt = build_prompt(
        TemplateId::InstitutionSummary,
        &PromptVars::from([("page_data", page_data.to_string())]),
    )?;

    Ok(normalizer::freeform(
        llm.invoke(&prompt).await,
        SUMMARY_UNAVAILABLE,
    ))
}

/// Job listings (or inferred hiring needs) from career-page or snippet text.
pub async fn extract_jobs(
    llm: &dyn LanguageModel,
    cleaned_text: &str,
    institution_context: &str,
) -> Result<JobExtraction, PromptError> {
    let prompt = build_prompt(
        TemplateId::JobExtraction,
        &PromptVars::from([
            ("page_data", cleaned_text.to_string()),
            ("institution_context", institution_context.to_string()),
        ]),
    )?;

    let extraction = normalizer::structured(llm.invoke(&prompt).await);
    info!("Job extraction produced {} records", extraction.jobs().len());
    Ok(extraction)
}

/// Executive report on a company's strategic focus. The 200-word limit is
/// requested in the prompt only.
pub async fn generate_company_report(
    llm: &dyn LanguageModel,
    company_name: &str,
    search_snippets: &str,
    institution_summary: &str,
) -> Result<String, PromptError> {
    let prompt = build_prompt(
        TemplateId::CompanyReport,
        &PromptVars::from([
            ("company_name", company_name.to_string()),
            ("search_snippets", search_snippets.to_string()),
            ("institution_summary", institution_summary.to_string()),
        ]),
    )?;

    Ok(normalizer::freeform(
        llm.invoke(&prompt).await,
        REPORT_UNAVAILABLE,
    ))
}

/// Cold email written in the placement officer's persona.
pub async fn write_mail(
    llm: &dyn LanguageModel,
    request: MailRequest<'_>,
) -> Result<String, PromptError> {
    let prompt = build_prompt(
        TemplateId::OutreachEmail,
        &PromptVars::from([
            ("user_name", request.user.name.clone()),
            ("institution_name", request.user.institution_name.clone()),
            ("company_name", request.company_name.to_string()),
            ("job_context", job_context(request.job, request.company_name)),
            ("institution_summary", request.institution_summary.to_string()),
            ("link_list", link_list(request.links)),
            ("intent", request.intent.label().to_string()),
            ("recipient_name", request.recipient.name.clone()),
            ("recipient_designation", request.recipient.designation.clone()),
        ]),
    )?;

    Ok(normalizer::freeform(
        llm.invoke(&prompt).await,
        EMAIL_UNAVAILABLE,
    ))
}

/// Specific-role framing when a job is selected, partnership framing otherwise.
pub fn job_context(job: Option<&JobRecord>, company_name: &str) -> String {
    let mut context = format!("Company: {company_name}\n");
    match job {
        Some(job) => {
            context.push_str(TARGET_ROLE_HEADING);
            context.push('\n');
            context.push_str(&describe_job(job));
            context.push('\n');
        }
        None => {
            context.push_str(PARTNERSHIP_FOCUS);
            context.push('\n');
        }
    }
    context
}

fn describe_job(job: &JobRecord) -> String {
    format!(
        "Role: {}\nExperience: {}\nSkills: {}\nDescription: {}",
        job.role,
        job.experience,
        job.skills.join(", "),
        job.description
    )
}

fn link_list(links: &[String]) -> String {
    if links.is_empty() {
        "no portfolio links on file".to_string()
    } else {
        links.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outreach::prompts::INSTITUTION_SUMMARY_TEMPLATE;
    use crate::outreach::testing::FakeLlm;

    fn profile() -> InstitutionProfile {
        InstitutionProfile {
            name: "Prof. Mohan Kumar".to_string(),
            designation: "Head of Corporate Relations".to_string(),
            institution_name: "City Institute of Technology".to_string(),
            institution_url: "https://cit.example.edu".to_string(),
            institution_summary: "Strong CS and ECE departments".to_string(),
        }
    }

    fn recipient() -> RecipientDetails {
        RecipientDetails {
            name: "Jane Smith".to_string(),
            designation: "HR Head".to_string(),
        }
    }

    #[tokio::test]
    async fn test_summarize_truncates_input_to_cap() {
        let llm = FakeLlm::replying("Summary");
        let text = format!("{}{}", "x".repeat(10_000), "§".repeat(2_000));

        let summary = summarize_institution(&llm, &text).await.unwrap();

        assert_eq!(summary, "Summary");
        let prompt = llm.last_prompt();
        let template_xs = INSTITUTION_SUMMARY_TEMPLATE.matches('x').count();
        assert_eq!(prompt.matches('x').count(), SUMMARY_INPUT_CHARS + template_xs);
        assert!(!prompt.contains('§'));
    }

    #[tokio::test]
    async fn test_summarize_failure_returns_fallback() {
        let llm = FakeLlm::unavailable();
        let summary = summarize_institution(&llm, "Some institution text").await.unwrap();
        assert_eq!(summary, SUMMARY_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_extract_jobs_parses_jobs_object() {
        let llm = FakeLlm::replying(
            r#"{"jobs":[{"role":"X","experience":"Y","skills":["A"],"description":"Z"}]}"#,
        );
        let extraction = extract_jobs(&llm, "careers text", "Institution: CIT.")
            .await
            .unwrap();
        let jobs = extraction.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].role, "X");
        assert_eq!(jobs[0].experience, "Y");
        assert_eq!(jobs[0].skills, vec!["A"]);
        assert_eq!(jobs[0].description, "Z");
        assert!(llm.last_prompt().contains("Institution: CIT."));
    }

    #[tokio::test]
    async fn test_extract_jobs_non_json_returns_fallback_record() {
        let llm = FakeLlm::replying("I could not find structured roles.");
        let extraction = extract_jobs(&llm, "careers text", "").await.unwrap();
        assert_eq!(
            extraction,
            JobExtraction::Fallback(vec![JobRecord::general_fallback()])
        );
    }

    #[tokio::test]
    async fn test_extract_jobs_transport_failure_is_empty() {
        let llm = FakeLlm::unavailable();
        let extraction = extract_jobs(&llm, "careers text", "").await.unwrap();
        assert_eq!(extraction, JobExtraction::Empty);
    }

    #[tokio::test]
    async fn test_company_report_prompt_and_fallback() {
        let llm = FakeLlm::replying("Acme is investing in AI.");
        let report = generate_company_report(&llm, "Acme", "- Acme Careers: hiring", "CIT summary")
            .await
            .unwrap();
        assert_eq!(report, "Acme is investing in AI.");
        let prompt = llm.last_prompt();
        assert!(prompt.contains("Target Company: Acme"));
        assert!(prompt.contains("max 200 words"));

        let report = generate_company_report(&FakeLlm::unavailable(), "Acme", "", "")
            .await
            .unwrap();
        assert_eq!(report, REPORT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_write_mail_without_job_uses_partnership_framing() {
        let llm = FakeLlm::replying("Dear Jane");
        let user = profile();
        let recipient = recipient();
        let links = vec!["https://p.example/ml".to_string()];

        let email = write_mail(
            &llm,
            MailRequest {
                job: None,
                links: &links,
                user: &user,
                recipient: &recipient,
                intent: Intent::MouPartnerships,
                company_name: "Acme",
                institution_summary: &user.institution_summary,
            },
        )
        .await
        .unwrap();

        assert_eq!(email, "Dear Jane");
        let prompt = llm.last_prompt();
        assert!(prompt.contains(PARTNERSHIP_FOCUS));
        assert!(!prompt.contains(TARGET_ROLE_HEADING));
        assert!(prompt.contains("You are Prof. Mohan Kumar"));
        assert!(prompt.contains("Intent: MOU & Partnerships"));
        assert!(prompt.contains("Recipient: Jane Smith, HR Head"));
        assert!(prompt.contains("https://p.example/ml"));
    }

    #[tokio::test]
    async fn test_write_mail_with_job_uses_role_framing() {
        let llm = FakeLlm::replying("Dear Jane");
        let user = profile();
        let recipient = recipient();
        let job = JobRecord {
            role: "Embedded Engineer".to_string(),
            experience: "0-2 years".to_string(),
            skills: vec!["C".to_string(), "RTOS".to_string()],
            description: "Firmware for sensors".to_string(),
        };

        write_mail(
            &llm,
            MailRequest {
                job: Some(&job),
                links: &[],
                user: &user,
                recipient: &recipient,
                intent: Intent::CampusHiringDrive,
                company_name: "Acme",
                institution_summary: "",
            },
        )
        .await
        .unwrap();

        let prompt = llm.last_prompt();
        assert!(prompt.contains(TARGET_ROLE_HEADING));
        assert!(prompt.contains("Role: Embedded Engineer"));
        assert!(prompt.contains("Skills: C, RTOS"));
        assert!(!prompt.contains(PARTNERSHIP_FOCUS));
    }

    #[tokio::test]
    async fn test_write_mail_failure_returns_fallback() {
        let user = profile();
        let recipient = recipient();
        let email = write_mail(
            &FakeLlm::unavailable(),
            MailRequest {
                job: None,
                links: &[],
                user: &user,
                recipient: &recipient,
                intent: Intent::StudentInternships,
                company_name: "Acme",
                institution_summary: "",
            },
        )
        .await
        .unwrap();
        assert_eq!(email, EMAIL_UNAVAILABLE);
    }

    #[test]
    fn test_job_context_starts_with_company_line() {
        assert!(job_context(None, "Acme").starts_with("Company: Acme\n"));
    }
}
