// All LLM prompt templates for the outreach pipeline.
// Placeholders are `{snake_case}` and are filled by `llm_client::prompts::fill_template`.

use crate::llm_client::prompts::{fill_template, PromptError, PromptVars};

/// Focus line used when the email pitches a general partnership rather than a role.
pub const PARTNERSHIP_FOCUS: &str =
    "### FOCUS: Strategic Institutional Partnership & Pipeline Development";

/// Heading placed above the serialized job when the email targets a specific role.
pub const TARGET_ROLE_HEADING: &str = "### TARGET ROLE IDENTIFIED:";

/// Institution summary prompt. Replace: {page_data}
pub const INSTITUTION_SUMMARY_TEMPLATE: &str = r#"### SCRAPED TEXT FROM INSTITUTION WEBSITE:
{page_data}

### INSTRUCTION:
You are a Senior Corporate Relations Officer. Summarize this institution's technical strengths,
key departments, and overall workforce readiness for a corporate audience.
Keep it professional and highlight value propositions for recruiters.

### SUMMARY (NO PREAMBLE):"#;

/// Job extraction prompt. Replace: {page_data}, {institution_context}
pub const JOB_EXTRACTION_TEMPLATE: &str = r#"### SCRAPED TEXT FROM WEBSITE:
{page_data}

### CONTEXT:
{institution_context}

### INSTRUCTION:
The scraped text is from a company's career page or search result.
Your job is to identify open roles, strategic focus areas, or general hiring intent.
Return a JSON object with a key `jobs` containing a list of objects.
Each job object must have: `role`, `experience`, `skills` (as a list), and `description`.
If no specific jobs are listed, infer the company's likely hiring needs based on the industry and scraped text.

Only return the valid JSON.
### VALID JSON (NO PREAMBLE):"#;

/// Company report prompt. Replace: {company_name}, {search_snippets}, {institution_summary}
pub const COMPANY_REPORT_TEMPLATE: &str = r#"### CONTEXT:
You are a Senior Placement Officer (10+ years exp) analyzing a target company for a strategic partnership.

Target Company: {company_name}
Search Snippets: {search_snippets}
My Institution: {institution_summary}

### INSTRUCTION:
Write a brief, high-level executive summary (max 200 words) answering:
1. What is this company's current strategic focus (digital transformation, AI, expansion, etc.)?
2. How does my institution's talent (e.g., CS, IT, Electronics students) fit into their future?

Tone: Professional, Insightful, Strategic.
### REPORT (NO PREAMBLE):"#;

/// Outreach email prompt.
/// Replace: {user_name}, {institution_name}, {company_name}, {job_context},
///          {institution_summary}, {link_list}, {intent}, {recipient_name},
///          {recipient_designation}
pub const OUTREACH_EMAIL_TEMPLATE: &str = r#"### PERSONA:
You are {user_name}, a Senior Head of Corporate Relations at {institution_name} with over 10 years of experience in managing high-stakes campus placements and industrial MOUs.
You are NOT an assistant. You are a peer to HR Heads and Talent Acquisition Leaders.

### EMAIL CONTEXT:
- Target Company: {company_name}
- Strategic Focus: {job_context}
- Institutional Strength: {institution_summary}
- Student Technical Proof: {link_list}
- Intent: {intent}
- Recipient: {recipient_name}, {recipient_designation}

### INSTRUCTION:
Write a MASTERFUL executive cold email. It must sound seasoned, confident, and partnership-oriented.
Avoid all entry-level cliches like "I am writing to..." or "I hope you are doing well."

Structure:
1. **The Lead**: Start with a professional observation about their company's recent direction or the industry landscape.
2. **The Connection**: Briefly link their growth to your institution's specific talent pipeline. Mention your 10 years of experience in shaping students for world-class firms.
3. **The 'Killer' Fact**: Highlight a specific technical capability your students have (referencing {link_list}) that solves their current hiring bottleneck.
4. **The Proposal**: Suggest a specific high-level engagement (e.g., "Let's discuss a structured campus hiring roadmap" or "A quick executive briefing on our upcoming talent cohort").
5. **Sign-off**: Executive, brief, and professional.

Tone: Highly professional, direct, and authoritative.
### MASTER DRAFT (NO PREAMBLE):"#;

/// Named templates known to the prompt builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    InstitutionSummary,
    JobExtraction,
    CompanyReport,
    OutreachEmail,
}

impl TemplateId {
    #[cfg(test)]
    pub const ALL: [TemplateId; 4] = [
        TemplateId::InstitutionSummary,
        TemplateId::JobExtraction,
        TemplateId::CompanyReport,
        TemplateId::OutreachEmail,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemplateId::InstitutionSummary => "institution_summary",
            TemplateId::JobExtraction => "job_extraction",
            TemplateId::CompanyReport => "company_report",
            TemplateId::OutreachEmail => "outreach_email",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            TemplateId::InstitutionSummary => INSTITUTION_SUMMARY_TEMPLATE,
            TemplateId::JobExtraction => JOB_EXTRACTION_TEMPLATE,
            TemplateId::CompanyReport => COMPANY_REPORT_TEMPLATE,
            TemplateId::OutreachEmail => OUTREACH_EMAIL_TEMPLATE,
        }
    }
}

/// Fills the named template. Fails with `MissingVariable` if any placeholder is unsupplied.
pub fn build_prompt(id: TemplateId, vars: &PromptVars) -> Result<String, PromptError> {
    fill_template(id.name(), id.template(), vars)
}
