//! Response Normalizer — turns raw model output into what the wizard shows.
//!
//! Freeform mode passes prose through and swaps in a fixed string when the
//! model is unavailable. Structured mode parses job listings and never fails:
//! unparseable output degrades to one generic record, an unreachable model to
//! an empty list. The two degraded paths are kept apart in `JobExtraction`.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::llm_client::{strip_json_fences, LlmError};
use crate::models::job::JobRecord;

/// Outcome of a structured job-extraction call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "jobs", rename_all = "snake_case")]
pub enum JobExtraction {
    /// The model answered with JSON in one of the accepted shapes.
    Parsed(Vec<JobRecord>),
    /// The model answered, but not with usable JSON.
    Fallback(Vec<JobRecord>),
    /// The model could not be reached.
    Empty,
}

impl JobExtraction {
    pub fn jobs(&self) -> &[JobRecord] {
        match self {
            JobExtraction::Parsed(jobs) | JobExtraction::Fallback(jobs) => jobs,
            JobExtraction::Empty => &[],
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.jobs().is_empty()
    }
}

/// Freeform mode: the model's text verbatim, or `fallback` when the call failed.
pub fn freeform(result: Result<String, LlmError>, fallback: &str) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            warn!("LLM unavailable, using fallback text: {e}");
            fallback.to_string()
        }
    }
}

/// Structured mode for job extraction.
pub fn structured(result: Result<String, LlmError>) -> JobExtraction {
    match result {
        Ok(text) => match parse_jobs(&text) {
            Ok(jobs) => JobExtraction::Parsed(jobs),
            Err(e) => {
                warn!("Job extraction output was not usable JSON ({e}); using fallback record");
                JobExtraction::Fallback(vec![JobRecord::general_fallback()])
            }
        },
        // The model was reached but said nothing, which is a parse problem.
        Err(LlmError::EmptyContent) => {
            warn!("Job extraction returned no content; using fallback record");
            JobExtraction::Fallback(vec![JobRecord::general_fallback()])
        }
        Err(e @ (LlmError::Http(_) | LlmError::Api { .. } | LlmError::Decode(_))) => {
            warn!("LLM unavailable for job extraction: {e}");
            JobExtraction::Empty
        }
    }
}

/// Accepts `{"jobs": [...]}`, a bare list, or a single object.
pub fn parse_jobs(text: &str) -> Result<Vec<JobRecord>, serde_json::Error> {
    let items = match extract_json_value(text)? {
        Value::Object(mut map) if map.contains_key("jobs") => match map.remove("jobs") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other],
        },
        Value::Array(items) => items,
        other => vec![other],
    };

    items.into_iter().map(serde_json::from_value).collect()
}

/// Parses the text as JSON, retrying on the outermost `{...}` / `[...]` span
/// when the model wrapped its answer in prose.
fn extract_json_value(text: &str) -> Result<Value, serde_json::Error> {
    let text = strip_json_fences(text);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(e) => {
            let start = text.find(&['{', '['][..]);
            let end = text.rfind(&['}', ']'][..]);
            match (start, end) {
                (Some(start), Some(end)) if start < end => {
                    serde_json::from_str(&text[start..=end]).map_err(|_| e)
                }
                _ => Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error() -> LlmError {
        LlmError::Api {
            status: 503,
            message: "upstream overloaded".to_string(),
        }
    }

    #[test]
    fn test_structured_jobs_object() {
        let text = r#"{"jobs":[{"role":"X","experience":"Y","skills":["A"],"description":"Z"}]}"#;
        let extraction = structured(Ok(text.to_string()));
        assert_eq!(
            extraction,
            JobExtraction::Parsed(vec![JobRecord {
                role: "X".to_string(),
                experience: "Y".to_string(),
                skills: vec!["A".to_string()],
                description: "Z".to_string(),
            }])
        );
    }

    #[test]
    fn test_structured_bare_list_is_returned_as_is() {
        let text = r#"[{"role":"A"},{"role":"B"}]"#;
        let jobs = structured(Ok(text.to_string())).jobs().to_vec();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].role, "B");
    }

    #[test]
    fn test_structured_single_object_is_wrapped() {
        let text = r#"{"role":"Data Engineer","skills":["Spark"]}"#;
        let extraction = structured(Ok(text.to_string()));
        assert!(matches!(&extraction, JobExtraction::Parsed(jobs) if jobs.len() == 1));
        assert_eq!(extraction.jobs()[0].role, "Data Engineer");
    }

    #[test]
    fn test_structured_fenced_json_with_preamble() {
        let text = "Here are the roles:\n```json\n{\"jobs\": [{\"role\": \"QA\"}]}\n```";
        let extraction = structured(Ok(text.to_string()));
        assert!(matches!(&extraction, JobExtraction::Parsed(jobs) if jobs[0].role == "QA"));
    }

    #[test]
    fn test_structured_non_json_returns_fallback_record() {
        let extraction = structured(Ok("Sorry, I cannot find any jobs.".to_string()));
        assert_eq!(
            extraction,
            JobExtraction::Fallback(vec![JobRecord::general_fallback()])
        );
        let job = &extraction.jobs()[0];
        assert_eq!(job.role, "General Technology Role");
        assert_eq!(job.experience, "Entry Level");
        assert_eq!(job.skills, vec!["Java", "Python", "Communication"]);
    }

    #[test]
    fn test_structured_list_of_strings_falls_back() {
        let extraction = structured(Ok(r#"["Engineer", "Analyst"]"#.to_string()));
        assert!(matches!(extraction, JobExtraction::Fallback(_)));
    }

    #[test]
    fn test_structured_empty_content_falls_back() {
        assert!(matches!(
            structured(Err(LlmError::EmptyContent)),
            JobExtraction::Fallback(_)
        ));
    }

    #[test]
    fn test_structured_transport_failure_is_empty() {
        let extraction = structured(Err(api_error()));
        assert_eq!(extraction, JobExtraction::Empty);
        assert!(extraction.jobs().is_empty());
    }

    #[test]
    fn test_structured_null_jobs_is_empty_list() {
        assert_eq!(
            structured(Ok(r#"{"jobs": null}"#.to_string())),
            JobExtraction::Parsed(vec![])
        );
    }

    #[test]
    fn test_freeform_passes_text_through() {
        assert_eq!(freeform(Ok("  As-is  ".to_string()), "fallback"), "  As-is  ");
    }

    #[test]
    fn test_freeform_failure_uses_fallback() {
        assert_eq!(freeform(Err(api_error()), "fallback"), "fallback");
    }

    #[test]
    fn test_extraction_serializes_with_status_tag() {
        let value = serde_json::to_value(JobExtraction::Empty).unwrap();
        assert_eq!(value["status"], "empty");
        let value = serde_json::to_value(JobExtraction::Fallback(vec![])).unwrap();
        assert_eq!(value["status"], "fallback");
        assert!(value["jobs"].as_array().unwrap().is_empty());
    }
}
