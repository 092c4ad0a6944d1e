//! Job records extracted from career pages or search snippets.
//!
//! NOTE: when a page lists no concrete openings, the extraction prompt asks the
//! model to infer likely hiring needs. Records can therefore be model-inferred
//! rather than scraped; the UI should present them as leads, not facts.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub experience: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl JobRecord {
    /// The record returned when the model answers with something that is not JSON.
    pub fn general_fallback() -> Self {
        Self {
            role: "General Technology Role".to_string(),
            experience: "Entry Level".to_string(),
            skills: vec![
                "Java".to_string(),
                "Python".to_string(),
                "Communication".to_string(),
            ],
            description: "General hiring opportunity identified via web presence.".to_string(),
        }
    }
}

/// Models sometimes emit numbers (`"experience": 3`) or nulls for text fields.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

/// Accepts a list of scalars or a single comma-separated string.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        Value::Null => Vec::new(),
        other => vec![scalar_text(&other)],
    })
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}
