use serde::{Deserialize, Serialize};

/// The placement officer's persona plus the derived institution summary.
/// Fixed once the setup step completes; only `institution_summary` is refreshed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionProfile {
    pub name: String,
    pub designation: String,
    pub institution_name: String,
    pub institution_url: String,
    /// Empty when the institution site could not be scraped.
    #[serde(default)]
    pub institution_summary: String,
}

impl InstitutionProfile {
    /// Returns the name of the first blank required field, if any.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("designation", &self.designation),
            ("institution_name", &self.institution_name),
            ("institution_url", &self.institution_url),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// Who the outreach email is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipientDetails {
    pub name: String,
    #[serde(default)]
    pub designation: String,
}

/// Strategic intent of an outreach email. Serialized as its display label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    #[default]
    #[serde(rename = "Campus Hiring Drive 2024-25")]
    CampusHiringDrive,
    #[serde(rename = "Student Internships")]
    StudentInternships,
    #[serde(rename = "MOU & Partnerships")]
    MouPartnerships,
}

impl Intent {
    pub const ALL: [Intent; 3] = [
        Intent::CampusHiringDrive,
        Intent::StudentInternships,
        Intent::MouPartnerships,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Intent::CampusHiringDrive => "Campus Hiring Drive 2024-25",
            Intent::StudentInternships => "Student Internships",
            Intent::MouPartnerships => "MOU & Partnerships",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_profile() -> InstitutionProfile {
        InstitutionProfile {
            name: "Prof. Mohan Kumar".to_string(),
            designation: "Head of Corporate Relations".to_string(),
            institution_name: "City Institute of Technology".to_string(),
            institution_url: "https://cit.example.edu".to_string(),
            institution_summary: String::new(),
        }
    }

    #[test]
    fn test_complete_profile_has_no_missing_field() {
        assert_eq!(complete_profile().first_missing_field(), None);
    }

    #[test]
    fn test_blank_field_is_reported() {
        let profile = InstitutionProfile {
            designation: "   ".to_string(),
            ..complete_profile()
        };
        assert_eq!(profile.first_missing_field(), Some("designation"));
    }

    #[test]
    fn test_intent_serializes_as_label() {
        for intent in Intent::ALL {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent.label()));
        }
    }

    #[test]
    fn test_intent_deserializes_from_label() {
        let intent: Intent = serde_json::from_str(r#""MOU & Partnerships""#).unwrap();
        assert_eq!(intent, Intent::MouPartnerships);
    }
}
