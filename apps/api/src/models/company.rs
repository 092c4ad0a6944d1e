use serde::{Deserialize, Serialize};

/// One ranked hit from the search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// The company currently being researched. Replaced, never merged, on each search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyQuery {
    pub display_name: String,
    pub search_snippets: String,
    pub career_url: String,
}

/// Title-cases the query and collapses whitespace: "acme  labs" → "Acme Labs".
/// A letter starts a new word after any non-letter, so "at&t" → "At&T".
pub fn display_name(query: &str) -> String {
    let words = query.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(words.len());
    let mut after_letter = false;

    for c in words.chars() {
        if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}
