//! Text cleanup for scraped pages: flattens html2text output into one line of prose.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap());
// Keeps letters, digits, whitespace and the punctuation that carries meaning
// in skill names ("C++", "C#", "Node.js", "R&D").
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\p{L}\p{N}\s.,;:!?'"()&%/+#@-]"#).unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strips URLs, collapses whitespace and drops repeated lines (menus and
/// footers often render several times). First occurrence wins.
///
/// Input is rendered text, not HTML: a literal `<` here is prose.
pub fn clean_text(raw: &str) -> String {
    let text = URL.replace_all(raw, " ");
    let text = DISALLOWED.replace_all(&text, " ");

    let mut seen = HashSet::new();
    let mut lines = Vec::new();
    for line in text.lines() {
        let line = WHITESPACE.replace_all(line, " ");
        let line = line.trim();
        if line.is_empty() || !seen.insert(line.to_string()) {
            continue;
        }
        lines.push(line.to_string());
    }

    lines.join(" ")
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Campus \t  placements\n\n  2024  "), "Campus placements 2024");
    }

    #[test]
    fn test_clean_text_drops_repeated_lines() {
        let raw = "Home | About\nOur labs lead in AI.\nHome | About\nOur labs lead in AI.\nContact";
        assert_eq!(clean_text(raw), "Home About Our labs lead in AI. Contact");
    }

    #[test]
    fn test_clean_text_removes_urls() {
        let raw = "Apply at https://careers.example.com/jobs?id=4 or www.example.com today";
        assert_eq!(clean_text(raw), "Apply at or today");
    }

    #[test]
    fn test_clean_text_keeps_text_between_angle_brackets() {
        assert_eq!(
            clean_text("CGPA < 6 needs review, > 9 earns merit"),
            "CGPA 6 needs review, 9 earns merit"
        );
    }

    #[test]
    fn test_clean_text_keeps_skill_punctuation() {
        assert_eq!(clean_text("C++ / C# * Node.js ~ R&D"), "C++ / C# Node.js R&D");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
