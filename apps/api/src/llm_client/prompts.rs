// Prompt filling shared by every module that talks to the model.
// Each module that needs LLM calls keeps its own template constants alongside it;
// this file only knows how to substitute `{name}` placeholders.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Variable name → value for one template fill.
pub type PromptVars = BTreeMap<&'static str, String>;

/// Placeholders are `{snake_case}` identifiers. Braces around anything else
/// are left alone so templates may still show literal `{}`.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_][a-z0-9_]*)\}").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    /// A template references a variable the caller did not supply.
    #[error("template '{template}' requires variable '{variable}'")]
    MissingVariable {
        template: &'static str,
        variable: String,
    },
}

/// Substitutes every placeholder in `template` from `vars`.
///
/// Injected values are inserted verbatim and never rescanned, so text that
/// itself contains `{...}` cannot trigger a second substitution.
pub fn fill_template(
    name: &'static str,
    template: &str,
    vars: &PromptVars,
) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(var)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = vars
            .get(var.as_str())
            .ok_or_else(|| PromptError::MissingVariable {
                template: name,
                variable: var.as_str().to_string(),
            })?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}

/// True when `text` still contains a `{placeholder}` marker.
#[cfg(test)]
pub fn has_placeholders(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}
