use std::time::Duration;

use anyhow::{Context, Result};

/// Where users can obtain a Groq key; shown when `GROQ_API_KEY` is missing.
pub const GROQ_CONSOLE_URL: &str = "https://console.groq.com/";

/// Application configuration loaded from environment variables.
/// `main` reports a missing API key to the user and exits instead of panicking.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub portfolio_path: String,
    pub port: u16,
    pub rust_log: String,
    /// Sessions with no activity for this long are dropped.
    pub session_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            portfolio_path: std::env::var("PORTFOLIO_PATH")
                .unwrap_or_else(|_| "resource/portfolio.json".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_idle_timeout: Duration::from_secs(
                std::env::var("SESSION_IDLE_MINUTES")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse::<u64>()
                    .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?
                    * 60,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_reports_variable_name() {
        let err = require_env("OUTREACH_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
        assert!(err
            .to_string()
            .contains("OUTREACH_TEST_SURELY_UNSET_VARIABLE"));
    }
}
