//! Per-run configuration.
//!
//! A [`RunConfig`] is built once at the entry point and passed down by
//! reference; nothing in the pipeline reads process-wide mutable state.

use crate::lang::Language;
use std::time::Duration;

/// Configuration for one documentation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Source language being documented.
    pub language: Language,
    /// Generation service credential.
    pub api_key: String,
    /// Generation service base URL.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Decoding temperature, biased toward variety.
    pub temperature: f64,
    /// Maximum output length per request.
    pub max_tokens: u32,
    /// Cooldown after a rate-limit response, chosen to exceed typical quota
    /// windows.
    pub rate_limit_cooldown: Duration,
    /// Maximum generation attempts per entity before giving up.
    pub max_attempts: usize,
    /// Directory base names skipped during traversal.
    pub ignored_dirs: Vec<String>,
    /// Print a unified diff of each rewritten file.
    pub show_diff: bool,
}

impl RunConfig {
    /// Build a config with the default generation parameters.
    pub fn new(language: Language, api_key: impl Into<String>) -> Self {
        Self {
            language,
            api_key: api_key.into(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            rate_limit_cooldown: default_cooldown(),
            max_attempts: default_max_attempts(),
            ignored_dirs: default_ignored_dirs(),
            show_diff: false,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    1.2
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_cooldown() -> Duration {
    Duration::from_secs(21)
}

fn default_max_attempts() -> usize {
    5
}

fn default_ignored_dirs() -> Vec<String> {
    [
        ".git", ".idea", ".vscode", "__pycache__", "venv", "dist", "build", "target",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RunConfig::new(Language::Python, "sk-test");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, 1.2);
        assert_eq!(config.rate_limit_cooldown, Duration::from_secs(21));
        assert_eq!(config.max_attempts, 5);
        assert!(config.ignored_dirs.iter().any(|d| d == "__pycache__"));
        assert!(!config.show_diff);
    }
}
