// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub prompt: String,
    pub color: bool,
    pub exit_words: Vec<String>,
    pub echo_results: bool,
    pub show_banner: bool,
    pub stop_on_error: bool,
    pub log_level: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            color: true,
            exit_words: vec!["exit".to_string(), "quit".to_string()],
            echo_results: true,
            show_banner: true,
            stop_on_error: false,
            log_level: None,
        }
    }
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_exit_words(mut self, words: &[&str]) -> Self {
        self.exit_words = words.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn with_echo_results(mut self, echo: bool) -> Self {
        self.echo_results = echo;
        self
    }

    pub fn with_banner(mut self, show: bool) -> Self {
        self.show_banner = show;
        self
    }

    pub fn with_stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    pub fn is_exit_word(&self, line: &str) -> bool {
        let line = line.trim();
        self.exit_words.iter().any(|word| word == line)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.contains('\n') {
            return Err("prompt must fit on one line".to_string());
        }
        if let Some(word) = self
            .exit_words
            .iter()
            .find(|word| word.is_empty() || word.contains(char::is_whitespace))
        {
            return Err(format!("exit word '{}' must be a single non-empty word", word));
        }
        Ok(())
    }

    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConsoleConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_exit_word(" quit "));
        assert!(!config.is_exit_word("help"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ConsoleConfig::from_json_str(r#"{ "prompt": "db> ", "echo_results": false }"#).unwrap();
        assert_eq!(config.prompt, "db> ");
        assert!(!config.echo_results);
        assert_eq!(config.exit_words, ConsoleConfig::default().exit_words);
    }

    #[test]
    fn test_invalid_exit_word_rejected() {
        let result = ConsoleConfig::from_json_str(r#"{ "exit_words": ["bye now"] }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            ConsoleConfig::from_json_str("{ prompt"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip_through_builders() {
        let config = ConsoleConfig::new()
            .with_prompt("$ ")
            .with_color(false)
            .with_exit_words(&["bye"])
            .with_stop_on_error(true);

        let parsed = ConsoleConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
