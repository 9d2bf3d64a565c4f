//! Runtime configuration loaded from the environment

use std::env;
use std::time::Duration;

use crate::{Result, SovereignError, DEFAULT_PASSCODE};

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_THINKING_BUDGET: u32 = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key; `None` means the local script is the only source
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub thinking_budget: u32,
    pub passcode: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            thinking_budget: DEFAULT_THINKING_BUDGET,
            passcode: DEFAULT_PASSCODE.to_string(),
        }
    }
}

impl Config {
    /// Read configuration from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|k| !k.trim().is_empty());

        let timeout_secs = match lookup("SOVEREIGN_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| SovereignError::InvalidConfig {
                key: "SOVEREIGN_TIMEOUT_SECS",
                value: raw,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let thinking_budget = match lookup("SOVEREIGN_THINKING_BUDGET") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| SovereignError::InvalidConfig {
                key: "SOVEREIGN_THINKING_BUDGET",
                value: raw,
            })?,
            None => DEFAULT_THINKING_BUDGET,
        };

        Ok(Self {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(timeout_secs),
            thinking_budget,
            passcode: lookup("SHADOW_PASSCODE").unwrap_or(defaults.passcode),
        })
    }

    /// API key, or an error when generation is requested without one
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(SovereignError::MissingConfig("GEMINI_API_KEY"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.passcode, DEFAULT_PASSCODE);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_api_key_fallback_name() {
        let config = Config::from_lookup(lookup_from(&[("API_KEY", "abc")])).unwrap();
        assert_eq!(config.require_api_key().unwrap(), "abc");
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let result = Config::from_lookup(lookup_from(&[("SOVEREIGN_TIMEOUT_SECS", "soon")]));
        assert!(matches!(
            result,
            Err(SovereignError::InvalidConfig { key: "SOVEREIGN_TIMEOUT_SECS", .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("SHADOW_PASSCODE", "1234"),
            ("SOVEREIGN_THINKING_BUDGET", "0"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.passcode, "1234");
        assert_eq!(config.thinking_budget, 0);
    }
}
