//! Process configuration, resolved once at startup.

use snafu::{ensure, OptionExt, ResultExt, Snafu};
use std::fmt;
use url::Url;

use crate::client::{Model, DEFAULT_BASE_URL};

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Accepted when `GEMINI_API_KEY` is not set.
pub const FALLBACK_API_KEY_VAR: &str = "API_KEY";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const TEXT_MODEL_VAR: &str = "GEMINI_TEXT_MODEL";
pub const VIDEO_MODEL_VAR: &str = "GEMINI_VIDEO_MODEL";

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("GEMINI_API_KEY (or API_KEY) environment variable not set"))]
    MissingApiKey,

    #[snafu(display("invalid base URL '{url}'"))]
    InvalidBaseUrl { source: url::ParseError, url: String },
}

/// Credentials and endpoints for the remote analyzer.
#[derive(Clone)]
pub struct Config {
    api_key: String,
    pub base_url: Url,
    pub text_model: Model,
    pub video_model: Model,
    pub temperature: Option<f32>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("text_model", &self.text_model)
            .field("video_model", &self.video_model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Config {
    /// Default models and endpoint; fails on a blank key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        ensure!(!api_key.trim().is_empty(), MissingApiKeySnafu);

        Ok(Self {
            api_key,
            base_url: Url::parse(DEFAULT_BASE_URL).context(InvalidBaseUrlSnafu {
                url: DEFAULT_BASE_URL,
            })?,
            text_model: Model::Gemini25Flash,
            video_model: Model::Gemini25Pro,
            temperature: None,
        })
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_blank(API_KEY_VAR)
            .or_else(|| non_blank(FALLBACK_API_KEY_VAR))
            .context(MissingApiKeySnafu)?;
        let mut config = Self::new(api_key)?;

        if let Some(url) = non_blank(BASE_URL_VAR) {
            config = config.with_base_url(&url)?;
        }
        if let Some(model) = non_blank(TEXT_MODEL_VAR) {
            config.text_model = Model::from(model);
        }
        if let Some(model) = non_blank(VIDEO_MODEL_VAR) {
            config.video_model = Model::from(model);
        }
        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Point the clients at another endpoint. A trailing slash is added if missing.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let normalized = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{url}/")
        };
        self.base_url = Url::parse(&normalized).context(InvalidBaseUrlSnafu { url })?;
        Ok(self)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        assert!(matches!(
            Config::from_lookup(lookup(&[])),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(API_KEY_VAR, "   ")])),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(Config::new(""), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_fallback_api_key_variable() {
        let config = Config::from_lookup(lookup(&[(FALLBACK_API_KEY_VAR, "legacy")])).unwrap();
        assert_eq!(config.api_key(), "legacy");

        let config =
            Config::from_lookup(lookup(&[(API_KEY_VAR, "primary"), (FALLBACK_API_KEY_VAR, "legacy")]))
                .unwrap();
        assert_eq!(config.api_key(), "primary");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "key"),
            (BASE_URL_VAR, "http://localhost:8080/v1beta"),
            (TEXT_MODEL_VAR, "gemini-2.0-flash"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:8080/v1beta/");
        assert_eq!(
            config.text_model,
            Model::Custom("models/gemini-2.0-flash".to_string())
        );
        assert_eq!(config.video_model, Model::Gemini25Pro);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Config::new("key").unwrap().with_base_url("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::new("super-secret").unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
