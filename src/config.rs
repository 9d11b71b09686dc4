//! Configuration types for a website audit.
//!
//! All audit behaviour is controlled through [`AuditConfig`], built via its
//! [`AuditConfigBuilder`]. Setters clamp out-of-range values to sane bounds;
//! [`AuditConfigBuilder::build`] validates the rest.

use crate::error::AuditError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default chat-completions endpoint base.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for a website audit.
///
/// Built via [`AuditConfig::builder()`] or using [`AuditConfig::default()`].
///
/// # Example
/// ```rust
/// use sitegrade::AuditConfig;
///
/// let config = AuditConfig::builder()
///     .max_chars(8_000)
///     .model("gpt-4o-mini")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Maximum number of characters of extracted page text sent to the model.
    /// Default: 12 000.
    ///
    /// Marketing-relevant copy lives near the top of a landing page; past a
    /// dozen kilobytes additional text mostly adds boilerplate (cookie
    /// banners, footers) and token cost without changing the grades.
    pub max_chars: usize,

    /// Model identifier, e.g. "gpt-4o-mini". Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Sampling temperature. Default: 0.4.
    ///
    /// Low enough to keep grades stable between runs while leaving the
    /// rationale and quick-win prose some room to breathe.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 4096.
    ///
    /// Four detailed sections with quick wins run 1 500–2 500 output tokens.
    /// Setting this too low truncates the JSON mid-object, which surfaces as
    /// a parse failure rather than a shorter report.
    pub max_tokens: usize,

    /// Timeout for the website fetch in seconds. Default: 30.
    pub fetch_timeout_secs: u64,

    /// Timeout for the model call in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Chat-completions endpoint base, without the trailing path.
    /// Default: [`DEFAULT_API_BASE`]. Overridable for proxies and tests.
    pub api_base: String,

    /// API key. If None, `OPENAI_API_KEY` is read from the environment at
    /// audit time — never earlier, so library users can construct configs
    /// freely without a key present.
    pub api_key: Option<String>,

    /// Optional logo image placed in the report header. A missing or
    /// unreadable file is silently omitted, never an error.
    pub logo: Option<PathBuf>,

    /// Custom system prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_chars: 12_000,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.4,
            max_tokens: 4096,
            fetch_timeout_secs: 30,
            api_timeout_secs: 120,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            logo: None,
            system_prompt: None,
        }
    }
}

impl AuditConfig {
    /// Create a new builder for `AuditConfig`.
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AuditConfig`].
#[derive(Debug)]
pub struct AuditConfigBuilder {
    config: AuditConfig,
}

impl AuditConfigBuilder {
    pub fn max_chars(mut self, n: usize) -> Self {
        self.config.max_chars = n.max(200);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs.max(1);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.logo = Some(path.into());
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AuditConfig, AuditError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(AuditError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(AuditError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if !c.api_base.starts_with("http://") && !c.api_base.starts_with("https://") {
            return Err(AuditError::InvalidConfig(format!(
                "api_base must be an http(s) URL, got '{}'",
                c.api_base
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AuditConfig::builder().build().unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_chars, 12_000);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn max_chars_clamped_to_floor() {
        let config = AuditConfig::builder().max_chars(5).build().unwrap();
        assert_eq!(config.max_chars, 200);
    }

    #[test]
    fn temperature_clamped() {
        let config = AuditConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn empty_model_rejected() {
        let err = AuditConfig::builder().model("  ").build().unwrap_err();
        assert!(matches!(err, AuditError::InvalidConfig(_)));
    }

    #[test]
    fn bad_api_base_rejected() {
        let err = AuditConfig::builder()
            .api_base("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, AuditError::InvalidConfig(_)));
    }
}
