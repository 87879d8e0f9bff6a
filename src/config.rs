//! Configuration types for PDF summarization.
//!
//! All run behaviour is controlled through [`ReportConfig`], built via its
//! [`ReportConfigBuilder`] or loaded from the environment with
//! [`ReportConfig::from_env`]. The config is assembled once at process start
//! and passed by reference into the pipeline stages — no stage reads the
//! environment on its own, which keeps the components testable and makes two
//! runs diffable from their configs alone.

use crate::error::ReportError;
use std::env;
use std::fmt;

/// Default completion model when `OPENAI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default completion API base when `OPENAI_BASE_URL` is unset.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Configuration for a summarization run.
///
/// # Example
/// ```rust
/// use pdf2report::ReportConfig;
///
/// let config = ReportConfig::builder()
///     .api_key("sk-test")
///     .model("gpt-4o-mini")
///     .target_tokens(1400)
///     .system_prompt("You are a careful summarizer.")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ReportConfig {
    /// Bearer credential for the completion endpoint. Required; checked
    /// before any network call is made.
    pub api_key: String,

    /// Completion model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Base URL of the chat-completions API. Default: [`DEFAULT_API_BASE`].
    ///
    /// Overridable so the same binary can talk to OpenAI-compatible gateways
    /// (proxies, vLLM, LiteLLM) without code changes.
    pub api_base: String,

    /// Maximum tokens the model may generate for the report. Default: 3000.
    ///
    /// The report is a single completion covering the whole document; 3000
    /// comfortably fits the JSON shape for papers and long reports while
    /// keeping cost bounded.
    pub max_tokens: u32,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Low temperature keeps the model faithful to the source text, which is
    /// what a summarizer wants. Higher values invite invented findings.
    pub temperature: f32,

    /// Token budget per chunk when packing pages. Default: 1400.
    ///
    /// Pages are packed greedily up to this budget and never split, so a
    /// single page larger than the budget becomes its own oversized chunk.
    pub target_tokens: usize,

    /// System-instruction text sent as the system message.
    ///
    /// Loaded from an external file at startup (the CLI reads
    /// `prompts/system.md` by default). Empty means "not loaded yet";
    /// [`crate::pipeline::llm`] refuses to run without it.
    pub system_prompt: String,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Timeout for the completion call in seconds. Default: 60.
    pub api_timeout_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_tokens: 3000,
            temperature: 0.1,
            target_tokens: 1400,
            system_prompt: String::new(),
            download_timeout_secs: 120,
            api_timeout_secs: 60,
        }
    }
}

impl fmt::Debug for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("target_tokens", &self.target_tokens)
            .field("system_prompt_len", &self.system_prompt.len())
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl ReportConfig {
    /// Create a new builder for `ReportConfig`.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// Reads `OPENAI_API_KEY` (required), `OPENAI_MODEL`, `OPENAI_BASE_URL`,
    /// `MAX_TOKENS`, and `TEMPERATURE`. A missing key is
    /// [`ReportError::MissingApiKey`] — reported immediately, before any
    /// network call. A malformed numeric value is a configuration error
    /// rather than a silent fallback to the default.
    pub fn from_env() -> Result<Self, ReportError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ReportError::MissingApiKey)?;

        let mut config = Self {
            api_key,
            ..Self::default()
        };

        if let Ok(model) = env::var("OPENAI_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        if let Ok(base) = env::var("OPENAI_BASE_URL") {
            if !base.is_empty() {
                config.api_base = base.trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = env::var("MAX_TOKENS") {
            config.max_tokens = v.parse().map_err(|_| {
                ReportError::InvalidConfig(format!("MAX_TOKENS must be an integer, got '{v}'"))
            })?;
        }
        if let Ok(v) = env::var("TEMPERATURE") {
            config.temperature = v.parse().map_err(|_| {
                ReportError::InvalidConfig(format!("TEMPERATURE must be a number, got '{v}'"))
            })?;
        }

        Ok(config)
    }
}

/// Builder for [`ReportConfig`].
#[derive(Debug)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.config.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn target_tokens(mut self, n: usize) -> Self {
        self.config.target_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ReportConfig, ReportError> {
        let c = &self.config;
        if c.target_tokens == 0 {
            return Err(ReportError::InvalidConfig(
                "target_tokens must be ≥ 1".into(),
            ));
        }
        if c.model.is_empty() {
            return Err(ReportError::InvalidConfig("model must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ReportConfig::builder().api_key("sk-test").build().unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 3000);
        assert_eq!(config.target_tokens, 1400);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_rejects_zero_target() {
        let err = ReportConfig::builder()
            .api_key("sk-test")
            .target_tokens(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("target_tokens"));
    }

    #[test]
    fn api_base_trailing_slash_is_trimmed() {
        let config = ReportConfig::builder()
            .api_key("sk-test")
            .api_base("http://localhost:8080/v1/")
            .build()
            .unwrap();
        assert_eq!(config.api_base, "http://localhost:8080/v1");
    }

    #[test]
    fn from_env_requires_api_key() {
        // Single test mutates the process environment so env reads cannot
        // race across the parallel test harness.
        env::remove_var("OPENAI_API_KEY");
        assert!(matches!(
            ReportConfig::from_env(),
            Err(ReportError::MissingApiKey)
        ));

        env::set_var("OPENAI_API_KEY", "sk-env-test");
        let config = ReportConfig::from_env().unwrap();
        assert_eq!(config.api_key, "sk-env-test");
        env::remove_var("OPENAI_API_KEY");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ReportConfig::builder()
            .api_key("sk-very-secret")
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("sk-very-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
