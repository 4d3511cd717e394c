//! Configuration for an audit invocation.
//!
//! All pipeline behaviour is controlled through [`AuditConfig`], built via
//! its [`AuditConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across invocations and to see at a glance why
//! two runs produced different requests.
//!
//! The credential is part of the config on purpose: it is scoped to the
//! invocation that carries the config, never cached in process-wide state,
//! so concurrent sessions with different keys cannot observe each other's.

use crate::error::AuditError;
use crate::framework::Framework;
use crate::pipeline::client::CompletionClient;
use std::fmt;
use std::sync::Arc;

/// Default page cap applied during extraction.
///
/// Two pages bounds both extraction latency and remote-call cost; report
/// excerpts with the emissions tables of interest fit comfortably within it.
pub const DEFAULT_PAGE_CAP: usize = 2;

/// Default completion model identifier.
pub const DEFAULT_MODEL: &str = "sonar-pro";

/// Default completion service endpoint (OpenAI-compatible chat API).
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Configuration for a compliance audit.
///
/// Built via [`AuditConfig::builder()`] or [`AuditConfig::default()`].
///
/// # Example
/// ```rust
/// use complibot::{AuditConfig, Framework};
///
/// let config = AuditConfig::builder()
///     .framework(Framework::Csrd)
///     .api_key("pplx-...")
///     .max_pages(2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AuditConfig {
    /// Reporting framework whose profile drives the extraction. Default: Generic.
    pub framework: Framework,

    /// Maximum number of pages read from the document. Default: 2.
    ///
    /// Pages beyond the cap are never decoded. Raise this for excerpts where
    /// the emissions disclosure sits deeper in the document; every extra page
    /// grows the prompt and the per-call cost roughly linearly.
    pub max_pages: usize,

    /// Completion model identifier. Default: `sonar-pro`.
    ///
    /// Fixed configuration — never derived from the document or any other
    /// user-supplied content.
    pub model: String,

    /// Base URL of the completion service. Default: `https://api.perplexity.ai`.
    ///
    /// Any OpenAI-compatible `/chat/completions` endpoint works, which is
    /// also how tests point the pipeline at a local stub server.
    pub base_url: String,

    /// API credential for the completion service.
    ///
    /// Required unless a pre-built [`client`](Self::client) is injected.
    /// Never logged; the `Debug` impl redacts it.
    pub api_key: Option<String>,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Low temperature keeps the model faithful to figures actually present
    /// in the text — exactly what an audit needs.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 1024.
    ///
    /// The expected output is a small compliance table; 1024 covers it with
    /// ample slack while keeping a runaway completion bounded.
    pub max_tokens: usize,

    /// Per-call timeout in seconds for the completion request. Default: 60.
    pub api_timeout_secs: u64,

    /// Check the returned table header against the profile's expected
    /// columns. Default: true.
    ///
    /// A mismatch is logged as a warning and reflected in
    /// `AuditStats::columns_verified`; the result is never rejected.
    pub validate_columns: bool,

    /// Pre-constructed completion client. Takes precedence over
    /// `base_url`/`api_key`/`model`; lets tests substitute a stub without
    /// touching global state.
    pub client: Option<Arc<dyn CompletionClient>>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            framework: Framework::Generic,
            max_pages: DEFAULT_PAGE_CAP,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            temperature: 0.1,
            max_tokens: 1024,
            api_timeout_secs: 60,
            validate_columns: true,
            client: None,
        }
    }
}

impl fmt::Debug for AuditConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditConfig")
            .field("framework", &self.framework)
            .field("max_pages", &self.max_pages)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("validate_columns", &self.validate_columns)
            .field("client", &self.client.as_ref().map(|_| "<dyn CompletionClient>"))
            .finish()
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
    pub fn framework(mut self, fw: Framework) -> Self {
        self.config.framework = fw;
        self
    }

    pub fn max_pages(mut self, n: usize) -> Self {
        self.config.max_pages = n.max(1);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
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

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn validate_columns(mut self, v: bool) -> Self {
        self.config.validate_columns = v;
        self
    }

    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.config.client = Some(client);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AuditConfig, AuditError> {
        let c = &self.config;
        if c.max_pages == 0 {
            return Err(AuditError::InvalidConfig("Page cap must be ≥ 1".into()));
        }
        if c.base_url.trim().is_empty() {
            return Err(AuditError::InvalidConfig("Base URL must not be empty".into()));
        }
        if c.model.trim().is_empty() {
            return Err(AuditError::InvalidConfig("Model must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_policy() {
        let c = AuditConfig::default();
        assert_eq!(c.max_pages, 2);
        assert_eq!(c.model, "sonar-pro");
        assert_eq!(c.base_url, "https://api.perplexity.ai");
        assert_eq!(c.framework, Framework::Generic);
    }

    #[test]
    fn builder_clamps_page_cap() {
        let c = AuditConfig::builder().max_pages(0).build().unwrap();
        assert_eq!(c.max_pages, 1);
    }

    #[test]
    fn builder_rejects_empty_base_url() {
        let mut c = AuditConfig::builder();
        c = c.base_url("  ");
        assert!(matches!(c.build(), Err(AuditError::InvalidConfig(_))));
    }

    #[test]
    fn debug_redacts_credential() {
        let c = AuditConfig::builder().api_key("pplx-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("pplx-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
