//! Configuration types for the typewriter client.

mod speed;

pub use speed::{sanitize_speed, SpeedPreset, TypingSpeed, DEFAULT_TYPING_SPEED_MS};

use secrecy::SecretString;
use std::time::Duration;
use url::Url;
use crate::error::{TypewriterError, ConfigurationError};

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Default model used for article generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Default request timeout (120 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connect timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Authentication method for API key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// Use x-goog-api-key header (recommended).
    #[default]
    Header,
    /// Use ?key= query parameter.
    QueryParam,
}

/// Log level for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Error level - only errors.
    Error,
    /// Warning level - errors and warnings.
    Warn,
    /// Info level - general information.
    #[default]
    Info,
    /// Debug level - detailed information.
    Debug,
    /// Trace level - very detailed information.
    Trace,
}

impl From<LogLevel> for tracing::level_filters::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

/// Configuration for the typewriter client.
#[derive(Clone)]
pub struct TypewriterConfig {
    /// API key (required).
    pub api_key: SecretString,
    /// Base URL for the API.
    pub base_url: Url,
    /// API version.
    pub api_version: String,
    /// Model used for generation.
    pub model: String,
    /// Default timeout for requests.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Authentication method.
    pub auth_method: AuthMethod,
    /// Initial typing speed in milliseconds per character.
    pub typing_speed_ms: f64,
    /// Log level.
    pub log_level: LogLevel,
}

impl TypewriterConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TypewriterConfigBuilder {
        TypewriterConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), `GEMINI_BASE_URL`,
    /// `GEMINI_API_VERSION`, `GEMINI_MODEL`, `GEMINI_TIMEOUT_SECS` and
    /// `TYPEWRITER_SPEED_MS`.
    pub fn from_env() -> Result<Self, TypewriterError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| ConfigurationError::MissingApiKey)?;

        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let api_version = std::env::var("GEMINI_API_VERSION")
            .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());

        let model = std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs: u64 = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let mut builder = Self::builder()
            .api_key(SecretString::new(api_key))
            .base_url(&base_url)?
            .api_version(&api_version)
            .model(&model)
            .timeout(Duration::from_secs(timeout_secs));

        if let Ok(raw) = std::env::var("TYPEWRITER_SPEED_MS") {
            builder = builder.typing_speed_ms(raw.trim().parse().unwrap_or(DEFAULT_TYPING_SPEED_MS));
        }

        builder.build()
    }

    /// A fresh live speed handle seeded from this configuration.
    pub fn typing_speed(&self) -> TypingSpeed {
        TypingSpeed::new(self.typing_speed_ms)
    }
}

impl std::fmt::Debug for TypewriterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypewriterConfig")
            .field("api_key", &"***REDACTED***")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("auth_method", &self.auth_method)
            .field("typing_speed_ms", &self.typing_speed_ms)
            .finish_non_exhaustive()
    }
}

/// Builder for `TypewriterConfig`.
#[derive(Default)]
pub struct TypewriterConfigBuilder {
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    api_version: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    auth_method: Option<AuthMethod>,
    typing_speed_ms: Option<f64>,
    log_level: Option<LogLevel>,
}

impl TypewriterConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, TypewriterError> {
        self.base_url = Some(Url::parse(base_url)?);
        Ok(self)
    }

    /// Set the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the authentication method.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Set the initial typing speed. Invalid values fall back to the default.
    pub fn typing_speed_ms(mut self, millis: f64) -> Self {
        self.typing_speed_ms = Some(sanitize_speed(millis));
        self
    }

    /// Set the typing speed from a preset.
    pub fn speed_preset(self, preset: SpeedPreset) -> Self {
        self.typing_speed_ms(preset.millis())
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<TypewriterConfig, TypewriterError> {
        let api_key = self.api_key
            .ok_or(ConfigurationError::MissingApiKey)?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "model name must not be empty".to_string(),
            }
            .into());
        }

        Ok(TypewriterConfig {
            api_key,
            base_url,
            api_version: self.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            model,
            timeout: self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            auth_method: self.auth_method.unwrap_or_default(),
            typing_speed_ms: self.typing_speed_ms.unwrap_or(DEFAULT_TYPING_SPEED_MS),
            log_level: self.log_level.unwrap_or_default(),
        })
    }
}
