// src/config.rs
use crate::errors::{Result, SubmitError};
use crate::response::ResponseMode;

/// Path of the formatter function in current deployments.
pub const FORMATTER_PATH: &str = "/api/formatter";

/// Path used by the older script-style deployment.
pub const LEGACY_FORMATTER_PATH: &str = "/api/formatter/formatter.py";

/// Path of the health check function.
pub const HEALTHCHECK_PATH: &str = "/api/healthcheck";

pub const DEFAULT_API_BASE: &str = "http://localhost:7071";
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Which formatter path a submission is posted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Legacy,
    Custom(String),
}

impl Endpoint {
    pub fn path(&self) -> &str {
        match self {
            Endpoint::Current => FORMATTER_PATH,
            Endpoint::Legacy => LEGACY_FORMATTER_PATH,
            Endpoint::Custom(path) => path,
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = SubmitError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "" | "current" => Ok(Endpoint::Current),
            "legacy" => Ok(Endpoint::Legacy),
            path if path.starts_with('/') => Ok(Endpoint::Custom(path.to_string())),
            other => Err(SubmitError::Config(format!(
                "Endpoint must be 'current', 'legacy' or an absolute path, got '{}'",
                other
            ))),
        }
    }
}

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub endpoint: Endpoint,
    pub response_mode: ResponseMode,
    /// Size of the pieces the request body is streamed in. Controls how often
    /// upload progress is reported.
    pub chunk_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            endpoint: Endpoint::Current,
            response_mode: ResponseMode::Json,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Missing keys fall
    /// back to defaults, present but malformed keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(api_base) = lookup("FORMATTER_API_BASE") {
            let api_base = api_base.trim();
            if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
                return Err(SubmitError::Config(format!(
                    "FORMATTER_API_BASE must be an http(s) URL, got '{}'",
                    api_base
                )));
            }
            config.api_base = api_base.trim_end_matches('/').to_string();
        }

        if let Some(endpoint) = lookup("FORMATTER_ENDPOINT") {
            config.endpoint = endpoint.parse()?;
        }

        if let Some(mode) = lookup("FORMATTER_RESPONSE_MODE") {
            config.response_mode = mode.parse()?;
        }

        if let Some(chunk_size) = lookup("FORMATTER_CHUNK_SIZE") {
            config.chunk_size = chunk_size
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    SubmitError::Config(format!(
                        "FORMATTER_CHUNK_SIZE must be a positive integer, got '{}'",
                        chunk_size
                    ))
                })?;
        }

        Ok(config)
    }

    /// Full URL submissions are posted to.
    pub fn formatter_url(&self) -> String {
        format!("{}{}", self.api_base, self.endpoint.path())
    }

    pub fn healthcheck_url(&self) -> String {
        format!("{}{}", self.api_base, HEALTHCHECK_PATH)
    }
}
