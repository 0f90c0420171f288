// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, provider keys, and runtime configuration parsing
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management for production deployment

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Default HTTP port when PORT is unset
pub const DEFAULT_PORT: u16 = 3001;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for deployment-specific behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Server configuration resolved from the process environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Groq API key, if configured
    pub groq_api_key: Option<String>,
    /// DeepSeek API key, if configured
    pub deepseek_api_key: Option<String>,
    /// Gemini API key, if configured
    pub gemini_api_key: Option<String>,
    /// Display name of the default chat model
    pub default_model: String,
    /// Comma-separated CORS origin allowlist, "*" or empty for any origin
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `CONFIG_ERROR` if PORT is set but not a valid port number
    pub fn from_env() -> AppResult<Self> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("invalid PORT value {value:?}")).with_source(e))?,
            Err(_) => DEFAULT_PORT,
        };

        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT")
                .or_else(|_| env::var("NODE_ENV"))
                .unwrap_or_default(),
        );

        let config = Self {
            port,
            environment,
            groq_api_key: non_empty_env("GROQ_API_KEY"),
            deepseek_api_key: non_empty_env("DEEPSEEK_API_KEY"),
            gemini_api_key: non_empty_env("GEMINI_API_KEY"),
            default_model: env::var("DEFAULT_MODEL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| crate::constants::models::FALLBACK_DEFAULT_MODEL.to_owned()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        };

        if config.groq_api_key.is_none()
            && config.deepseek_api_key.is_none()
            && config.gemini_api_key.is_none()
        {
            warn!("no provider API keys configured, chat requests will fail until one is set");
        }

        Ok(config)
    }

    /// One-line summary for startup logging, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} environment={} default_model={:?} groq_key={} deepseek_key={} gemini_key={}",
            self.port,
            self.environment,
            self.default_model,
            key_status(self.groq_api_key.as_deref()),
            key_status(self.deepseek_api_key.as_deref()),
            key_status(self.gemini_api_key.as_deref()),
        )
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

const fn key_status(key: Option<&str>) -> &'static str {
    match key {
        Some(_) => "set",
        None => "unset",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("bogus"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default(""),
            Environment::Development
        );
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_summary_hides_secrets() {
        let config = ServerConfig {
            port: 3001,
            environment: Environment::Development,
            groq_api_key: Some("gsk_super_secret".into()),
            deepseek_api_key: None,
            gemini_api_key: None,
            default_model: "GPT OSS 120b".into(),
            cors_allowed_origins: String::new(),
        };
        let summary = config.summary();
        assert!(!summary.contains("gsk_super_secret"));
        assert!(summary.contains("groq_key=set"));
        assert!(summary.contains("deepseek_key=unset"));
    }
}
