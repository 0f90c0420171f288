// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the FitCoach
//! server. It defines standard error codes, HTTP status mapping, and the JSON
//! response envelope used by every route so that failures look the same no
//! matter which layer produced them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Model resolution & provider access
    #[serde(rename = "MODEL_NOT_SUPPORTED")]
    ModelNotSupported,
    #[serde(rename = "API_KEY_MISSING")]
    ApiKeyMissing,
    #[serde(rename = "NO_RESPONSE")]
    NoResponse,
    #[serde(rename = "MODEL_ERROR")]
    ModelError,

    // Pipeline stages
    #[serde(rename = "INTENT_ERROR")]
    IntentError,
    #[serde(rename = "WORKOUT_GENERATION_ERROR")]
    WorkoutGenerationError,
    #[serde(rename = "MODELS_ERROR")]
    ModelsError,

    // Validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,

    // Configuration & internal
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::ModelNotSupported | Self::InvalidInput => 400,

            // 502 Bad Gateway - upstream model misbehaved
            Self::NoResponse | Self::ModelError | Self::IntentError | Self::WorkoutGenerationError => 502,

            // 503 Service Unavailable - provider not usable without a key
            Self::ApiKeyMissing => 503,

            // 500 Internal Server Error
            Self::ModelsError | Self::ConfigError | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ModelNotSupported => "The requested model is not supported",
            Self::ApiKeyMissing => "No API key is configured for the requested model",
            Self::NoResponse => "The model returned an empty response",
            Self::ModelError => "The model provider encountered an error",
            Self::IntentError => "Intent detection failed",
            Self::WorkoutGenerationError => "Workout generation failed",
            Self::ModelsError => "Failed to list available models",
            Self::InvalidInput => "The provided input is invalid",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional structured detail for the response body
    pub details: Option<serde_json::Value>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Add structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: error.message,
            code: Some(error.code),
            details: error.details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Unknown model name in a chat request
    pub fn model_not_supported(model: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ModelNotSupported,
            format!("Model {} is not supported", model.into()),
        )
    }

    /// The model is known but its provider key is absent from the environment
    pub fn api_key_missing(model: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ApiKeyMissing,
            format!("No API key configured for model {}", model.into()),
        )
    }

    /// Provider answered without a usable choice
    pub fn no_response(model: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NoResponse,
            format!("Model {} returned no response", model.into()),
        )
    }

    /// Transport or provider-side failure
    pub fn model_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelError, message)
    }

    /// Intent detection pipeline failure
    pub fn intent_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IntentError, message)
    }

    /// Workout generation pipeline failure
    pub fn workout_generation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::WorkoutGenerationError, message)
    }

    /// Model listing failure
    pub fn models_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelsError, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Request body validation failure with per-field details
    pub fn validation(issues: Vec<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, "Validation failed")
            .with_details(serde_json::json!(issues))
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

/// Conversion from anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => Self::new(ErrorCode::InternalError, error.to_string()).with_details(
                serde_json::json!({
                    "source": source.to_string()
                }),
            ),
            None => Self::new(ErrorCode::InternalError, error.to_string()),
        }
    }
}
