// ABOUTME: OpenAI-compatible gateway implementation covering Groq, DeepSeek, and Gemini
// ABOUTME: Resolves display names through the registry and speaks the chat completions dialect
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! # `OpenAI`-Compatible Gateway
//!
//! Every provider in the catalog exposes an `OpenAI` chat completions
//! endpoint, so a single implementation serves them all. The registry decides
//! which base URL and API key a display name routes to; this type owns the
//! HTTP mechanics and the mapping of provider failures onto the error
//! taxonomy.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use super::{
    AvailableModels, ChatMessage, GatewayOptions, GatewayResponse, ModelEntry, ModelGateway,
    ModelRegistry, TokenUsage, Tool, ToolCall, ToolCallFunction, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
use crate::errors::{AppError, AppResult};

/// Connection timeout for provider endpoints
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Request timeout covering slow completions
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

/// Tool call in response
#[derive(Debug, Clone, Deserialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: OpenAiFunctionCall,
}

/// Function call details in response
#[derive(Debug, Clone, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Gateway Implementation
// ============================================================================

/// Gateway for `OpenAI`-compatible chat completion endpoints
pub struct OpenAiCompatibleGateway {
    client: Client,
    registry: Arc<ModelRegistry>,
}

impl OpenAiCompatibleGateway {
    /// Create a new gateway over the given registry
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(registry: Arc<ModelRegistry>) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, registry })
    }

    /// Resolve a display name to a usable catalog entry
    fn resolve<'a>(&'a self, requested: Option<&'a str>) -> AppResult<(&'a ModelEntry, &'a str)> {
        let display_name = requested.unwrap_or_else(|| self.registry.default_model());
        let entry = self
            .registry
            .get(display_name)
            .ok_or_else(|| AppError::model_not_supported(display_name))?;

        if entry.api_key.is_none() {
            return Err(AppError::api_key_missing(display_name));
        }

        Ok((entry, display_name))
    }

    /// Build the API URL for a given endpoint
    fn api_url(base_url: &str, endpoint: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
    }

    /// Convert internal messages to `OpenAI` format
    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        messages.iter().map(OpenAiMessage::from).collect()
    }

    /// Convert provider tool calls to the internal representation
    ///
    /// Arguments stay as the raw JSON string; the tool orchestrator parses
    /// them and reports malformed payloads per call.
    fn convert_tool_calls(tool_calls: Vec<OpenAiToolCall>) -> Vec<ToolCall> {
        tool_calls
            .into_iter()
            .map(|call| {
                debug!(
                    tool_call_id = %call.id,
                    function_name = %call.function.name,
                    "model requested tool call"
                );
                ToolCall {
                    id: call.id,
                    call_type: call.call_type,
                    function: ToolCallFunction {
                        name: call.function.name,
                        arguments: call.function.arguments,
                    },
                }
            })
            .collect()
    }

    /// Parse an error response body from the provider
    fn parse_error_response(
        provider: &str,
        status: reqwest::StatusCode,
        body: &str,
    ) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 => AppError::model_error(format!(
                    "{provider} rejected the API key: {}",
                    error_response.error.message
                )),
                429 => AppError::model_error(format!(
                    "{provider} rate limit reached: {}",
                    error_response.error.message
                )),
                _ => AppError::model_error(format!(
                    "{provider} error ({status}): {error_type} - {}",
                    error_response.error.message
                )),
            }
        } else {
            AppError::model_error(format!(
                "{provider} error ({status}): {}",
                body.chars().take(200).collect::<String>()
            ))
        }
    }

    /// Log message details for debugging model interactions
    fn log_messages_debug(messages: &[OpenAiMessage], provider: &str, has_tools: bool) {
        for (i, msg) in messages.iter().enumerate() {
            debug!(
                "Message[{i}] role={}, content_len={}",
                msg.role,
                msg.content.len()
            );
        }
        debug!(
            "Sending chat completion request to {provider} with {} messages, tools={has_tools}",
            messages.len()
        );
    }
}

#[async_trait]
impl ModelGateway for OpenAiCompatibleGateway {
    #[instrument(skip(self, messages, options), fields(model = options.model.as_deref().unwrap_or("default")))]
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &GatewayOptions,
    ) -> AppResult<GatewayResponse> {
        let (entry, display_name) = self.resolve(options.model.as_deref())?;
        let provider = entry.spec.provider.as_str();

        let converted_messages = Self::convert_messages(messages);
        Self::log_messages_debug(&converted_messages, provider, options.tools.is_some());

        let request = OpenAiRequest {
            model: entry.spec.model_id.to_owned(),
            messages: converted_messages,
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            stream: false,
            tools: options.tools.clone(),
            tool_choice: options
                .tools
                .as_ref()
                .map(|_| options.tool_choice.unwrap_or(super::ToolChoice::Auto))
                .map(|choice| choice.as_str().to_owned()),
        };

        // api_key presence checked in resolve()
        let api_key = entry.api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .post(Self::api_url(entry.spec.base_url, "chat/completions"))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {provider}: {e}");
                AppError::model_error(format!("Failed to reach {provider}: {e}")).with_source(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read {provider} response: {e}");
            AppError::model_error(format!("Failed to read {provider} response: {e}"))
                .with_source(e)
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(provider, status, &body));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse {provider} response: {e} - body: {}",
                body.chars().take(500).collect::<String>()
            );
            AppError::model_error(format!("Failed to parse {provider} response: {e}"))
        })?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(AppError::no_response(display_name));
        };

        let tool_calls = choice.message.tool_calls.map(|calls| {
            info!("{provider} returned {} tool calls", calls.len());
            Self::convert_tool_calls(calls)
        });

        debug!(
            content_len = choice.message.content.as_ref().map_or(0, String::len),
            finish_reason = ?choice.finish_reason,
            "received completion from {provider}"
        );

        Ok(GatewayResponse {
            content: choice.message.content.unwrap_or_default(),
            model: entry.spec.model_id.to_owned(),
            tool_calls,
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
        })
    }

    fn available_models(&self) -> AppResult<AvailableModels> {
        let listing = self.registry.available_models();
        if listing.models.is_empty() {
            return Err(AppError::models_error("model catalog is empty"));
        }
        Ok(listing)
    }
}
