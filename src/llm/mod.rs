// ABOUTME: LLM gateway abstraction layer for OpenAI-compatible chat providers
// ABOUTME: Defines the gateway contract, message types, and tool-calling structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! # Model Gateway Service Provider Interface
//!
//! This module defines the contract the chat pipeline uses to talk to LLM
//! providers. All configured providers (Groq, DeepSeek, Gemini) speak the
//! OpenAI chat completions dialect, so one gateway implementation covers them
//! all; the registry decides which base URL and key a display name routes to.
//!
//! ## Key Concepts
//!
//! - **`ModelGateway`**: Async trait for chat completion with tool calling
//! - **`ChatMessage`**: Role-based message structure for conversations
//! - **`GatewayOptions`**: Per-call configuration (model, temperature, tools)
//! - **`ModelRegistry`**: Display-name catalog with runtime API keys
//!
//! ## Example: Using the Gateway
//!
//! ```rust,no_run
//! use fitcoach_server::llm::{ModelGateway, ChatMessage, GatewayOptions};
//!
//! async fn example(gateway: &dyn ModelGateway) {
//!     let messages = vec![
//!         ChatMessage::system("You are a helpful fitness assistant."),
//!         ChatMessage::user("What's a good warm-up routine?"),
//!     ];
//!
//!     let options = GatewayOptions::new().with_temperature(0.7);
//!     let response = gateway.chat(&messages, &options).await;
//! }
//! ```

mod openai_compatible;
pub mod prompts;
mod registry;

pub use openai_compatible::OpenAiCompatibleGateway;
pub use registry::{ModelEntry, ModelRegistry};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::AppResult;

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Tool Types
// ============================================================================

/// Declaration of a callable tool, OpenAI function-calling shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Always "function"
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: ToolFunction,
}

/// Function declaration within a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolFunction {
    pub name: String,
    pub description: String,
    /// JSON schema describing the arguments object
    pub parameters: serde_json::Value,
}

impl Tool {
    /// Declare a function tool with a JSON schema for its parameters
    #[must_use]
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".to_owned(),
            function: ToolFunction {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier
    pub id: String,
    /// Always "function"
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: ToolCallFunction,
}

/// Function name and raw argument payload of a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    /// Raw JSON string as produced by the model
    pub arguments: String,
}

/// Tool selection strategy passed to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChoice {
    /// Let the model decide whether to call a tool
    Auto,
    /// Forbid tool calls
    None,
}

impl ToolChoice {
    /// Wire representation for OpenAI-compatible APIs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Default sampling temperature when none is requested
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token budget when none is requested
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Per-call configuration for a gateway chat completion
#[derive(Debug, Clone, Default)]
pub struct GatewayOptions {
    /// Display name of the model, falls back to the registry default
    pub model: Option<String>,
    /// Temperature for response randomness (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Tools the model may call
    pub tools: Option<Vec<Tool>>,
    /// Tool selection strategy, only sent when tools are present
    pub tool_choice: Option<ToolChoice>,
}

impl GatewayOptions {
    /// Create empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model display name to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Attach callable tools
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set the tool selection strategy
    #[must_use]
    pub const fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }
}

/// Response from a gateway chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// Generated message content, empty when the model only called tools
    pub content: String,
    /// Provider-side model identifier that produced the reply
    pub model: String,
    /// Tool invocations requested by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl GatewayResponse {
    /// Tool calls requested by the model, if any
    #[must_use]
    pub fn requested_tool_calls(&self) -> Option<&[ToolCall]> {
        self.tool_calls.as_deref().filter(|calls| !calls.is_empty())
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// Model listing returned by `/chat/models`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableModels {
    /// Display names clients may select, in catalog order
    pub models: Vec<String>,
    /// Display name of the configured default
    pub default_model: String,
    /// Short blurb per display name for model pickers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub model_info: BTreeMap<String, String>,
}

// ============================================================================
// Gateway Trait
// ============================================================================

/// Gateway trait for chat completion against configured model providers
///
/// The single production implementation is [`OpenAiCompatibleGateway`]; tests
/// substitute stubs to script provider behavior.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Perform a chat completion
    ///
    /// # Errors
    ///
    /// - `MODEL_NOT_SUPPORTED` if the requested display name is unknown
    /// - `API_KEY_MISSING` if the resolved provider has no key configured
    /// - `NO_RESPONSE` if the provider returned no choices
    /// - `MODEL_ERROR` for transport or provider-side failures
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &GatewayOptions,
    ) -> AppResult<GatewayResponse>;

    /// List models clients may select
    ///
    /// # Errors
    ///
    /// Returns `MODELS_ERROR` if the listing cannot be produced.
    fn available_models(&self) -> AppResult<AvailableModels>;
}
