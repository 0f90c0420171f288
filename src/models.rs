// ABOUTME: Core data models and types for the FitCoach chat API
// ABOUTME: Defines chat requests, responses, intent detection results, and exercise records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! # Data Models
//!
//! Wire-level data structures shared across the chat pipeline. Everything here
//! serializes with camelCase field names to stay compatible with existing
//! clients.
//!
//! ## Core Models
//!
//! - `ChatRequest` / `ChatResponse`: the `/chat` request and reply envelope
//! - `ExerciseRecord`: one exercise as returned by ExerciseDB, enriched with
//!   optional sets/reps/rest prescriptions
//! - `IntentDetection`: structured output of the intent classification pass
//! - `StreamEvent`: staged progress events emitted over `/chat/stream`

use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;

/// Maximum accepted chat message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Incoming chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// User message, 1 to [`MAX_MESSAGE_LENGTH`] characters
    pub message: String,
    /// Display name of the model to use, defaults to the configured model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Prior turns, oldest first, as condensed by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<ChatMessage>>,
    /// Session identifier, minted server-side when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Chat reply envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Markdown coaching text
    pub coach_talk: String,
    /// Exercise cards backing the coach talk, present for generation replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_exercises: Option<Vec<ExerciseRecord>>,
    /// Model that produced the reply, or a sentinel such as "guardrail"
    pub model: String,
    /// Session identifier echoed back or freshly minted
    pub session_id: String,
    /// Set when the coach needs more detail before generating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_clarification: Option<bool>,
    /// The clarification question shown to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification_question: Option<String>,
}

/// One exercise as returned by the ExerciseDB search API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub exercise_id: String,
    pub name: String,
    #[serde(default)]
    pub gif_url: String,
    #[serde(default)]
    pub target_muscles: Vec<String>,
    #[serde(default)]
    pub body_parts: Vec<String>,
    #[serde(default)]
    pub equipments: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Prescribed set count, filled in for workout generation replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    /// Prescribed rep range, e.g. "10-12"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    /// Prescribed rest between sets, e.g. "60-90 sec"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
}

/// Kind of request the classifier decided the user is making
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    /// User wants a complete workout plan
    WorkoutGeneration,
    /// User wants specific exercises or instructions for one
    ExerciseLookup,
    /// User already received exercises and wants alternatives
    ExerciseVariation,
    /// Fitness-related but missing critical parameters
    ClarificationNeeded,
}

/// Self-declared fitness level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Beginner,
    Intermediate,
    Advanced,
}

/// Workout parameters the classifier extracted from the conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_muscles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_parts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    /// Requested workout length in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    /// Number of exercises to include, derived from duration when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_exercises: Option<u32>,
    /// Muscles to avoid due to mentioned injuries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_muscles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_description: Option<String>,
    /// Free-text search term for exercise lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Set when the user asked for variations of earlier exercises
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_variation_request: Option<bool>,
    /// Summary of previously provided exercises for variation requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_exercise_context: Option<String>,
}

/// Classified workout intent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutIntent {
    #[serde(rename = "type")]
    pub intent_type: IntentType,
    /// Classifier confidence in [0, 1]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_params: Option<ExtractedParams>,
    /// Parameter names still needed before generation can proceed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_params: Option<Vec<String>>,
}

/// Guardrail verdict from the classifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Guardrail {
    pub violation: bool,
    #[serde(default)]
    pub reason: String,
}

/// Full result of the intent classification pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentDetection {
    pub intent: WorkoutIntent,
    pub should_call_tools: bool,
    #[serde(default)]
    pub guardrail: Guardrail,
}

/// Stage markers emitted over the `/chat/stream` SSE channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamEventType {
    IntentDetected,
    ToolsCalling,
    ToolsExecuted,
    FinalResponse,
    Error,
}

/// One staged progress event on the streaming endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub event_type: StreamEventType,
    pub data: serde_json::Value,
    pub session_id: String,
}

impl StreamEvent {
    /// Build an event for the given stage
    #[must_use]
    pub fn new(
        event_type: StreamEventType,
        data: serde_json::Value,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            data,
            session_id: session_id.into(),
        }
    }

    /// Build an error event carrying the failure message and code
    #[must_use]
    pub fn error(error: &crate::errors::AppError, session_id: impl Into<String>) -> Self {
        Self::new(
            StreamEventType::Error,
            serde_json::json!({
                "error": error.message,
                "code": error.code,
            }),
            session_id,
        )
    }
}
