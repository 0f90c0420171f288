// ABOUTME: Intent classification pass over user messages and recent history
// ABOUTME: Runs the fast classifier model and fails closed on any failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! # Intent Classification
//!
//! First stage of every chat turn. A fast model classifies the user message
//! (with up to three trailing history messages for context) into a workout
//! intent plus a guardrail verdict, and extracts workout parameters.
//!
//! The classifier fails closed: if the model call or the reply parse fails,
//! the result is a guardrail-violating default intent rather than an error,
//! so unclassifiable input gets the polite refusal instead of a 5xx.

pub mod parser;

pub use parser::parse_intent_response;

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::constants::models::INTENT_MODEL;
use crate::errors::AppResult;
use crate::llm::{prompts, ChatMessage, GatewayOptions, ModelGateway};
use crate::models::{ExtractedParams, Guardrail, IntentDetection, IntentType, WorkoutIntent};

/// Sampling temperature for classification, kept low for determinism
const INTENT_TEMPERATURE: f32 = 0.1;

/// Token budget for the classification reply
const INTENT_MAX_TOKENS: u32 = 500;

/// Trailing history messages forwarded for context
const HISTORY_CONTEXT_MESSAGES: usize = 3;

/// Exercise count when no duration is known
const DEFAULT_EXERCISE_COUNT: u32 = 5;

/// Minutes of workout time budgeted per exercise
const MINUTES_PER_EXERCISE: u32 = 4;

/// Classifies user messages into workout intents
pub struct IntentClassifier {
    gateway: Arc<dyn ModelGateway>,
}

impl IntentClassifier {
    /// Create a classifier over the given gateway
    #[must_use]
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Classify a message, returning the fail-closed default on any failure
    #[instrument(skip(self, message, history))]
    pub async fn detect_intent(
        &self,
        message: &str,
        history: Option<&[ChatMessage]>,
    ) -> AppResult<IntentDetection> {
        let mut messages = vec![ChatMessage::system(prompts::INTENT_DETECTION_PROMPT)];
        if let Some(history) = history {
            let skip = history.len().saturating_sub(HISTORY_CONTEXT_MESSAGES);
            messages.extend(history[skip..].iter().cloned());
        }
        messages.push(ChatMessage::user(message));

        let options = GatewayOptions::new()
            .with_model(INTENT_MODEL)
            .with_temperature(INTENT_TEMPERATURE)
            .with_max_tokens(INTENT_MAX_TOKENS);

        let detection = match self.gateway.chat(&messages, &options).await {
            Ok(response) => match parser::parse_intent_response(&response.content) {
                Ok(detection) => detection,
                Err(e) => {
                    warn!(error = %e, "intent reply did not parse, falling back to default intent");
                    Self::default_intent()
                }
            },
            Err(e) => {
                warn!(error = %e, "intent model call failed, falling back to default intent");
                Self::default_intent()
            }
        };

        let detection = Self::apply_exercise_count(detection);
        debug!(
            intent = ?detection.intent.intent_type,
            should_call_tools = detection.should_call_tools,
            guardrail_violation = detection.guardrail.violation,
            "intent detection completed"
        );
        Ok(detection)
    }

    /// Derive `numExercises` from duration at four minutes per exercise
    ///
    /// A known duration always wins over whatever the classifier guessed;
    /// without one, an absent count defaults to five. Params are
    /// materialized when the classifier returned none, so the default
    /// count holds on every path.
    fn apply_exercise_count(mut detection: IntentDetection) -> IntentDetection {
        let params = detection
            .intent
            .extracted_params
            .get_or_insert_with(ExtractedParams::default);
        if let Some(duration) = params.duration {
            params.num_exercises = Some(duration / MINUTES_PER_EXERCISE);
        } else if params.num_exercises.is_none() {
            params.num_exercises = Some(DEFAULT_EXERCISE_COUNT);
        }
        detection
    }

    /// Fail-closed result used when classification cannot complete
    fn default_intent() -> IntentDetection {
        IntentDetection {
            intent: WorkoutIntent {
                intent_type: IntentType::WorkoutGeneration,
                confidence: 0.5,
                extracted_params: None,
                missing_params: None,
            },
            should_call_tools: false,
            guardrail: Guardrail {
                violation: true,
                reason: "Could not parse intent, defaulting to rejection".to_owned(),
            },
        }
    }
}
