// ABOUTME: Conversation orchestrator driving intent gate, generation, and streaming
// ABOUTME: Stateless per request; shared by the /chat and /chat/stream handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! # Chat Orchestration
//!
//! One request runs one sequential pipeline: classify the message, gate on
//! the guardrail and clarification outcomes, then run the two-pass
//! generation protocol (tool-enabled call, tool execution, final composition
//! call). No state survives a request; everything flows from the incoming
//! `ChatRequest` and the fresh intent.
//!
//! Failure policy: classifier failures fail closed into guardrail or
//! fallback replies, while failures during generation surface as typed
//! errors — "we understood you and our backend failed" is distinct from
//! "we deliberately decline."

use std::sync::Arc;

use async_stream::stream;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use serde_json::json;
use tokio_stream::Stream;
use tracing::{error, info, instrument};

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::intent::IntentClassifier;
use crate::llm::{
    prompts, ChatMessage, GatewayOptions, GatewayResponse, ModelGateway, ToolChoice,
};
use crate::models::{
    ChatRequest, ChatResponse, ExerciseRecord, IntentDetection, IntentType, StreamEvent,
    StreamEventType,
};
use crate::tools::{ToolOrchestrator, ToolOutcome};

/// Temperature for the tool-enabled generation pass
const GENERATION_TEMPERATURE: f32 = 0.7;

/// Token budget for the tool-enabled generation pass
const GENERATION_MAX_TOKENS: u32 = 1000;

/// Temperature for the final composition pass
const FINAL_TEMPERATURE: f32 = 0.5;

/// Token budget for the final composition pass
const FINAL_MAX_TOKENS: u32 = 800;

/// Sentinel model names for non-generated replies
const GUARDRAIL_MODEL: &str = "guardrail";
const CLARIFICATION_MODEL: &str = "clarification";
const FALLBACK_MODEL: &str = "fallback";

/// Length of the random session id suffix
const SESSION_SUFFIX_LEN: usize = 7;

/// Default prescriptions merged into workout generation exercise cards
const DEFAULT_SETS: u32 = 3;
const DEFAULT_REPS: &str = "10-12";
const DEFAULT_REST: &str = "60-90 sec";

/// Orchestrates one chat turn end to end
pub struct ChatService {
    gateway: Arc<dyn ModelGateway>,
    classifier: IntentClassifier,
    tools: ToolOrchestrator,
}

impl ChatService {
    /// Create the orchestrator over a gateway and tool executor
    #[must_use]
    pub fn new(gateway: Arc<dyn ModelGateway>, tools: ToolOrchestrator) -> Self {
        let classifier = IntentClassifier::new(Arc::clone(&gateway));
        Self {
            gateway,
            classifier,
            tools,
        }
    }

    /// Run one chat turn
    ///
    /// # Errors
    ///
    /// Returns typed failures only for the generation phase; guardrail,
    /// clarification, and classifier breakdowns all produce `Ok` replies.
    #[instrument(skip(self, request), fields(session_id))]
    pub async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let session_id = Self::resolve_session_id(request);
        tracing::Span::current().record("session_id", session_id.as_str());

        let detection = match self
            .classifier
            .detect_intent(&request.message, request.conversation_history.as_deref())
            .await
        {
            Ok(detection) => detection,
            Err(e) => {
                error!(error = %e, "intent stage failed, producing fallback reply");
                return Ok(Self::fallback_response(session_id));
            }
        };

        if detection.guardrail.violation {
            info!(reason = %detection.guardrail.reason, "guardrail rejected request");
            return Ok(Self::guardrail_response(session_id));
        }

        if detection.intent.intent_type == IntentType::ClarificationNeeded {
            return Ok(Self::clarification_response(session_id, &detection));
        }

        self.generate(request, session_id, &detection).await
    }

    /// Run one chat turn, emitting staged progress events
    ///
    /// Ends with either a `final_response` or an `error` event; the SSE
    /// terminator is appended by the route layer.
    pub fn chat_stream(
        self: Arc<Self>,
        request: ChatRequest,
    ) -> impl Stream<Item = StreamEvent> + Send {
        stream! {
            let session_id = Self::resolve_session_id(&request);

            let detection = match self
                .classifier
                .detect_intent(&request.message, request.conversation_history.as_deref())
                .await
            {
                Ok(detection) => detection,
                Err(e) => {
                    error!(error = %e, "intent stage failed, streaming fallback reply");
                    let response = Self::fallback_response(session_id.clone());
                    yield StreamEvent::new(StreamEventType::FinalResponse, json!(response), session_id);
                    return;
                }
            };

            yield StreamEvent::new(
                StreamEventType::IntentDetected,
                json!(detection),
                session_id.clone(),
            );

            if detection.guardrail.violation {
                let response = Self::guardrail_response(session_id.clone());
                yield StreamEvent::new(StreamEventType::FinalResponse, json!(response), session_id);
                return;
            }

            if detection.intent.intent_type == IntentType::ClarificationNeeded {
                let response = Self::clarification_response(session_id.clone(), &detection);
                yield StreamEvent::new(StreamEventType::FinalResponse, json!(response), session_id);
                return;
            }

            let (messages, first) = match self.first_pass(&request, &detection).await {
                Ok(result) => result,
                Err(e) => {
                    yield StreamEvent::error(&e, session_id);
                    return;
                }
            };

            let Some(calls) = first.requested_tool_calls().map(<[_]>::to_vec) else {
                let response = Self::direct_response(first, session_id.clone());
                yield StreamEvent::new(StreamEventType::FinalResponse, json!(response), session_id);
                return;
            };

            let tool_names: Vec<&str> = calls.iter().map(|c| c.function.name.as_str()).collect();
            yield StreamEvent::new(
                StreamEventType::ToolsCalling,
                json!({"toolCalls": tool_names}),
                session_id.clone(),
            );

            let outcomes = self.tools.process_tool_calls(&calls).await;
            yield StreamEvent::new(
                StreamEventType::ToolsExecuted,
                json!({"results": outcomes.len()}),
                session_id.clone(),
            );

            match self
                .second_pass(&request, session_id.clone(), &detection, messages, &outcomes)
                .await
            {
                Ok(response) => {
                    yield StreamEvent::new(StreamEventType::FinalResponse, json!(response), session_id);
                }
                Err(e) => {
                    yield StreamEvent::error(&e, session_id);
                }
            }
        }
    }

    // ========================================================================
    // Generation sub-protocol
    // ========================================================================

    async fn generate(
        &self,
        request: &ChatRequest,
        session_id: String,
        detection: &IntentDetection,
    ) -> AppResult<ChatResponse> {
        let (messages, first) = self.first_pass(request, detection).await?;

        let Some(calls) = first.requested_tool_calls().map(<[_]>::to_vec) else {
            return Ok(Self::direct_response(first, session_id));
        };

        let outcomes = self.tools.process_tool_calls(&calls).await;
        self.second_pass(request, session_id, detection, messages, &outcomes)
            .await
    }

    /// Tool-enabled generation call over `[system, ...history, user]`
    async fn first_pass(
        &self,
        request: &ChatRequest,
        detection: &IntentDetection,
    ) -> AppResult<(Vec<ChatMessage>, GatewayResponse)> {
        let mut messages = vec![ChatMessage::system(prompts::build_structured_workout_prompt(
            &detection.intent,
        ))];
        if let Some(history) = &request.conversation_history {
            messages.extend(history.iter().cloned());
        }
        messages.push(ChatMessage::user(&request.message));

        let mut options = GatewayOptions::new()
            .with_temperature(GENERATION_TEMPERATURE)
            .with_max_tokens(GENERATION_MAX_TOKENS)
            .with_tools(ToolOrchestrator::available_tools())
            .with_tool_choice(ToolChoice::Auto);
        if let Some(model) = &request.model {
            options = options.with_model(model);
        }

        let response = self
            .gateway
            .chat(&messages, &options)
            .await
            .map_err(|e| Self::wrap_generation_error(e, ErrorCode::ModelError, "Workout generation failed"))?;

        Ok((messages, response))
    }

    /// Final composition call grounded in literal tool output
    async fn second_pass(
        &self,
        request: &ChatRequest,
        session_id: String,
        detection: &IntentDetection,
        mut messages: Vec<ChatMessage>,
        outcomes: &[ToolOutcome],
    ) -> AppResult<ChatResponse> {
        for outcome in outcomes {
            let pretty = serde_json::to_string_pretty(&outcome.result)
                .unwrap_or_else(|_| outcome.result.to_string());
            messages.push(ChatMessage::assistant(format!(
                "Here are the exercise results:\n{pretty}"
            )));
        }

        let final_messages = Self::replace_system_prompt(
            &messages,
            prompts::build_final_response_prompt(&detection.intent),
        );

        let mut options = GatewayOptions::new()
            .with_temperature(FINAL_TEMPERATURE)
            .with_max_tokens(FINAL_MAX_TOKENS);
        if let Some(model) = &request.model {
            options = options.with_model(model);
        }

        let final_response = self.gateway.chat(&final_messages, &options).await.map_err(|e| {
            Self::wrap_generation_error(
                e,
                ErrorCode::WorkoutGenerationError,
                "Final response generation failed",
            )
        })?;

        let exercises = Self::collect_exercises(outcomes, detection);
        info!(
            exercises = exercises.len(),
            model = %final_response.model,
            "chat turn completed with tool results"
        );

        Ok(ChatResponse {
            coach_talk: final_response.content,
            detailed_exercises: Some(exercises),
            model: final_response.model,
            session_id,
            requires_clarification: None,
            clarification_question: None,
        })
    }

    /// Swap the original system prompt for the final-pass prompt
    fn replace_system_prompt(messages: &[ChatMessage], system_prompt: String) -> Vec<ChatMessage> {
        let mut replaced = Vec::with_capacity(messages.len());
        replaced.push(ChatMessage::system(system_prompt));
        replaced.extend(messages.iter().skip(1).cloned());
        replaced
    }

    /// Gather exercise records across tool outcomes, cap, and fill prescriptions
    fn collect_exercises(
        outcomes: &[ToolOutcome],
        detection: &IntentDetection,
    ) -> Vec<ExerciseRecord> {
        let mut exercises: Vec<ExerciseRecord> = Vec::new();
        for outcome in outcomes {
            // error outcomes are objects, not arrays, and are skipped here
            if let Ok(batch) =
                serde_json::from_value::<Vec<ExerciseRecord>>(outcome.result.clone())
            {
                exercises.extend(batch);
            }
        }

        if let Some(cap) = detection
            .intent
            .extracted_params
            .as_ref()
            .and_then(|p| p.num_exercises)
        {
            exercises.truncate(cap as usize);
        }

        if detection.intent.intent_type == IntentType::WorkoutGeneration {
            for exercise in &mut exercises {
                exercise.sets.get_or_insert(DEFAULT_SETS);
                if exercise.reps.is_none() {
                    exercise.reps = Some(DEFAULT_REPS.to_owned());
                }
                if exercise.rest.is_none() {
                    exercise.rest = Some(DEFAULT_REST.to_owned());
                }
            }
        }

        exercises
    }

    /// Keep client-facing error codes, wrap everything else as a stage failure
    fn wrap_generation_error(e: AppError, code: ErrorCode, context: &str) -> AppError {
        if e.code == ErrorCode::ModelNotSupported {
            return e;
        }
        AppError::new(code, format!("{context}: {}", e.message))
            .with_details(json!({"cause": e.code}))
    }

    // ========================================================================
    // Canned replies and session handling
    // ========================================================================

    fn direct_response(first: GatewayResponse, session_id: String) -> ChatResponse {
        ChatResponse {
            coach_talk: first.content,
            detailed_exercises: Some(Vec::new()),
            model: first.model,
            session_id,
            requires_clarification: None,
            clarification_question: None,
        }
    }

    fn guardrail_response(session_id: String) -> ChatResponse {
        ChatResponse {
            coach_talk: prompts::GUARDRAIL_VIOLATION_MESSAGE.to_owned(),
            detailed_exercises: None,
            model: GUARDRAIL_MODEL.to_owned(),
            session_id,
            requires_clarification: None,
            clarification_question: None,
        }
    }

    fn clarification_response(session_id: String, detection: &IntentDetection) -> ChatResponse {
        let missing = detection
            .intent
            .missing_params
            .clone()
            .unwrap_or_default();
        let message = prompts::build_clarification_request(&missing);
        ChatResponse {
            coach_talk: message.clone(),
            detailed_exercises: None,
            model: CLARIFICATION_MODEL.to_owned(),
            session_id,
            requires_clarification: Some(true),
            clarification_question: Some(message),
        }
    }

    fn fallback_response(session_id: String) -> ChatResponse {
        ChatResponse {
            coach_talk: prompts::FALLBACK_RESPONSE_MESSAGE.to_owned(),
            detailed_exercises: None,
            model: FALLBACK_MODEL.to_owned(),
            session_id,
            requires_clarification: None,
            clarification_question: None,
        }
    }

    fn resolve_session_id(request: &ChatRequest) -> String {
        request
            .session_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(Self::mint_session_id)
    }

    /// Mint `session_<millis>_<7 alnum chars>`
    fn mint_session_id() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_SUFFIX_LEN)
            .map(char::from)
            .collect();
        format!(
            "session_{}_{}",
            Utc::now().timestamp_millis(),
            suffix.to_lowercase()
        )
    }
}
