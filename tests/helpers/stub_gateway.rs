// ABOUTME: Scripted ModelGateway stub for driving the chat pipeline in tests
// ABOUTME: Replays queued replies in order and records every call it receives

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use fitcoach_server::errors::{AppError, AppResult};
use fitcoach_server::llm::{
    AvailableModels, ChatMessage, GatewayOptions, GatewayResponse, ModelGateway, ToolCall,
    ToolCallFunction,
};

/// One recorded gateway invocation
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub options: GatewayOptions,
}

/// Gateway stub replaying a fixed script of replies
pub struct StubGateway {
    replies: Mutex<VecDeque<Result<GatewayResponse, AppError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubGateway {
    /// Create a stub that answers calls with the given replies, in order
    pub fn scripted(replies: Vec<Result<GatewayResponse, AppError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every call made so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for StubGateway {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &GatewayOptions,
    ) -> AppResult<GatewayResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            options: options.clone(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("no scripted reply left")))
    }

    fn available_models(&self) -> AppResult<AvailableModels> {
        Ok(AvailableModels {
            models: vec!["GPT OSS 120b".to_owned()],
            default_model: "GPT OSS 120b".to_owned(),
            model_info: BTreeMap::new(),
        })
    }
}

/// Plain text reply from the given model id
pub fn text_reply(content: &str, model: &str) -> GatewayResponse {
    GatewayResponse {
        content: content.to_owned(),
        model: model.to_owned(),
        tool_calls: None,
        usage: None,
    }
}

/// Reply requesting one `get_workout_exercises` call with the given arguments
pub fn tool_call_reply(call_id: &str, arguments: &str) -> GatewayResponse {
    GatewayResponse {
        content: String::new(),
        model: "openai/gpt-oss-120b".to_owned(),
        tool_calls: Some(vec![ToolCall {
            id: call_id.to_owned(),
            call_type: "function".to_owned(),
            function: ToolCallFunction {
                name: "get_workout_exercises".to_owned(),
                arguments: arguments.to_owned(),
            },
        }]),
        usage: None,
    }
}

/// Classifier reply carrying the given intent JSON verbatim
pub fn intent_reply(intent_json: &str) -> GatewayResponse {
    text_reply(intent_json, "llama-3.1-8b-instant")
}

/// Well-formed workout generation classification with a 20 minute duration
pub fn workout_intent_json() -> String {
    r#"{
        "intent": {
            "type": "workout_generation",
            "confidence": 0.95,
            "extractedParams": {
                "targetMuscles": ["chest"],
                "equipment": ["dumbbell"],
                "duration": 20,
                "numExercises": 5
            }
        },
        "shouldCallTools": true,
        "guardrail": {"violation": false, "reason": ""}
    }"#
    .to_owned()
}

/// Guardrail-violating classification for an off-topic message
pub fn guardrail_intent_json() -> String {
    r#"{
        "intent": {"type": "workout_generation", "confidence": 0.9},
        "shouldCallTools": false,
        "guardrail": {"violation": true, "reason": "Not fitness-related"}
    }"#
    .to_owned()
}

/// Clarification classification missing duration and equipment
pub fn clarification_intent_json() -> String {
    r#"{
        "intent": {
            "type": "clarification_needed",
            "confidence": 0.8,
            "missingParams": ["duration", "equipment"]
        },
        "shouldCallTools": false,
        "guardrail": {"violation": false, "reason": ""}
    }"#
    .to_owned()
}
