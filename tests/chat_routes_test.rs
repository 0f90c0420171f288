// ABOUTME: Integration tests for the HTTP route surface
// ABOUTME: Exercises validation, error envelopes, SSE framing, models, and health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod helpers;

use std::sync::Arc;

use axum::Router;
use fitcoach_server::config::{Environment, ServerConfig};
use fitcoach_server::errors::AppError;
use fitcoach_server::external::ExerciseDbClient;
use fitcoach_server::llm::{ModelGateway, ModelRegistry, OpenAiCompatibleGateway};
use fitcoach_server::routes::{self, AppState};
use fitcoach_server::services::ChatService;
use fitcoach_server::tools::ToolOrchestrator;
use helpers::axum_test::AxumTestRequest;
use helpers::stub_gateway::{guardrail_intent_json, intent_reply, StubGateway};
use serde_json::{json, Value};

fn test_config() -> ServerConfig {
    ServerConfig {
        port: 0,
        environment: Environment::Testing,
        groq_api_key: Some("gsk_test_key".to_owned()),
        deepseek_api_key: None,
        gemini_api_key: None,
        default_model: "GPT OSS 120b".to_owned(),
        cors_allowed_origins: String::new(),
    }
}

/// Router over a scripted gateway stub
fn app(gateway: Arc<dyn ModelGateway>) -> Router {
    let exercises = ExerciseDbClient::with_base_url("http://127.0.0.1:1").unwrap();
    let chat = Arc::new(ChatService::new(
        Arc::clone(&gateway),
        ToolOrchestrator::new(exercises),
    ));
    routes::router(AppState { chat, gateway }, &test_config())
}

/// Router over the real gateway, for the catalog endpoint
fn app_with_real_gateway() -> Router {
    let config = test_config();
    let registry = Arc::new(ModelRegistry::from_config(&config));
    let gateway: Arc<dyn ModelGateway> =
        Arc::new(OpenAiCompatibleGateway::new(registry).unwrap());
    app(gateway)
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let app = app(Arc::new(StubGateway::scripted(vec![])));

    let response = AxumTestRequest::post("/chat")
        .json(&json!({"message": "   "}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["details"][0], "message must not be empty");
}

#[tokio::test]
async fn test_chat_rejects_oversized_message() {
    let app = app(Arc::new(StubGateway::scripted(vec![])));

    let response = AxumTestRequest::post("/chat")
        .json(&json!({"message": "x".repeat(2001)}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_chat_returns_reply_envelope() {
    let app = app(Arc::new(StubGateway::scripted(vec![Ok(intent_reply(
        &guardrail_intent_json(),
    ))])));

    let response = AxumTestRequest::post("/chat")
        .json(&json!({"message": "write me a poem", "sessionId": "session_1_a"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["model"], "guardrail");
    assert_eq!(body["sessionId"], "session_1_a");
    assert!(body["coachTalk"]
        .as_str()
        .unwrap()
        .contains("fitness coach AI"));
}

#[tokio::test]
async fn test_chat_generation_failure_maps_to_gateway_error() {
    // provider key missing mid-generation surfaces as a 502 model error
    let app = app(Arc::new(StubGateway::scripted(vec![
        Ok(intent_reply(&helpers::stub_gateway::workout_intent_json())),
        Err(AppError::api_key_missing("Gemini 2.0 Flash")),
    ])));

    let response = AxumTestRequest::post("/chat")
        .json(&json!({"message": "20 min chest workout"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 502);
    let body: Value = response.json();
    assert_eq!(body["code"], "MODEL_ERROR");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Workout generation failed:"));
}

#[tokio::test]
async fn test_models_lists_dropdown_catalog() {
    let app = app_with_real_gateway();

    let response = AxumTestRequest::get("/chat/models").send(app).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    let models: Vec<&str> = body["models"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m.as_str().unwrap())
        .collect();

    assert!(models.contains(&"GPT OSS 120b"));
    assert!(models.contains(&"DeepSeek Chat"));
    assert!(models.contains(&"Gemini 2.0 Flash"));
    // the guardrail model stays out of the picker
    assert!(!models.contains(&"Llama Guard 4"));
    assert_eq!(body["defaultModel"], "GPT OSS 120b");
    assert!(body["modelInfo"]["GPT OSS 120b"].is_string());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app(Arc::new(StubGateway::scripted(vec![])));

    let response = AxumTestRequest::get("/api/health").send(app).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_stream_frames_end_with_done_marker() {
    let app = app(Arc::new(StubGateway::scripted(vec![Ok(intent_reply(
        &guardrail_intent_json(),
    ))])));

    let response = AxumTestRequest::post("/chat/stream")
        .json(&json!({"message": "write me a poem", "sessionId": "session_1_a"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    assert!(response
        .content_type()
        .unwrap()
        .starts_with("text/event-stream"));

    let body = response.text();
    let frames: Vec<&str> = body
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .collect();

    assert_eq!(*frames.last().unwrap(), "[DONE]");

    let events: Vec<Value> = frames[..frames.len() - 1]
        .iter()
        .map(|frame| serde_json::from_str(frame).unwrap())
        .collect();
    assert_eq!(events[0]["type"], "intent_detected");
    let last = events.last().unwrap();
    assert_eq!(last["type"], "final_response");
    assert_eq!(last["data"]["model"], "guardrail");
    assert_eq!(last["sessionId"], "session_1_a");
}

#[tokio::test]
async fn test_stream_validation_fails_before_streaming() {
    let app = app(Arc::new(StubGateway::scripted(vec![])));

    let response = AxumTestRequest::post("/chat/stream")
        .json(&json!({"message": ""}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}
