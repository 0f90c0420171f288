// ABOUTME: Chat route handlers for the coaching conversation API
// ABOUTME: Provides the plain, streaming, and model listing endpoints under /chat
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! Chat routes for coaching conversations
//!
//! Three endpoints share one validation path and one orchestrator:
//! `POST /chat` returns the complete reply, `POST /chat/stream` emits the
//! same pipeline as staged SSE events terminated by `[DONE]`, and
//! `GET /chat/models` lists the selectable model catalog.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures_util::stream::Stream;
use tokio_stream::StreamExt;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::llm::AvailableModels;
use crate::models::{ChatRequest, ChatResponse, MAX_MESSAGE_LENGTH};
use crate::routes::AppState;

/// SSE terminator sent after the last pipeline event
const STREAM_DONE_MARKER: &str = "[DONE]";

/// Chat routes implementation
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes over the shared state
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/chat", post(Self::chat))
            .route("/chat/stream", post(Self::chat_stream))
            .route("/chat/models", get(Self::models))
            .with_state(state)
    }

    /// Reject empty and oversized messages before the pipeline runs
    fn validate(request: &ChatRequest) -> AppResult<()> {
        let mut issues = Vec::new();
        if request.message.trim().is_empty() {
            issues.push("message must not be empty".to_owned());
        }
        if request.message.chars().count() > MAX_MESSAGE_LENGTH {
            issues.push(format!(
                "message must not exceed {MAX_MESSAGE_LENGTH} characters"
            ));
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(issues))
        }
    }

    /// Handle `POST /chat`
    async fn chat(
        State(state): State<AppState>,
        Json(request): Json<ChatRequest>,
    ) -> Result<Json<ChatResponse>, AppError> {
        Self::validate(&request)?;
        let response = state.chat.chat(&request).await?;
        info!(
            session_id = %response.session_id,
            model = %response.model,
            "chat request completed"
        );
        Ok(Json(response))
    }

    /// Handle `POST /chat/stream`
    ///
    /// Every pipeline event goes out as one `data:` frame of JSON; the stream
    /// always closes with a literal `[DONE]` frame, including after errors.
    async fn chat_stream(
        State(state): State<AppState>,
        Json(request): Json<ChatRequest>,
    ) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
        Self::validate(&request)?;

        let events = Arc::clone(&state.chat)
            .chat_stream(request)
            .map(|event| Ok(Event::default().data(serde_json::json!(event).to_string())))
            .chain(tokio_stream::once(Ok(
                Event::default().data(STREAM_DONE_MARKER)
            )));

        Ok(Sse::new(events).keep_alive(KeepAlive::default()))
    }

    /// Handle `GET /chat/models`
    async fn models(State(state): State<AppState>) -> Result<Json<AvailableModels>, AppError> {
        Ok(Json(state.gateway.available_models()?))
    }
}
