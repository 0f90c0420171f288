// ABOUTME: Route module organization for the FitCoach HTTP endpoints
// ABOUTME: Provides route definitions by domain plus the shared application state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! Route module for the FitCoach server
//!
//! Routes are organized by domain with thin handler functions delegating to
//! the service layer. [`AppState`] carries the shared chat orchestrator and
//! model gateway into each handler.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::llm::ModelGateway;
use crate::middleware::setup_cors;
use crate::services::ChatService;

/// Chat conversation routes
pub mod chat;
/// Health check and system status routes
pub mod health;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;

/// Shared state handed to every route handler
#[derive(Clone)]
pub struct AppState {
    /// Conversation orchestrator behind `/chat` and `/chat/stream`
    pub chat: Arc<ChatService>,
    /// Gateway used directly by the model listing endpoint
    pub gateway: Arc<dyn ModelGateway>,
}

/// Assemble the full application router with tracing and CORS layers
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .merge(ChatRoutes::routes(state))
        .merge(HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors(config))
}
