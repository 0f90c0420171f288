// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Hosts the conversation orchestrator shared by the plain and streaming endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! Domain service layer
//!
//! Business logic lives here, independent of the HTTP surface. The chat
//! orchestrator drives the full turn pipeline and is shared by the `/chat`
//! and `/chat/stream` handlers.

/// Conversation orchestration: intent gate, tool-augmented generation, streaming
pub mod chat;

pub use chat::ChatService;
