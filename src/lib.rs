// ABOUTME: Main library entry point for the FitCoach chat backend
// ABOUTME: Provides the intent-gated, tool-augmented workout coaching API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

#![deny(unsafe_code)]

//! # FitCoach Server
//!
//! An AI fitness coaching backend. Each chat turn runs a fixed pipeline:
//! a fast model classifies the message into a workout intent with a guardrail
//! verdict, off-topic or underspecified requests get canned replies, and
//! everything else flows through tool-augmented generation where the model
//! may fetch real exercises from ExerciseDB before composing its answer.
//!
//! ## Features
//!
//! - **Multi-provider models**: Groq, DeepSeek, and Gemini behind one
//!   OpenAI-compatible gateway, selected by display name
//! - **Intent gating**: guardrail and clarification checks before any
//!   expensive generation call
//! - **Tool calling**: `get_workout_exercises` backed by the ExerciseDB
//!   fuzzy search API
//! - **Streaming**: the same pipeline over SSE with staged progress events
//!
//! ## Quick Start
//!
//! Set at least one provider key (`GROQ_API_KEY`, `DEEPSEEK_API_KEY`,
//! `GEMINI_API_KEY`) and start the `fitcoach-server` binary; the API listens
//! on `PORT` (default 3001).
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fitcoach_server::config::ServerConfig;
//! use fitcoach_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("FitCoach server configured for port {}", config.port);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the server binary (src/bin/) and integration
// tests (tests/). They must remain `pub` so external consumers can access
// them.

/// Configuration management from the process environment
pub mod config;

/// Application constants: model catalog and ExerciseDB vocabulary
pub mod constants;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// External API clients (ExerciseDB)
pub mod external;

/// Intent classification pass over user messages
pub mod intent;

/// LLM gateway abstraction over OpenAI-compatible providers
pub mod llm;

/// Structured logging initialization
pub mod logging;

/// HTTP middleware layers
pub mod middleware;

/// Wire-level data models for the chat API
pub mod models;

/// HTTP route definitions by domain
pub mod routes;

/// Domain service layer
pub mod services;

/// Tool declarations and orchestration for model-requested calls
pub mod tools;
