// ABOUTME: Configuration management module for centralized server settings and parameters
// ABOUTME: Handles environment configs, provider keys, and runtime options
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors
//! Configuration module for the FitCoach server
//!
//! This module provides centralized configuration management:
//!
//! - **Environment**: Server configuration from environment variables,
//!   including provider API keys and the default chat model

/// Environment and server configuration
pub mod environment;

pub use environment::{Environment, LogLevel, ServerConfig};
