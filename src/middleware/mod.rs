// ABOUTME: HTTP middleware layers shared across the route surface
// ABOUTME: Hosts CORS configuration for browser clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

/// Cross-Origin Resource Sharing setup for web client access
pub mod cors;

pub use cors::setup_cors;
