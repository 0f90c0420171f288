// ABOUTME: External API client modules (ExerciseDB)
// ABOUTME: Provides exercise catalog lookup via fuzzy search

// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 FitCoach contributors

//! External API Clients
//!
//! This module contains clients for external APIs used by the FitCoach server.

pub mod exercisedb;

// Re-export commonly used types
pub use exercisedb::{ExerciseDbClient, WorkoutSearchParams};
