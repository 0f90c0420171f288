// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Groups exercise vocabulary and model catalog constants by domain

//! Constants module
//!
//! This module organizes application constants by domain for better maintainability.
//! Exercise vocabulary lives in `exercisedb`, the chat model catalog in `models`.

/// ExerciseDB vocabulary and input mapping helpers
pub mod exercisedb;
/// Chat model catalog
pub mod models;
