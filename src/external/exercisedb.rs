// ABOUTME: ExerciseDB API client for exercise catalog retrieval
// ABOUTME: Implements fuzzy search with vocabulary normalization and variation enrichment

// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 FitCoach contributors

//! ExerciseDB API Client
//!
//! Client for the ExerciseDB fuzzy search endpoint. Filter lists coming from
//! the model are normalized against the known vocabulary before they become
//! search terms, and variation requests get extra search terms derived from
//! the previous exercise context.
//!
//! Lookup failures never abort a chat turn: the workout search swallows
//! errors and returns an empty list, so the coach reply degrades to text-only.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::constants::exercisedb::{
    validate_and_map_body_parts, validate_and_map_equipment, validate_and_map_muscles,
    EXERCISEDB_BASE_URL, MAX_SEARCH_LIMIT, SEARCH_THRESHOLD,
};
use crate::errors::{AppError, AppResult};
use crate::models::ExerciseRecord;

/// Default exercise count when the tool call does not specify one
pub const DEFAULT_NUM_EXERCISES: u32 = 8;

/// Connection timeout for the ExerciseDB endpoint
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Request timeout for search calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Arguments of a `get_workout_exercises` tool call
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutSearchParams {
    pub target_muscles: Option<Vec<String>>,
    pub body_parts: Option<Vec<String>>,
    pub equipment: Option<Vec<String>>,
    pub num_exercises: Option<u32>,
    pub search: Option<String>,
    pub is_variation_request: Option<bool>,
    pub previous_exercise_context: Option<String>,
}

/// Search response envelope from the API
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<ExerciseRecord>,
}

/// Client for the ExerciseDB search API
pub struct ExerciseDbClient {
    client: Client,
    base_url: String,
}

impl ExerciseDbClient {
    /// Create a client against the production endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> AppResult<Self> {
        Self::with_base_url(EXERCISEDB_BASE_URL)
    }

    /// Create a client against a custom endpoint, used by tests
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(base_url: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch exercises for a workout, returning an empty list on any failure
    #[instrument(skip(self, params))]
    pub async fn get_workout_exercises(&self, params: &WorkoutSearchParams) -> Vec<ExerciseRecord> {
        let query = Self::build_search_query(params);
        let limit = params.num_exercises.unwrap_or(DEFAULT_NUM_EXERCISES);

        match self.fuzzy_search(&query, limit).await {
            Ok(mut exercises) => {
                exercises.truncate(limit as usize);
                debug!(
                    query = %query,
                    count = exercises.len(),
                    "exercise search completed"
                );
                exercises
            }
            Err(e) => {
                warn!(query = %query, error = %e, "exercise search failed, returning no exercises");
                Vec::new()
            }
        }
    }

    /// Assemble the fuzzy search query from normalized filter terms
    fn build_search_query(params: &WorkoutSearchParams) -> String {
        let mut terms: Vec<String> = Vec::new();

        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            terms.push(search.trim().to_owned());
        }

        if params.is_variation_request.unwrap_or(false) {
            terms.extend(["variation", "alternative", "different"].map(str::to_owned));

            if let Some(context) = &params.previous_exercise_context {
                let previous = context.to_lowercase();
                if previous.contains("chest") {
                    terms.extend(["upper body", "shoulders", "triceps"].map(str::to_owned));
                }
                if previous.contains("legs") {
                    terms.extend(["lower body", "glutes", "calves"].map(str::to_owned));
                }
            }
        }

        if let Some(muscles) = &params.target_muscles {
            let valid = validate_and_map_muscles(muscles);
            if valid.len() < muscles.len() {
                debug!(input = ?muscles, kept = ?valid, "dropped unrecognized muscle terms");
            }
            terms.extend(valid);
        }

        if let Some(body_parts) = &params.body_parts {
            let valid = validate_and_map_body_parts(body_parts);
            if valid.len() < body_parts.len() {
                debug!(input = ?body_parts, kept = ?valid, "dropped unrecognized body part terms");
            }
            terms.extend(valid);
        }

        if let Some(equipment) = &params.equipment {
            let valid = validate_and_map_equipment(equipment);
            if valid.len() < equipment.len() {
                debug!(input = ?equipment, kept = ?valid, "dropped unrecognized equipment terms");
            }
            terms.extend(valid);
        }

        terms.join(" ")
    }

    /// Run one fuzzy search request
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// unparseable body.
    async fn fuzzy_search(&self, query: &str, limit: u32) -> AppResult<Vec<ExerciseRecord>> {
        let limit = limit.min(MAX_SEARCH_LIMIT);
        let url = format!("{}/exercises/search", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("offset", "0".to_owned()),
                ("limit", limit.to_string()),
                ("q", query.to_owned()),
                ("threshold", SEARCH_THRESHOLD.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::internal(format!("ExerciseDB request failed: {e}")).with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::internal(format!(
                "ExerciseDB returned status {status}"
            )));
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| {
            AppError::internal(format!("Failed to parse ExerciseDB response: {e}")).with_source(e)
        })?;

        Ok(parsed.data)
    }
}
