// ABOUTME: Tool declarations and orchestration for model-requested function calls
// ABOUTME: Executes get_workout_exercises calls and reports per-call outcomes inline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! # Tool Orchestration
//!
//! The generation pass hands the model one callable tool,
//! `get_workout_exercises`. When the model requests calls, the orchestrator
//! executes them in order and returns one outcome per call. A failing call
//! never fails the batch: malformed arguments or unknown tool names become
//! inline `{"error": ...}` results the model can read in the second pass.

use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::external::{ExerciseDbClient, WorkoutSearchParams};
use crate::llm::{Tool, ToolCall};

/// Name of the exercise retrieval tool
pub const GET_WORKOUT_EXERCISES: &str = "get_workout_exercises";

/// Result of executing one tool call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutcome {
    /// Provider-assigned identifier of the originating call
    pub tool_call_id: String,
    /// Exercise array on success, `{"error": ...}` object on failure
    pub result: serde_json::Value,
}

/// Executes tool calls requested by the model
pub struct ToolOrchestrator {
    exercises: ExerciseDbClient,
}

impl ToolOrchestrator {
    /// Create an orchestrator over the given ExerciseDB client
    #[must_use]
    pub const fn new(exercises: ExerciseDbClient) -> Self {
        Self { exercises }
    }

    /// Declarations of every tool the model may call
    #[must_use]
    pub fn available_tools() -> Vec<Tool> {
        vec![Tool::function(
            GET_WORKOUT_EXERCISES,
            "Get filtered exercises for a workout plan using ExerciseDB filter endpoint",
            json!({
                "type": "object",
                "properties": {
                    "targetMuscles": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Array of target muscle groups (e.g., ['chest', 'biceps', 'triceps'])"
                    },
                    "bodyParts": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Array of body parts (e.g., ['upper arms', 'chest', 'back'])"
                    },
                    "equipment": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Array of available equipment (e.g., ['dumbbell', 'barbell', 'body weight'])"
                    },
                    "search": {
                        "type": "string",
                        "description": "Optional search term (e.g., 'chest workout', 'beginner routine')"
                    },
                    "numExercises": {
                        "type": "integer",
                        "description": "Number of exercises to return (default: 8)"
                    },
                    "isVariationRequest": {
                        "type": "boolean",
                        "description": "Whether this is a request for exercise variations"
                    },
                    "previousExerciseContext": {
                        "type": "string",
                        "description": "Context about previously provided exercises for variation requests"
                    }
                },
                "required": []
            }),
        )]
    }

    /// Execute the given tool calls in order, one outcome per call
    pub async fn process_tool_calls(&self, tool_calls: &[ToolCall]) -> Vec<ToolOutcome> {
        let mut outcomes = Vec::with_capacity(tool_calls.len());

        for call in tool_calls {
            debug!(
                tool = %call.function.name,
                args = %call.function.arguments,
                "processing tool call"
            );

            let result = match call.function.name.as_str() {
                GET_WORKOUT_EXERCISES => self.run_workout_search(&call.function.arguments).await,
                unknown => {
                    warn!(tool = %unknown, "model requested unknown tool");
                    json!({"error": format!("Unknown tool: {unknown}")})
                }
            };

            outcomes.push(ToolOutcome {
                tool_call_id: call.id.clone(),
                result,
            });
        }

        outcomes
    }

    async fn run_workout_search(&self, raw_arguments: &str) -> serde_json::Value {
        match serde_json::from_str::<WorkoutSearchParams>(raw_arguments) {
            Ok(params) => json!(self.exercises.get_workout_exercises(&params).await),
            Err(e) => {
                warn!(error = %e, "tool call arguments did not parse");
                json!({"error": format!("Failed to execute tool: {e}")})
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolCallFunction;

    fn call(name: &str, arguments: &str, id: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            call_type: "function".into(),
            function: ToolCallFunction {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    fn orchestrator() -> ToolOrchestrator {
        ToolOrchestrator::new(ExerciseDbClient::with_base_url("http://127.0.0.1:1").unwrap())
    }

    #[test]
    fn test_tool_declaration() {
        let tools = ToolOrchestrator::available_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].function.name, GET_WORKOUT_EXERCISES);
        let schema = &tools[0].function.parameters;
        assert!(schema["properties"]["targetMuscles"].is_object());
        assert!(schema["properties"]["isVariationRequest"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_tool_reports_inline_error() {
        let outcomes = orchestrator()
            .process_tool_calls(&[call("get_meal_plan", "{}", "call_1")])
            .await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].tool_call_id, "call_1");
        assert_eq!(
            outcomes[0].result["error"],
            "Unknown tool: get_meal_plan"
        );
    }

    #[tokio::test]
    async fn test_malformed_arguments_report_inline_error() {
        let outcomes = orchestrator()
            .process_tool_calls(&[call(GET_WORKOUT_EXERCISES, "{not json", "call_2")])
            .await;
        assert!(outcomes[0].result["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to execute tool:"));
    }

    #[tokio::test]
    async fn test_outcomes_preserve_call_order() {
        let outcomes = orchestrator()
            .process_tool_calls(&[
                call("first_unknown", "{}", "call_a"),
                call("second_unknown", "{}", "call_b"),
            ])
            .await;
        assert_eq!(outcomes[0].tool_call_id, "call_a");
        assert_eq!(outcomes[1].tool_call_id, "call_b");
    }

    #[tokio::test]
    async fn test_unreachable_search_yields_empty_array() {
        // ExerciseDB failures degrade to an empty exercise list, not an error
        let outcomes = orchestrator()
            .process_tool_calls(&[call(GET_WORKOUT_EXERCISES, "{}", "call_3")])
            .await;
        assert_eq!(outcomes[0].result, serde_json::json!([]));
    }
}
