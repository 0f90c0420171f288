// ABOUTME: Parser for model-produced intent classification replies
// ABOUTME: Extracts the JSON payload from fenced or prose-wrapped model output

//! Intent reply parsing
//!
//! Classification models rarely return bare JSON: replies arrive inside
//! markdown fences or surrounded by prose. The parser first looks for a
//! fenced block, then falls back to scanning for the first balanced JSON
//! object, and finally enforces the contract: `intent` and `shouldCallTools`
//! must both be present.

use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::{Guardrail, IntentDetection, WorkoutIntent};

/// Loosely-typed reply shape, validated after parsing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIntentReply {
    intent: Option<WorkoutIntent>,
    should_call_tools: Option<bool>,
    #[serde(default)]
    guardrail: Option<Guardrail>,
}

/// Parse a model classification reply into an [`IntentDetection`]
///
/// # Errors
///
/// Returns an `INTENT_ERROR` when no JSON object can be located, the JSON
/// does not parse, or a required field is missing.
pub fn parse_intent_response(raw: &str) -> AppResult<IntentDetection> {
    let payload = extract_json_payload(raw)
        .ok_or_else(|| AppError::intent_error("no JSON object found in classifier reply"))?;

    let reply: RawIntentReply = serde_json::from_str(payload)
        .map_err(|e| AppError::intent_error(format!("classifier reply did not parse: {e}")))?;

    let intent = reply
        .intent
        .ok_or_else(|| AppError::intent_error("classifier reply is missing \"intent\""))?;
    let should_call_tools = reply.should_call_tools.ok_or_else(|| {
        AppError::intent_error("classifier reply is missing \"shouldCallTools\"")
    })?;

    Ok(IntentDetection {
        intent,
        should_call_tools,
        guardrail: reply.guardrail.unwrap_or_default(),
    })
}

/// Locate the JSON object inside a model reply
fn extract_json_payload(raw: &str) -> Option<&str> {
    extract_fenced_block(raw).or_else(|| extract_balanced_object(raw))
}

/// Pull the contents of a ```json fenced block, if present
fn extract_fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```json")? + "```json".len();
    let rest = &raw[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Find the first balanced `{...}` object, respecting strings and escapes
fn extract_balanced_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let bytes = raw.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntentType;

    const VALID_REPLY: &str = r#"{
        "intent": {"type": "workout_generation", "confidence": 1.0},
        "shouldCallTools": true,
        "guardrail": {"violation": false, "reason": ""}
    }"#;

    #[test]
    fn test_parse_bare_json() {
        let detection = parse_intent_response(VALID_REPLY).unwrap();
        assert_eq!(detection.intent.intent_type, IntentType::WorkoutGeneration);
        assert!(detection.should_call_tools);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = format!("Here is the classification:\n```json\n{VALID_REPLY}\n```\nDone.");
        let detection = parse_intent_response(&raw).unwrap();
        assert!(!detection.guardrail.violation);
    }

    #[test]
    fn test_parse_prose_wrapped_json() {
        let raw = format!("Sure! {VALID_REPLY} Let me know if you need anything else.");
        assert!(parse_intent_response(&raw).is_ok());
    }

    #[test]
    fn test_balanced_scan_handles_nested_objects_and_strings() {
        let raw = r#"note: {"intent": {"type": "exercise_lookup", "confidence": 0.9,
            "extractedParams": {"search": "weird {brace} in string"}},
            "shouldCallTools": true}"#;
        let detection = parse_intent_response(raw).unwrap();
        assert_eq!(detection.intent.intent_type, IntentType::ExerciseLookup);
        assert_eq!(
            detection
                .intent
                .extracted_params
                .unwrap()
                .search
                .as_deref(),
            Some("weird {brace} in string")
        );
    }

    #[test]
    fn test_missing_intent_rejected() {
        let raw = r#"{"guardrail": {"violation": true, "reason": "Not fitness-related"}, "shouldCallTools": false}"#;
        let err = parse_intent_response(raw).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::IntentError);
        assert!(err.message.contains("intent"));
    }

    #[test]
    fn test_missing_should_call_tools_rejected() {
        let raw = r#"{"intent": {"type": "workout_generation", "confidence": 1.0}}"#;
        assert!(parse_intent_response(raw).is_err());
    }

    #[test]
    fn test_no_json_rejected() {
        assert!(parse_intent_response("I cannot classify that message.").is_err());
    }

    #[test]
    fn test_unbalanced_json_rejected() {
        assert!(parse_intent_response(r#"{"intent": {"type": "workout_generation""#).is_err());
    }
}
