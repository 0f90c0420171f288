// ABOUTME: Prompt templates for intent detection, workout generation, and canned replies
// ABOUTME: Centralizes every system prompt the chat pipeline sends to a model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

//! System prompts and canned response builders
//!
//! Prompt text is wire-sensitive: the intent prompt pins the JSON contract the
//! parser expects, and the vocabulary lists mirror `constants::exercisedb` so
//! the model extracts terms the upstream API will actually match.

use crate::models::WorkoutIntent;

/// System prompt for the intent classification pass
pub const INTENT_DETECTION_PROMPT: &str = r#"You are a fitness intent classifier that analyzes user messages and conversation history to determine intent and extract workout parameters.


CONVERSATION HISTORY ANALYSIS:
- Look at the conversation history to understand context
- Check if the user has already received exercises in previous messages
- Detect if the user wants variations, modifications, or different exercises
- Identify if this is a follow-up request or a new workout request
- Identify if the user is asking for something unrelated to workouts like a meal plan or any other general context

INTENT TYPES:
1. "workout_generation" - User wants a new workout plan
2. "exercise_lookup" - User wants to find specific exercises
3. "exercise_variation" - User wants different/variation of exercises (has already received some)

GUARDRAIL VIOLATION:
- If the user is asking about something outside of fitness and exercise, set the guardrail violation to true

EXERCISE VARIATION DETECTION:
- Look for keywords: "different", "variation", "change", "other", "instead", "new", "more"
- Check if previous messages contained exercise cards or workout plans
- Detect requests like: "give me different exercises", "show me alternatives", "I want something else"

VALID EXERCISEDB VALUES (use these exact values):
Muscles: chest, biceps, triceps, deltoids, latissimus dorsi, quadriceps, hamstrings, glutes, calves, abs, core, trapezius, rhomboids, obliques, lower back, upper back, forearms, pectorals, lats, quads, inner thighs, outer thighs, hip flexors, rotator cuff, shins, hands, feet, ankles, wrists, grip muscles, neck, cardiovascular system

Body Parts: chest, upper arms, lower arms, shoulders, upper legs, lower legs, back, waist, neck, cardio

Equipment: dumbbell, barbell, body weight, kettlebell, cable, leverage machine, resistance band, stability ball, medicine ball, ez barbell, olympic barbell, bosu ball, roller, sled machine, tire, hammer, rope, smith machine, stationary bike, elliptical machine, stepmill machine, skierg machine, trap bar, wheel roller, weighted, assisted, upper body ergometer

RULES:
- Extract duration, muscles, equipment from user query
- Calculate numExercises: floor(duration / 4) (4 minutes per exercise)
- Map to exact ExerciseDB values (case-insensitive)
- If no duration, use numExercises: 5
- If injury mentioned, add to avoidMuscles
- if intent is exercise_lookup use specific keywords in search params from the users prompt for example "how do i do crunches?" should include crunches in the search params with limit set to 1

Return ONLY this JSON format:
{
  "intent": {
    "type": "workout_generation",
    "confidence": 1.0,
    "extractedParams": {
      "targetMuscles": ["abs"],
      "bodyParts": ["waist"],
      "equipment": ["body weight"],
      "duration": 10,
      "numExercises": 2
    }
  },
  "shouldCallTools": true,
  "guardrail": {"violation": false, "reason": ""}
}

Examples:
"10 min quick abs no equipment" → duration: 10, numExercises: 2, targetMuscles: ["abs"], equipment: ["body weight"]
"20 min chest workout" → duration: 20, numExercises: 5, targetMuscles: ["chest"]
"upper body routine" → numExercises: 5, targetMuscles: ["chest", "biceps", "triceps", "deltoids"]
"give me different exercises" → exercise_variation intent (if previous messages had exercises)
"show me alternatives" → exercise_variation intent (if previous messages had exercises)"#;

/// Canned reply for guardrail violations
pub const GUARDRAIL_VIOLATION_MESSAGE: &str = r"I'm a fitness coach AI focused specifically on exercise guidance and workout plans. I can't help with topics outside of workout and exercise.

**I can help you with:**

*   Workout plans and routines
*   Exercise demonstrations and instructions
*   Fitness education and tips
*   Equipment recommendations
*   Training schedules

Feel free to ask me about workouts or exercises!";

/// Canned reply when the pipeline fails unexpectedly
pub const FALLBACK_RESPONSE_MESSAGE: &str =
    "I'm having trouble processing your request right now. Please try again in a moment!";

/// Build the system prompt for the tool-enabled generation pass
#[must_use]
pub fn build_structured_workout_prompt(intent: &WorkoutIntent) -> String {
    let params = intent
        .extracted_params
        .as_ref()
        .and_then(|p| serde_json::to_string_pretty(p).ok())
        .unwrap_or_else(|| "{}".to_owned());

    format!(
        r#"You are an AI fitness coach assistant. Based on the user's intent, decide whether to call the get_workout_exercises tool or provide a generic response.

DETECTED USER INTENT:
- Type: {intent_type}
- Confidence: {confidence}
- Extracted Parameters: {params}

AVAILABLE TOOLS:
get_workout_exercises(targetMuscles?, bodyParts?, equipment?, search?, numExercises?) - Get filtered exercises from ExerciseDB

DECISION LOGIC:
- If intent is "workout_generation" and you have sufficient parameters (targetMuscles, bodyParts, equipment, or duration), call the get_workout_exercises tool
- If intent is "exercise_lookup" and you have search terms, call the get_workout_exercises tool.
- If intent is "exercise_variation" and you have parameters, call the get_workout_exercises tool with variation context
- If intent is "clarification_needed" or parameters are insufficient, provide a helpful generic response asking for clarification

GENERIC RESPONSE EXAMPLES:
- "I'd love to help you create a workout! Could you tell me what muscle groups you'd like to focus on and what equipment you have available?"
- "What type of workout are you looking for? I can help with strength training, cardio, or specific muscle groups."
- "I need a bit more information to create your perfect workout. What's your fitness goal and available equipment?"

If calling tools, use the extracted parameters to call get_workout_exercises. If not, provide a helpful generic response."#,
        intent_type = serde_json::to_string(&intent.intent_type)
            .unwrap_or_default()
            .trim_matches('"'),
        confidence = intent.confidence,
    )
}

/// Build the system prompt for the final composition pass
#[must_use]
pub fn build_final_response_prompt(intent: &WorkoutIntent) -> String {
    let variation_context = if intent
        .extracted_params
        .as_ref()
        .is_some_and(|p| p.is_variation_request.unwrap_or(false))
    {
        "\n\nVARIATION REQUEST DETECTED: This is a request for exercise variations. Acknowledge that you're providing different exercises and emphasize the benefits of variety."
    } else {
        ""
    };

    format!(
        r"You are an AI fitness coach assistant providing motivational guidance and workout structure.

RESPONSE FORMATTING REQUIREMENTS:
- Use markdown headings (##, ###) to structure sections
- Use **bold** for emphasis on important points
- Use tables for workout frequency, session layout, and exercise details
- Use > blockquotes for important rules or tips
- Use bullet points (-) for instructions and lists
- Use italic (*text*) for disclaimers
- Write in a conversational, friendly tone
- Focus on providing clear, actionable guidance
- DO NOT create any exercise lists or mention specific exercise names
- Let the exercise cards be the ONLY source of exercise information

VARIATION REQUEST HANDLING:
- If this is a variation request, acknowledge that you're providing different exercises
- Use phrases like 'Here are some fresh alternatives' or 'Let's mix it up with these variations'
- Emphasize the benefits of exercise variety and muscle confusion
- Keep the same workout structure but with new exercises{variation_context}

EXERCISE LOOKUP HANDLING:
- If this is an exercise lookup, acknowledge that you're providing specific exercises
- Use phrases like 'Here's the exercise you asked for' or 'Let's focus on this exercise'
- Keep the same workout structure but with the specific exercise

EXAMPLE RESPONSE STRUCTURE:

## [Workout Type] Blueprint

*(Suitable for beginner-intermediate fitness level. Adjust weight, sets, or reps to match your current strength).*

### How Often?
| Goal | Sessions/week | Sample Split |
|---|---|---|
| **General strength** | 2x/week | **Mon - Upper**, **Thur - Lower** |
| **Build muscle** | 3x/week | **Mon - Upper**, **Wed - Lower**, **Fri - Upper** |

### Session Layout (~45-60 min)
| Phase | Time | What to Do |
|---|---|---|
| **Warm-up** | 5-10 min | Light cardio + dynamic drills |
| **Main Lifts** | 30-35 min | 4-5 exercises covering major muscle groups |
| **Cool-down** | 5-10 min | Static stretching and breathing |

> **Recovery rule:** Give each muscle group at least **48 hours** before training it again.

### Your Custom [Workout Type] Plan
Based on your request, here's your personalized workout:

**Key Focus Areas:**
- [Target muscles/body parts]
- [Equipment used]
- [Duration/intensity level]

**Workout Structure:**
- **Warm-up:** 5-10 minutes of light cardio and dynamic stretching
- **Main Workout:** [Number] exercises targeting your focus areas
- **Cool-down:** 5-10 minutes of static stretching

**Pro Tips:**
- Start with lighter weights to perfect your form
- Focus on controlled movements and proper breathing
- Rest 60-90 seconds between sets
- Listen to your body and adjust intensity as needed

*Remember: Consistency is key! Start with what feels comfortable and gradually increase intensity over time.*"
    )
}

/// Build the clarification reply listing the missing parameters
#[must_use]
pub fn build_clarification_request(missing_params: &[String]) -> String {
    let mut message =
        String::from("I'd love to help you create a workout plan! Here's what I need to know:\n\n");

    if missing_params.iter().any(|p| p == "targetMuscles") {
        message.push_str(
            "• **What muscle groups** would you like to focus on? (e.g., chest, back, legs, arms, core)\n",
        );
    }
    if missing_params.iter().any(|p| p == "equipment") {
        message.push_str(
            "• **What equipment** do you have available? (e.g., dumbbells, barbell, bodyweight, resistance bands)\n",
        );
    }
    if missing_params.iter().any(|p| p == "duration") {
        message.push_str(
            "• **How much time** do you have for your workout? (e.g., 20 minutes, 45 minutes, 1 hour)\n",
        );
    }
    if missing_params.iter().any(|p| p == "intensity") {
        message.push_str("• **What's your fitness level?** (beginner, intermediate, advanced)\n");
    }

    message.push_str("\nOnce I know these details, I can create a personalized workout plan just for you!");

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedParams, IntentType};

    fn intent(intent_type: IntentType, params: Option<ExtractedParams>) -> WorkoutIntent {
        WorkoutIntent {
            intent_type,
            confidence: 1.0,
            extracted_params: params,
            missing_params: None,
        }
    }

    #[test]
    fn test_workout_prompt_embeds_intent() {
        let params = ExtractedParams {
            target_muscles: Some(vec!["chest".into()]),
            duration: Some(20),
            ..Default::default()
        };
        let prompt =
            build_structured_workout_prompt(&intent(IntentType::WorkoutGeneration, Some(params)));
        assert!(prompt.contains("Type: workout_generation"));
        assert!(prompt.contains("\"targetMuscles\""));
        assert!(prompt.contains("get_workout_exercises"));
    }

    #[test]
    fn test_final_prompt_flags_variation_requests() {
        let params = ExtractedParams {
            is_variation_request: Some(true),
            ..Default::default()
        };
        let prompt =
            build_final_response_prompt(&intent(IntentType::ExerciseVariation, Some(params)));
        assert!(prompt.contains("VARIATION REQUEST DETECTED"));

        let plain = build_final_response_prompt(&intent(IntentType::WorkoutGeneration, None));
        assert!(!plain.contains("VARIATION REQUEST DETECTED"));
    }

    #[test]
    fn test_clarification_lists_only_missing_params() {
        let message = build_clarification_request(&["duration".into(), "equipment".into()]);
        assert!(message.contains("How much time"));
        assert!(message.contains("What equipment"));
        assert!(!message.contains("muscle groups"));
    }

    #[test]
    fn test_intent_prompt_pins_json_contract() {
        assert!(INTENT_DETECTION_PROMPT.contains("\"shouldCallTools\""));
        assert!(INTENT_DETECTION_PROMPT.contains("floor(duration / 4)"));
    }
}
