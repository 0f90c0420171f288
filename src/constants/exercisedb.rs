// ABOUTME: ExerciseDB vocabulary constants - valid values that return actual data
// ABOUTME: Maps user-friendly terms to the exact vocabulary the upstream API accepts

//! ExerciseDB vocabulary and validation helpers
//!
//! The upstream API only matches exact lowercase terms. User input (and model
//! output) arrives in free form, so every filter list is normalized here:
//! lowercase and trim, remap known synonyms, then drop anything the API would
//! not recognize.

/// Default ExerciseDB API base URL
pub const EXERCISEDB_BASE_URL: &str = "https://www.exercisedb.dev/api/v1";

/// Fuzzy-search similarity threshold used for all queries
pub const SEARCH_THRESHOLD: f64 = 0.5;

/// Upstream cap on results per search request
pub const MAX_SEARCH_LIMIT: u32 = 25;

/// Muscle terms the API recognizes
pub const AVAILABLE_MUSCLES: &[&str] = &[
    "shins",
    "hands",
    "sternocleidomastoid",
    "soleus",
    "inner thighs",
    "lower abs",
    "grip muscles",
    "abdominals",
    "wrist extensors",
    "wrist flexors",
    "latissimus dorsi",
    "upper chest",
    "rotator cuff",
    "wrists",
    "groin",
    "brachialis",
    "deltoids",
    "feet",
    "ankles",
    "trapezius",
    "rear deltoids",
    "chest",
    "quadriceps",
    "back",
    "core",
    "shoulders",
    "ankle stabilizers",
    "rhomboids",
    "obliques",
    "lower back",
    "hip flexors",
    "levator scapulae",
    "abductors",
    "serratus anterior",
    "traps",
    "forearms",
    "delts",
    "biceps",
    "upper back",
    "spine",
    "cardiovascular system",
    "triceps",
    "adductors",
    "hamstrings",
    "glutes",
    "pectorals",
    "calves",
    "lats",
    "quads",
    "abs",
];

/// Equipment terms the API recognizes
pub const AVAILABLE_EQUIPMENT: &[&str] = &[
    "stepmill machine",
    "elliptical machine",
    "trap bar",
    "tire",
    "stationary bike",
    "wheel roller",
    "smith machine",
    "hammer",
    "skierg machine",
    "roller",
    "resistance band",
    "bosu ball",
    "weighted",
    "olympic barbell",
    "kettlebell",
    "upper body ergometer",
    "sled machine",
    "ez barbell",
    "dumbbell",
    "rope",
    "barbell",
    "band",
    "stability ball",
    "medicine ball",
    "assisted",
    "leverage machine",
    "cable",
    "body weight",
];

/// Body part terms the API recognizes
pub const AVAILABLE_BODY_PARTS: &[&str] = &[
    "neck",
    "lower arms",
    "shoulders",
    "cardio",
    "upper arms",
    "chest",
    "lower legs",
    "back",
    "upper legs",
    "waist",
];

/// Remap user-friendly muscle terms to API vocabulary
fn map_muscle(term: &str) -> &str {
    match term {
        "arms" => "upper arms",
        "legs" => "upper legs",
        "grip" => "grip muscles",
        other => other,
    }
}

/// Remap user-friendly equipment terms to API vocabulary
fn map_equipment(term: &str) -> &str {
    match term {
        "dumbbells" => "dumbbell",
        "ez bar" => "ez barbell",
        "smith" => "smith machine",
        "bodyweight" => "body weight",
        "bands" => "resistance band",
        "elliptical" => "elliptical machine",
        "stepmill" => "stepmill machine",
        other => other,
    }
}

/// Remap user-friendly body part terms to API vocabulary
fn map_body_part(term: &str) -> &str {
    match term {
        "arms" => "upper arms",
        "legs" => "upper legs",
        "core" => "waist",
        other => other,
    }
}

fn normalize(input: &[String], map: fn(&str) -> &str, allowed: &[&str]) -> Vec<String> {
    let mut seen = Vec::with_capacity(input.len());
    for raw in input {
        let lowered = raw.to_lowercase();
        let mapped = map(lowered.trim());
        if allowed.contains(&mapped) && !seen.iter().any(|s| s == mapped) {
            seen.push(mapped.to_owned());
        }
    }
    seen
}

/// Normalize a muscle filter list, dropping unrecognized terms
#[must_use]
pub fn validate_and_map_muscles(input: &[String]) -> Vec<String> {
    normalize(input, map_muscle, AVAILABLE_MUSCLES)
}

/// Normalize an equipment filter list, dropping unrecognized terms
#[must_use]
pub fn validate_and_map_equipment(input: &[String]) -> Vec<String> {
    normalize(input, map_equipment, AVAILABLE_EQUIPMENT)
}

/// Normalize a body part filter list, dropping unrecognized terms
#[must_use]
pub fn validate_and_map_body_parts(input: &[String]) -> Vec<String> {
    normalize(input, map_body_part, AVAILABLE_BODY_PARTS)
}
