//! Confidence scoring: one 0–1 signal per answered question, combining
//! correctness, pacing against the expected time, hint reliance and item
//! difficulty. Total function; malformed inputs are clamped, never
//! rejected.

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceWeights;
use crate::types::{MAX_DIFFICULTY, MIN_DIFFICULTY};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInput {
    pub is_correct: bool,
    pub time_taken_seconds: f64,
    pub expected_time_seconds: f64,
    pub hints_used: u32,
    pub max_hints: u32,
    pub difficulty_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceFactors {
    pub correctness: f64,
    pub time: f64,
    pub hints: f64,
    pub difficulty: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceReport {
    pub confidence_score: f64,
    pub interpretation: String,
    pub factors: ConfidenceFactors,
}

pub fn calculate(weights: &ConfidenceWeights, input: &ConfidenceInput) -> ConfidenceReport {
    let time_taken = input.time_taken_seconds.max(0.0);
    let expected = if input.expected_time_seconds > 0.0 {
        input.expected_time_seconds
    } else {
        weights.default_expected_time
    };
    let difficulty = input
        .difficulty_level
        .clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);

    let correctness = if input.is_correct { 1.0 } else { 0.0 };

    // Gaussian centered on the expected time; rushing and lingering both
    // cost confidence symmetrically.
    let sigma = weights.sigma_ratio * expected;
    let diff = time_taken - expected;
    let time = (-(diff * diff) / (2.0 * sigma * sigma)).exp().clamp(0.0, 1.0);

    let hints = if input.max_hints == 0 {
        1.0
    } else {
        let ratio = (input.hints_used as f64 / input.max_hints as f64).min(1.0);
        (1.0 - ratio * weights.hint_penalty).max(weights.hint_floor)
    };

    let difficulty_factor = if input.is_correct {
        0.5 + (difficulty as f64 / MAX_DIFFICULTY as f64) * 0.5
    } else {
        0.5
    };

    let score = (weights.correctness * correctness
        + weights.time * time
        + weights.hints * hints
        + weights.difficulty * difficulty_factor)
        .clamp(0.0, 1.0);

    ConfidenceReport {
        confidence_score: score,
        interpretation: interpret(score).to_string(),
        factors: ConfidenceFactors {
            correctness,
            time,
            hints,
            difficulty: difficulty_factor,
        },
    }
}

fn interpret(score: f64) -> &'static str {
    if score >= 0.85 {
        "very high"
    } else if score >= 0.70 {
        "high"
    } else if score >= 0.50 {
        "moderate"
    } else if score >= 0.30 {
        "low"
    } else {
        "very low"
    }
}
