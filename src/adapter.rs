//! Continuous difficulty adaptation for regular practice: one state
//! update per graded attempt. Persisting the updated state is the
//! caller's job, via `SkillStateStore::upsert`.

use chrono::{DateTime, Utc};

use crate::types::{SkillState, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// No difficulty change until this many outcomes exist in the window.
const MIN_WINDOW_FOR_ADJUSTMENT: usize = 3;

#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub is_correct: bool,
    pub hint_used: bool,
    /// Confidence score for this attempt, as produced by the scorer.
    pub confidence: f64,
    pub at: DateTime<Utc>,
}

/// Folds one attempt into the skill state: cumulative mastery, trailing
/// outcome window, running hint/confidence fractions, practice timestamp,
/// and — once the window holds enough outcomes — the difficulty level.
pub fn apply_attempt(state: &mut SkillState, outcome: &AttemptOutcome) {
    state.attempts += 1;
    if outcome.is_correct {
        state.correct += 1;
    }
    state.mastery_level = state.correct as f64 / state.attempts as f64;
    state.push_outcome(outcome.is_correct);

    let n = state.attempts as f64;
    let hint = if outcome.hint_used { 1.0 } else { 0.0 };
    state.hints_usage_rate += (hint - state.hints_usage_rate) / n;
    state.avg_confidence += (outcome.confidence.clamp(0.0, 1.0) - state.avg_confidence) / n;

    state.last_practiced = Some(outcome.at);
    state.decay_factor = 1.0;

    if state.last_5_outcomes.len() >= MIN_WINDOW_FOR_ADJUSTMENT {
        if let Some(accuracy) = state.window_accuracy() {
            let delta = difficulty_delta(accuracy);
            state.current_difficulty =
                (state.current_difficulty + delta).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        }
    }
}

fn difficulty_delta(accuracy: f64) -> i32 {
    if accuracy >= 0.95 {
        2
    } else if accuracy >= 0.85 {
        1
    } else if accuracy >= 0.75 {
        1
    } else if accuracy >= 0.60 {
        0
    } else if accuracy >= 0.40 {
        -1
    } else {
        -2
    }
}
