//! Cross-session drill adaptation. Difficulty moves once per completed
//! drill, not per answer: each skill's next target comes from its
//! accuracy and average attempted difficulty in the most recent drill,
//! and its share of the slot budget from the accuracy trend across the
//! recent drill window.

use std::collections::HashSet;

use crate::config::DrillParams;
use crate::types::{DrillHistory, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Per-skill aggregate over one completed drill.
#[derive(Debug, Clone, Copy)]
pub struct SkillDrillStats {
    pub answered: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_difficulty: f64,
}

pub fn skill_stats(drill: &DrillHistory, skill_id: &str) -> Option<SkillDrillStats> {
    let mut answered = 0usize;
    let mut correct = 0usize;
    let mut difficulty_sum = 0i64;

    for answer in drill.answers.iter().filter(|a| a.skill_id == skill_id) {
        answered += 1;
        if answer.is_correct {
            correct += 1;
        }
        difficulty_sum += answer.difficulty_attempted as i64;
    }

    if answered == 0 {
        return None;
    }
    Some(SkillDrillStats {
        answered,
        correct,
        accuracy: correct as f64 / answered as f64,
        avg_difficulty: difficulty_sum as f64 / answered as f64,
    })
}

/// Target difficulty for a skill's next drill. Cold start (no completed
/// drill, or skill absent from the most recent one) lands on 1. Accuracy
/// below the reset threshold also lands on 1 regardless of the base: that
/// signals a conceptual gap, not a tuning problem.
pub fn target_difficulty(
    params: &DrillParams,
    latest_drill: Option<&DrillHistory>,
    skill_id: &str,
) -> i32 {
    let stats = match latest_drill.and_then(|drill| skill_stats(drill, skill_id)) {
        Some(stats) => stats,
        None => return MIN_DIFFICULTY,
    };

    if stats.accuracy < params.reset_below {
        return MIN_DIFFICULTY;
    }

    let base = stats.avg_difficulty.round() as i32;
    let step = if stats.accuracy >= 1.0 {
        3
    } else if stats.accuracy >= 0.85 {
        2
    } else if stats.accuracy >= 0.75 {
        1
    } else if stats.accuracy >= 0.60 {
        0
    } else {
        -1
    };

    (base + step).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Allocation weight over the recent drill window (most recent first).
/// Needs at least two drills with data for the skill; otherwise the
/// neutral weight applies.
pub fn allocation_weight(params: &DrillParams, drills: &[DrillHistory], skill_id: &str) -> f64 {
    let accuracies: Vec<f64> = drills
        .iter()
        .take(params.history_window)
        .filter_map(|drill| skill_stats(drill, skill_id))
        .map(|stats| stats.accuracy)
        .collect();

    if accuracies.len() < 2 {
        return 1.0;
    }

    let mean = accuracies.iter().sum::<f64>() / accuracies.len() as f64;
    let min = accuracies.iter().cloned().fold(f64::INFINITY, f64::min);

    if mean >= params.mastered_mean && min >= params.mastered_min {
        params.mastered_weight
    } else if mean < params.struggling_mean {
        params.struggling_weight
    } else {
        1.0
    }
}

/// Splits the drill's slot budget across skills proportionally to weight,
/// one slot minimum per skill. Rounding drift is corrected on the single
/// highest-weight skill.
pub fn allocate_slots(session_size: usize, weights: &[(String, f64)]) -> Vec<(String, usize)> {
    if weights.is_empty() {
        return Vec::new();
    }

    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let mut slots: Vec<(String, usize)> = weights
        .iter()
        .map(|(skill_id, weight)| {
            let raw = (session_size as f64 * weight / total).round() as usize;
            (skill_id.clone(), raw.max(1))
        })
        .collect();

    let assigned: usize = slots.iter().map(|(_, n)| n).sum();
    let drift = session_size as i64 - assigned as i64;
    if drift != 0 {
        let heaviest = weights
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let adjusted = (slots[heaviest].1 as i64 + drift).max(1) as usize;
        slots[heaviest].1 = adjusted;
    }

    slots
}

/// Every question id answered in any of the given drills. Seeds the
/// no-repetition exclude set.
pub fn attempted_question_ids(drills: &[DrillHistory]) -> HashSet<String> {
    drills
        .iter()
        .flat_map(|drill| drill.answers.iter())
        .map(|answer| answer.question_id.clone())
        .collect()
}
