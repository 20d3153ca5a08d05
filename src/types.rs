use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of trailing outcomes retained per skill for the continuous
/// difficulty adapter.
pub const OUTCOME_WINDOW: usize = 5;

pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SkillCategory {
    Weak,
    #[default]
    Moderate,
    Strong,
    Unstarted,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
            Self::Unstarted => "unstarted",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "weak" => Self::Weak,
            "strong" => Self::Strong,
            "unstarted" => Self::Unstarted,
            _ => Self::Moderate,
        }
    }
}

/// Per-user, per-module, per-skill learning state. Created lazily on the
/// first attempt and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillState {
    pub user_id: String,
    pub module_id: String,
    pub skill_id: String,
    pub current_difficulty: i32,
    pub mastery_level: f64,
    pub attempts: i64,
    pub correct: i64,
    pub last_5_outcomes: VecDeque<bool>,
    pub decay_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_practiced: Option<DateTime<Utc>>,
    pub hints_usage_rate: f64,
    pub avg_confidence: f64,
}

impl SkillState {
    pub fn new(
        user_id: impl Into<String>,
        module_id: impl Into<String>,
        skill_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            module_id: module_id.into(),
            skill_id: skill_id.into(),
            current_difficulty: MIN_DIFFICULTY,
            mastery_level: 0.0,
            attempts: 0,
            correct: 0,
            last_5_outcomes: VecDeque::with_capacity(OUTCOME_WINDOW),
            decay_factor: 1.0,
            last_practiced: None,
            hints_usage_rate: 0.0,
            avg_confidence: 0.0,
        }
    }

    /// Appends an outcome to the trailing window, dropping the oldest once
    /// the window holds `OUTCOME_WINDOW` entries.
    pub fn push_outcome(&mut self, is_correct: bool) {
        self.last_5_outcomes.push_back(is_correct);
        while self.last_5_outcomes.len() > OUTCOME_WINDOW {
            self.last_5_outcomes.pop_front();
        }
    }

    /// Accuracy over the trailing outcome window. `None` until at least one
    /// outcome has been recorded.
    pub fn window_accuracy(&self) -> Option<f64> {
        if self.last_5_outcomes.is_empty() {
            return None;
        }
        let correct = self.last_5_outcomes.iter().filter(|&&c| c).count();
        Some(correct as f64 / self.last_5_outcomes.len() as f64)
    }

    pub fn clamp_invariants(&mut self) {
        self.current_difficulty = self.current_difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        self.mastery_level = self.mastery_level.clamp(0.0, 1.0);
        self.decay_factor = self.decay_factor.clamp(0.1, 1.0);
    }
}

/// A practice question as seen by the engine. Read-only; content authoring
/// lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub id: String,
    pub module_id: String,
    pub skill_id: String,
    pub difficulty: i32,
    pub expected_time_seconds: f64,
}

/// Category and mastery of the target skill at the moment a question was
/// chosen. Observability only; never read back by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSnapshot {
    pub category: SkillCategory,
    pub effective_mastery: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    pub question: QuestionItem,
    pub rationale: String,
    pub skill_snapshot: SkillSnapshot,
}

impl SelectionResult {
    pub fn new(
        question: QuestionItem,
        rationale: impl Into<String>,
        category: SkillCategory,
        effective_mastery: f64,
    ) -> Self {
        Self {
            question,
            rationale: rationale.into(),
            skill_snapshot: SkillSnapshot {
                category,
                effective_mastery,
            },
        }
    }
}

/// One answered question inside a completed drill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillAnswer {
    pub question_id: String,
    pub skill_id: String,
    pub difficulty_attempted: i32,
    pub is_correct: bool,
}

/// A completed drill for one (user, module), ordered answers included.
/// Input to the cross-session difficulty adapter; never written by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillHistory {
    pub completed_at: DateTime<Utc>,
    pub answers: Vec<DrillAnswer>,
}
