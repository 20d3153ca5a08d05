//! Candidate selection for regular practice sessions. Walks classified
//! skills worst-first inside each category, pulls questions around an
//! adjusted difficulty target, back-fills shortfalls and shuffles the
//! combined list. The exclude set is threaded through every step as an
//! explicit accumulator so each helper stays referentially transparent.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::classifier::ClassifiedSkill;
use crate::config::{PlannerParams, SelectorParams};
use crate::planner::DEFAULT_SESSION_SIZE;
use crate::store::{QuestionFilter, QuestionRepository, StoreError};
use crate::types::{SelectionResult, SkillCategory, MAX_DIFFICULTY, MIN_DIFFICULTY};

#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub user_id: String,
    pub session_size: usize,
    pub exclude_ids: Vec<String>,
    pub focus_modules: Vec<String>,
}

impl SessionRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_size: DEFAULT_SESSION_SIZE,
            exclude_ids: Vec::new(),
            focus_modules: Vec::new(),
        }
    }

    pub fn with_session_size(mut self, session_size: usize) -> Self {
        self.session_size = session_size;
        self
    }

    pub fn with_exclude_ids(mut self, exclude_ids: Vec<String>) -> Self {
        self.exclude_ids = exclude_ids;
        self
    }

    pub fn with_focus_modules(mut self, focus_modules: Vec<String>) -> Self {
        self.focus_modules = focus_modules;
        self
    }
}

/// Session-mode difficulty target: weak skills step down one level, strong
/// skills step up one level capped at the session band ceiling. The
/// continuous adapter owns the full [1, 10] range; this bias does not.
pub fn target_difficulty(params: &SelectorParams, category: SkillCategory, current: i32) -> i32 {
    match category {
        SkillCategory::Weak => (current - 1).max(MIN_DIFFICULTY),
        SkillCategory::Strong => (current + 1).min(params.session_difficulty_cap),
        SkillCategory::Moderate | SkillCategory::Unstarted => current,
    }
}

/// Ascending by effective mastery, worst first.
pub fn sort_worst_first(skills: &mut [ClassifiedSkill]) {
    skills.sort_by(|a, b| {
        a.effective_mastery
            .partial_cmp(&b.effective_mastery)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Picks up to `quota` questions for one category, at most
/// `per_skill_limit` per skill, inside ±`band_radius` of each skill's
/// target difficulty. Consumes and returns the exclude accumulator.
pub fn select_for_category(
    questions: &dyn QuestionRepository,
    params: &SelectorParams,
    skills: &[ClassifiedSkill],
    quota: usize,
    mut excluded: HashSet<String>,
) -> Result<(Vec<SelectionResult>, HashSet<String>), StoreError> {
    let mut picks = Vec::new();

    for skill in skills {
        if picks.len() >= quota {
            break;
        }

        let target = target_difficulty(params, skill.category, skill.state.current_difficulty);
        let filter = QuestionFilter {
            module_id: Some(skill.state.module_id.clone()),
            skill_id: Some(skill.state.skill_id.clone()),
            difficulty_min: (target - params.band_radius).max(MIN_DIFFICULTY),
            difficulty_max: (target + params.band_radius).min(MAX_DIFFICULTY),
            excluding: excluded.clone(),
        };
        let candidates = questions.find(&filter)?;
        if candidates.is_empty() {
            debug!(
                skill_id = %skill.state.skill_id,
                target,
                "no unused questions in difficulty band, skipping skill"
            );
            continue;
        }

        let remaining = quota - picks.len();
        for question in candidates
            .into_iter()
            .take(params.per_skill_limit.min(remaining))
        {
            let rationale = format!(
                "{} skill {} (effective mastery {:.2}), difficulty target {}±{}",
                skill.category.as_str(),
                skill.state.skill_id,
                skill.effective_mastery,
                target,
                params.band_radius,
            );
            excluded.insert(question.id.clone());
            picks.push(SelectionResult::new(
                question,
                rationale,
                skill.category,
                skill.effective_mastery,
            ));
        }
    }

    Ok((picks, excluded))
}

/// Fills remaining slots with any unexcluded question, ignoring the
/// skill/category targeting. `snapshots` maps skill ids to their
/// classification for observability; unknown skills read as unstarted.
pub fn backfill(
    questions: &dyn QuestionRepository,
    needed: usize,
    snapshots: &HashMap<String, (SkillCategory, f64)>,
    mut excluded: HashSet<String>,
) -> Result<(Vec<SelectionResult>, HashSet<String>), StoreError> {
    if needed == 0 {
        return Ok((Vec::new(), excluded));
    }

    let filter = QuestionFilter {
        excluding: excluded.clone(),
        ..QuestionFilter::any_difficulty()
    };
    let candidates = questions.find(&filter)?;
    if candidates.len() < needed {
        warn!(
            needed,
            available = candidates.len(),
            "question pool exhausted, session will be under-filled"
        );
    }

    let mut picks = Vec::new();
    for question in candidates.into_iter().take(needed) {
        let (category, mastery) = snapshots
            .get(&question.skill_id)
            .copied()
            .unwrap_or((SkillCategory::Unstarted, 0.0));
        excluded.insert(question.id.clone());
        picks.push(SelectionResult::new(
            question,
            "fill remaining session slots",
            category,
            mastery,
        ));
    }

    Ok((picks, excluded))
}

/// Beginner path: no skill state exists for the user, so classification is
/// skipped and questions come only from the given modules at low
/// difficulty.
pub fn select_beginner(
    questions: &dyn QuestionRepository,
    params: &PlannerParams,
    modules: &[String],
    session_size: usize,
    mut excluded: HashSet<String>,
) -> Result<(Vec<SelectionResult>, HashSet<String>), StoreError> {
    let mut picks = Vec::new();

    for module_id in modules {
        if picks.len() >= session_size {
            break;
        }
        let filter = QuestionFilter {
            module_id: Some(module_id.clone()),
            difficulty_min: MIN_DIFFICULTY,
            difficulty_max: params.beginner_max_difficulty,
            excluding: excluded.clone(),
            ..QuestionFilter::default()
        };
        let candidates = questions.find(&filter)?;
        for question in candidates
            .into_iter()
            .take(session_size - picks.len())
        {
            let rationale = format!(
                "new learner, starting with {} at difficulty ≤{}",
                module_id, params.beginner_max_difficulty
            );
            excluded.insert(question.id.clone());
            picks.push(SelectionResult::new(
                question,
                rationale,
                SkillCategory::Unstarted,
                0.0,
            ));
        }
    }

    Ok((picks, excluded))
}

/// Uniform Fisher–Yates shuffle so category and difficulty ordering is not
/// observable to the caller.
pub fn shuffle_selection<R: Rng + ?Sized>(results: &mut [SelectionResult], rng: &mut R) {
    results.shuffle(rng);
}
