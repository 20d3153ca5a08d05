//! Engine facade. Holds the tuning config and the three injected store
//! interfaces; every operation is a pure computation over what the stores
//! return, and all writes stay with the caller.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::adapter::{self, AttemptOutcome};
use crate::classifier;
use crate::confidence::{self, ConfidenceInput, ConfidenceReport};
use crate::config::EngineConfig;
use crate::decay;
use crate::drill;
use crate::error::EngineError;
use crate::planner::{self, CategoryCounts};
use crate::selector::{self, SessionRequest};
use crate::store::{DrillHistoryStore, QuestionFilter, QuestionRepository, SkillStateStore};
use crate::types::{SelectionResult, SkillCategory, SkillState};

pub struct PracticeEngine {
    config: EngineConfig,
    skill_states: Arc<dyn SkillStateStore>,
    questions: Arc<dyn QuestionRepository>,
    drill_history: Arc<dyn DrillHistoryStore>,
}

impl PracticeEngine {
    pub fn new(
        config: EngineConfig,
        skill_states: Arc<dyn SkillStateStore>,
        questions: Arc<dyn QuestionRepository>,
        drill_history: Arc<dyn DrillHistoryStore>,
    ) -> Self {
        Self {
            config,
            skill_states,
            questions,
            drill_history,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Plans a mixed practice session for a user: decayed mastery →
    /// need tiers → category quotas → concrete questions, shuffled.
    pub fn select_questions_for_session(
        &self,
        request: &SessionRequest,
    ) -> Result<Vec<SelectionResult>, EngineError> {
        self.select_questions_for_session_with(request, Utc::now(), &mut rand::rng())
    }

    /// Same as [`select_questions_for_session`] with the clock and random
    /// source injected, so tests are reproducible.
    ///
    /// [`select_questions_for_session`]: Self::select_questions_for_session
    pub fn select_questions_for_session_with<R: Rng + ?Sized>(
        &self,
        request: &SessionRequest,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Vec<SelectionResult>, EngineError> {
        let states = self.skill_states.list_by_user(&request.user_id)?;
        let excluded: HashSet<String> = request.exclude_ids.iter().cloned().collect();

        if states.is_empty() {
            info!(user_id = %request.user_id, "no skill history, taking beginner path");
            let modules = if request.focus_modules.is_empty() {
                &self.config.planner.foundation_modules
            } else {
                &request.focus_modules
            };
            let (mut picks, _excluded) = selector::select_beginner(
                self.questions.as_ref(),
                &self.config.planner,
                modules,
                request.session_size,
                excluded,
            )?;
            selector::shuffle_selection(&mut picks, rng);
            return Ok(picks);
        }

        let mut classified = classifier::classify_skills(
            &self.config.classifier,
            &self.config.decay,
            states,
            now,
        );
        if !request.focus_modules.is_empty() {
            let focus: HashSet<&str> =
                request.focus_modules.iter().map(String::as_str).collect();
            classified.retain(|skill| focus.contains(skill.state.module_id.as_str()));
        }

        let snapshots: HashMap<String, (SkillCategory, f64)> = classified
            .iter()
            .map(|skill| {
                (
                    skill.state.skill_id.clone(),
                    (skill.category, skill.effective_mastery),
                )
            })
            .collect();

        let mut weak = Vec::new();
        let mut moderate = Vec::new();
        let mut strong = Vec::new();
        for skill in classified {
            match skill.category {
                SkillCategory::Weak => weak.push(skill),
                SkillCategory::Moderate => moderate.push(skill),
                SkillCategory::Strong | SkillCategory::Unstarted => strong.push(skill),
            }
        }
        selector::sort_worst_first(&mut weak);
        selector::sort_worst_first(&mut moderate);
        selector::sort_worst_first(&mut strong);

        let quota = planner::plan(
            &self.config.planner,
            request.session_size,
            CategoryCounts {
                weak: weak.len(),
                moderate: moderate.len(),
                strong: strong.len(),
            },
        );
        debug!(
            user_id = %request.user_id,
            weak_quota = quota.weak,
            moderate_quota = quota.moderate,
            strong_quota = quota.strong,
            "session quota planned"
        );

        let mut results = Vec::new();
        let mut excluded = excluded;
        for (skills, category_quota) in [
            (&weak, quota.weak),
            (&moderate, quota.moderate),
            (&strong, quota.strong),
        ] {
            let (picks, carried) = selector::select_for_category(
                self.questions.as_ref(),
                &self.config.selector,
                skills,
                category_quota,
                excluded,
            )?;
            results.extend(picks);
            excluded = carried;
        }

        if results.len() < request.session_size {
            let needed = request.session_size - results.len();
            debug!(needed, "category targeting fell short, back-filling");
            let (picks, _excluded) = selector::backfill(
                self.questions.as_ref(),
                needed,
                &snapshots,
                excluded,
            )?;
            results.extend(picks);
        }

        selector::shuffle_selection(&mut results, rng);
        Ok(results)
    }

    /// Plans the next fixed-size drill for a module: per-skill targets and
    /// slot weights from recent completed drills, never repeating a
    /// question the user has already seen in any drill for the module.
    pub fn select_adaptive_drill_questions(
        &self,
        user_id: &str,
        module_id: &str,
        session_size: usize,
    ) -> Result<Vec<SelectionResult>, EngineError> {
        self.select_adaptive_drill_questions_with(user_id, module_id, session_size, Utc::now())
    }

    pub fn select_adaptive_drill_questions_with(
        &self,
        user_id: &str,
        module_id: &str,
        session_size: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<SelectionResult>, EngineError> {
        let skill_ids = self.questions.distinct_skill_ids(module_id)?;
        if skill_ids.is_empty() {
            warn!(module_id, "module has no skills, drill is empty");
            return Ok(Vec::new());
        }

        // Full history for the no-repetition guarantee; only the recent
        // window drives targets and weights.
        let all_drills =
            self.drill_history
                .recent_completed_drills(user_id, module_id, usize::MAX)?;
        let window = &all_drills[..all_drills.len().min(self.config.drill.history_window)];
        let latest = all_drills.first();

        let weights: Vec<(String, f64)> = skill_ids
            .iter()
            .map(|skill_id| {
                (
                    skill_id.clone(),
                    drill::allocation_weight(&self.config.drill, window, skill_id),
                )
            })
            .collect();
        let slots = drill::allocate_slots(session_size, &weights);
        debug!(
            user_id,
            module_id,
            skills = skill_ids.len(),
            drills_seen = all_drills.len(),
            "drill slots allocated"
        );

        let mut excluded = drill::attempted_question_ids(&all_drills);
        let mut results = Vec::new();

        for (skill_id, slot_count) in slots {
            let target = drill::target_difficulty(&self.config.drill, latest, &skill_id);
            let (category, effective_mastery) =
                self.skill_snapshot(user_id, module_id, &skill_id, now)?;

            let filter = QuestionFilter {
                module_id: Some(module_id.to_string()),
                skill_id: Some(skill_id.clone()),
                difficulty_min: target,
                difficulty_max: target,
                excluding: excluded.clone(),
            };
            let mut taken = 0usize;
            for question in self.questions.find(&filter)?.into_iter().take(slot_count) {
                let rationale = if latest.and_then(|d| drill::skill_stats(d, &skill_id)).is_some()
                {
                    format!("drill difficulty {target} adapted from last completed drill")
                } else {
                    format!("cold start at difficulty {target}")
                };
                excluded.insert(question.id.clone());
                results.push(SelectionResult::new(
                    question,
                    rationale,
                    category,
                    effective_mastery,
                ));
                taken += 1;
            }

            while taken < slot_count {
                match self.questions.lowest_difficulty_available(
                    module_id,
                    &skill_id,
                    &excluded,
                )? {
                    Some(question) => {
                        let rationale = format!(
                            "target difficulty {target} exhausted, lowest available is {}",
                            question.difficulty
                        );
                        excluded.insert(question.id.clone());
                        results.push(SelectionResult::new(
                            question,
                            rationale,
                            category,
                            effective_mastery,
                        ));
                        taken += 1;
                    }
                    None => {
                        warn!(
                            skill_id = %skill_id,
                            "no unattempted questions remain for skill, under-filling drill"
                        );
                        break;
                    }
                }
            }
        }

        Ok(results)
    }

    /// Scores how confidently one answer was produced. Pure and total;
    /// see [`confidence::calculate`].
    pub fn calculate_confidence_score(&self, input: &ConfidenceInput) -> ConfidenceReport {
        confidence::calculate(&self.config.confidence, input)
    }

    /// Continuous (per-answer) difficulty adaptation. Mutates the given
    /// state only; persisting it via `SkillStateStore::upsert` is the
    /// caller's job after grading.
    pub fn apply_attempt(&self, state: &mut SkillState, outcome: &AttemptOutcome) {
        adapter::apply_attempt(state, outcome);
    }

    fn skill_snapshot(
        &self,
        user_id: &str,
        module_id: &str,
        skill_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(SkillCategory, f64), EngineError> {
        match self.skill_states.get(user_id, module_id, skill_id)? {
            Some(state) => {
                let effective = decay::effective_mastery(&self.config.decay, &state, now);
                Ok((
                    classifier::classify(&self.config.classifier, effective),
                    effective,
                ))
            }
            None => Ok((SkillCategory::Unstarted, 0.0)),
        }
    }
}

// The engine is shared across request handlers; nothing inside it is
// mutable, so the auto-derived markers must hold.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PracticeEngine>();
};
