#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use practice_engine::store::{
    DrillHistoryStore, QuestionFilter, QuestionRepository, SkillStateStore, StoreError,
};
use practice_engine::types::{DrillAnswer, DrillHistory, QuestionItem, SkillState};
use practice_engine::{EngineConfig, PracticeEngine};

pub struct MemorySkillStateStore {
    states: RwLock<Vec<SkillState>>,
}

impl MemorySkillStateStore {
    pub fn new(states: Vec<SkillState>) -> Self {
        Self {
            states: RwLock::new(states),
        }
    }
}

impl SkillStateStore for MemorySkillStateStore {
    fn list_by_user(&self, user_id: &str) -> Result<Vec<SkillState>, StoreError> {
        Ok(self
            .states
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get(
        &self,
        user_id: &str,
        module_id: &str,
        skill_id: &str,
    ) -> Result<Option<SkillState>, StoreError> {
        Ok(self
            .states
            .read()
            .unwrap()
            .iter()
            .find(|s| {
                s.user_id == user_id && s.module_id == module_id && s.skill_id == skill_id
            })
            .cloned())
    }

    fn upsert(&self, state: &SkillState) -> Result<(), StoreError> {
        let mut states = self.states.write().unwrap();
        match states.iter_mut().find(|s| {
            s.user_id == state.user_id
                && s.module_id == state.module_id
                && s.skill_id == state.skill_id
        }) {
            Some(existing) => *existing = state.clone(),
            None => states.push(state.clone()),
        }
        Ok(())
    }
}

pub struct MemoryQuestionRepository {
    questions: Vec<QuestionItem>,
}

impl MemoryQuestionRepository {
    pub fn new(mut questions: Vec<QuestionItem>) -> Self {
        // deterministic order so seeded-rng tests are stable
        questions.sort_by(|a, b| (a.difficulty, &a.id).cmp(&(b.difficulty, &b.id)));
        Self { questions }
    }
}

impl QuestionRepository for MemoryQuestionRepository {
    fn find(&self, filter: &QuestionFilter) -> Result<Vec<QuestionItem>, StoreError> {
        Ok(self
            .questions
            .iter()
            .filter(|q| {
                filter
                    .module_id
                    .as_ref()
                    .map_or(true, |m| &q.module_id == m)
                    && filter.skill_id.as_ref().map_or(true, |s| &q.skill_id == s)
                    && q.difficulty >= filter.difficulty_min
                    && q.difficulty <= filter.difficulty_max
                    && !filter.excluding.contains(&q.id)
            })
            .cloned()
            .collect())
    }

    fn distinct_skill_ids(&self, module_id: &str) -> Result<Vec<String>, StoreError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for q in self.questions.iter().filter(|q| q.module_id == module_id) {
            if seen.insert(q.skill_id.clone()) {
                out.push(q.skill_id.clone());
            }
        }
        out.sort();
        Ok(out)
    }

    fn lowest_difficulty_available(
        &self,
        module_id: &str,
        skill_id: &str,
        excluding: &HashSet<String>,
    ) -> Result<Option<QuestionItem>, StoreError> {
        Ok(self
            .questions
            .iter()
            .filter(|q| {
                q.module_id == module_id
                    && q.skill_id == skill_id
                    && !excluding.contains(&q.id)
            })
            .min_by(|a, b| (a.difficulty, &a.id).cmp(&(b.difficulty, &b.id)))
            .cloned())
    }
}

pub struct MemoryDrillHistoryStore {
    /// Most recent first, matching the store contract.
    drills: Vec<DrillHistory>,
}

impl MemoryDrillHistoryStore {
    pub fn new(drills: Vec<DrillHistory>) -> Self {
        Self { drills }
    }
}

impl DrillHistoryStore for MemoryDrillHistoryStore {
    fn recent_completed_drills(
        &self,
        _user_id: &str,
        _module_id: &str,
        limit: usize,
    ) -> Result<Vec<DrillHistory>, StoreError> {
        Ok(self.drills.iter().take(limit).cloned().collect())
    }
}

/// Every call fails, for dependency-propagation tests.
pub struct FailingStore;

impl SkillStateStore for FailingStore {
    fn list_by_user(&self, _user_id: &str) -> Result<Vec<SkillState>, StoreError> {
        Err(StoreError::Unavailable("skill state store down".into()))
    }

    fn get(
        &self,
        _user_id: &str,
        _module_id: &str,
        _skill_id: &str,
    ) -> Result<Option<SkillState>, StoreError> {
        Err(StoreError::Unavailable("skill state store down".into()))
    }

    fn upsert(&self, _state: &SkillState) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("skill state store down".into()))
    }
}

impl QuestionRepository for FailingStore {
    fn find(&self, _filter: &QuestionFilter) -> Result<Vec<QuestionItem>, StoreError> {
        Err(StoreError::Unavailable("question repository down".into()))
    }

    fn distinct_skill_ids(&self, _module_id: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("question repository down".into()))
    }

    fn lowest_difficulty_available(
        &self,
        _module_id: &str,
        _skill_id: &str,
        _excluding: &HashSet<String>,
    ) -> Result<Option<QuestionItem>, StoreError> {
        Err(StoreError::Unavailable("question repository down".into()))
    }
}

impl DrillHistoryStore for FailingStore {
    fn recent_completed_drills(
        &self,
        _user_id: &str,
        _module_id: &str,
        _limit: usize,
    ) -> Result<Vec<DrillHistory>, StoreError> {
        Err(StoreError::Unavailable("drill history store down".into()))
    }
}

pub fn question(id: &str, module_id: &str, skill_id: &str, difficulty: i32) -> QuestionItem {
    QuestionItem {
        id: id.to_string(),
        module_id: module_id.to_string(),
        skill_id: skill_id.to_string(),
        difficulty,
        expected_time_seconds: 60.0,
    }
}

/// A skill state practiced `days_ago` days before `now` with the given
/// cumulative accuracy baked in.
pub fn skill_state(
    user_id: &str,
    module_id: &str,
    skill_id: &str,
    mastery: f64,
    difficulty: i32,
    days_ago: i64,
    now: DateTime<Utc>,
) -> SkillState {
    let mut state = SkillState::new(user_id, module_id, skill_id);
    state.mastery_level = mastery;
    state.current_difficulty = difficulty;
    state.attempts = 20;
    state.correct = (20.0 * mastery).round() as i64;
    state.last_practiced = Some(now - Duration::days(days_ago));
    state
}

pub fn drill(completed_at: DateTime<Utc>, answers: Vec<(&str, &str, i32, bool)>) -> DrillHistory {
    DrillHistory {
        completed_at,
        answers: answers
            .into_iter()
            .map(|(question_id, skill_id, difficulty_attempted, is_correct)| DrillAnswer {
                question_id: question_id.to_string(),
                skill_id: skill_id.to_string(),
                difficulty_attempted,
                is_correct,
            })
            .collect(),
    }
}

pub fn engine(
    states: Vec<SkillState>,
    questions: Vec<QuestionItem>,
    drills: Vec<DrillHistory>,
) -> PracticeEngine {
    PracticeEngine::new(
        EngineConfig::default(),
        Arc::new(MemorySkillStateStore::new(states)),
        Arc::new(MemoryQuestionRepository::new(questions)),
        Arc::new(MemoryDrillHistoryStore::new(drills)),
    )
}
