//! Interfaces to the surrounding backend. The engine owns no storage; it
//! reads skill state, question content and drill history through these
//! traits and leaves every write to the caller.

use std::collections::HashSet;

use crate::types::{DrillHistory, QuestionItem, SkillState};

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub module_id: Option<String>,
    pub skill_id: Option<String>,
    pub difficulty_min: i32,
    pub difficulty_max: i32,
    pub excluding: HashSet<String>,
}

impl QuestionFilter {
    pub fn any_difficulty() -> Self {
        Self {
            difficulty_min: crate::types::MIN_DIFFICULTY,
            difficulty_max: crate::types::MAX_DIFFICULTY,
            ..Self::default()
        }
    }
}

pub trait SkillStateStore: Send + Sync {
    fn list_by_user(&self, user_id: &str) -> Result<Vec<SkillState>, StoreError>;

    fn get(
        &self,
        user_id: &str,
        module_id: &str,
        skill_id: &str,
    ) -> Result<Option<SkillState>, StoreError>;

    fn upsert(&self, state: &SkillState) -> Result<(), StoreError>;
}

pub trait QuestionRepository: Send + Sync {
    fn find(&self, filter: &QuestionFilter) -> Result<Vec<QuestionItem>, StoreError>;

    fn distinct_skill_ids(&self, module_id: &str) -> Result<Vec<String>, StoreError>;

    /// Lowest-difficulty question still available for a skill, or `None`
    /// when the skill is exhausted.
    fn lowest_difficulty_available(
        &self,
        module_id: &str,
        skill_id: &str,
        excluding: &HashSet<String>,
    ) -> Result<Option<QuestionItem>, StoreError>;
}

pub trait DrillHistoryStore: Send + Sync {
    /// Completed drills for one (user, module), most recent first.
    fn recent_completed_drills(
        &self,
        user_id: &str,
        module_id: &str,
        limit: usize,
    ) -> Result<Vec<DrillHistory>, StoreError>;
}
