//! Need-tier classification over decayed mastery. Skills with no state
//! record are unstarted and handled by the beginner path, not here.

use chrono::{DateTime, Utc};

use crate::config::{ClassifierParams, DecayParams};
use crate::decay;
use crate::types::{SkillCategory, SkillState};

#[derive(Debug, Clone)]
pub struct ClassifiedSkill {
    pub state: SkillState,
    pub effective_mastery: f64,
    pub category: SkillCategory,
}

pub fn classify(params: &ClassifierParams, effective_mastery: f64) -> SkillCategory {
    if effective_mastery < params.weak_below {
        SkillCategory::Weak
    } else if effective_mastery < params.strong_at {
        SkillCategory::Moderate
    } else {
        SkillCategory::Strong
    }
}

pub fn classify_skills(
    classifier: &ClassifierParams,
    decay_params: &DecayParams,
    states: Vec<SkillState>,
    now: DateTime<Utc>,
) -> Vec<ClassifiedSkill> {
    states
        .into_iter()
        .map(|state| {
            let effective = decay::effective_mastery(decay_params, &state, now);
            let category = classify(classifier, effective);
            ClassifiedSkill {
                state,
                effective_mastery: effective,
                category,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn thresholds_bucket_correctly() {
        let params = ClassifierParams::default();
        assert_eq!(classify(&params, 0.0), SkillCategory::Weak);
        assert_eq!(classify(&params, 0.49), SkillCategory::Weak);
        assert_eq!(classify(&params, 0.50), SkillCategory::Moderate);
        assert_eq!(classify(&params, 0.74), SkillCategory::Moderate);
        assert_eq!(classify(&params, 0.75), SkillCategory::Strong);
        assert_eq!(classify(&params, 1.0), SkillCategory::Strong);
    }

    #[test]
    fn decayed_strong_skill_can_fall_to_weak() {
        let now = Utc::now();
        let mut state = SkillState::new("u1", "m1", "s1");
        state.mastery_level = 0.9;
        state.last_practiced = Some(now - Duration::days(60));

        let classified = classify_skills(
            &ClassifierParams::default(),
            &DecayParams::default(),
            vec![state],
            now,
        );
        // 0.9 × e^(-0.05 × 60) ≈ 0.045
        assert_eq!(classified[0].category, SkillCategory::Weak);
        assert!(classified[0].effective_mastery < 0.05);
    }
}
