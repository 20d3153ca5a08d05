//! Retention decay. Elapsed time since last practice shrinks the stored
//! mastery into an effective value; nothing here mutates state.

use chrono::{DateTime, Utc};

use crate::config::DecayParams;
use crate::types::SkillState;

/// `max(floor, e^(-rate × days))`. Negative elapsed time (clock skew)
/// counts as zero days.
pub fn decay_factor(params: &DecayParams, days_since_last_practice: f64) -> f64 {
    let days = days_since_last_practice.max(0.0);
    (-params.rate_per_day * days).exp().max(params.floor)
}

pub fn days_since(last_practiced: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let seconds = (now - last_practiced).num_seconds() as f64;
    (seconds / 86_400.0).max(0.0)
}

/// Decay multiplier for a skill. A never-practiced skill has nothing to
/// decay and keeps the full multiplier.
pub fn current_decay_factor(params: &DecayParams, state: &SkillState, now: DateTime<Utc>) -> f64 {
    match state.last_practiced {
        Some(last) => decay_factor(params, days_since(last, now)),
        None => 1.0,
    }
}

pub fn effective_mastery(params: &DecayParams, state: &SkillState, now: DateTime<Utc>) -> f64 {
    state.mastery_level * current_decay_factor(params, state, now)
}
