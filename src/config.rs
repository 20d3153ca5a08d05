use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayParams {
    /// Exponential decay rate per day of inactivity.
    pub rate_per_day: f64,
    /// Retention multiplier never drops below this floor.
    pub floor: f64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            rate_per_day: 0.05,
            floor: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierParams {
    /// Effective mastery below this is weak.
    pub weak_below: f64,
    /// Effective mastery at or above this is strong.
    pub strong_at: f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            weak_below: 0.50,
            strong_at: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerParams {
    pub weak_ratio: f64,
    pub moderate_ratio: f64,
    /// Share of a weak-category shortfall that moves to moderate; the rest
    /// goes to strong.
    pub weak_overflow_to_moderate: f64,
    /// Modules the beginner path draws from when the caller supplies no
    /// focus modules.
    pub foundation_modules: Vec<String>,
    /// Beginner-path questions never exceed this difficulty.
    pub beginner_max_difficulty: i32,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            weak_ratio: 0.4,
            moderate_ratio: 0.4,
            weak_overflow_to_moderate: 0.6,
            foundation_modules: vec!["foundations".to_string()],
            beginner_max_difficulty: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorParams {
    /// Questions fetched per skill before moving to the next skill.
    pub per_skill_limit: usize,
    /// Difficulty band half-width around the per-skill target.
    pub band_radius: i32,
    /// Session-mode selection biases targets into [1, this]; the continuous
    /// adapter still owns the full [1, 10] range.
    pub session_difficulty_cap: i32,
}

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            per_skill_limit: 2,
            band_radius: 1,
            session_difficulty_cap: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillParams {
    /// Completed drills consulted for allocation weighting.
    pub history_window: usize,
    /// Below this accuracy the skill hard-resets to difficulty 1.
    pub reset_below: f64,
    pub mastered_mean: f64,
    pub mastered_min: f64,
    pub struggling_mean: f64,
    pub mastered_weight: f64,
    pub struggling_weight: f64,
}

impl Default for DrillParams {
    fn default() -> Self {
        Self {
            history_window: 3,
            reset_below: 0.40,
            mastered_mean: 0.90,
            mastered_min: 0.85,
            struggling_mean: 0.50,
            mastered_weight: 0.3,
            struggling_weight: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub correctness: f64,
    pub time: f64,
    pub hints: f64,
    pub difficulty: f64,
    /// Maximum score reduction from exhausting every hint.
    pub hint_penalty: f64,
    /// Hints factor never drops below this.
    pub hint_floor: f64,
    /// Standard deviation of the time Gaussian as a fraction of the
    /// expected time.
    pub sigma_ratio: f64,
    /// Substituted when the caller passes a non-positive expected time.
    pub default_expected_time: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            correctness: 0.40,
            time: 0.35,
            hints: 0.15,
            difficulty: 0.10,
            hint_penalty: 0.25,
            hint_floor: 0.75,
            sigma_ratio: 0.5,
            default_expected_time: 60.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub decay: DecayParams,
    pub classifier: ClassifierParams,
    pub planner: PlannerParams,
    pub selector: SelectorParams,
    pub drill: DrillParams,
    pub confidence: ConfidenceWeights,
}

impl EngineConfig {
    /// Defaults overridden by `PRACTICE_*` environment variables, with a
    /// `.env` file honored when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(val) = std::env::var("PRACTICE_DECAY_RATE") {
            config.decay.rate_per_day = val.parse().unwrap_or(config.decay.rate_per_day);
        }
        if let Ok(val) = std::env::var("PRACTICE_DECAY_FLOOR") {
            config.decay.floor = val.parse().unwrap_or(config.decay.floor);
        }
        if let Ok(val) = std::env::var("PRACTICE_FOUNDATION_MODULES") {
            let modules: Vec<String> = val
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            if !modules.is_empty() {
                config.planner.foundation_modules = modules;
            }
        }
        if let Ok(val) = std::env::var("PRACTICE_DRILL_HISTORY_WINDOW") {
            config.drill.history_window = val.parse().unwrap_or(config.drill.history_window);
        }

        config
    }
}
