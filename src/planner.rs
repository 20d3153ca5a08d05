//! Session mix planning. Turns classified skills plus a target session
//! size into per-category question quotas, shifting slots away from
//! categories that cannot fill them.

use crate::config::PlannerParams;

pub const DEFAULT_SESSION_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryQuota {
    pub weak: usize,
    pub moderate: usize,
    pub strong: usize,
}

impl CategoryQuota {
    pub fn total(&self) -> usize {
        self.weak + self.moderate + self.strong
    }
}

/// Distinct skills available per category, as classified for this user.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryCounts {
    pub weak: usize,
    pub moderate: usize,
    pub strong: usize,
}

pub fn base_quota(params: &PlannerParams, session_size: usize) -> CategoryQuota {
    let weak = (session_size as f64 * params.weak_ratio).round() as usize;
    let moderate = (session_size as f64 * params.moderate_ratio).round() as usize;
    let strong = session_size.saturating_sub(weak + moderate);
    CategoryQuota {
        weak,
        moderate,
        strong,
    }
}

/// Moves slots out of under-populated categories: a weak shortfall splits
/// 60/40 toward moderate and strong (moderate share ceiling-rounded), and
/// any remaining moderate shortfall moves entirely to strong.
pub fn redistribute(
    params: &PlannerParams,
    quota: CategoryQuota,
    available: CategoryCounts,
) -> CategoryQuota {
    let mut weak = quota.weak;
    let mut moderate = quota.moderate;
    let mut strong = quota.strong;

    let weak_shortfall = weak.saturating_sub(available.weak);
    if weak_shortfall > 0 {
        weak = available.weak;
        let to_moderate = ((weak_shortfall as f64) * params.weak_overflow_to_moderate).ceil()
            as usize;
        let to_moderate = to_moderate.min(weak_shortfall);
        moderate += to_moderate;
        strong += weak_shortfall - to_moderate;
    }

    let moderate_shortfall = moderate.saturating_sub(available.moderate);
    if moderate_shortfall > 0 {
        moderate = available.moderate;
        strong += moderate_shortfall;
    }

    CategoryQuota {
        weak,
        moderate,
        strong,
    }
}

pub fn plan(params: &PlannerParams, session_size: usize, available: CategoryCounts) -> CategoryQuota {
    redistribute(params, base_quota(params, session_size), available)
}
