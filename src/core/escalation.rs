//! Escalation model: two pure mappings that must not be conflated
//!
//! - upload count → bird state (4 buckets, cumulative strain over a day)
//! - flag count → risk level (3 buckets, a single conversation's density)

use crate::types::{BirdState, DayFlags, RiskLevel};
use crate::{RISK_FLAGS_ANXIOUS_MIN, UPLOADS_DISTORTED_MAX, UPLOADS_HEALTHY_MAX, UPLOADS_UNEASY_MAX};

/// Map cumulative upload count to the visual bird state
///
/// Monotone non-decreasing: {0,1}→healthy, {2,3}→uneasy, {4,5}→distorted,
/// {6,...}→critical.
pub fn bird_state_for_uploads(upload_count: u32) -> BirdState {
    if upload_count <= UPLOADS_HEALTHY_MAX {
        BirdState::Healthy
    } else if upload_count <= UPLOADS_UNEASY_MAX {
        BirdState::Uneasy
    } else if upload_count <= UPLOADS_DISTORTED_MAX {
        BirdState::Distorted
    } else {
        BirdState::Critical
    }
}

/// Rate one day's flag density, used at learn time for the timeline entry
pub fn risk_level_for_flags(flags: &DayFlags) -> RiskLevel {
    let count = flags.count();
    if count >= RISK_FLAGS_ANXIOUS_MIN {
        RiskLevel::Anxious
    } else if count == 1 {
        RiskLevel::Cautious
    } else {
        RiskLevel::Calm
    }
}

// =============================================================================
// TESTS
// =============================================================================
