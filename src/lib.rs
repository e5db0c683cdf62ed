//! BirdGuard core: risk-signal extraction and day-record lifecycle engine
//!
//! Pipeline: raw conversation text → ConversationParser → flags →
//! DayRecordStore → escalation (bird state / risk level) → timeline projection

pub mod core;
pub mod types;

// =============================================================================
// ESCALATION THRESHOLDS
// =============================================================================

/// Highest upload count that still maps to a healthy bird
pub const UPLOADS_HEALTHY_MAX: u32 = 1;

/// Highest upload count that maps to an uneasy bird
pub const UPLOADS_UNEASY_MAX: u32 = 3;

/// Highest upload count that maps to a distorted bird (above: critical)
pub const UPLOADS_DISTORTED_MAX: u32 = 5;

/// Flag count at which a single day's conversation rates anxious
pub const RISK_FLAGS_ANXIOUS_MIN: usize = 2;

// =============================================================================
// LEARN FLOW
// =============================================================================

/// How many extracted sentences a day record retains per import; also the
/// number the learn flow presents
pub const MAX_LEARN_SENTENCES: usize = 3;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
