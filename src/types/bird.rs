//! The three state scales of BirdGuard
//!
//! Deliberately distinct types, never merged:
//! - `BirdState`: 4-level visual escalation driven by cumulative uploads
//! - `RiskLevel`: 3-level rating of a single day's flag density
//! - `Mood`: 5-value state stamped onto records and timeline entries

use serde::{Deserialize, Serialize};

/// Visual bird escalation, driven by how many imports landed on a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirdState {
    /// At most one upload, nothing worrying yet
    Healthy,
    /// A couple of uploads, the bird is restless
    Uneasy,
    /// Repeated uploads, the bird is visibly strained
    Distorted,
    /// Six or more uploads in one day
    Critical,
}

impl BirdState {
    /// Emoji for state
    pub fn emoji(&self) -> &'static str {
        match self {
            BirdState::Healthy => "🐦",
            BirdState::Uneasy => "😟",
            BirdState::Distorted => "🌀",
            BirdState::Critical => "🚨",
        }
    }

    /// Map a stored mood to its visual bird, falling back to healthy when unset
    pub fn from_mood(mood: Option<Mood>) -> Self {
        match mood {
            Some(Mood::Calm) => BirdState::Healthy,
            Some(Mood::Cautious) => BirdState::Uneasy,
            Some(Mood::Anxious) => BirdState::Distorted,
            Some(Mood::Relieved) => BirdState::Healthy,
            Some(Mood::Growing) => BirdState::Healthy,
            None => BirdState::Healthy,
        }
    }
}

impl std::fmt::Display for BirdState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BirdState::Healthy => "HEALTHY",
            BirdState::Uneasy => "UNEASY",
            BirdState::Distorted => "DISTORTED",
            BirdState::Critical => "CRITICAL",
        };
        write!(f, "{}", name)
    }
}

/// Single-day risk rating derived from flag density at learn time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Calm,
    Cautious,
    Anxious,
}

impl RiskLevel {
    /// The mood stamped onto a record when a day at this level is completed
    pub fn to_mood(self) -> Mood {
        match self {
            RiskLevel::Calm => Mood::Calm,
            RiskLevel::Cautious => Mood::Cautious,
            RiskLevel::Anxious => Mood::Anxious,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskLevel::Calm => "calm",
            RiskLevel::Cautious => "cautious",
            RiskLevel::Anxious => "anxious",
        };
        write!(f, "{}", name)
    }
}

/// Stored mood on day records and timeline entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Calm,
    Cautious,
    Anxious,
    Relieved,
    Growing,
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mood::Calm => "calm",
            Mood::Cautious => "cautious",
            Mood::Anxious => "anxious",
            Mood::Relieved => "relieved",
            Mood::Growing => "growing",
        };
        write!(f, "{}", name)
    }
}
