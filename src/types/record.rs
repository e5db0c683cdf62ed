//! Day record model
//!
//! One record per Seoul calendar date. `upload_count` never decreases,
//! `immediate_risk_shown` only flips false → true, and `flags` always hold
//! the most recent import's classification (overwritten, not unioned).

use serde::{Deserialize, Serialize};

use crate::types::{DayFlags, Mood, ParsedConversation};
use crate::MAX_LEARN_SENTENCES;

/// Externally supplied risk signals attached to a day record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmediateRisk {
    /// Link already reported as a scam
    pub scam_url: bool,
    /// Account already reported
    pub reported_account: bool,
    /// Image judged AI-generated
    pub ai_image: bool,
}

impl ImmediateRisk {
    /// Any signal raised?
    pub fn any(&self) -> bool {
        self.scam_url || self.reported_account || self.ai_image
    }

    /// One Korean label per raised signal
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.scam_url {
            labels.push("신고된 링크");
        }
        if self.reported_account {
            labels.push("신고된 계좌");
        }
        if self.ai_image {
            labels.push("합성 이미지");
        }
        labels
    }
}

/// Per-calendar-date aggregate of imported conversation content
///
/// Fields added after early releases carry serde defaults, so loading an old
/// collection backfills them; `reload` persists the normalized form back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// `day_<date>`, deterministic from the date key
    pub id: String,
    /// Seoul calendar key, YYYY-MM-DD, unique per record
    pub date: String,
    /// Import source channel
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file_name: Option<String>,
    /// Ordered message lines from the most recent import
    pub extracted_sentences: Vec<String>,
    /// Optional translations, index-aligned with `extracted_sentences`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_sentences: Option<Vec<String>>,
    pub flags: DayFlags,
    /// One increment per import landing on this date
    pub upload_count: u32,
    /// Set exactly once per day via the learn completion
    #[serde(default)]
    pub learned: bool,
    /// Mood stamped at learn time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bird_state: Option<Mood>,
    #[serde(default)]
    pub immediate_risk: ImmediateRisk,
    /// Flips true once the user acknowledges the risk overlay
    #[serde(default)]
    pub immediate_risk_shown: bool,
    /// ISO timestamps
    pub created_at: String,
    pub updated_at: String,
}

impl DayRecord {
    /// Deterministic record id for a date key
    pub fn id_for(date_key: &str) -> String {
        format!("day_{}", date_key)
    }

    /// Does this record still need its risk overlay shown?
    pub fn needs_risk_overlay(&self) -> bool {
        !self.immediate_risk_shown && self.immediate_risk.any()
    }
}

/// Input for one import event, merged into the record of the target date
#[derive(Debug, Clone, Default)]
pub struct ImportDraft {
    pub extracted_sentences: Vec<String>,
    pub flags: DayFlags,
    /// Falls back to the previous value when absent on a merge
    pub native_sentences: Option<Vec<String>>,
    pub source_file_name: Option<String>,
    pub immediate_risk: Option<ImmediateRisk>,
}

impl ImportDraft {
    /// Build the draft for one parsed import
    ///
    /// Records retain only the first `MAX_LEARN_SENTENCES` messages; the
    /// cap is applied here, at import time, not at display time.
    pub fn from_parsed(parsed: &ParsedConversation) -> Self {
        Self {
            extracted_sentences: parsed
                .messages
                .iter()
                .take(MAX_LEARN_SENTENCES)
                .cloned()
                .collect(),
            flags: parsed.flags,
            ..Self::default()
        }
    }
}
