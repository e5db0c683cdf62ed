//! Parser output bundle

use serde::{Deserialize, Serialize};

use crate::types::DayFlags;

/// Everything the parser derives from one imported conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConversation {
    /// Non-empty trimmed lines in original order
    pub messages: Vec<String>,
    /// First message, or a fixed fallback when the import was empty
    pub summary: String,
    /// One tag per raised flag, fixed display order
    pub tags: Vec<String>,
    /// Count of raised flags (0-5)
    pub risk_flags_count: usize,
    pub flags: DayFlags,
    pub raw_text_length: usize,
    pub messages_count: usize,
}
