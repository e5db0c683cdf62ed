//! Timeline entry and projected display item

use serde::{Deserialize, Serialize};

use crate::types::{BirdState, Mood};

/// Denormalized snapshot of a completed day, taken at learn time
///
/// Append-only: re-completing the same day replaces the entry with the
/// same id rather than merging into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Same as the date key in the current flow
    pub id: String,
    /// YYYY-MM-DD
    pub date: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub bird_state: Mood,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file_name: Option<String>,
}

/// Display-ready projection of one day record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub date: String,
    /// Date with dots, e.g. 2025.03.01
    pub date_label: String,
    /// Row label of the highest-priority raised flag
    pub title: String,
    /// First extracted sentence, if any
    pub subtitle: Option<String>,
    pub tags: Vec<String>,
    pub bird: BirdState,
    pub learned: bool,
    pub upload_count: u32,
}

/// Format a date key for display (2025-03-01 → 2025.03.01)
pub fn format_date_label(date_key: &str) -> String {
    date_key.replace('-', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_label() {
        assert_eq!(format_date_label("2025-03-01"), "2025.03.01");
    }

    #[test]
    fn test_entry_roundtrip() {
        let entry = TimelineEntry {
            id: "2025-03-01".to_string(),
            date: "2025-03-01".to_string(),
            summary: "오늘의 대화 기록이 남았어요.".to_string(),
            tags: vec!["부탁".to_string()],
            bird_state: Mood::Cautious,
            created_at: "2025-03-01T12:00:00+09:00".to_string(),
            source_file_name: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let restored: TimelineEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, entry);
    }
}
