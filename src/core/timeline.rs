//! Timeline store, learn completion, and the read-side projection

use std::sync::Arc;

use crate::core::clock::now_iso;
use crate::core::escalation::risk_level_for_flags;
use crate::core::store::{DayRecordStore, Storage};
use crate::types::{
    format_date_label, BirdState, DayRecord, FlagKind, RiskLevel, StorageError, TimelineEntry,
    TimelineItem,
};
use crate::MAX_LEARN_SENTENCES;

/// Summary fallback for a completed day with no extracted sentences
pub const EMPTY_DAY_SUMMARY: &str = "오늘의 대화 기록이 남았어요.";

/// Card title for a day with no raised flags
pub const NO_FLAGS_TITLE: &str = "오늘은 특별한 항목이 없었어요.";

// =============================================================================
// TIMELINE STORE
// =============================================================================

/// Append-only entry collection, newest first
///
/// Appending an entry whose id already exists replaces the prior entry;
/// re-completing a day supersedes its snapshot rather than merging.
pub struct TimelineStore {
    storage: Arc<dyn Storage>,
    entries: Vec<TimelineEntry>,
}

impl TimelineStore {
    pub fn open(storage: Arc<dyn Storage>) -> Result<Self, StorageError> {
        let entries = storage.load_timeline()?;
        Ok(Self { storage, entries })
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.entries = self.storage.load_timeline()?;
        Ok(())
    }

    /// Prepend an entry, dropping any prior entry with the same id
    pub fn add(&mut self, entry: TimelineEntry) -> Result<(), StorageError> {
        let mut updated: Vec<TimelineEntry> = Vec::with_capacity(self.entries.len() + 1);
        updated.push(entry.clone());
        updated.extend(self.entries.iter().filter(|item| item.id != entry.id).cloned());

        self.storage.save_timeline(&updated)?;
        self.entries = updated;
        Ok(())
    }
}

// =============================================================================
// LEARN FLOW
// =============================================================================

/// Result of completing one day's learning
#[derive(Debug, Clone)]
pub struct LearnOutcome {
    pub record: DayRecord,
    pub entry: TimelineEntry,
    pub risk_level: RiskLevel,
}

/// The sentences presented for learning (first 3)
pub fn learn_sentences(record: &DayRecord) -> &[String] {
    let end = record.extracted_sentences.len().min(MAX_LEARN_SENTENCES);
    &record.extracted_sentences[..end]
}

/// Complete today's learning
///
/// Rates the day's flags, marks the record learned with the matching mood,
/// and appends the timeline snapshot (id = date key). Returns `None` when
/// the date has no record.
pub fn complete_learning(
    records: &mut DayRecordStore,
    timeline: &mut TimelineStore,
    date_key: &str,
) -> Result<Option<LearnOutcome>, StorageError> {
    let target = match records.get(date_key) {
        Some(record) => record.clone(),
        None => return Ok(None),
    };

    let risk_level = risk_level_for_flags(&target.flags);
    let mood = risk_level.to_mood();

    let record = match records.mark_learned(date_key, Some(mood))? {
        Some(record) => record,
        None => return Ok(None),
    };

    let summary = target
        .extracted_sentences
        .first()
        .cloned()
        .unwrap_or_else(|| EMPTY_DAY_SUMMARY.to_string());

    let entry = TimelineEntry {
        id: date_key.to_string(),
        date: date_key.to_string(),
        summary,
        tags: target.flags.tags(),
        bird_state: mood,
        created_at: now_iso(),
        source_file_name: target.source_file_name,
    };
    timeline.add(entry.clone())?;

    Ok(Some(LearnOutcome {
        record,
        entry,
        risk_level,
    }))
}

// =============================================================================
// PROJECTION
// =============================================================================

/// Project day records into display items: descending date order, optional
/// per-flag filter, flag-priority title, visual bird with healthy fallback
pub fn project(records: &[DayRecord], filter: Option<FlagKind>) -> Vec<TimelineItem> {
    let mut sorted: Vec<&DayRecord> = records
        .iter()
        .filter(|record| filter.map_or(true, |kind| record.flags.has(kind)))
        .collect();
    // Lexicographic on YYYY-MM-DD is chronological
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .map(|record| TimelineItem {
            date: record.date.clone(),
            date_label: format_date_label(&record.date),
            title: record
                .flags
                .primary()
                .map(|kind| kind.label().to_string())
                .unwrap_or_else(|| NO_FLAGS_TITLE.to_string()),
            subtitle: record.extracted_sentences.first().cloned(),
            tags: record.flags.tags(),
            bird: BirdState::from_mood(record.bird_state),
            learned: record.learned,
            upload_count: record.upload_count,
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
