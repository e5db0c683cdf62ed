//! Day record store and whole-collection persistence
//!
//! Every mutation is read-full-collection → mutate-in-memory →
//! write-full-collection. The persisted form is one JSON file per
//! collection; last writer wins across processes, same as the original
//! key-value storage this replaces.
//!
//! Store operations take the date key explicitly. "Today" is resolved by
//! the caller (see `core::clock`), which keeps the lifecycle deterministic
//! under test.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::clock::now_iso;
use crate::types::{DayRecord, ImportDraft, Mood, Profile, StorageError, TimelineEntry};

// =============================================================================
// STORAGE COLLABORATOR
// =============================================================================

/// Collection file names, versioned like the original storage keys
pub const DAY_RECORDS_FILE: &str = "birdguard.day_records.v1.json";
pub const TIMELINE_FILE: &str = "birdguard.timeline_entries.v1.json";
pub const PROFILE_FILE: &str = "birdguard.profile.v1.json";

/// Serialized read/write surface for the three persisted collections
pub trait Storage: Send + Sync {
    fn load_day_records(&self) -> Result<Vec<DayRecord>, StorageError>;
    fn save_day_records(&self, records: &[DayRecord]) -> Result<(), StorageError>;
    fn load_timeline(&self) -> Result<Vec<TimelineEntry>, StorageError>;
    fn save_timeline(&self, entries: &[TimelineEntry]) -> Result<(), StorageError>;
    fn load_profile(&self) -> Result<Option<Profile>, StorageError>;
    fn save_profile(&self, profile: &Profile) -> Result<(), StorageError>;
}

/// JSON-file-per-collection storage under a data directory
///
/// A missing or unreadable file loads as the empty collection; only saves
/// propagate errors ("could not save, try again").
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load_collection<T: serde::de::DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.dir.join(file);
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn save_collection<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(value)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(file), json)?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load_day_records(&self) -> Result<Vec<DayRecord>, StorageError> {
        Ok(self.load_collection(DAY_RECORDS_FILE))
    }

    fn save_day_records(&self, records: &[DayRecord]) -> Result<(), StorageError> {
        self.save_collection(DAY_RECORDS_FILE, &records)
    }

    fn load_timeline(&self) -> Result<Vec<TimelineEntry>, StorageError> {
        Ok(self.load_collection(TIMELINE_FILE))
    }

    fn save_timeline(&self, entries: &[TimelineEntry]) -> Result<(), StorageError> {
        self.save_collection(TIMELINE_FILE, &entries)
    }

    fn load_profile(&self) -> Result<Option<Profile>, StorageError> {
        Ok(self.load_collection(PROFILE_FILE))
    }

    fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        self.save_collection(PROFILE_FILE, &Some(profile))
    }
}

/// In-memory storage for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    day_records: Mutex<Vec<DayRecord>>,
    timeline: Mutex<Vec<TimelineEntry>>,
    profile: Mutex<Option<Profile>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many save calls hit this storage (any collection)
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Storage for MemoryStorage {
    fn load_day_records(&self) -> Result<Vec<DayRecord>, StorageError> {
        Ok(self.day_records.lock().unwrap().clone())
    }

    fn save_day_records(&self, records: &[DayRecord]) -> Result<(), StorageError> {
        *self.day_records.lock().unwrap() = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_timeline(&self) -> Result<Vec<TimelineEntry>, StorageError> {
        Ok(self.timeline.lock().unwrap().clone())
    }

    fn save_timeline(&self, entries: &[TimelineEntry]) -> Result<(), StorageError> {
        *self.timeline.lock().unwrap() = entries.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<Profile>, StorageError> {
        Ok(self.profile.lock().unwrap().clone())
    }

    fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        *self.profile.lock().unwrap() = Some(profile.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// DAY RECORD STORE
// =============================================================================

/// Date-keyed aggregate of imported conversations
///
/// Invariants: at most one record per date key; `upload_count` never
/// decreases; `learned` and `immediate_risk_shown` survive merges.
pub struct DayRecordStore {
    storage: Arc<dyn Storage>,
    records: Vec<DayRecord>,
}

impl DayRecordStore {
    /// Open the store, normalizing and re-persisting whatever was on disk
    pub fn open(storage: Arc<dyn Storage>) -> Result<Self, StorageError> {
        let mut store = Self {
            storage,
            records: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Load persisted records and write the normalized form back
    ///
    /// Deserialization backfills `learned` / `immediate_risk` /
    /// `immediate_risk_shown` defaults for records created before those
    /// fields existed; saving afterwards makes the migration stick.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        let loaded = self.storage.load_day_records()?;
        self.storage.save_day_records(&loaded)?;
        self.records = loaded;
        Ok(())
    }

    /// All records, insertion order (newest import first)
    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    /// Record for a date key, if present
    pub fn get(&self, date_key: &str) -> Option<&DayRecord> {
        self.records.iter().find(|record| record.date == date_key)
    }

    /// First record with unacknowledged immediate risk, if any
    pub fn pending_risk_overlay(&self) -> Option<&DayRecord> {
        self.records.iter().find(|record| record.needs_risk_overlay())
    }

    /// Merge one import event into the record for `date_key`
    ///
    /// Existing record: sentences/flags/file name are overwritten (native
    /// sentences and immediate risk fall back to previous values),
    /// `upload_count` increments, `learned` and `immediate_risk_shown`
    /// are preserved. Absent: a fresh record with `upload_count` 1.
    pub fn add_or_update(
        &mut self,
        date_key: &str,
        draft: ImportDraft,
    ) -> Result<DayRecord, StorageError> {
        let now = now_iso();

        let next = match self.get(date_key) {
            Some(existing) => DayRecord {
                extracted_sentences: draft.extracted_sentences,
                native_sentences: draft.native_sentences.or_else(|| existing.native_sentences.clone()),
                source_file_name: draft
                    .source_file_name
                    .or_else(|| existing.source_file_name.clone()),
                flags: draft.flags,
                immediate_risk: draft.immediate_risk.unwrap_or(existing.immediate_risk),
                upload_count: existing.upload_count + 1,
                updated_at: now,
                ..existing.clone()
            },
            None => DayRecord {
                id: DayRecord::id_for(date_key),
                date: date_key.to_string(),
                source: "kakaotalk_txt".to_string(),
                source_file_name: draft.source_file_name,
                extracted_sentences: draft.extracted_sentences,
                native_sentences: draft.native_sentences,
                flags: draft.flags,
                upload_count: 1,
                learned: false,
                bird_state: None,
                immediate_risk: draft.immediate_risk.unwrap_or_default(),
                immediate_risk_shown: false,
                created_at: now.clone(),
                updated_at: now,
            },
        };

        self.commit(date_key, next.clone())?;
        Ok(next)
    }

    /// Mark the record for `date_key` learned, optionally stamping a mood
    ///
    /// Returns `None` without touching storage when no record exists.
    /// Repeat calls keep `learned` true but still refresh `updated_at`
    /// and may overwrite the mood.
    pub fn mark_learned(
        &mut self,
        date_key: &str,
        mood: Option<Mood>,
    ) -> Result<Option<DayRecord>, StorageError> {
        let existing = match self.get(date_key) {
            Some(record) => record.clone(),
            None => return Ok(None),
        };

        let next = DayRecord {
            learned: true,
            bird_state: mood.or(existing.bird_state),
            updated_at: now_iso(),
            ..existing
        };
        self.commit(date_key, next.clone())?;
        Ok(Some(next))
    }

    /// Acknowledge the risk overlay for a date; idempotent, monotone
    pub fn mark_immediate_risk_shown(
        &mut self,
        date_key: &str,
    ) -> Result<Option<DayRecord>, StorageError> {
        let existing = match self.get(date_key) {
            Some(record) => record.clone(),
            None => return Ok(None),
        };

        let next = DayRecord {
            immediate_risk_shown: true,
            updated_at: now_iso(),
            ..existing
        };
        self.commit(date_key, next.clone())?;
        Ok(Some(next))
    }

    /// Replace/insert the record for a date, persist, then commit in memory
    ///
    /// Persisting before committing keeps the in-memory view unchanged when
    /// the save fails; no partial application.
    fn commit(&mut self, date_key: &str, next: DayRecord) -> Result<(), StorageError> {
        let mut updated = self.records.clone();
        match updated.iter_mut().find(|record| record.date == date_key) {
            Some(slot) => *slot = next,
            None => updated.insert(0, next),
        }
        self.storage.save_day_records(&updated)?;
        self.records = updated;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DayFlags, ImmediateRisk};

    fn draft(sentences: &[&str], flags: DayFlags) -> ImportDraft {
        ImportDraft {
            extracted_sentences: sentences.iter().map(|s| s.to_string()).collect(),
            flags,
            ..ImportDraft::default()
        }
    }

    fn open_store() -> (DayRecordStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = DayRecordStore::open(storage.clone() as Arc<dyn Storage>).unwrap();
        (store, storage)
    }

    #[test]
    fn test_first_import_creates_record() {
        let (mut store, _) = open_store();
        let record = store
            .add_or_update("2025-03-01", draft(&["안녕"], DayFlags::none()))
            .unwrap();

        assert_eq!(record.id, "day_2025-03-01");
        assert_eq!(record.upload_count, 1);
        assert!(!record.learned);
        assert!(!record.immediate_risk_shown);
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn test_second_import_merges_and_increments() {
        let (mut store, _) = open_store();
        let flags_a = DayFlags {
            money_request: true,
            ..DayFlags::none()
        };
        let flags_b = DayFlags {
            link_included: true,
            ..DayFlags::none()
        };

        store.add_or_update("2025-03-01", draft(&["첫 번째"], flags_a)).unwrap();
        store.mark_learned("2025-03-01", None).unwrap();
        let record = store
            .add_or_update("2025-03-01", draft(&["두 번째"], flags_b))
            .unwrap();

        // Flags overwritten wholesale, not unioned
        assert!(!record.flags.money_request);
        assert!(record.flags.link_included);
        assert_eq!(record.upload_count, 2);
        assert_eq!(record.extracted_sentences, vec!["두 번째"]);
        // learned survives the merge
        assert!(record.learned);
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn test_merge_falls_back_to_previous_optionals() {
        let (mut store, _) = open_store();
        let mut first = draft(&["a"], DayFlags::none());
        first.source_file_name = Some("chat.txt".to_string());
        first.native_sentences = Some(vec!["A".to_string()]);
        first.immediate_risk = Some(ImmediateRisk {
            scam_url: true,
            ..ImmediateRisk::default()
        });
        store.add_or_update("2025-03-01", first).unwrap();

        let record = store
            .add_or_update("2025-03-01", draft(&["b"], DayFlags::none()))
            .unwrap();
        assert_eq!(record.source_file_name.as_deref(), Some("chat.txt"));
        assert_eq!(record.native_sentences, Some(vec!["A".to_string()]));
        assert!(record.immediate_risk.scam_url);
    }

    #[test]
    fn test_mark_learned_missing_date_is_noop() {
        let (mut store, storage) = open_store();
        let saves_before = storage.save_count();

        let result = store.mark_learned("2025-03-01", Some(Mood::Calm)).unwrap();
        assert!(result.is_none());
        assert_eq!(storage.save_count(), saves_before, "no-op must not persist");
    }

    #[test]
    fn test_mark_learned_stamps_mood_and_is_idempotent_in_effect() {
        let (mut store, _) = open_store();
        store.add_or_update("2025-03-01", draft(&["a"], DayFlags::none())).unwrap();

        let first = store.mark_learned("2025-03-01", Some(Mood::Anxious)).unwrap().unwrap();
        assert!(first.learned);
        assert_eq!(first.bird_state, Some(Mood::Anxious));

        // Second call keeps learned, can overwrite the mood
        let second = store.mark_learned("2025-03-01", Some(Mood::Calm)).unwrap().unwrap();
        assert!(second.learned);
        assert_eq!(second.bird_state, Some(Mood::Calm));

        // No mood supplied: previous mood kept
        let third = store.mark_learned("2025-03-01", None).unwrap().unwrap();
        assert_eq!(third.bird_state, Some(Mood::Calm));
    }

    #[test]
    fn test_mark_risk_shown_idempotent() {
        let (mut store, _) = open_store();
        let mut first = draft(&["a"], DayFlags::none());
        first.immediate_risk = Some(ImmediateRisk {
            ai_image: true,
            ..ImmediateRisk::default()
        });
        store.add_or_update("2025-03-01", first).unwrap();
        assert!(store.pending_risk_overlay().is_some());

        let once = store.mark_immediate_risk_shown("2025-03-01").unwrap().unwrap();
        assert!(once.immediate_risk_shown);
        assert!(store.pending_risk_overlay().is_none());

        let twice = store.mark_immediate_risk_shown("2025-03-01").unwrap().unwrap();
        assert!(twice.immediate_risk_shown);

        assert!(store.mark_immediate_risk_shown("1999-01-01").unwrap().is_none());
    }

    #[test]
    fn test_distinct_dates_stay_distinct() {
        let (mut store, _) = open_store();
        store.add_or_update("2025-03-01", draft(&["a"], DayFlags::none())).unwrap();
        store.add_or_update("2025-03-02", draft(&["b"], DayFlags::none())).unwrap();

        assert_eq!(store.records().len(), 2);
        assert_eq!(store.get("2025-03-01").unwrap().upload_count, 1);
        assert_eq!(store.get("2025-03-02").unwrap().upload_count, 1);
    }

    #[test]
    fn test_reload_roundtrip() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut store = DayRecordStore::open(storage.clone() as Arc<dyn Storage>).unwrap();
            store.add_or_update("2025-03-01", draft(&["a"], DayFlags::none())).unwrap();
        }

        let store = DayRecordStore::open(storage as Arc<dyn Storage>).unwrap();
        let record = store.get("2025-03-01").unwrap();
        assert_eq!(record.upload_count, 1);
        assert_eq!(record.extracted_sentences, vec!["a"]);
    }
}
