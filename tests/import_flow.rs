//! Integration tests for the import path
//!
//! Full path: raw text → ConversationParser → DayRecordStore → escalation

use pretty_assertions::assert_eq;
use std::sync::Arc;

use birdguard::core::{
    bird_state_for_uploads, ConversationParser, DayRecordStore, JsonFileStorage, MemoryStorage,
    Storage,
};
use birdguard::types::{BirdState, DayFlags, ImportDraft};

fn draft_from(text: &str) -> ImportDraft {
    ImportDraft::from_parsed(&ConversationParser::new().parse(text))
}

/// Scenario: favor request plus link, nothing else
#[test]
fn test_favor_and_link_import() {
    let parser = ConversationParser::new();
    let parsed = parser.parse("이번만 도와줄 수 있을까?\nhttp://example.com");

    assert_eq!(
        parsed.flags,
        DayFlags {
            money_request: false,
            favor_request: true,
            excessive_praise: false,
            link_included: true,
            image_included: false,
        }
    );
    assert_eq!(parsed.tags, vec!["부탁", "링크"]);
    assert_eq!(parsed.risk_flags_count, 2);
    assert_eq!(parsed.messages_count, 2);
}

/// Scenario: first import of a day is healthy, the second turns uneasy
#[test]
fn test_upload_count_drives_bird_state() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = DayRecordStore::open(storage as Arc<dyn Storage>).unwrap();

    let record = store.add_or_update("2025-03-01", draft_from("안녕하세요")).unwrap();
    assert_eq!(record.upload_count, 1);
    assert_eq!(bird_state_for_uploads(record.upload_count), BirdState::Healthy);

    let record = store.add_or_update("2025-03-01", draft_from("또 왔어요")).unwrap();
    assert_eq!(record.upload_count, 2);
    assert_eq!(bird_state_for_uploads(record.upload_count), BirdState::Uneasy);
}

/// Repeated imports walk the full escalation ladder
#[test]
fn test_escalation_ladder() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = DayRecordStore::open(storage as Arc<dyn Storage>).unwrap();

    let expected = [
        BirdState::Healthy,   // 1
        BirdState::Uneasy,    // 2
        BirdState::Uneasy,    // 3
        BirdState::Distorted, // 4
        BirdState::Distorted, // 5
        BirdState::Critical,  // 6
        BirdState::Critical,  // 7
    ];
    for (i, expected_state) in expected.iter().enumerate() {
        let record = store.add_or_update("2025-03-01", draft_from("메시지")).unwrap();
        assert_eq!(record.upload_count as usize, i + 1);
        assert_eq!(bird_state_for_uploads(record.upload_count), *expected_state);
    }
}

/// Flags reflect only the latest import of the day
#[test]
fn test_flags_are_overwritten_per_import() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = DayRecordStore::open(storage as Arc<dyn Storage>).unwrap();

    store
        .add_or_update("2025-03-01", draft_from("송금 좀 부탁해"))
        .unwrap();
    let record = store
        .add_or_update("2025-03-01", draft_from("고마워 잘 지내"))
        .unwrap();

    assert!(!record.flags.money_request);
    assert!(!record.flags.favor_request);
    assert_eq!(record.flags.count(), 0);
    assert_eq!(record.upload_count, 2);
}

/// Day records survive a save/load cycle through the file storage
#[test]
fn test_file_storage_roundtrip() {
    let dir = std::env::temp_dir().join(format!(
        "birdguard-import-test-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let storage = Arc::new(JsonFileStorage::new(&dir));

    {
        let mut store = DayRecordStore::open(storage.clone() as Arc<dyn Storage>).unwrap();
        store
            .add_or_update("2025-03-01", draft_from("사진 보낼게\nwww.example.com"))
            .unwrap();
        store.add_or_update("2025-03-02", draft_from("잘 자")).unwrap();
    }

    let store = DayRecordStore::open(storage as Arc<dyn Storage>).unwrap();
    assert_eq!(store.records().len(), 2);

    let first = store.get("2025-03-01").unwrap();
    assert!(first.flags.image_included);
    assert!(first.flags.link_included);
    assert_eq!(first.extracted_sentences, vec!["사진 보낼게", "www.example.com"]);
    assert_eq!(first.upload_count, 1);

    std::fs::remove_dir_all(&dir).ok();
}

/// Records retain only the first three sentences of an import
#[test]
fn test_import_caps_stored_sentences() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = DayRecordStore::open(storage as Arc<dyn Storage>).unwrap();

    let record = store
        .add_or_update("2025-03-01", draft_from("하나\n둘\n셋\n넷\n다섯"))
        .unwrap();
    assert_eq!(record.extracted_sentences, vec!["하나", "둘", "셋"]);
}

/// Opening a store over a pre-migration file backfills the newer fields
/// and writes the normalized collection back to disk
#[test]
fn test_open_migrates_legacy_file_on_disk() {
    let dir = std::env::temp_dir().join(format!(
        "birdguard-migration-test-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();

    // Collection written before learned/immediateRisk/immediateRiskShown existed
    let legacy = r#"[{
        "id": "day_2025-01-01",
        "date": "2025-01-01",
        "source": "kakaotalk_txt",
        "extractedSentences": ["안녕"],
        "flags": {
            "moneyRequest": false,
            "favorRequest": false,
            "excessivePraise": false,
            "linkIncluded": false,
            "imageIncluded": false
        },
        "uploadCount": 1,
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
    }]"#;
    let path = dir.join(birdguard::core::store::DAY_RECORDS_FILE);
    std::fs::write(&path, legacy).unwrap();

    let storage = Arc::new(JsonFileStorage::new(&dir));
    let store = DayRecordStore::open(storage as Arc<dyn Storage>).unwrap();
    let record = store.get("2025-01-01").unwrap();
    assert!(!record.learned);
    assert!(!record.immediate_risk_shown);
    assert!(!record.immediate_risk.any());

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[0]["learned"], false);
    assert_eq!(on_disk[0]["immediateRiskShown"], false);
    assert_eq!(on_disk[0]["immediateRisk"]["scamUrl"], false);

    std::fs::remove_dir_all(&dir).ok();
}

/// Empty lines and mixed newline styles do not produce messages
#[test]
fn test_parser_drops_empty_lines() {
    let parser = ConversationParser::new();
    let parsed = parser.parse("하나\r\n\r\n둘\n   \n셋");
    assert_eq!(parsed.messages, vec!["하나", "둘", "셋"]);
}
