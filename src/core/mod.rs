//! Core engine: classifier, parser, store, escalation, timeline, API

pub mod api;
pub mod classifier;
pub mod clock;
pub mod escalation;
pub mod parser;
pub mod store;
pub mod timeline;

pub use api::{create_router, run_server};
pub use classifier::{Classify, KeywordClassifier};
pub use clock::{now_iso, seoul_date_key, today_seoul_key};
pub use escalation::{bird_state_for_uploads, risk_level_for_flags};
pub use parser::{ConversationParser, PlainTextFileSource, RawTextSource};
pub use store::{DayRecordStore, JsonFileStorage, MemoryStorage, Storage};
pub use timeline::{complete_learning, learn_sentences, project, LearnOutcome, TimelineStore};
