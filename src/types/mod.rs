//! Core types for BirdGuard

mod bird;
mod conversation;
mod error;
mod flags;
mod profile;
mod record;
mod timeline;

pub use bird::{BirdState, Mood, RiskLevel};
pub use conversation::ParsedConversation;
pub use error::{ImportError, StorageError};
pub use flags::{DayFlags, FlagKind};
pub use profile::Profile;
pub use record::{DayRecord, ImmediateRisk, ImportDraft};
pub use timeline::{format_date_label, TimelineEntry, TimelineItem};
