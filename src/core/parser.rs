//! Conversation parser: decoded text → messages + flags
//!
//! Splits imported text into trimmed non-empty lines, joins them with
//! single spaces, and classifies the whole conversation at once; flags
//! are computed over the joined text, not per line.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::classifier::{Classify, KeywordClassifier};
use crate::types::{ImportError, ParsedConversation};

lazy_static! {
    /// Any newline sequence (\r\n or \n)
    static ref RE_LINE_BREAK: Regex = Regex::new(r"\r?\n").unwrap();
}

/// Fallback summary when an import carries no messages
pub const EMPTY_IMPORT_SUMMARY: &str = "오늘의 대화를 기록했어요.";

/// Source of decoded conversation text
///
/// Archive unwrapping and encoding detection live behind this seam; the
/// parser only ever sees final decoded text.
pub trait RawTextSource {
    /// Yield decoded text for a file handle/name
    fn read_text(&self, name: &str) -> Result<String, ImportError>;
}

/// Reads plain text files from disk
///
/// Archive inputs are rejected with `ImportError::Extraction` so callers can
/// show the "re-export as plain text" message; everything else is read as
/// UTF-8 text, matching the original import fallback.
#[derive(Debug, Default)]
pub struct PlainTextFileSource;

impl RawTextSource for PlainTextFileSource {
    fn read_text(&self, name: &str) -> Result<String, ImportError> {
        if name.to_lowercase().ends_with(".zip") {
            return Err(ImportError::Extraction(name.to_string()));
        }
        std::fs::read_to_string(name).map_err(ImportError::Decode)
    }
}

/// Conversation parser over a pluggable classifier
#[derive(Debug, Default)]
pub struct ConversationParser<C = KeywordClassifier> {
    classifier: C,
}

impl ConversationParser<KeywordClassifier> {
    /// Create parser with the keyword classifier
    pub fn new() -> Self {
        Self {
            classifier: KeywordClassifier::new(),
        }
    }
}

impl<C: Classify> ConversationParser<C> {
    /// Create parser with a custom classifier
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    /// Parse decoded conversation text
    pub fn parse(&self, text: &str) -> ParsedConversation {
        let messages = extract_messages(text);
        let joined = messages.join(" ");
        let flags = self.classifier.classify(&joined);

        let summary = messages
            .first()
            .cloned()
            .unwrap_or_else(|| EMPTY_IMPORT_SUMMARY.to_string());

        ParsedConversation {
            summary,
            tags: flags.tags(),
            risk_flags_count: flags.count(),
            flags,
            raw_text_length: text.len(),
            messages_count: messages.len(),
            messages,
        }
    }

    /// Read from a text source and parse
    ///
    /// Either a full `ParsedConversation` comes back or nothing happened;
    /// there is no partial result on failure.
    pub fn parse_from(
        &self,
        source: &dyn RawTextSource,
        name: &str,
    ) -> Result<ParsedConversation, ImportError> {
        let text = source.read_text(name)?;
        Ok(self.parse(&text))
    }
}

/// Split into non-empty trimmed lines, preserving order
fn extract_messages(text: &str) -> Vec<String> {
    RE_LINE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
