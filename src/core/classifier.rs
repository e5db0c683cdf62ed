//! Keyword classifier: raw text → risk flags
//!
//! Simple case-sensitive substring containment against fixed keyword lists.
//! No normalization, no stemming, no negation handling: "돈 안 보낼게"
//! still raises the money flag. A documented false-positive-tolerant
//! heuristic, not NLP.

use crate::types::DayFlags;

// =============================================================================
// KEYWORD LISTS
// =============================================================================

/// Money/transfer request keywords
pub const MONEY_KEYWORDS: &[&str] = &["돈", "송금", "입금", "계좌", "이체"];

/// Favor/help request keywords
pub const FAVOR_KEYWORDS: &[&str] = &["부탁", "도와", "도움", "지원"];

/// Flattery/love/marriage keywords
pub const PRAISE_KEYWORDS: &[&str] = &["사랑", "보고싶", "결혼", "최고", "운명"];

/// Photo/image keywords
pub const IMAGE_KEYWORDS: &[&str] = &["사진", "이미지", "포토"];

/// Classification seam: a stronger classifier can replace the keyword
/// heuristic without touching the record store or escalation model
pub trait Classify {
    /// Classify one joined text blob into independent risk flags
    fn classify(&self, text: &str) -> DayFlags;
}

/// The keyword-list classifier
#[derive(Debug, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Create new classifier
    pub fn new() -> Self {
        Self
    }
}

impl Classify for KeywordClassifier {
    fn classify(&self, text: &str) -> DayFlags {
        DayFlags {
            money_request: contains_any(text, MONEY_KEYWORDS),
            favor_request: contains_any(text, FAVOR_KEYWORDS),
            excessive_praise: contains_any(text, PRAISE_KEYWORDS),
            link_included: text.contains("http://")
                || text.contains("https://")
                || text.contains("www."),
            image_included: contains_any(text, IMAGE_KEYWORDS),
        }
    }
}

/// Substring containment against a keyword list
fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_raises_nothing() {
        let classifier = KeywordClassifier::new();
        let flags = classifier.classify("오늘 날씨 좋다 산책 갈래?");
        assert_eq!(flags, DayFlags::none());
    }

    #[test]
    fn test_money_keywords() {
        let classifier = KeywordClassifier::new();
        for keyword in MONEY_KEYWORDS {
            let text = format!("지금 {} 가능해?", keyword);
            assert!(classifier.classify(&text).money_request, "{} should raise money", keyword);
        }
    }

    #[test]
    fn test_flags_are_independent() {
        let classifier = KeywordClassifier::new();
        let flags = classifier.classify("사랑해 이 사진 봐 https://example.com");
        assert!(!flags.money_request);
        assert!(!flags.favor_request);
        assert!(flags.excessive_praise);
        assert!(flags.link_included);
        assert!(flags.image_included);
    }

    #[test]
    fn test_position_insensitive() {
        let classifier = KeywordClassifier::new();
        let front = classifier.classify("송금 해줘 그리고 잘자");
        let back = classifier.classify("잘자 그리고 해줘 송금");
        assert_eq!(front, back);
    }

    #[test]
    fn test_no_negation_handling() {
        // Deliberate false positive: negated requests still trigger
        let classifier = KeywordClassifier::new();
        assert!(classifier.classify("절대 돈 안 보낼 거야").money_request);
    }

    #[test]
    fn test_link_variants() {
        let classifier = KeywordClassifier::new();
        assert!(classifier.classify("http://a.b").link_included);
        assert!(classifier.classify("https://a.b").link_included);
        assert!(classifier.classify("www.example.com").link_included);
        assert!(!classifier.classify("example.com").link_included);
    }
}
