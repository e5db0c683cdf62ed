//! Risk flag record produced by the classifier

use serde::{Deserialize, Serialize};

/// The five independent risk flags for one day's conversation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayFlags {
    /// Money/transfer request keywords present
    pub money_request: bool,
    /// Favor/help request keywords present
    pub favor_request: bool,
    /// Flattery/love/marriage keywords present
    pub excessive_praise: bool,
    /// Literal http://, https:// or www. present
    pub link_included: bool,
    /// Photo/image keywords present
    pub image_included: bool,
}

impl DayFlags {
    /// All flags off
    pub fn none() -> Self {
        Self::default()
    }

    /// Number of raised flags (0-5)
    pub fn count(&self) -> usize {
        [
            self.money_request,
            self.favor_request,
            self.excessive_praise,
            self.link_included,
            self.image_included,
        ]
        .iter()
        .filter(|f| **f)
        .count()
    }

    /// Is any flag raised?
    pub fn any(&self) -> bool {
        self.count() > 0
    }

    /// Human-readable tags, one per raised flag, in fixed display order
    pub fn tags(&self) -> Vec<String> {
        FlagKind::ALL
            .iter()
            .filter(|kind| self.has(**kind))
            .map(|kind| kind.tag().to_string())
            .collect()
    }

    /// Check a single flag by kind
    pub fn has(&self, kind: FlagKind) -> bool {
        match kind {
            FlagKind::Money => self.money_request,
            FlagKind::Favor => self.favor_request,
            FlagKind::Praise => self.excessive_praise,
            FlagKind::Link => self.link_included,
            FlagKind::Image => self.image_included,
        }
    }

    /// Highest-priority raised flag, if any
    pub fn primary(&self) -> Option<FlagKind> {
        FlagKind::ALL.iter().copied().find(|kind| self.has(*kind))
    }
}

/// Flag identity, in priority/display order: money > favor > praise > link > image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    Money,
    Favor,
    Praise,
    Link,
    Image,
}

impl FlagKind {
    /// All kinds in priority order
    pub const ALL: [FlagKind; 5] = [
        FlagKind::Money,
        FlagKind::Favor,
        FlagKind::Praise,
        FlagKind::Link,
        FlagKind::Image,
    ];

    /// Short tag shown on timeline entries
    pub fn tag(&self) -> &'static str {
        match self {
            FlagKind::Money => "금전",
            FlagKind::Favor => "부탁",
            FlagKind::Praise => "과한 칭찬",
            FlagKind::Link => "링크",
            FlagKind::Image => "이미지",
        }
    }

    /// Full row label shown on day record cards
    pub fn label(&self) -> &'static str {
        match self {
            FlagKind::Money => "금전 관련 표현",
            FlagKind::Favor => "부탁/도움 요청",
            FlagKind::Praise => "과한 칭찬/의존",
            FlagKind::Link => "외부 링크 포함",
            FlagKind::Image => "이미지 포함",
        }
    }

    /// Parse a filter key as used by the timeline filter chips
    pub fn from_filter_key(key: &str) -> Option<Self> {
        match key {
            "money" => Some(FlagKind::Money),
            "favor" => Some(FlagKind::Favor),
            "praise" => Some(FlagKind::Praise),
            "link" => Some(FlagKind::Link),
            "image" => Some(FlagKind::Image),
            _ => None,
        }
    }
}

impl std::fmt::Display for FlagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlagKind::Money => "money",
            FlagKind::Favor => "favor",
            FlagKind::Praise => "praise",
            FlagKind::Link => "link",
            FlagKind::Image => "image",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_any() {
        let mut flags = DayFlags::none();
        assert_eq!(flags.count(), 0);
        assert!(!flags.any());

        flags.favor_request = true;
        flags.link_included = true;
        assert_eq!(flags.count(), 2);
        assert!(flags.any());
    }

    #[test]
    fn test_tags_fixed_order() {
        let flags = DayFlags {
            money_request: false,
            favor_request: true,
            excessive_praise: false,
            link_included: true,
            image_included: true,
        };
        assert_eq!(flags.tags(), vec!["부탁", "링크", "이미지"]);
    }

    #[test]
    fn test_primary_follows_priority() {
        let flags = DayFlags {
            money_request: false,
            favor_request: true,
            excessive_praise: false,
            link_included: true,
            image_included: false,
        };
        assert_eq!(flags.primary(), Some(FlagKind::Favor));
        assert_eq!(DayFlags::none().primary(), None);
    }

    #[test]
    fn test_filter_key_roundtrip() {
        for kind in FlagKind::ALL {
            assert_eq!(FlagKind::from_filter_key(&kind.to_string()), Some(kind));
        }
        assert_eq!(FlagKind::from_filter_key("all"), None);
    }
}
