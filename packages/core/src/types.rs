// ABOUTME: Type definitions for the requirements interview
// ABOUTME: Defines coverage areas, summary items, interview state, and draft snapshots

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the five fixed requirement coverage areas.
///
/// Declaration order is the canonical area ordering used for tie-breaks;
/// the set is never extended at runtime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AreaId {
    Discovery,
    Scope,
    Users,
    Features,
    Constraints,
}

impl AreaId {
    /// All areas in canonical order.
    pub const ALL: [AreaId; 5] = [
        AreaId::Discovery,
        AreaId::Scope,
        AreaId::Users,
        AreaId::Features,
        AreaId::Constraints,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AreaId::Discovery => "discovery",
            AreaId::Scope => "scope",
            AreaId::Users => "users",
            AreaId::Features => "features",
            AreaId::Constraints => "constraints",
        }
    }
}

/// Interview language, parsed from a BCP-47-style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

impl Language {
    /// Parse a language tag, defaulting to English for anything unrecognized.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        if tag == "ar" || tag.starts_with("ar-") {
            Language::Ar
        } else {
            Language::En
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

/// Flag attached to a summary item by the turn collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemFlag {
    #[default]
    None,
    Contradiction,
    Vague,
}

/// A single recorded requirement item within an area.
///
/// Deserializes from either a bare string or a `{text, flag}` object, since
/// collaborators are not trusted to always emit the full shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_no_flag")]
    pub flag: ItemFlag,
}

fn is_no_flag(flag: &ItemFlag) -> bool {
    *flag == ItemFlag::None
}

impl<'de> Deserialize<'de> for SummaryItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Full {
                text: String,
                #[serde(default)]
                flag: ItemFlag,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => SummaryItem {
                text,
                flag: ItemFlag::None,
            },
            Repr::Full { text, flag } => SummaryItem { text, flag },
        })
    }
}

impl SummaryItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flag: ItemFlag::None,
        }
    }

    pub fn flagged(text: impl Into<String>, flag: ItemFlag) -> Self {
        Self {
            text: text.into(),
            flag,
        }
    }
}

/// Cumulative per-area structured summary. Insertion order per area is
/// discovery order; no two items in one area share a normalized form.
pub type Summary = BTreeMap<AreaId, Vec<SummaryItem>>;

/// Incremental items the turn collaborator proposes adding per area.
pub type SummaryDelta = BTreeMap<AreaId, Vec<SummaryItem>>;

/// Per-area completion estimates in [0, 100].
pub type CoverageMap = BTreeMap<AreaId, f64>;

/// The full state of one project's interview session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewState {
    pub project_id: String,
    pub summary: Summary,
    pub coverage: CoverageMap,
    /// Last question the assistant asked; duplicate detection only.
    #[serde(default)]
    pub last_question: Option<String>,
    /// Last answer the user gave; duplicate detection only.
    #[serde(default)]
    pub last_answer: Option<String>,
    /// Whether interview mode is active for this project.
    pub active: bool,
    /// Timestamp of the last persistence write.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl InterviewState {
    /// Create an empty state with every area present, so the fixed key-set
    /// invariant holds by construction.
    pub fn new(project_id: impl Into<String>) -> Self {
        let mut summary = Summary::new();
        let mut coverage = CoverageMap::new();
        for area in AreaId::ALL {
            summary.insert(area, Vec::new());
            coverage.insert(area, 0.0);
        }
        Self {
            project_id: project_id.into(),
            summary,
            coverage,
            last_question: None,
            last_answer: None,
            active: true,
            saved_at: None,
        }
    }

    /// Items recorded for an area, empty if the area has none yet.
    pub fn items(&self, area: AreaId) -> &[SummaryItem] {
        self.summary.get(&area).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A persisted snapshot of interview state. Two copies may coexist (local
/// cache, remote store); reconciliation keeps the strictly newer one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecord {
    pub state: InterviewState,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_ordering_is_fixed() {
        let mut areas = AreaId::ALL.to_vec();
        areas.sort();
        assert_eq!(areas, AreaId::ALL.to_vec());
        assert_eq!(AreaId::ALL[0], AreaId::Discovery);
        assert_eq!(AreaId::ALL[4], AreaId::Constraints);
    }

    #[test]
    fn language_tag_parsing() {
        assert_eq!(Language::from_tag("ar"), Language::Ar);
        assert_eq!(Language::from_tag("AR-EG"), Language::Ar);
        assert_eq!(Language::from_tag("en-US"), Language::En);
        assert_eq!(Language::from_tag(""), Language::En);
        assert_eq!(Language::from_tag("fr"), Language::En);
    }

    #[test]
    fn new_state_has_all_areas() {
        let state = InterviewState::new("proj-1");
        assert_eq!(state.summary.len(), 5);
        assert_eq!(state.coverage.len(), 5);
        assert!(state.active);
        for area in AreaId::ALL {
            assert!(state.items(area).is_empty());
            assert_eq!(state.coverage[&area], 0.0);
        }
    }

    #[test]
    fn summary_item_deserializes_from_bare_string() {
        let item: SummaryItem = serde_json::from_str("\"Users need exports\"").unwrap();
        assert_eq!(item.text, "Users need exports");
        assert_eq!(item.flag, ItemFlag::None);

        let item: SummaryItem =
            serde_json::from_str(r#"{"text": "Offline mode", "flag": "vague"}"#).unwrap();
        assert_eq!(item.flag, ItemFlag::Vague);
    }

    #[test]
    fn summary_item_flag_roundtrip() {
        let item = SummaryItem::flagged("Budget is fixed", ItemFlag::Contradiction);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("contradiction"));

        let plain = SummaryItem::new("No login required");
        let json = serde_json::to_string(&plain).unwrap();
        assert!(!json.contains("flag"));
        let back: SummaryItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.flag, ItemFlag::None);
    }
}
