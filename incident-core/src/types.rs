//! Value types produced by the extraction passes.
//!
//! Every value is built fresh per call and never mutated afterwards. All of
//! them serialize to the JSON shapes the hosting layer returns to clients.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One timestamped line of incident text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The matched time expression, exactly as it appeared in the line.
    pub time: String,
    /// The full source line, trimmed.
    pub text: String,
    /// Person responsible for the line, when one survived filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

/// Category of an incident-response action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Investigation,
    Remediation,
    Communication,
    Status,
}

impl ActionCategory {
    /// Categories in scan order. A line reports the first one that matches.
    pub const ALL: [ActionCategory; 4] = [
        ActionCategory::Investigation,
        ActionCategory::Remediation,
        ActionCategory::Communication,
        ActionCategory::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::Investigation => "investigation",
            ActionCategory::Remediation => "remediation",
            ActionCategory::Communication => "communication",
            ActionCategory::Status => "status",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action verb found on a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The keyword that matched, lowercase.
    pub action: String,
    pub category: ActionCategory,
    /// The full source line, trimmed.
    pub context: String,
}

/// Services, IP addresses and domains mentioned in the text.
///
/// Each list is deduplicated and ordered by first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub services: Vec<String>,
    pub ips: Vec<String>,
    pub domains: Vec<String>,
}

impl EntitySet {
    /// Returns `true` when no entity of any kind was found.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.ips.is_empty() && self.domains.is_empty()
    }
}

/// Coarse incident-impact classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl SeverityLevel {
    /// Levels that carry keywords, highest priority first.
    pub const RANKED: [SeverityLevel; 4] = [
        SeverityLevel::Critical,
        SeverityLevel::High,
        SeverityLevel::Medium,
        SeverityLevel::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Critical => "critical",
            SeverityLevel::High => "high",
            SeverityLevel::Medium => "medium",
            SeverityLevel::Low => "low",
            SeverityLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength of a severity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Three or more indicators is high, one or two medium, none low.
    pub fn from_indicator_count(count: usize) -> Self {
        match count {
            0 => Confidence::Low,
            1 | 2 => Confidence::Medium,
            _ => Confidence::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of severity detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityAssessment {
    pub level: SeverityLevel,
    pub confidence: Confidence,
    /// Matched keywords, all from `level`'s list, in list order.
    pub indicators: Vec<String>,
}

impl SeverityAssessment {
    /// The assessment for text with no severity keywords at all.
    pub fn unknown() -> Self {
        Self {
            level: SeverityLevel::Unknown,
            confidence: Confidence::Low,
            indicators: Vec::new(),
        }
    }
}

/// Everything the engine extracts from one input, plus a rendered digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub timeline: Vec<Event>,
    pub actions: Vec<Action>,
    pub entities: EntitySet,
    pub severity: SeverityAssessment,
    pub summary_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_omits_missing_actor() {
        let event = Event {
            time: "14:23".into(),
            text: "System alert triggered at 14:23".into(),
            actor: None,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"time": "14:23", "text": "System alert triggered at 14:23"})
        );
    }

    #[test]
    fn test_event_with_actor() {
        let event = Event {
            time: "14:23".into(),
            text: "@sarah 14:23: Seeing elevated errors".into(),
            actor: Some("sarah".into()),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["actor"], "sarah");
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_value(ActionCategory::Remediation).unwrap(),
            json!("remediation")
        );
        assert_eq!(
            serde_json::to_value(SeverityLevel::Unknown).unwrap(),
            json!("unknown")
        );
        assert_eq!(
            serde_json::to_value(Confidence::Medium).unwrap(),
            json!("medium")
        );
    }

    #[test]
    fn test_confidence_from_indicator_count() {
        assert_eq!(Confidence::from_indicator_count(0), Confidence::Low);
        assert_eq!(Confidence::from_indicator_count(1), Confidence::Medium);
        assert_eq!(Confidence::from_indicator_count(2), Confidence::Medium);
        assert_eq!(Confidence::from_indicator_count(3), Confidence::High);
        assert_eq!(Confidence::from_indicator_count(12), Confidence::High);
    }

    #[test]
    fn test_display_matches_serde_names() {
        for category in ActionCategory::ALL {
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                json!(category.to_string())
            );
        }
        for level in SeverityLevel::RANKED {
            assert_eq!(
                serde_json::to_value(level).unwrap(),
                json!(level.to_string())
            );
        }
    }

    #[test]
    fn test_entity_set_is_empty() {
        let mut entities = EntitySet::default();
        assert!(entities.is_empty());
        entities.ips.push("10.0.0.1".into());
        assert!(!entities.is_empty());
    }
}
