//! Pattern registry: the ordered regular expressions and keyword lists that
//! define what each extraction pass looks for.
//!
//! Order is part of the contract: every pass walks these collections front to
//! back and stops at the first hit. Regexes are compiled once in
//! [`PatternRegistry::new`] and the registry is read-only afterwards.

use crate::error::EngineError;
use crate::types::{ActionCategory, SeverityLevel};
use regex::Regex;
use tracing::debug;

/// Timestamp pattern definitions, most specific first.
///
/// `isolated` patterns stand for `(?<![:\w])…(?!:\d)` in a backtracking
/// engine. The `regex` crate has no look-around, so only the core is compiled
/// here and the timestamp scanner checks the neighbouring characters.
const TIMESTAMP_DEFS: &[(&str, &str, bool)] = &[
    (
        "full_datetime",
        r"\b(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2}(?::\d{2})?)\b",
        false,
    ),
    ("time_with_seconds", r"([0-2]?\d):([0-5]\d):([0-5]\d)\b", true),
    ("simple_time", r"([0-2]?\d):([0-5]\d)\b", true),
];

/// Actor pattern definitions. Group 1 captures the name.
const ACTOR_DEFS: &[(&str, &str)] = &[
    // Slack-style mentions: @sarah, @mike.jones
    ("mention", r"@([\w.-]+)"),
    // Chat prefixes: "Sarah:", "Mike Jones:"
    ("name_colon", r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?):"),
];

/// An extra `:<digit>` group directly after a time, which disqualifies an
/// isolated match. `\d` is the same decimal-digit class the time cores use.
const TIME_CONTINUATION_PATTERN: &str = r"^:\d";

const SERVICE_PATTERN: &str = r"\b([a-z][a-z0-9_-]*(?:service|api|worker|job|daemon))\b";
const IP_PATTERN: &str = r"\b([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})\b";
const DOMAIN_PATTERN: &str = r"\b([a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,})\b";

pub const INVESTIGATION_KEYWORDS: &[&str] = &[
    "investigating",
    "investigated",
    "checking",
    "checked",
    "examining",
    "examined",
    "analyzing",
    "analyzed",
    "reviewing",
    "reviewed",
    "debugging",
    "debugged",
    "tracing",
    "traced",
    "monitoring",
    "monitored",
    "watching",
];

pub const REMEDIATION_KEYWORDS: &[&str] = &[
    "deploying",
    "deployed",
    "rolling back",
    "rolled back",
    "reverting",
    "reverted",
    "restarting",
    "restarted",
    "rebooting",
    "rebooted",
    "fixing",
    "fixed",
    "patching",
    "patched",
    "updating",
    "updated",
    "scaling",
    "scaled",
    "killing",
    "killed",
    "stopping",
    "stopped",
];

pub const COMMUNICATION_KEYWORDS: &[&str] = &[
    "notifying",
    "notified",
    "alerting",
    "alerted",
    "paging",
    "paged",
    "escalating",
    "escalated",
    "confirming",
    "confirmed",
    "acknowledging",
    "acknowledged",
    "reporting",
    "reported",
];

pub const STATUS_KEYWORDS: &[&str] = &[
    "resolving",
    "resolved",
    "mitigating",
    "mitigated",
    "completing",
    "completed",
    "starting",
    "started",
    "initiating",
    "initiated",
];

pub const CRITICAL_KEYWORDS: &[&str] = &[
    "critical",
    "down",
    "outage",
    "offline",
    "unavailable",
    "total failure",
    "complete loss",
    "service down",
];

pub const HIGH_KEYWORDS: &[&str] = &[
    "degraded",
    "slow",
    "timeout",
    "elevated error",
    "high error",
    "error rate",
    "performance issue",
    "jumped",
    "spike",
    "surged",
];

pub const MEDIUM_KEYWORDS: &[&str] = &[
    "intermittent",
    "occasional",
    "sporadic",
    "some users",
    "affecting some",
];

pub const LOW_KEYWORDS: &[&str] = &["minor", "cosmetic", "edge case", "rare"];

/// A compiled timestamp expression.
#[derive(Debug)]
pub struct TimestampPattern {
    pub name: &'static str,
    pub regex: Regex,
    /// Must not touch a word character or colon before, nor `:<digit>` after.
    pub isolated: bool,
}

/// A compiled actor expression whose first capture group is the name.
#[derive(Debug)]
pub struct ActorPattern {
    pub name: &'static str,
    pub regex: Regex,
}

/// The three entity expressions, each capturing the entity in group 1.
#[derive(Debug)]
pub struct EntityPatterns {
    /// Matched against case-folded text.
    pub service: Regex,
    /// Matched against the original text.
    pub ip: Regex,
    /// Matched against case-folded text.
    pub domain: Regex,
}

/// Every pattern and keyword list the extraction passes consult.
#[derive(Debug)]
pub struct PatternRegistry {
    timestamps: Vec<TimestampPattern>,
    time_continuation: Regex,
    actors: Vec<ActorPattern>,
    actions: Vec<(ActionCategory, &'static [&'static str])>,
    severities: Vec<(SeverityLevel, &'static [&'static str])>,
    entities: EntityPatterns,
}

impl PatternRegistry {
    /// Compile the built-in registry.
    pub fn new() -> Result<Self, EngineError> {
        let timestamps = TIMESTAMP_DEFS
            .iter()
            .map(|&(name, pattern, isolated)| {
                Ok(TimestampPattern {
                    name,
                    regex: compile(name, pattern)?,
                    isolated,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let actors = ACTOR_DEFS
            .iter()
            .map(|&(name, pattern)| {
                Ok(ActorPattern {
                    name,
                    regex: compile(name, pattern)?,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let entities = EntityPatterns {
            service: compile("service", SERVICE_PATTERN)?,
            ip: compile("ip", IP_PATTERN)?,
            domain: compile("domain", DOMAIN_PATTERN)?,
        };

        let registry = Self {
            timestamps,
            time_continuation: compile("time_continuation", TIME_CONTINUATION_PATTERN)?,
            actors,
            actions: vec![
                (ActionCategory::Investigation, INVESTIGATION_KEYWORDS),
                (ActionCategory::Remediation, REMEDIATION_KEYWORDS),
                (ActionCategory::Communication, COMMUNICATION_KEYWORDS),
                (ActionCategory::Status, STATUS_KEYWORDS),
            ],
            severities: vec![
                (SeverityLevel::Critical, CRITICAL_KEYWORDS),
                (SeverityLevel::High, HIGH_KEYWORDS),
                (SeverityLevel::Medium, MEDIUM_KEYWORDS),
                (SeverityLevel::Low, LOW_KEYWORDS),
            ],
            entities,
        };

        debug!(
            timestamp_patterns = registry.timestamps.len(),
            actor_patterns = registry.actors.len(),
            "Pattern registry compiled"
        );
        Ok(registry)
    }

    /// Timestamp patterns, most specific first.
    pub fn timestamps(&self) -> &[TimestampPattern] {
        &self.timestamps
    }

    /// Anchored check for a `:<digit>` group following an isolated time.
    pub fn time_continuation(&self) -> &Regex {
        &self.time_continuation
    }

    /// Actor patterns: mention before name-colon.
    pub fn actors(&self) -> &[ActorPattern] {
        &self.actors
    }

    /// Action keyword lists in category scan order.
    pub fn actions(&self) -> &[(ActionCategory, &'static [&'static str])] {
        &self.actions
    }

    /// Severity keyword lists, highest priority first.
    pub fn severities(&self) -> &[(SeverityLevel, &'static [&'static str])] {
        &self.severities
    }

    pub fn entities(&self) -> &EntityPatterns {
        &self.entities
    }
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, EngineError> {
    Regex::new(pattern).map_err(|source| EngineError::InvalidPattern { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PatternRegistry {
        PatternRegistry::new().unwrap()
    }

    fn timestamp_regex<'r>(registry: &'r PatternRegistry, name: &str) -> &'r Regex {
        &registry
            .timestamps()
            .iter()
            .find(|p| p.name == name)
            .unwrap()
            .regex
    }

    #[test]
    fn test_timestamp_order_is_most_specific_first() {
        let registry = registry();
        let names: Vec<_> = registry.timestamps().iter().map(|p| p.name).collect();
        assert_eq!(names, ["full_datetime", "time_with_seconds", "simple_time"]);
        assert!(!registry.timestamps()[0].isolated);
        assert!(registry.timestamps()[1].isolated);
        assert!(registry.timestamps()[2].isolated);
    }

    #[test]
    fn test_full_datetime_matches() {
        let registry = registry();
        let re = timestamp_regex(&registry, "full_datetime");
        for text in [
            "Incident started 2024-01-15 14:23 UTC",
            "Logged at 2025-12-31 23:59:59",
            "Occurred 2024-06-15 09:30",
        ] {
            let m = re.find(text).unwrap();
            assert!(m.as_str().contains("202"), "{text}");
        }
        assert_eq!(
            re.find("Logged at 2025-12-31 23:59:59").unwrap().as_str(),
            "2025-12-31 23:59:59"
        );
    }

    #[test]
    fn test_full_datetime_requires_date_and_time() {
        let registry = registry();
        let re = timestamp_regex(&registry, "full_datetime");
        for text in ["2024-01-15", "14:23:45", "just text", "15/01/2024 14:23"] {
            assert!(re.find(text).is_none(), "{text}");
        }
    }

    #[test]
    fn test_actor_order() {
        let registry = registry();
        let names: Vec<_> = registry.actors().iter().map(|p| p.name).collect();
        assert_eq!(names, ["mention", "name_colon"]);
    }

    #[test]
    fn test_mention_pattern() {
        let registry = registry();
        let re = &registry.actors()[0].regex;
        for (text, expected) in [
            ("@sarah investigating the issue", "sarah"),
            ("@mike.jones rolled back deploy", "mike.jones"),
            ("@john-smith confirmed", "john-smith"),
            ("@user123 acknowledged", "user123"),
        ] {
            assert_eq!(&re.captures(text).unwrap()[1], expected);
        }
        assert!(re.captures("@").is_none());
        assert!(re.captures("sentence with @ symbol alone").is_none());
    }

    #[test]
    fn test_name_colon_pattern() {
        let registry = registry();
        let re = &registry.actors()[1].regex;
        for (text, expected) in [
            ("Sarah: investigating the database", "Sarah"),
            ("Mike Jones: rolled back the deploy", "Mike Jones"),
            ("Alice: confirmed fix deployed", "Alice"),
            ("John: restarted service", "John"),
        ] {
            assert_eq!(&re.captures(text).unwrap()[1], expected);
        }
        assert!(re.captures("lowercase: should not match").is_none());
        assert!(re.captures("mixedCase: also wrong").is_none());
    }

    #[test]
    fn test_name_colon_stops_at_lowercase_particles() {
        let registry = registry();
        let re = &registry.actors()[1].regex;
        assert_eq!(
            &re.captures("Ian de Marcellus: restarted service").unwrap()[1],
            "Marcellus"
        );
    }

    #[test]
    fn test_action_categories_in_scan_order() {
        let registry = registry();
        let order: Vec<_> = registry.actions().iter().map(|(c, _)| *c).collect();
        assert_eq!(order, ActionCategory::ALL);
        assert!(INVESTIGATION_KEYWORDS.contains(&"investigating"));
        assert!(INVESTIGATION_KEYWORDS.contains(&"checked"));
        assert!(INVESTIGATION_KEYWORDS.contains(&"analyzed"));
        assert!(REMEDIATION_KEYWORDS.contains(&"deployed"));
        assert!(REMEDIATION_KEYWORDS.contains(&"rolled back"));
        assert!(REMEDIATION_KEYWORDS.contains(&"restarted"));
    }

    #[test]
    fn test_severity_levels_in_priority_order() {
        let registry = registry();
        let order: Vec<_> = registry.severities().iter().map(|(l, _)| *l).collect();
        assert_eq!(order, SeverityLevel::RANKED);
        for keyword in ["down", "outage", "critical"] {
            assert!(CRITICAL_KEYWORDS.contains(&keyword));
        }
    }

    #[test]
    fn test_keywords_are_lowercase() {
        let registry = registry();
        let lists = registry
            .actions()
            .iter()
            .map(|(_, k)| *k)
            .chain(registry.severities().iter().map(|(_, k)| *k));
        for keywords in lists {
            for keyword in keywords {
                assert_eq!(*keyword, keyword.to_lowercase(), "'{keyword}' is not lowercase");
            }
        }
    }

    #[test]
    fn test_service_pattern() {
        let registry = registry();
        let re = &registry.entities().service;
        for (text, expected) in [
            ("payment-service is down", "payment-service"),
            ("user_service restarted", "user_service"),
            ("authService failed", "authservice"),
            ("background-worker crashed", "background-worker"),
        ] {
            let folded = text.to_lowercase();
            assert_eq!(&re.captures(&folded).unwrap()[1], expected);
        }
    }

    #[test]
    fn test_ip_pattern_is_syntactic_only() {
        let registry = registry();
        let re = &registry.entities().ip;
        for (text, expected) in [
            ("server at 192.168.1.1 is down", "192.168.1.1"),
            ("connecting to 10.0.0.1", "10.0.0.1"),
            ("IP 172.16.0.1 unresponsive", "172.16.0.1"),
        ] {
            assert_eq!(&re.captures(text).unwrap()[1], expected);
        }
        // Range validation happens in the entity extractor.
        assert!(re.is_match("999.999.999.999"));
    }

    #[test]
    fn test_domain_pattern() {
        let registry = registry();
        let re = &registry.entities().domain;
        for (text, expected) in [
            ("api.example.com returned 500", "api.example.com"),
            ("timeout from service.uber.com", "service.uber.com"),
            ("resolved example.org", "example.org"),
        ] {
            assert_eq!(&re.captures(text).unwrap()[1], expected);
        }
    }
}
