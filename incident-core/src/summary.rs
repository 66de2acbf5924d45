//! Summary composition.
//!
//! Every pass re-scans the full input; nothing computed by one pass feeds
//! another. The rendered digest is built only from the four results.

use crate::actions::identify_actions;
use crate::entities::extract_entities;
use crate::patterns::PatternRegistry;
use crate::severity::detect_severity;
use crate::timeline::extract_timeline;
use crate::types::{
    Action, ActionCategory, EntitySet, Event, SeverityAssessment, SeverityLevel, Summary,
};

/// Digest text used when no pass produced anything.
pub const EMPTY_SUMMARY: &str = "No significant data extracted";

pub fn generate_summary(registry: &PatternRegistry, text: &str) -> Summary {
    let timeline = extract_timeline(registry, text);
    let actions = identify_actions(registry, text);
    let entities = extract_entities(registry, text);
    let severity = detect_severity(registry, text);
    let summary_text = render_summary_text(&timeline, &actions, &entities, &severity);

    Summary {
        timeline,
        actions,
        entities,
        severity,
        summary_text,
    }
}

/// Render the human-readable digest. Blocks appear in a fixed order and
/// each is omitted when its source is empty:
///
/// ```text
/// Severity: CRITICAL (confidence: medium)
/// Timeline: 3 events from 14:23 to 15:10
/// Actions: 4 total (investigation: 2, remediation: 2)
/// Entities:
///   - Services: 1
///   - IPs: 2
/// ```
pub fn render_summary_text(
    timeline: &[Event],
    actions: &[Action],
    entities: &EntitySet,
    severity: &SeverityAssessment,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    if severity.level != SeverityLevel::Unknown {
        lines.push(format!(
            "Severity: {} (confidence: {})",
            severity.level.as_str().to_uppercase(),
            severity.confidence
        ));
    }

    if let (Some(first), Some(last)) = (timeline.first(), timeline.last()) {
        lines.push(format!(
            "Timeline: {} events from {} to {}",
            timeline.len(),
            first.time,
            last.time
        ));
    }

    if !actions.is_empty() {
        let breakdown = category_counts(actions)
            .iter()
            .map(|(category, count)| format!("{category}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Actions: {} total ({breakdown})", actions.len()));
    }

    if !entities.is_empty() {
        lines.push("Entities:".to_string());
        let kinds = [
            ("Services", entities.services.len()),
            ("IPs", entities.ips.len()),
            ("Domains", entities.domains.len()),
        ];
        for (label, count) in kinds.into_iter().filter(|(_, count)| *count > 0) {
            lines.push(format!("  - {label}: {count}"));
        }
    }

    if lines.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }
    lines.join("\n")
}

/// Per-category counts, ordered by each category's first appearance.
fn category_counts(actions: &[Action]) -> Vec<(ActionCategory, usize)> {
    let mut counts: Vec<(ActionCategory, usize)> = Vec::new();
    for action in actions {
        match counts.iter_mut().find(|(category, _)| *category == action.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((action.category, 1)),
        }
    }
    counts
}
