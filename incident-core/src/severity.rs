//! Severity detection over the whole text.

use crate::patterns::PatternRegistry;
use crate::types::{Confidence, SeverityAssessment};

/// Classify the text by the highest-priority level with any keyword present.
///
/// Indicators are that level's matched keywords in list order. Matches at
/// lower levels are dropped.
pub fn detect_severity(registry: &PatternRegistry, text: &str) -> SeverityAssessment {
    let folded = text.to_lowercase();

    for (level, keywords) in registry.severities() {
        let indicators: Vec<String> = keywords
            .iter()
            .filter(|keyword| folded.contains(*keyword))
            .map(|keyword| (*keyword).to_string())
            .collect();

        if !indicators.is_empty() {
            return SeverityAssessment {
                level: *level,
                confidence: Confidence::from_indicator_count(indicators.len()),
                indicators,
            };
        }
    }

    SeverityAssessment::unknown()
}
