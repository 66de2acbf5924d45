//! Action identification by keyword containment.

use crate::patterns::PatternRegistry;
use crate::types::Action;

/// One action per line at most: the first category, in registry order, that
/// has a keyword contained in the case-folded line.
///
/// Matching is plain substring containment, so "checked" also hits inside
/// "rechecked" and a line naming both an investigation and a remediation
/// verb reports only the investigation.
pub fn identify_actions(registry: &PatternRegistry, text: &str) -> Vec<Action> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| classify_line(registry, line))
        .collect()
}

fn classify_line(registry: &PatternRegistry, line: &str) -> Option<Action> {
    let folded = line.to_lowercase();
    registry.actions().iter().find_map(|(category, keywords)| {
        keywords
            .iter()
            .find(|keyword| folded.contains(*keyword))
            .map(|keyword| Action {
                action: (*keyword).to_string(),
                category: *category,
                context: line.to_string(),
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionCategory;
    use pretty_assertions::assert_eq;

    fn actions(text: &str) -> Vec<Action> {
        identify_actions(&PatternRegistry::new().unwrap(), text)
    }

    #[test]
    fn test_identifies_each_category() {
        let found = actions(
            "@sarah investigating the spike\n\
             @mike restarted the pods\n\
             @lead paged the on-call\n\
             Incident resolved",
        );
        let categories: Vec<_> = found.iter().map(|a| a.category).collect();
        assert_eq!(
            categories,
            [
                ActionCategory::Investigation,
                ActionCategory::Remediation,
                ActionCategory::Communication,
                ActionCategory::Status,
            ]
        );
        assert_eq!(found[0].action, "investigating");
        assert_eq!(found[1].action, "restarted");
        assert_eq!(found[2].action, "paged");
        assert_eq!(found[3].action, "resolved");
    }

    #[test]
    fn test_context_is_trimmed_line() {
        let found = actions("   @mike ROLLED BACK deploy 4471   ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].action, "rolled back");
        assert_eq!(found[0].context, "@mike ROLLED BACK deploy 4471");
    }

    #[test]
    fn test_first_category_wins() {
        let found = actions("checking logs after we deployed the fix");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, ActionCategory::Investigation);
        assert_eq!(found[0].action, "checking");
    }

    #[test]
    fn test_keyword_list_order_within_category() {
        // "fixed" comes after "deployed" in the remediation list.
        let found = actions("fixed config and deployed");
        assert_eq!(found[0].action, "deployed");
    }

    #[test]
    fn test_substring_matching() {
        let found = actions("we rechecked the dashboards");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].action, "checked");
    }

    #[test]
    fn test_phrase_requires_adjacency() {
        assert!(actions("rolled the dice, back later").is_empty());
    }

    #[test]
    fn test_lines_without_keywords_are_skipped() {
        let found = actions("nothing here\n\n@sarah looking around\nmonitoring now");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].action, "monitoring");
    }

    #[test]
    fn test_empty_input() {
        assert!(actions("").is_empty());
        assert!(actions("  \n\t\n").is_empty());
    }
}
