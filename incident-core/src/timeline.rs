//! Timeline extraction: timestamps and actors per line.
//!
//! Both scanners are single pass: the first pattern that matches decides the
//! outcome for the line. When the context filter rejects that match the line
//! reports nothing; later patterns are not consulted.

use crate::patterns::{PatternRegistry, TimestampPattern};
use crate::types::Event;
use regex::{Match, Regex};
use tracing::trace;

/// Words that mark a time-looking number as something else when they appear
/// shortly before it ("error ratio of 3:45", "running version 1:45").
pub const FALSE_POSITIVE_WORDS: &[&str] = &["ratio", "version", "scaled"];

/// How many characters before a timestamp the false-positive check inspects.
pub const CONTEXT_WINDOW_CHARS: usize = 20;

/// Capitalized labels that the name-colon pattern picks up but are not people.
pub const RESERVED_LABELS: &[&str] = &[
    "time", "error", "status", "note", "warning", "info", "debug", "system",
];

/// A captured actor ending in one of these is a host name ("api.example.com:").
pub const DOMAIN_SUFFIXES: &[&str] = &[".com", ".org", ".net", ".io", ".co", ".edu", ".gov"];

/// Find the first timestamp in a line, returned exactly as written.
pub fn find_timestamp(registry: &PatternRegistry, line: &str) -> Option<String> {
    for pattern in registry.timestamps() {
        let Some(found) = match_timestamp(registry, pattern, line) else {
            continue;
        };

        if preceded_by_false_positive(line, found.start()) {
            trace!(
                pattern = pattern.name,
                candidate = found.as_str(),
                "Timestamp rejected by context filter"
            );
            return None;
        }
        return Some(found.as_str().to_string());
    }
    None
}

/// Find the person a line is attributed to.
pub fn find_actor(registry: &PatternRegistry, line: &str) -> Option<String> {
    for pattern in registry.actors() {
        let Some(captures) = pattern.regex.captures(line) else {
            continue;
        };
        let name = captures.get(1)?.as_str();

        if !is_likely_actor(name) {
            trace!(pattern = pattern.name, candidate = name, "Actor rejected");
            return None;
        }
        return Some(name.to_string());
    }
    None
}

/// Build the event list: one event per non-blank line carrying a timestamp,
/// in input order.
pub fn extract_timeline(registry: &PatternRegistry, text: &str) -> Vec<Event> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let time = find_timestamp(registry, line)?;
            Some(Event {
                time,
                text: line.to_string(),
                actor: find_actor(registry, line),
            })
        })
        .collect()
}

fn match_timestamp<'t>(
    registry: &PatternRegistry,
    pattern: &TimestampPattern,
    line: &'t str,
) -> Option<Match<'t>> {
    if pattern.isolated {
        find_isolated(&pattern.regex, registry.time_continuation(), line)
    } else {
        pattern.regex.find(line)
    }
}

/// Leftmost match of `regex` that is neither glued to a preceding word
/// character or colon nor followed by another `:<digit>` group.
///
/// A start position admits at most one parse of the time core, so resuming
/// one character past a rejected start finds the same match a look-around
/// pattern would.
fn find_isolated<'t>(regex: &Regex, continuation: &Regex, line: &'t str) -> Option<Match<'t>> {
    let mut start = 0;
    while start < line.len() {
        let candidate = regex.find_at(line, start)?;
        if is_isolated(line, continuation, candidate.start(), candidate.end()) {
            return Some(candidate);
        }
        let width = line[candidate.start()..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        start = candidate.start() + width;
    }
    None
}

fn is_isolated(line: &str, continuation: &Regex, start: usize, end: usize) -> bool {
    let glued_before = line[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c == ':' || is_word_char(c));
    if glued_before {
        return false;
    }

    !continuation.is_match(&line[end..])
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn preceded_by_false_positive(line: &str, start: usize) -> bool {
    let before = &line[..start];
    let window_start = before
        .char_indices()
        .rev()
        .nth(CONTEXT_WINDOW_CHARS - 1)
        .map_or(0, |(i, _)| i);
    let window = before[window_start..].to_lowercase();
    FALSE_POSITIVE_WORDS.iter().any(|word| window.contains(word))
}

fn is_likely_actor(name: &str) -> bool {
    let folded = name.to_lowercase();
    if RESERVED_LABELS.contains(&folded.as_str()) {
        return false;
    }
    !DOMAIN_SUFFIXES
        .iter()
        .any(|suffix| folded.ends_with(suffix))
}
