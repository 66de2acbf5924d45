//! Entity extraction: service names, IPv4 addresses and domains.
//!
//! Each kind is a separate scan over the whole text. Services and domains are
//! matched against the case-folded text; IP addresses against the original.

use crate::patterns::PatternRegistry;
use crate::types::EntitySet;
use tracing::trace;

/// Placeholder domains that never count as real entities.
pub const RESERVED_DOMAINS: &[&str] = &["example.com", "test.com", "localhost.local"];

/// Domains shorter than this are discarded.
pub const MIN_DOMAIN_LEN: usize = 5;

pub fn extract_entities(registry: &PatternRegistry, text: &str) -> EntitySet {
    let patterns = registry.entities();
    let folded = text.to_lowercase();
    let mut entities = EntitySet::default();

    for captures in patterns.service.captures_iter(&folded) {
        push_unique(&mut entities.services, &captures[1]);
    }

    for captures in patterns.ip.captures_iter(text) {
        let candidate = &captures[1];
        if is_valid_ipv4(candidate) {
            push_unique(&mut entities.ips, candidate);
        } else {
            trace!(candidate, "Discarding out-of-range address");
        }
    }

    for captures in patterns.domain.captures_iter(&folded) {
        let candidate = &captures[1];
        if is_meaningful_domain(candidate) {
            push_unique(&mut entities.domains, candidate);
        }
    }

    entities
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

/// Every dotted group must parse as an integer no greater than 255.
fn is_valid_ipv4(candidate: &str) -> bool {
    candidate
        .split('.')
        .all(|octet| octet.parse::<u16>().is_ok_and(|value| value <= 255))
}

fn is_meaningful_domain(candidate: &str) -> bool {
    candidate.len() >= MIN_DOMAIN_LEN && !RESERVED_DOMAINS.contains(&candidate)
}
