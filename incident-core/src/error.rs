//! Error types for the extraction engine.

/// Errors raised while building the pattern registry.
///
/// Extraction itself never fails; every scan degrades to an empty result.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to compile pattern '{name}': {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}
