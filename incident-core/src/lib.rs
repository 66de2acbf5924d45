//! # Incident Core
//!
//! Extraction engine for free-form incident-response text such as Slack
//! threads, chat logs and postmortem drafts. Five pure operations pull out a
//! timeline of timestamped events, the actions people took, the services and
//! hosts involved, and a keyword-based severity estimate.
//!
//! All operations read from a [`PatternRegistry`] compiled once up front.
//! [`IncidentAnalyzer`] bundles a registry with the five operations and is
//! safe to share across threads.
//!
//! ```no_run
//! use incident_core::IncidentAnalyzer;
//!
//! let analyzer = IncidentAnalyzer::new()?;
//! let events = analyzer.extract_timeline("@sarah 14:23: Seeing elevated errors");
//! assert_eq!(events[0].actor.as_deref(), Some("sarah"));
//! # Ok::<(), incident_core::EngineError>(())
//! ```

pub mod actions;
pub mod entities;
pub mod error;
pub mod patterns;
pub mod severity;
pub mod summary;
pub mod timeline;
pub mod types;

pub use error::EngineError;
pub use patterns::PatternRegistry;
pub use types::{
    Action, ActionCategory, Confidence, EntitySet, Event, SeverityAssessment, SeverityLevel,
    Summary,
};

/// The extraction engine: a compiled registry plus the operations over it.
#[derive(Debug)]
pub struct IncidentAnalyzer {
    registry: PatternRegistry,
}

impl IncidentAnalyzer {
    /// Compile the pattern registry.
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self::with_registry(PatternRegistry::new()?))
    }

    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn find_timestamp(&self, line: &str) -> Option<String> {
        timeline::find_timestamp(&self.registry, line)
    }

    pub fn find_actor(&self, line: &str) -> Option<String> {
        timeline::find_actor(&self.registry, line)
    }

    pub fn extract_timeline(&self, text: &str) -> Vec<Event> {
        timeline::extract_timeline(&self.registry, text)
    }

    pub fn identify_actions(&self, text: &str) -> Vec<Action> {
        actions::identify_actions(&self.registry, text)
    }

    pub fn extract_entities(&self, text: &str) -> EntitySet {
        entities::extract_entities(&self.registry, text)
    }

    pub fn detect_severity(&self, text: &str) -> SeverityAssessment {
        severity::detect_severity(&self.registry, text)
    }

    pub fn generate_summary(&self, text: &str) -> Summary {
        summary::generate_summary(&self.registry, text)
    }
}
