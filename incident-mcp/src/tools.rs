//! Tool registry: the five extraction operations exposed as MCP tools.
//!
//! Tools are registered once at startup and listed in registration order.
//! Every call produces a text payload. Engine results are JSON documents;
//! failures are `{"error": "<message>"}` objects flagged as errors.

use incident_core::IncidentAnalyzer;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::protocol::{CallToolResult, McpTool};

/// Payload message when the `text` argument is missing or empty.
pub const NO_TEXT_MESSAGE: &str = "No text provided";

/// Errors from tool registration and execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {name}")]
    NotFound { name: String },

    #[error("Tool already registered: {name}")]
    AlreadyRegistered { name: String },

    #[error("Invalid arguments for tool '{name}': {reason}")]
    InvalidArguments { name: String, reason: String },

    #[error("Tool '{name}' execution failed: {message}")]
    ExecutionFailed { name: String, message: String },
}

impl ToolError {
    /// The message placed in an `{"error": ...}` payload.
    pub fn payload_message(&self) -> String {
        match self {
            ToolError::NotFound { name } => format!("Unknown tool: {name}"),
            ToolError::InvalidArguments { reason, .. } => reason.clone(),
            ToolError::ExecutionFailed { message, .. } => message.clone(),
            ToolError::AlreadyRegistered { .. } => self.to_string(),
        }
    }
}

/// A tool that runs one operation over a block of incident text.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments.
    fn parameters_schema(&self) -> Value;

    fn execute(&self, text: &str) -> Result<Value, ToolError>;
}

/// The rendered outcome of a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// An `{"error": message}` payload.
    pub fn error(message: &str) -> Self {
        Self {
            content: format!("{{\"error\": {}}}", Value::from(message)),
            is_error: true,
        }
    }

    pub fn into_call_result(self) -> CallToolResult {
        CallToolResult::text(self.content, self.is_error)
    }
}

/// Ordered collection of tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        if self.get(tool.name()).is_some() {
            return Err(ToolError::AlreadyRegistered {
                name: tool.name().to_string(),
            });
        }
        debug!(tool = tool.name(), "Registering tool");
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name).cloned()
    }

    /// Tool definitions in registration order, as sent in `tools/list`.
    pub fn list_definitions(&self) -> Vec<McpTool> {
        self.tools
            .iter()
            .map(|tool| McpTool {
                name: tool.name().to_string(),
                description: Some(tool.description().to_string()),
                input_schema: tool.parameters_schema(),
            })
            .collect()
    }

    pub fn list_names(&self) -> Vec<String> {
        self.tools.iter().map(|tool| tool.name().to_string()).collect()
    }

    /// Run a tool against its arguments.
    ///
    /// The text argument is checked before the name is resolved, so a call
    /// without text reports the missing text even for an unknown tool.
    pub fn execute(&self, name: &str, arguments: Option<&Value>) -> Result<Value, ToolError> {
        let text = text_argument(arguments).ok_or_else(|| ToolError::InvalidArguments {
            name: name.to_string(),
            reason: NO_TEXT_MESSAGE.to_string(),
        })?;

        let tool = self.get(name).ok_or_else(|| ToolError::NotFound {
            name: name.to_string(),
        })?;

        info!(tool = name, text_len = text.len(), "Executing tool");
        tool.execute(text)
    }

    /// Run a tool and render the payload clients receive.
    pub fn call(&self, name: &str, arguments: Option<&Value>, pretty: bool) -> ToolOutput {
        let rendered = self
            .execute(name, arguments)
            .and_then(|value| render(name, &value, pretty));

        match rendered {
            Ok(content) => ToolOutput::text(content),
            Err(err) => {
                warn!(tool = name, error = %err, "Tool call failed");
                ToolOutput::error(&err.payload_message())
            }
        }
    }
}

/// The non-empty string under `arguments.text`, if there is one.
pub fn text_argument(arguments: Option<&Value>) -> Option<&str> {
    arguments?
        .get("text")?
        .as_str()
        .filter(|text| !text.is_empty())
}

fn render(name: &str, value: &Value, pretty: bool) -> Result<String, ToolError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|err| ToolError::ExecutionFailed {
        name: name.to_string(),
        message: err.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Incident tools
// ---------------------------------------------------------------------------

/// The engine operations, in the order they are advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Timeline,
    Actions,
    Entities,
    Severity,
    Summary,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Timeline,
        Operation::Actions,
        Operation::Entities,
        Operation::Severity,
        Operation::Summary,
    ];

    pub fn tool_name(&self) -> &'static str {
        match self {
            Operation::Timeline => "extract_timeline",
            Operation::Actions => "identify_actions",
            Operation::Entities => "extract_entities",
            Operation::Severity => "detect_severity",
            Operation::Summary => "generate_summary",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::Timeline => {
                "Extract chronological timeline of events from incident text. \
                 Returns events with timestamps, actors, and full context."
            }
            Operation::Actions => {
                "Identify actions taken during incident response. \
                 Categorizes actions by type (investigation, remediation, communication, status)."
            }
            Operation::Entities => {
                "Extract entities involved in the incident. \
                 Finds services, IP addresses, and domains mentioned in text."
            }
            Operation::Severity => {
                "Detect incident severity based on keywords and context. \
                 Returns severity level (critical/high/medium/low/unknown) with confidence score."
            }
            Operation::Summary => {
                "Generate comprehensive incident summary. \
                 Combines timeline, actions, entities, and severity into structured report."
            }
        }
    }

    fn text_description(&self) -> &'static str {
        match self {
            Operation::Timeline => "Raw incident text (chat logs, notes, etc.)",
            _ => "Raw incident text",
        }
    }
}

/// Adapter exposing one engine operation as a [`Tool`].
pub struct AnalysisTool {
    operation: Operation,
    analyzer: Arc<IncidentAnalyzer>,
}

impl AnalysisTool {
    pub fn new(operation: Operation, analyzer: Arc<IncidentAnalyzer>) -> Self {
        Self {
            operation,
            analyzer,
        }
    }

    fn to_json<T: Serialize>(&self, result: &T) -> Result<Value, ToolError> {
        serde_json::to_value(result).map_err(|err| ToolError::ExecutionFailed {
            name: self.name().to_string(),
            message: err.to_string(),
        })
    }
}

impl Tool for AnalysisTool {
    fn name(&self) -> &str {
        self.operation.tool_name()
    }

    fn description(&self) -> &str {
        self.operation.description()
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": self.operation.text_description()
                }
            },
            "required": ["text"]
        })
    }

    fn execute(&self, text: &str) -> Result<Value, ToolError> {
        let analyzer = &self.analyzer;
        match self.operation {
            Operation::Timeline => self.to_json(&analyzer.extract_timeline(text)),
            Operation::Actions => self.to_json(&analyzer.identify_actions(text)),
            Operation::Entities => self.to_json(&analyzer.extract_entities(text)),
            Operation::Severity => self.to_json(&analyzer.detect_severity(text)),
            Operation::Summary => self.to_json(&analyzer.generate_summary(text)),
        }
    }
}

/// Register the five incident tools in advertised order.
pub fn register_incident_tools(
    registry: &mut ToolRegistry,
    analyzer: Arc<IncidentAnalyzer>,
) -> Result<(), ToolError> {
    for operation in Operation::ALL {
        registry.register(Arc::new(AnalysisTool::new(operation, Arc::clone(&analyzer))))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> ToolRegistry {
        let analyzer = Arc::new(IncidentAnalyzer::new().unwrap());
        let mut registry = ToolRegistry::new();
        register_incident_tools(&mut registry, analyzer).unwrap();
        registry
    }

    struct FailingTool;

    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "explode"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object"})
        }

        fn execute(&self, _text: &str) -> Result<Value, ToolError> {
            Err(ToolError::ExecutionFailed {
                name: "explode".into(),
                message: "engine blew up".into(),
            })
        }
    }

    #[test]
    fn test_tools_listed_in_order() {
        assert_eq!(
            registry().list_names(),
            [
                "extract_timeline",
                "identify_actions",
                "extract_entities",
                "detect_severity",
                "generate_summary",
            ]
        );
    }

    #[test]
    fn test_definitions_require_text() {
        for definition in registry().list_definitions() {
            assert_eq!(definition.input_schema["required"], json!(["text"]));
            assert_eq!(
                definition.input_schema["properties"]["text"]["type"],
                "string"
            );
            assert!(definition.description.is_some());
        }
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let analyzer = Arc::new(IncidentAnalyzer::new().unwrap());
        let err = registry
            .register(Arc::new(AnalysisTool::new(Operation::Severity, analyzer)))
            .unwrap_err();
        assert!(matches!(err, ToolError::AlreadyRegistered { name } if name == "detect_severity"));
        assert_eq!(registry.list_names().len(), 5);
    }

    #[test]
    fn test_missing_text_payload() {
        let registry = registry();
        for args in [
            None,
            Some(json!({})),
            Some(json!({"text": ""})),
            Some(json!({"text": null})),
            Some(json!({"text": 42})),
        ] {
            let output = registry.call("extract_timeline", args.as_ref(), true);
            assert_eq!(output, ToolOutput::error(NO_TEXT_MESSAGE));
            assert_eq!(output.content, r#"{"error": "No text provided"}"#);
        }
    }

    #[test]
    fn test_missing_text_checked_before_tool_name() {
        let output = registry().call("nope", Some(&json!({})), true);
        assert_eq!(output.content, r#"{"error": "No text provided"}"#);
    }

    #[test]
    fn test_unknown_tool_payload() {
        let output = registry().call("summarize", Some(&json!({"text": "x"})), true);
        assert!(output.is_error);
        assert_eq!(output.content, r#"{"error": "Unknown tool: summarize"}"#);
    }

    #[test]
    fn test_execution_failure_payload() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FailingTool)).unwrap();
        let output = registry.call("explode", Some(&json!({"text": "x"})), true);
        assert!(output.is_error);
        assert_eq!(output.content, r#"{"error": "engine blew up"}"#);
    }

    #[test]
    fn test_pretty_payload_uses_two_space_indent() {
        let output = registry().call(
            "extract_entities",
            Some(&json!({"text": "db-service at 10.0.0.1"})),
            true,
        );
        assert!(!output.is_error);
        assert_eq!(
            output.content,
            "{\n  \"services\": [\n    \"db-service\"\n  ],\n  \"ips\": [\n    \"10.0.0.1\"\n  ],\n  \"domains\": []\n}"
        );
    }

    #[test]
    fn test_compact_payload() {
        let output = registry().call(
            "extract_timeline",
            Some(&json!({"text": "@sarah 14:23: Seeing elevated errors"})),
            false,
        );
        assert_eq!(
            output.content,
            r#"[{"time":"14:23","text":"@sarah 14:23: Seeing elevated errors","actor":"sarah"}]"#
        );
    }

    #[test]
    fn test_execute_returns_typed_errors() {
        let registry = registry();
        assert!(matches!(
            registry.execute("extract_timeline", None),
            Err(ToolError::InvalidArguments { .. })
        ));
        assert!(matches!(
            registry.execute("missing", Some(&json!({"text": "x"}))),
            Err(ToolError::NotFound { .. })
        ));
        let value = registry
            .execute("detect_severity", Some(&json!({"text": "site is down"})))
            .unwrap();
        assert_eq!(value["level"], "critical");
    }

    #[test]
    fn test_error_payload_escapes_message() {
        let output = ToolOutput::error("bad \"quote\"");
        assert_eq!(output.content, r#"{"error": "bad \"quote\""}"#);
        let parsed: Value = serde_json::from_str(&output.content).unwrap();
        assert_eq!(parsed["error"], "bad \"quote\"");
    }

    #[test]
    fn test_into_call_result_flags_errors() {
        let result = ToolOutput::error("x").into_call_result();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(ToolOutput::text("[]").into_call_result().is_error, None);
    }
}
