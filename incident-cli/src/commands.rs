//! Subcommand handlers.

use crate::Commands;
use incident_core::IncidentAnalyzer;
use incident_mcp::protocol::McpTool;
use incident_mcp::tools::Operation;
use incident_mcp::transport::StdioTransport;
use incident_mcp::{McpServer, ServerConfig, ToolOutput, ToolRegistry, register_incident_tools};
use serde_json::json;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// Operation names accepted by `analyze`.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeOperation {
    Timeline,
    Actions,
    Entities,
    Severity,
    Summary,
}

impl From<AnalyzeOperation> for Operation {
    fn from(op: AnalyzeOperation) -> Self {
        match op {
            AnalyzeOperation::Timeline => Operation::Timeline,
            AnalyzeOperation::Actions => Operation::Actions,
            AnalyzeOperation::Entities => Operation::Entities,
            AnalyzeOperation::Severity => Operation::Severity,
            AnalyzeOperation::Summary => Operation::Summary,
        }
    }
}

pub async fn handle_command(command: Commands, config: &ServerConfig) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Serve => {
            let registry = Arc::new(build_registry()?);
            let mut server = McpServer::new(Arc::clone(&registry), config);
            info!(
                server = %config.server.name,
                tools = ?registry.list_names(),
                "Serving MCP on stdio"
            );
            let mut transport = StdioTransport::stdio();
            server.run(&mut transport).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Analyze { operation, file } => {
            let text = read_input(file.as_deref())?;
            let registry = build_registry()?;
            let output = analyze(&registry, operation.into(), &text, config.output.pretty_json);
            println!("{}", output.content);
            Ok(if output.is_error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Tools => {
            let registry = build_registry()?;
            println!("{}", render_tools(&registry.list_definitions())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_registry() -> anyhow::Result<ToolRegistry> {
    let analyzer = Arc::new(IncidentAnalyzer::new()?);
    let mut registry = ToolRegistry::new();
    register_incident_tools(&mut registry, analyzer)?;
    Ok(registry)
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e)),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Same path as an MCP `tools/call`, so output matches the server's payloads.
fn analyze(registry: &ToolRegistry, operation: Operation, text: &str, pretty: bool) -> ToolOutput {
    let arguments = json!({ "text": text });
    registry.call(operation.tool_name(), Some(&arguments), pretty)
}

fn render_tools(tools: &[McpTool]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&json!({ "tools": tools }))?)
}
