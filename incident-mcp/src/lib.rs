//! # Incident MCP
//!
//! Model Context Protocol server exposing the incident extraction engine as
//! five tools over JSON-RPC 2.0.
//!
//! ## Architecture
//!
//! ```text
//! Client <-> Transport (stdio/channel) <-> McpServer <-> RequestHandler
//!                                                        +-- ToolRegistry -> IncidentAnalyzer
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod tools;
pub mod transport;

pub use config::{ServerConfig, load_config};
pub use error::McpError;
pub use tools::{ToolError, ToolOutput, ToolRegistry, register_incident_tools};

use handlers::RequestHandler;
use protocol::{IncomingMessage, JSONRPC_VERSION, JsonRpcResponse, RequestId};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use transport::Transport;

/// Serves MCP requests from one client over one transport.
pub struct McpServer {
    handler: RequestHandler,
}

impl McpServer {
    pub fn new(tools: Arc<ToolRegistry>, config: &ServerConfig) -> Self {
        Self {
            handler: RequestHandler::new(tools, config),
        }
    }

    /// Process messages until the transport reports EOF or fails to read.
    pub async fn run<T: Transport>(&mut self, transport: &mut T) -> Result<(), McpError> {
        info!("MCP server starting");

        loop {
            let message = match transport.read_message().await {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    info!("Transport closed (EOF), shutting down MCP server");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Transport read error");
                    break;
                }
            };

            if message.trim().is_empty() {
                continue;
            }

            debug!(message = %message, "Received MCP message");

            let Some(response) = self.process_message(&message) else {
                continue;
            };
            let response_json = match serde_json::to_string(&response) {
                Ok(json) => json,
                Err(e) => {
                    error!(error = %e, "Failed to serialize MCP response");
                    continue;
                }
            };
            debug!(response = %response_json, "Sending MCP response");
            transport.write_message(&response_json).await?;
        }

        transport.close().await?;
        info!("MCP server stopped");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub fn process_message(&mut self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable MCP message");
                return Some(JsonRpcResponse::from_mcp_error(
                    RequestId::Null,
                    McpError::ParseError {
                        message: format!("Invalid JSON-RPC message: {e}"),
                    },
                ));
            }
        };

        let fallback_id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok())
            .unwrap_or(RequestId::Null);

        let incoming: IncomingMessage = match serde_json::from_value(value) {
            Ok(incoming) => incoming,
            Err(e) => {
                return Some(JsonRpcResponse::from_mcp_error(
                    fallback_id,
                    McpError::InvalidRequest {
                        message: format!("Malformed JSON-RPC message: {e}"),
                    },
                ));
            }
        };

        if incoming.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::from_mcp_error(
                fallback_id,
                McpError::InvalidRequest {
                    message: format!("Expected jsonrpc version 2.0, got: {}", incoming.jsonrpc),
                },
            ));
        }

        if incoming.is_notification() {
            debug!(method = %incoming.method, "Processing notification");
            if let Err(e) = self.handler.route(&incoming.method, incoming.params) {
                warn!(method = %incoming.method, error = %e, "Notification handler error");
            }
            return None;
        }

        let id = incoming.id.unwrap_or(RequestId::Null);
        debug!(method = %incoming.method, "Processing request");
        let response = match self.handler.route(&incoming.method, incoming.params) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!(method = %incoming.method, error = %e, "Request failed");
                JsonRpcResponse::from_mcp_error(id, e)
            }
        };
        Some(response)
    }

    pub fn is_initialized(&self) -> bool {
        self.handler.is_initialized()
    }
}
