//! MCP request handlers: routes JSON-RPC methods to the tool registry.

use crate::config::ServerConfig;
use crate::error::McpError;
use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, ListToolsResult, MCP_PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::tools::ToolRegistry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-connection protocol state plus the tools it dispatches to.
pub struct RequestHandler {
    tools: Arc<ToolRegistry>,
    initialized: bool,
    server_info: ServerInfo,
    pretty_json: bool,
}

impl RequestHandler {
    pub fn new(tools: Arc<ToolRegistry>, config: &ServerConfig) -> Self {
        Self {
            tools,
            initialized: false,
            server_info: ServerInfo {
                name: config.server.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            pretty_json: config.output.pretty_json,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn handle_initialize(&mut self, params: InitializeParams) -> Result<Value, McpError> {
        info!(
            client = %params.client_info.name,
            client_version = ?params.client_info.version,
            protocol_version = %params.protocol_version,
            "MCP client connecting"
        );

        self.initialized = true;

        to_result(
            "initialize result",
            InitializeResult {
                protocol_version: MCP_PROTOCOL_VERSION.to_string(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability {
                        list_changed: false,
                    }),
                },
                server_info: self.server_info.clone(),
            },
        )
    }

    pub fn handle_initialized(&self) {
        info!("MCP client initialized");
    }

    pub fn handle_tools_list(&self) -> Result<Value, McpError> {
        self.ensure_initialized()?;

        let tools = self.tools.list_definitions();
        debug!(count = tools.len(), "Listing tools");
        to_result("tools list", ListToolsResult { tools })
    }

    /// Tool failures are reported inside the result, never as JSON-RPC errors.
    pub fn handle_tools_call(&self, params: CallToolParams) -> Result<Value, McpError> {
        self.ensure_initialized()?;

        info!(tool = %params.name, "Calling tool via MCP");
        if let Some(arguments) = &params.arguments {
            debug!(tool = %params.name, args = %arguments, "Tool call arguments");
        }

        let output = self
            .tools
            .call(&params.name, params.arguments.as_ref(), self.pretty_json);
        to_result("tool result", output.into_call_result())
    }

    /// Dispatch one method. Notifications are routed here too; the caller
    /// drops their result.
    pub fn route(&mut self, method: &str, params: Value) -> Result<Value, McpError> {
        match method {
            "initialize" => {
                let params = decode_params(method, params)?;
                self.handle_initialize(params)
            }
            "notifications/initialized" => {
                self.handle_initialized();
                Ok(Value::Null)
            }
            "tools/list" => self.handle_tools_list(),
            "tools/call" => {
                let params = decode_params(method, params)?;
                self.handle_tools_call(params)
            }
            _ => Err(McpError::MethodNotFound {
                method: method.to_string(),
            }),
        }
    }

    fn ensure_initialized(&self) -> Result<(), McpError> {
        if self.initialized {
            Ok(())
        } else {
            Err(McpError::NotInitialized)
        }
    }
}

fn decode_params<T: DeserializeOwned>(method: &str, params: Value) -> Result<T, McpError> {
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams {
        message: format!("Invalid {method} params: {e}"),
    })
}

fn to_result<T: Serialize>(what: &str, value: T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError {
        message: format!("Failed to serialize {what}: {e}"),
    })
}
