//! Request dispatcher
//!
//! Implements the MCP method surface over the tool registry and the
//! resource catalog, and owns the drain gate: once shutdown begins,
//! tool calls and resource reads are refused before any platform
//! traffic is attempted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::error::{Result, VigiliaError, Violations};
use crate::mcp::protocol::{
    methods, InitializeResult, McpHandler, McpRequest, McpResponse, ResourceContents,
    ToolCallResult,
};
use crate::mcp::resources;
use crate::tools::{dispatch_tool, get_tool_definitions, ToolContext, ToolRegistry};

/// MCP handler over the vigilance platform
pub struct VigiliaHandler {
    ctx: ToolContext,
    registry: ToolRegistry,
    shutting_down: Arc<AtomicBool>,
}

impl VigiliaHandler {
    pub fn new(client: ApiClient) -> Result<Self> {
        Ok(Self {
            ctx: ToolContext { client },
            registry: ToolRegistry::new()?,
            shutting_down: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag shared with whoever initiates shutdown.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutting_down.clone()
    }

    fn refuse_if_draining(&self) -> Result<()> {
        if self.shutting_down.load(Ordering::SeqCst) {
            Err(VigiliaError::Unavailable)
        } else {
            Ok(())
        }
    }

    async fn handle_tool_call(&self, name: &str, arguments: Value) -> Result<Value> {
        self.refuse_if_draining()?;
        tracing::debug!(tool = name, "tool call");
        dispatch_tool(&self.registry, &self.ctx, name, arguments).await
    }

    async fn handle_read_resource(&self, params: &Value) -> Result<ResourceContents> {
        self.refuse_if_draining()?;
        let uri = params
            .get("uri")
            .and_then(|v| v.as_str())
            .ok_or_else(|| VigiliaError::Parameter(Violations::of("uri", "is required")))?;
        tracing::debug!(uri, "resource read");
        resources::read(&self.ctx, uri).await
    }
}

#[async_trait]
impl McpHandler for VigiliaHandler {
    async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        match request.method.as_str() {
            methods::INITIALIZE => {
                let result = InitializeResult::default();
                Some(McpResponse::success(request.id, json!(result)))
            }
            methods::INITIALIZED => {
                // Notification, nothing goes back
                if request.is_notification() {
                    return None;
                }
                Some(McpResponse::success(request.id, json!({})))
            }
            methods::PING => Some(McpResponse::success(request.id, json!({}))),
            methods::LIST_TOOLS => {
                let tools = get_tool_definitions();
                Some(McpResponse::success(request.id, json!({"tools": tools})))
            }
            methods::CALL_TOOL => {
                let name = request
                    .params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let arguments = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(json!({}));

                match self.handle_tool_call(name, arguments).await {
                    Ok(value) => {
                        let tool_result = ToolCallResult::json(&value);
                        Some(McpResponse::success(request.id, json!(tool_result)))
                    }
                    Err(e) => {
                        tracing::warn!(tool = name, error = %e, "tool call failed");
                        Some(McpResponse::from_error(request.id, &e))
                    }
                }
            }
            methods::LIST_RESOURCES => {
                let list = resources::resource_definitions();
                Some(McpResponse::success(request.id, json!({"resources": list})))
            }
            methods::LIST_RESOURCE_TEMPLATES => {
                let list = resources::template_definitions();
                Some(McpResponse::success(
                    request.id,
                    json!({"resourceTemplates": list}),
                ))
            }
            methods::READ_RESOURCE => match self.handle_read_resource(&request.params).await {
                Ok(contents) => Some(McpResponse::success(
                    request.id,
                    json!({"contents": [contents]}),
                )),
                Err(e) => {
                    tracing::warn!(error = %e, "resource read failed");
                    Some(McpResponse::from_error(request.id, &e))
                }
            },
            _ if request.is_notification() => None,
            _ => Some(McpResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            )),
        }
    }
}
