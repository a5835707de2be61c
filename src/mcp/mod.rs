//! MCP (Model Context Protocol) server implementation
//!
//! JSON-RPC over stdio for AI tool integration.

pub mod protocol;
pub mod resources;

pub use protocol::{
    methods, InitializeResult, McpHandler, McpRequest, McpResponse, McpServer, ToolCallResult,
};
