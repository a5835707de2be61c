//! Vigilia MCP - AML/KYC vigilance tools for AI agents
//!
//! Shims the Vigilia vigilance platform REST API into MCP tools and
//! resources so agents can read and manage dossiers without touching
//! HTTP themselves.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mcp;
pub mod schema;
pub mod tools;

pub use client::ApiClient;
pub use config::Config;
pub use dispatch::VigiliaHandler;
pub use error::{Result, VigiliaError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
