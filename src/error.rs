//! Error types for the Vigilia MCP server

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Vigilia operations
pub type Result<T> = std::result::Result<T, VigiliaError>;

/// A single rejected field: where it sits in the arguments and what rule it broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field path inside the tool arguments, e.g. `customers[2]` or `per_page`
    pub path: String,
    /// Constraint the value failed
    pub constraint: String,
}

/// Accumulator for argument validation.
///
/// Validation never stops at the first bad field; every offending path is
/// collected so the caller can fix the whole payload in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Single-violation constructor for fail-fast call sites.
    pub fn of(path: impl Into<String>, constraint: impl Into<String>) -> Self {
        let mut v = Self::new();
        v.push(path, constraint);
        v
    }

    pub fn push(&mut self, path: impl Into<String>, constraint: impl Into<String>) {
        self.0.push(Violation {
            path: path.into(),
            constraint: constraint.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Empty accumulator becomes `Ok(())`, anything else a `Parameter` error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(VigiliaError::Parameter(self))
        }
    }
}

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for v in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", v.path, v.constraint)?;
            first = false;
        }
        Ok(())
    }
}

/// Main error type for the Vigilia MCP server
#[derive(Error, Debug)]
pub enum VigiliaError {
    #[error("Invalid parameters: {0}")]
    Parameter(Violations),

    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Server is shutting down")]
    Unavailable,

    #[error("Upstream response failed validation: {0}")]
    UpstreamValidation(String),

    #[error("Execution error: {detail}")]
    Execution { status: Option<u16>, detail: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VigiliaError {
    /// Get error code for MCP protocol
    pub fn code(&self) -> i64 {
        match self {
            VigiliaError::Parameter(_) => -32602,
            VigiliaError::UnknownOperation(_) => -32601,
            VigiliaError::NotFound(_) => -32001,
            VigiliaError::Timeout(_) => -32002,
            VigiliaError::Unauthorized(_) => -32003,
            VigiliaError::Forbidden(_) => -32004,
            VigiliaError::Unavailable => -32005,
            VigiliaError::UpstreamValidation(_) => -32006,
            _ => -32000,
        }
    }

    /// Structured violation list, when the error is a parameter rejection.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            VigiliaError::Parameter(v) => Some(v),
            _ => None,
        }
    }
}
