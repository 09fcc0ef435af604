//! Error taxonomy shared by every tool.
//!
//! Tools never let an error escape their boundary: each failure is mapped to a
//! [`ToolError`] and rendered as `{"error": "..."}` by the MCP layer.

use thiserror::Error;

/// Failure of a single tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required external client was never configured (missing token or key).
    #[error("{0}")]
    Configuration(String),

    /// A parameter was malformed; detected before any remote call.
    #[error("{0}")]
    Validation(String),

    /// A call to an external collaborator failed.
    #[error("{0}")]
    Remote(String),
}

impl ToolError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ToolError::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    /// Wrap a remote failure, keeping the whole context chain in the message.
    pub fn remote(context: &str, err: &anyhow::Error) -> Self {
        ToolError::Remote(format!("{}: {:#}", context, err))
    }

    /// Short machine-friendly label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Configuration(_) => "configuration",
            ToolError::Validation(_) => "validation",
            ToolError::Remote(_) => "remote",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_keeps_context_chain() {
        let err = anyhow::anyhow!("connection reset").context("Failed to list repositories");
        let tool_err = ToolError::remote("GitHub request failed", &err);

        let message = tool_err.to_string();
        assert!(message.starts_with("GitHub request failed: "));
        assert!(message.contains("Failed to list repositories"));
        assert!(message.contains("connection reset"));
        assert_eq!(tool_err.kind(), "remote");
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = ToolError::validation("per_page must be between 1 and 100");
        assert_eq!(err.to_string(), "per_page must be between 1 and 100");
        assert_eq!(err.kind(), "validation");
    }
}
