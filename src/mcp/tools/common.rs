//! Common utilities for MCP tools.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::{DocumentStore, FileStore, SourceHost};
use crate::error::ToolError;
use crate::runtime::Runtime;

/// Render a tool outcome: pretty JSON on success, `{"error": ..}` on failure.
pub fn respond<T: Serialize>(tool: &str, result: Result<T, ToolError>) -> CallToolResult {
    match result {
        Ok(payload) => match serde_json::to_string_pretty(&payload) {
            Ok(text) => {
                info!("✅ {} completed", tool);
                CallToolResult::success(vec![Content::text(text)])
            }
            Err(e) => tool_error(format!("Failed to serialize {} result: {}", tool, e)),
        },
        Err(err) => {
            warn!("❌ {} failed ({}): {}", tool, err.kind(), err);
            tool_error(err.to_string())
        }
    }
}

/// Error result for tool failures
pub fn tool_error(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(
        json!({ "error": message.into() }).to_string(),
    )])
}

pub fn require_github(runtime: &Runtime) -> Result<&dyn SourceHost, ToolError> {
    runtime.github.as_deref().ok_or_else(|| {
        ToolError::configuration("GitHub client not initialized. Set GITHUB_TOKEN to enable GitHub tools.")
    })
}

pub fn require_drive(runtime: &Runtime) -> Result<&dyn FileStore, ToolError> {
    runtime.drive.as_deref().ok_or_else(|| {
        ToolError::configuration(
            "Google Drive client not initialized. Provide Google credentials (token.json).",
        )
    })
}

pub fn require_docs(runtime: &Runtime) -> Result<&dyn DocumentStore, ToolError> {
    runtime.docs.as_deref().ok_or_else(|| {
        ToolError::configuration(
            "Google Docs client not initialized. Provide Google credentials (token.json).",
        )
    })
}

/// The trimmed value, or a validation error naming the parameter.
pub fn require_non_empty<'a>(name: &str, value: &'a str) -> Result<&'a str, ToolError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::validation(format!("{} must not be empty", name)));
    }
    Ok(value)
}

/// `owner/name` as given, or a bare name qualified with the authenticated user.
pub async fn resolve_repo(host: &dyn SourceHost, repo_name: &str) -> Result<String, ToolError> {
    let repo_name = require_non_empty("repo_name", repo_name)?;
    if let Some((owner, name)) = repo_name.split_once('/') {
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(ToolError::validation(format!(
                "repo_name must be 'owner/name' or 'name', got '{}'",
                repo_name
            )));
        }
        return Ok(repo_name.to_string());
    }

    let user = host
        .authenticated_user()
        .await
        .map_err(|e| ToolError::remote("Failed to resolve the GitHub user", &e))?;
    Ok(format!("{}/{}", user.login, repo_name))
}

/// Quote a value for a Drive query expression.
pub fn quote_query_value(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
