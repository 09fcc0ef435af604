//! MCP (Model Context Protocol) server implementation using rmcp.
//!
//! The server exposes the notebook, repository and document tools over stdio.

mod handlers;
mod server;
mod tools;
pub mod types;

pub use handlers::run_mcp_server;
