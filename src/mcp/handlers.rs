//! MCP server handlers.
//!
//! This module contains only the MCP server startup logic.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use crate::runtime::Runtime;

use super::server::ColabHubServer;

/// Run the MCP server over stdio until the client disconnects.
pub async fn run_mcp_server(runtime: Arc<Runtime>) -> Result<()> {
    info!("🔧 Starting colabhub MCP tool server...");
    info!("📝 Stdio mode (using rmcp)");

    let server = ColabHubServer::new(runtime);

    run_server(server).await
}

async fn run_server(server: ColabHubServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("✅ MCP tool server started");
    info!("🔗 Ready for MCP client connections");

    let service = server.serve(stdio()).await.map_err(|e| {
        error!("Failed to start MCP service: {:?}", e);
        anyhow::anyhow!("Failed to start MCP service: {:?}", e)
    })?;

    service.waiting().await.map_err(|e| {
        error!("MCP service error: {:?}", e);
        anyhow::anyhow!("MCP service error: {:?}", e)
    })?;

    info!("MCP server shutting down");
    Ok(())
}
