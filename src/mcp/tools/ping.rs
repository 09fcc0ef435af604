//! Ping tool implementation.

use serde::Serialize;

use crate::error::ToolError;
use crate::mcp::types::PingArgs;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
}

/// Liveness check.
pub fn ping(_args: PingArgs) -> Result<PingResponse, ToolError> {
    Ok(PingResponse { status: "pong" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping() {
        let response = ping(PingArgs::default()).unwrap();
        assert_eq!(serde_json::to_value(&response).unwrap()["status"], "pong");
    }
}
