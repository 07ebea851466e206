//! MCP Protocol Helpers
//!
//! This module contains helper functions for JSON-RPC communication.

use serde_json::{json, Value};

/// Builds a JSON-RPC 2.0 success response.
///
/// # Arguments
///
/// * `id` – The request identifier that must be echoed back.
/// * `result` – The payload representing the successful outcome.
pub fn rpc_success(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

/// Builds a JSON-RPC 2.0 error response.
///
/// # Arguments
///
/// * `id` – The request identifier (or `null` if unavailable).
/// * `code` – The JSON-RPC error code (e.g., -32601 for method not found).
/// * `message` – Human-readable description of the error.
pub fn rpc_error(id: Value, code: i32, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_envelopes() {
        let success = rpc_success(json!(1), json!("ok"));
        assert_eq!(success["jsonrpc"], "2.0");
        assert_eq!(success["result"], "ok");
        assert_eq!(success["id"], 1);

        let error = rpc_error(json!(2), -1, "fail");
        assert_eq!(error["error"]["code"], -1);
        assert_eq!(error["error"]["message"], "fail");
        assert_eq!(error["id"], 2);
    }
}
