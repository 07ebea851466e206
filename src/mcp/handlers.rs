//! MCP (Model Context Protocol) route handlers
//!
//! This module answers JSON-RPC requests from an agent and dispatches
//! `tools/call` into the tool registry. It exports `handle_tool_call`
//! publicly to make it accessible for tests.

use super::{helpers::*, models::*};
use crate::{state::SharedState, tools::ToolRegistry};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};

/// Creates routes for MCP-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(handle_mcp).get(handle_mcp_sse))
        .route("/mcp", post(handle_mcp).get(handle_mcp_sse)) // Standard endpoint
        .route("/mcp/", post(handle_mcp).get(handle_mcp_sse)) // Trailing slash safety
}

/// Handle SSE (Server-Sent Events) handshake for GET requests
async fn handle_mcp_sse() -> impl IntoResponse {
    (
        [("content-type", "text/event-stream")],
        "event: endpoint\ndata: /mcp\n\n",
    )
}

/// Endpoint: POST /mcp
/// Handles the Model Context Protocol communication for POST requests.
async fn handle_mcp(
    State(state): State<SharedState>,
    body: Result<Json<JsonRpcRequest>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let req = match body {
        Ok(Json(r)) => r,
        Err(e) => {
            tracing::warn!(error = %e.body_text(), "Rejected JSON-RPC body");
            return (
                StatusCode::BAD_REQUEST,
                Json(rpc_error(Value::Null, PARSE_ERROR, "Parse error")),
            )
                .into_response();
        }
    };

    let id = req.id.unwrap_or(Value::Null);
    let method_name = req.method.as_str();
    let params = req.params.unwrap_or(Value::Null);

    tracing::info!(method = method_name, id = %id, "MCP call");

    let response_body = match method_name {
        "initialize" => rpc_success(id, handle_initialize()),
        "notifications/initialized" => rpc_success(id, json!({})),
        "tools/list" => rpc_success(id, handle_tools_list(&state.tools)),
        "tools/call" => {
            let call: ToolCallParams = serde_json::from_value(params).unwrap_or_default();
            match handle_tool_call(&state.tools, &call.name, call.arguments) {
                Ok(result) => rpc_success(id, result),
                Err(msg) => rpc_error(id, INVALID_PARAMS, msg),
            }
        }
        "ping" => rpc_success(id, json!({})),
        _ => {
            tracing::warn!(method = method_name, "Unknown method");
            rpc_error(id, METHOD_NOT_FOUND, "Method not found")
        }
    };

    Json(response_body).into_response()
}

// =============================================================================
// MCP Method Handlers
// =============================================================================

/// Handles `initialize` request (Handshake).
fn handle_initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": true }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Handles `tools/list` request.
fn handle_tools_list(tools: &ToolRegistry) -> Value {
    let listing: Vec<Value> = tools.list().iter().map(|t| t.to_listing()).collect();
    json!({ "tools": listing })
}

/// Handles `tools/call` request.
///
/// Errors come back as the message to place in the JSON-RPC error object.
pub fn handle_tool_call(tools: &ToolRegistry, name: &str, args: Value) -> Result<Value, String> {
    tools
        .call(name, args)
        .map(|output| output.into_call_result())
        .map_err(|e| {
            tracing::warn!(tool = name, error = %e, "Tool call failed");
            e.to_string()
        })
}
