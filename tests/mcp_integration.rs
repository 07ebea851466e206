//! Integration tests for the MCP (Model Context Protocol) endpoint
//!
//! These tests verify the complete MCP protocol implementation including:
//! - Server initialization and handshake
//! - Tool discovery and listing
//! - Tool execution against the shared store
//! - Error handling

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use shoe_store_rust::catalog::Catalog;
use shoe_store_rust::config::StoreConfig;
use shoe_store_rust::router::create_app_router;
use shoe_store_rust::state::{AppState, SharedState};

/// Helper function to create a test app instance plus its shared state
fn create_test_app() -> (axum::Router, SharedState) {
    let catalog = Catalog::builtin().expect("bundled catalog");
    let state = Arc::new(AppState::new(catalog, &StoreConfig::default()));
    (create_app_router(state.clone()), state)
}

/// Helper function to send a JSON-RPC request and get the response
async fn send_jsonrpc_request(
    app: &axum::Router,
    method: &str,
    params: Option<Value>,
    id: i32,
) -> (StatusCode, Value) {
    let request_body = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": id
    });

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&request_body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

/// Helper for `tools/call`
async fn call_tool(app: &axum::Router, name: &str, arguments: Value, id: i32) -> Value {
    let params = json!({ "name": name, "arguments": arguments });
    let (status, body) = send_jsonrpc_request(app, "tools/call", Some(params), id).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_mcp_sse_endpoint() {
    let (app, _) = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/mcp")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(content_type, "text/event-stream");

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8(body_bytes.to_vec()).unwrap();

    assert!(body_str.contains("event: endpoint"));
    assert!(body_str.contains("data: /mcp"));
}

#[tokio::test]
async fn test_mcp_initialize() {
    let (app, _) = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "initialize", None, 1).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], 1);

    let result = &body["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "shoe-store-rust");
    assert!(result["capabilities"]["tools"]["listChanged"]
        .as_bool()
        .unwrap());
}

#[tokio::test]
async fn test_mcp_tools_list() {
    let (app, _) = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "tools/list", None, 2).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);

    let tools = body["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "get_all_store_items",
            "add_to_cart",
            "display_cart",
            "purchase_cart",
            "get_filter_options",
            "filter_by_brand",
            "filter_by_gender",
            "filter_by_category",
        ]
    );

    let add_to_cart = &tools[1];
    assert_eq!(add_to_cart["description"], "Add an item to the shopping cart");
    assert_eq!(add_to_cart["inputSchema"]["properties"]["id"]["type"], "number");
    assert_eq!(add_to_cart["inputSchema"]["required"], json!(["id"]));

    let display_cart = &tools[2];
    assert_eq!(display_cart["inputSchema"]["properties"], json!({}));
}

#[tokio::test]
async fn test_mcp_tool_call_add_to_cart() {
    let (app, state) = create_test_app();

    call_tool(&app, "add_to_cart", json!({ "id": 1 }), 5).await;
    let body = call_tool(&app, "add_to_cart", json!({ "id": 1 }), 6).await;

    let content = &body["result"]["content"][0];
    assert_eq!(content["type"], "text");
    assert_eq!(content["text"], "Successfully added item 1 to cart");

    let snapshot = state.store.state();
    assert_eq!(snapshot.cart.len(), 1);
    assert_eq!(snapshot.cart[0].quantity, 2);
    assert_eq!(state.store.cart_total_items(), 2);
}

#[tokio::test]
async fn test_mcp_tool_call_add_to_cart_any_number() {
    let (app, state) = create_test_app();

    let body = call_tool(&app, "add_to_cart", json!({ "id": 1.0 }), 30).await;
    assert_eq!(
        body["result"]["content"][0]["text"],
        "Successfully added item 1 to cart"
    );

    let body = call_tool(&app, "add_to_cart", json!({ "id": -5 }), 31).await;
    assert!(body.get("error").is_none());
    assert_eq!(
        body["result"]["content"][0]["text"],
        "Successfully added item -5 to cart"
    );

    let snapshot = state.store.state();
    assert_eq!(snapshot.cart.len(), 1);
    assert_eq!(snapshot.cart[0].id(), 1);
}

#[tokio::test]
async fn test_mcp_tool_call_get_all_store_items() {
    let (app, state) = create_test_app();

    let body = call_tool(&app, "get_all_store_items", json!({}), 7).await;

    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    let items: Vec<Value> = serde_json::from_str(text).unwrap();
    assert_eq!(items.len(), state.store.catalog().len());
    assert!(items[0]["imageURL"].is_string());
    assert!(items[0]["price"].is_number());
}

#[tokio::test]
async fn test_mcp_tool_call_get_filter_options() {
    let (app, _) = create_test_app();

    let body = call_tool(&app, "get_filter_options", json!({}), 8).await;

    let structured = &body["result"]["structuredContent"];
    assert_eq!(structured["brands"][0], "ALL");
    assert_eq!(structured["genders"][0], "ALL");
    assert_eq!(structured["categories"][0], "ALL");
}

#[tokio::test]
async fn test_mcp_tool_call_filters_drive_visible_products() {
    let (app, state) = create_test_app();

    let body = call_tool(&app, "filter_by_brand", json!({ "brand": "Vans" }), 9).await;
    assert_eq!(
        body["result"]["content"][0]["text"],
        "Successfully filtered by brand Vans"
    );
    assert!(state
        .store
        .visible_products()
        .iter()
        .all(|p| p.brand == "Vans"));

    call_tool(&app, "filter_by_category", json!({ "category": "NOPE" }), 10).await;
    assert!(state.store.visible_products().is_empty());
}

#[tokio::test]
async fn test_mcp_tool_call_display_cart() {
    let (app, state) = create_test_app();

    let body = call_tool(&app, "display_cart", json!({}), 11).await;

    assert_eq!(
        body["result"]["content"][0]["text"],
        "The shopping cart has been opened and is now visible to the user."
    );
    assert!(state.store.state().cart_open);
}

#[tokio::test(start_paused = true)]
async fn test_mcp_tool_call_purchase_cart() {
    let (app, state) = create_test_app();

    call_tool(&app, "add_to_cart", json!({ "id": 1 }), 12).await;
    call_tool(&app, "display_cart", json!({}), 13).await;
    let body = call_tool(&app, "purchase_cart", json!({}), 14).await;

    assert_eq!(
        body["result"]["content"][0]["text"],
        "Shopping cart purchased successfully"
    );
    assert!(state.store.state().checkout_in_progress);

    tokio::time::sleep(state.store.checkout_delay() * 2).await;

    let snapshot = state.store.state();
    assert!(!snapshot.checkout_in_progress);
    assert!(snapshot.cart.is_empty());
    assert!(!snapshot.cart_open);
}

#[tokio::test]
async fn test_mcp_tool_call_posts_notification() {
    let (app, state) = create_test_app();

    call_tool(&app, "get_filter_options", json!({}), 15).await;

    let active = state.notifications.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].message, "get_filter_options called");
}

#[tokio::test]
async fn test_mcp_unknown_method() {
    let (app, _) = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "unknown/method", None, 16).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 16);

    let error = &body["error"];
    assert_eq!(error["code"], -32601);
    assert_eq!(error["message"], "Method not found");
}

#[tokio::test]
async fn test_mcp_invalid_json() {
    let (app, _) = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from("invalid json {{{"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();

    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["error"]["message"], "Parse error");
}

#[tokio::test]
async fn test_mcp_tool_call_unknown_tool() {
    let (app, _) = create_test_app();

    let body = call_tool(&app, "unknown_tool", json!({}), 17).await;

    let error = &body["error"];
    assert_eq!(error["code"], -32602);
    assert!(error["message"].as_str().unwrap().contains("Unknown tool"));
}

#[tokio::test]
async fn test_mcp_tool_call_invalid_arguments() {
    let (app, state) = create_test_app();

    let body = call_tool(&app, "add_to_cart", json!({ "id": "one" }), 18).await;

    let error = &body["error"];
    assert_eq!(error["code"], -32602);
    assert!(error["message"]
        .as_str()
        .unwrap()
        .contains("Invalid arguments"));
    assert!(state.store.state().cart.is_empty());
}

#[tokio::test]
async fn test_mcp_ping() {
    let (app, _) = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "ping", None, 19).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 19);
    assert_eq!(body["result"], json!({}));
}

#[tokio::test]
async fn test_mcp_notifications_initialized() {
    let (app, _) = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "notifications/initialized", None, 20).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({}));
}

#[tokio::test]
async fn test_mcp_invalid_method_type() {
    let (app, _) = create_test_app();

    // method should be a string, let's pass a number
    let request_body = json!({
        "jsonrpc": "2.0",
        "method": 123,
        "id": 1
    });

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&request_body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    // Rejection by Axum Json extractor or our handler
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
