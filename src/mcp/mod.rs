//! Model Context Protocol (MCP) Module
//!
//! This module serves the tool registry over JSON-RPC, including:
//! - Protocol models (JsonRpcRequest, constants)
//! - RPC helpers (success/error envelopes)
//! - MCP handlers (initialize, tools/list, tools/call, etc.)

pub mod handlers;
pub mod helpers;
pub mod models;

// Re-export commonly used types and functions
pub use handlers::routes;
