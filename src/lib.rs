//! Shoe Store Library
//!
//! This library provides a storefront state machine (catalog filters, cart,
//! simulated checkout) whose actions are also exposed as tools to an agent
//! through MCP (Model Context Protocol).

// Domain modules
pub mod catalog;
pub mod store;
pub mod tools;

// Protocol
pub mod mcp;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
pub mod state;
