//! Store Domain Module
//!
//! This module contains the storefront's state machine, including:
//! - Domain models (filter selections, cart lines, state snapshots)
//! - Derived views and cart transforms
//! - The state container and its change notifications
//! - HTTP handlers the presentation layer drives it through

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::{CartLine, Selection, StateChange, StoreEvent, StoreState, StoreView};
pub use state::{Store, Subscription};
