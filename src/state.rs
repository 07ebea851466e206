//! Application State
//!
//! Everything the HTTP handlers share: the store, the tool registry the MCP
//! endpoint serves, and the notification list.

use std::sync::Arc;

use crate::{
    catalog::Catalog,
    config::StoreConfig,
    store::Store,
    tools::{register_store_tools, Notifications, StoreTools, ToolRegistry},
};

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state
pub struct AppState {
    pub store: Arc<Store>,
    pub tools: Arc<ToolRegistry>,
    pub notifications: Arc<Notifications>,
}

impl AppState {
    /// Builds the store from `catalog` and registers the store tools for the
    /// lifetime of the process.
    pub fn new(catalog: Catalog, config: &StoreConfig) -> Self {
        let store = Arc::new(Store::with_checkout_delay(
            Arc::new(catalog),
            config.checkout_delay,
        ));
        let notifications = Arc::new(Notifications::new(config.notification_ttl));
        let tools = Arc::new(ToolRegistry::new());

        register_store_tools(
            tools.as_ref(),
            &StoreTools::new(Arc::clone(&store), notifications.clone()),
        );

        Self {
            store,
            tools,
            notifications,
        }
    }
}
