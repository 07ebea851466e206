//! Tool Adapter Module
//!
//! This module exposes store actions as named, independently invocable tools:
//! - Tool descriptors, input schemas and outputs
//! - The tool host capability and the in-process registry
//! - The fixed catalog of store tools
//! - Transient user notifications posted on every invocation

pub mod models;
pub mod notifications;
pub mod registry;
pub mod store_tools;

// Re-export commonly used types for convenience
pub use models::{ToolDescriptor, ToolOutput};
pub use notifications::{Notifications, Notifier};
pub use registry::{ToolHandle, ToolHost, ToolRegistry, ToolScope};
pub use store_tools::{mount_store_tools, register_store_tools, StoreTools};
