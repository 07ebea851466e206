//! Tool host capability and the in-process registry implementing it

use dashmap::DashMap;
use serde_json::Value;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use super::models::{ToolDescriptor, ToolOutput};
use crate::error::ToolError;

/// Identifies one registration of a tool
///
/// Re-registering a name yields a new handle; the old handle then no longer
/// unregisters anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolHandle {
    name: String,
    generation: u64,
}

impl ToolHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Something tools can be registered with
pub trait ToolHost: Send + Sync {
    /// Registers `descriptor`, replacing any tool of the same name
    fn register(&self, descriptor: ToolDescriptor) -> ToolHandle;

    /// Removes the registration `handle` refers to, if it is still current
    fn unregister(&self, handle: &ToolHandle);
}

/// In-process tool host, listed and invoked by the MCP endpoint
#[derive(Default)]
pub struct ToolRegistry {
    tools: DashMap<String, (u64, ToolDescriptor)>,
    generation: AtomicU64,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<ToolDescriptor> {
        self.tools.get(name).map(|entry| entry.value().1.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tools in registration order
    pub fn list(&self) -> Vec<ToolDescriptor> {
        let mut entries: Vec<(u64, ToolDescriptor)> = self
            .tools
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|(generation, _)| *generation);
        entries.into_iter().map(|(_, tool)| tool).collect()
    }

    /// Invokes the tool called `name`
    pub fn call(&self, name: &str, args: Value) -> Result<ToolOutput, ToolError> {
        // Clone out of the map so the execute function runs without a shard lock.
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.call(args)
    }
}

impl ToolHost for ToolRegistry {
    fn register(&self, descriptor: ToolDescriptor) -> ToolHandle {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let name = descriptor.name.clone();
        if self
            .tools
            .insert(name.clone(), (generation, descriptor))
            .is_some()
        {
            tracing::debug!(tool = %name, "Replaced tool registration");
        }
        ToolHandle { name, generation }
    }

    fn unregister(&self, handle: &ToolHandle) {
        self.tools
            .remove_if(&handle.name, |_, (generation, _)| *generation == handle.generation);
    }
}

/// Tools registered for the lifetime of a consumer
///
/// Everything registered through the scope is unregistered when it drops.
pub struct ToolScope {
    host: Arc<dyn ToolHost>,
    handles: Vec<ToolHandle>,
}

impl ToolScope {
    pub fn new(host: Arc<dyn ToolHost>) -> Self {
        Self {
            host,
            handles: Vec::new(),
        }
    }

    pub fn register(&mut self, descriptor: ToolDescriptor) -> ToolHandle {
        let handle = self.host.register(descriptor);
        self.handles.push(handle.clone());
        handle
    }

    pub fn handles(&self) -> &[ToolHandle] {
        &self.handles
    }
}

impl Drop for ToolScope {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            self.host.unregister(&handle);
        }
    }
}
