//! Tool Descriptor Models
//!
//! A tool is a name, a description, an input schema and an execute function.
//! This module defines those pieces and how a tool's output is shaped for
//! callers.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::{fmt, sync::Arc};

use crate::error::ToolError;

// =============================================================================
// Input Schema
// =============================================================================

/// Primitive type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
}

/// One named parameter of a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamType,
    pub description: String,
    pub required: bool,
}

/// Mapping from parameter name to type and required/optional marking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    params: Vec<ParamSpec>,
}

impl InputSchema {
    /// A schema taking no parameters
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn required(self, name: &str, kind: ParamType, description: &str) -> Self {
        self.param(name, kind, description, true)
    }

    pub fn optional(self, name: &str, kind: ParamType, description: &str) -> Self {
        self.param(name, kind, description, false)
    }

    fn param(mut self, name: &str, kind: ParamType, description: &str, required: bool) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required,
        });
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// JSON Schema object form, as expected by MCP clients
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({ "type": p.kind, "description": p.description }),
                )
            })
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }

        schema
    }
}

// =============================================================================
// Tool Output
// =============================================================================

/// A block of structured tool content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// What an execute function returns: a plain value or structured content
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Plain string result
    Text(String),
    /// Plain JSON result
    Json(Value),
    /// Already in content-block form
    Content(Vec<ContentBlock>),
}

impl ToolOutput {
    /// Wraps the output in the `{content, structuredContent}` call result shape.
    ///
    /// JSON objects are also echoed as `structuredContent`.
    pub fn into_call_result(self) -> Value {
        match self {
            Self::Text(text) => json!({ "content": [ContentBlock::text(text)] }),
            Self::Json(value) => {
                let mut result = json!({ "content": [ContentBlock::text(value.to_string())] });
                if value.is_object() {
                    result["structuredContent"] = value;
                }
                result
            }
            Self::Content(blocks) => json!({ "content": blocks }),
        }
    }
}

// =============================================================================
// Tool Descriptor
// =============================================================================

/// Execute function of a tool; receives the raw JSON arguments
pub type ToolExecute = Arc<dyn Fn(Value) -> Result<ToolOutput, ToolError> + Send + Sync>;

/// The name/description/schema/execute tuple registered with a tool host
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    pub execute: ToolExecute,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

impl ToolDescriptor {
    pub fn new(
        name: &str,
        description: &str,
        input_schema: InputSchema,
        execute: impl Fn(Value) -> Result<ToolOutput, ToolError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
            execute: Arc::new(execute),
        }
    }

    pub fn call(&self, args: Value) -> Result<ToolOutput, ToolError> {
        (self.execute)(args)
    }

    /// Entry for a `tools/list` response
    pub fn to_listing(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema.to_json(),
        })
    }
}
