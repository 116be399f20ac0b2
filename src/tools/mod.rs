//! Static MCP tool catalog
//!
//! The catalog is advertised on `/mcp/tools` but is not wired into chat
//! generation. Tools can only be run explicitly through their call endpoint,
//! and both executors are local stand-ins.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Descriptor of one advertised tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool's parameters
    pub parameters: Value,
}

/// Errors raised when running a tool
#[derive(Debug, Error, PartialEq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required parameter '{param}' for tool {tool}")]
    MissingParameter { tool: String, param: String },
}

pub const GET_CURRENT_TIME: &str = "get_current_time";
pub const SEARCH_KNOWLEDGE: &str = "search_knowledge";

/// The advertised tools, in listing order
pub fn catalog() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: GET_CURRENT_TIME.to_string(),
            description: "Get the current time".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        ToolDescriptor {
            name: SEARCH_KNOWLEDGE.to_string(),
            description: "Search knowledge base".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query"}
                },
                "required": ["query"]
            }),
        },
    ]
}

/// Run a tool with the given parameters
pub fn execute(name: &str, parameters: &Value) -> Result<String, ToolError> {
    match name {
        GET_CURRENT_TIME => Ok(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        SEARCH_KNOWLEDGE => {
            let query = parameters
                .get("query")
                .and_then(Value::as_str)
                .ok_or_else(|| ToolError::MissingParameter {
                    tool: name.to_string(),
                    param: "query".to_string(),
                })?;
            Ok(format!("Search results for: {} (Mock implementation)", query))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
