//! MCP tool endpoints
//!
//! - `GET /mcp/tools` - static tool catalog
//! - `POST /mcp/tools/:name/call` - run a tool's local executor

use axum::{body::Bytes, extract::Path, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{
    error::{ApiResponse, AppError, AppResult},
    tools::{self, ToolDescriptor, ToolError},
};

/// Tool listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolListResponse {
    pub success: bool,
    pub tools: Vec<ToolDescriptor>,
}

/// Tool call request body
#[derive(Debug, Default, Deserialize)]
pub struct ToolCallRequest {
    #[serde(default)]
    pub parameters: Value,
}

/// Result of a tool call
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolCallResult {
    pub tool: String,
    pub result: String,
}

/// List the advertised tools
pub async fn list_tools() -> Json<ToolListResponse> {
    Json(ToolListResponse {
        success: true,
        tools: tools::catalog(),
    })
}

/// Run one tool by name. An empty body means no parameters.
pub async fn call_tool(
    Path(name): Path<String>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<ToolCallResult>>> {
    let request: ToolCallRequest = if body.is_empty() {
        ToolCallRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {}", e)))?
    };

    let result = tools::execute(&name, &request.parameters).map_err(|e| match e {
        ToolError::UnknownTool(tool) => AppError::NotFound(format!("tool '{}'", tool)),
        missing @ ToolError::MissingParameter { .. } => AppError::InvalidRequest(missing.to_string()),
    })?;

    info!(tool = %name, "Tool executed");
    Ok(Json(ApiResponse::ok(ToolCallResult { tool: name, result })))
}
