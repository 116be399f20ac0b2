//! Service descriptor served at `/`

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
}

pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Chat MCP Service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}
