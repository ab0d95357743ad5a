//! Mock HTTP-like requests replayed by the demo.

use std::{
    error::Error,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const HTTP_POST_METHOD: &str = "POST";
pub const HTTP_GET_METHOD: &str = "GET";

pub const HTTP_STATUS_OK: u16 = 200;
pub const HTTP_STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub host: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    pub params: Params,
}

/// What a handler reports back for a request or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
}

pub fn user_mock() -> Value {
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    json!({
        "name": "User Name",
        "age": 26,
        "roles": ["user", "admin"],
        "created_at": created_at,
        "is_deleted": false,
    })
}

pub fn requests_mock() -> Vec<Request> {
    vec![
        Request {
            method: HTTP_POST_METHOD.to_string(),
            host: "service.example".to_string(),
            path: "user".to_string(),
            body: Some(user_mock()),
            params: Params::default(),
        },
        Request {
            method: HTTP_GET_METHOD.to_string(),
            host: "service.example".to_string(),
            path: "user".to_string(),
            body: None,
            params: Params {
                id: Some("3f5h67s4s".to_string()),
            },
        },
    ]
}

pub fn handle_request(request: &Request) -> Response {
    tracing::info!(
        method = %request.method,
        host = %request.host,
        path = %request.path,
        id = ?request.params.id,
        "handling request"
    );
    Response {
        status: HTTP_STATUS_OK,
    }
}

pub fn handle_error(error: Arc<dyn Error + Send + Sync>) -> Response {
    tracing::warn!(%error, "request stream failed");
    Response {
        status: HTTP_STATUS_INTERNAL_SERVER_ERROR,
    }
}

pub fn handle_complete() {
    tracing::info!("complete");
}
