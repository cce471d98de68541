//! Canned JSON-RPC backends for the four tools.
//!
//! Each backend accepts `POST /` and answers from static data. They hold no
//! state and exist so the gateway can be exercised without real services.

use crate::jsonrpc::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
};
use crate::registry::Tool;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

/// Method names each backend answers to, `get_methods` excluded.
pub fn methods(tool: Tool) -> &'static [&'static str] {
    match tool {
        Tool::Filesystem => &["list_files", "read_file"],
        Tool::Github => &["list_repos", "list_commits", "get_pull_request"],
        Tool::Atlassian => &["search_issues", "get_issue"],
        Tool::Gdrive => &["list_files", "get_file"],
    }
}

/// Router serving one tool's canned backend.
pub fn router(tool: Tool) -> Router {
    Router::new().route("/", post(rpc_handler)).with_state(tool)
}

async fn rpc_handler(State(tool): State<Tool>, body: Bytes) -> (StatusCode, Json<JsonRpcResponse>) {
    let request = match JsonRpcRequest::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::failure(None, INVALID_REQUEST, e.to_string())),
            )
        }
    };

    tracing::debug!(tool = tool.as_str(), method = %request.method, "Mock backend call");

    let params = request.params.clone().unwrap_or(Value::Null);
    let response = match dispatch(tool, &request.method, &params) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err((code, message)) => JsonRpcResponse::failure(request.id, code, message),
    };

    (StatusCode::OK, Json(response))
}

/// Canned answer for `method`, or a JSON-RPC error code and message.
pub fn dispatch(tool: Tool, method: &str, params: &Value) -> Result<Value, (i64, String)> {
    if method == "get_methods" {
        return Ok(json!(methods(tool)));
    }

    let param = |name: &str| params.get(name).and_then(Value::as_str);

    match (tool, method) {
        (Tool::Filesystem, "list_files") => {
            let path = param("path").unwrap_or(".");
            Ok(json!({
                "path": path,
                "files": ["README.md", "Cargo.toml", "src/main.rs", "src/lib.rs"]
            }))
        }
        (Tool::Filesystem, "read_file") => {
            let path = param("path").ok_or((INVALID_PARAMS, "missing 'path'".to_string()))?;
            Ok(json!({
                "path": path,
                "content": format!("// contents of {}\n", path)
            }))
        }
        (Tool::Github, "list_repos") => Ok(json!([
            { "name": "nexus-web", "default_branch": "main" },
            { "name": "nexus-mcp", "default_branch": "main" }
        ])),
        (Tool::Github, "list_commits") => Ok(json!([
            { "sha": "abc123", "message": "Fix login button alignment on mobile devices (NEX-123)" },
            { "sha": "def456", "message": "Implement MCP server for Task API (NEX-456)" },
            { "sha": "vwx234", "message": "MCP proxy server implementation (NEX-404)" }
        ])),
        (Tool::Github, "get_pull_request") => {
            let number = param("number").unwrap_or("1");
            Ok(json!({ "number": number, "state": "open", "title": "MCP proxy server" }))
        }
        (Tool::Atlassian, "search_issues") => {
            let query = param("query").or_else(|| param("jql")).unwrap_or("");
            Ok(json!({
                "query": query,
                "issues": [
                    { "key": "NEX-123", "summary": "Login button misaligned on mobile", "status": "Done" },
                    { "key": "NEX-404", "summary": "Central MCP proxy", "status": "In Progress" }
                ]
            }))
        }
        (Tool::Atlassian, "get_issue") => {
            let key = param("key").ok_or((INVALID_PARAMS, "missing 'key'".to_string()))?;
            Ok(json!({ "key": key, "summary": "Canned issue", "status": "Open" }))
        }
        (Tool::Gdrive, "list_files") => Ok(json!([
            { "id": "doc-1", "name": "Architecture overview" },
            { "id": "doc-2", "name": "RAG pipeline notes" }
        ])),
        (Tool::Gdrive, "get_file") => {
            let id = param("id").ok_or((INVALID_PARAMS, "missing 'id'".to_string()))?;
            Ok(json!({ "id": id, "content": "Canned document body" }))
        }
        _ => Err((
            METHOD_NOT_FOUND,
            format!("Method '{}' not found on {}", method, tool),
        )),
    }
}
