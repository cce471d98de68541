//! JSON-RPC 2.0 envelope types shared by the gateway, the agent, and the mock backends.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error codes used by the mock backends.
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// A request with a fresh random id.
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Some(Value::String(uuid::Uuid::new_v4().to_string())),
        }
    }

    /// Validate an arbitrary JSON value against the request shape.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(obj) = &value else {
            return Err(AppError::ValidationError(
                "request must be a JSON object".to_string(),
            ));
        };

        match obj.get("jsonrpc") {
            None => {
                return Err(AppError::ValidationError(
                    "missing 'jsonrpc' field".to_string(),
                ))
            }
            Some(Value::String(v)) if v == JSONRPC_VERSION => {}
            Some(other) => {
                return Err(AppError::ValidationError(format!(
                    "'jsonrpc' must be \"2.0\", got {}",
                    other
                )))
            }
        }

        match obj.get("method") {
            None => {
                return Err(AppError::ValidationError(
                    "missing 'method' field".to_string(),
                ))
            }
            Some(Value::String(m)) if !m.is_empty() => {}
            Some(Value::String(_)) => {
                return Err(AppError::ValidationError(
                    "'method' cannot be empty".to_string(),
                ))
            }
            Some(_) => {
                return Err(AppError::ValidationError(
                    "'method' must be a string".to_string(),
                ))
            }
        }

        if let Some(id) = obj.get("id") {
            if !(id.is_string() || id.is_number() || id.is_null()) {
                return Err(AppError::ValidationError(
                    "'id' must be a string, number, or null".to_string(),
                ));
            }
        }

        serde_json::from_value(value).map_err(|e| AppError::ValidationError(e.to_string()))
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| AppError::ValidationError(e.to_string()))
    }

    /// Validate raw request bytes.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::ValidationError(format!("body is not valid JSON: {}", e)))?;
        Self::from_value(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A response carries exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}
