//! HTTP client for a remote gateway, used by the agent CLI.

use crate::error::{AppError, Result};
use crate::gateway::{ToolGateway, ROUTE_TIMEOUT};
use crate::jsonrpc::JsonRpcRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Client-side deadline. Longer than [`ROUTE_TIMEOUT`] so the gateway's own
/// timeout body arrives before the client gives up.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(ROUTE_TIMEOUT.as_secs() + 5);

/// Leading text of the gateway's own 404 and 400 bodies.
const UNKNOWN_TARGET_PREFIX: &str = "Unknown target ";
const VALIDATION_PREFIX: &str = "Invalid request: ";

/// Talks to `POST <base_url>/mcp/<target>` and turns normalized error bodies
/// back into [`AppError`] values.
#[derive(Clone)]
pub struct HttpGatewayClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpGatewayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::downstream(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ToolGateway for HttpGatewayClient {
    async fn call(&self, target: &str, request: &JsonRpcRequest) -> Result<Value> {
        let url = format!("{}/mcp/{}", self.base_url, target);

        let exchange = async {
            let response = self.http.post(&url).json(request).send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                AppError::downstream(format!(
                    "Gateway call timed out after {}ms",
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| AppError::downstream(format!("Gateway unreachable at {}: {}", url, e)))?;

        let parsed: Option<Value> = serde_json::from_slice(&body).ok();

        if status.is_success() {
            return parsed
                .ok_or_else(|| AppError::downstream("Gateway returned a non-JSON body"));
        }

        Err(error_from_body(target, status.as_u16(), parsed))
    }
}

/// Rebuild an [`AppError`] from a gateway error reply.
///
/// Only the gateway's own 404/400 bodies (no `details`, known message) map
/// back to `TargetNotFound`/`ValidationError`. A backend 4xx relayed through
/// the gateway stays a `DownstreamError`.
fn error_from_body(target: &str, status: u16, parsed: Option<Value>) -> AppError {
    let mut body = parsed.unwrap_or(Value::Null);
    let message = body
        .get("error")
        .and_then(|e| e.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Gateway responded with status {}", status));
    let details = body.get_mut("details").map(Value::take);

    if details.is_none() {
        match status {
            404 if message.starts_with(UNKNOWN_TARGET_PREFIX) => {
                return AppError::TargetNotFound(target.to_string());
            }
            400 => {
                if let Some(reason) = message.strip_prefix(VALIDATION_PREFIX) {
                    return AppError::ValidationError(reason.to_string());
                }
            }
            _ => {}
        }
    }

    AppError::DownstreamError {
        status: Some(status),
        message,
        details,
    }
}
