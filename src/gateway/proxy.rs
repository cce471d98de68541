//! Request routing and `get_methods` fan-out.
//!
//! A routed call resolves the target first, then validates the envelope, then
//! forwards it once with a fixed deadline. No retries: a failed attempt is
//! surfaced as an [`AppError::DownstreamError`] carrying whatever the backend
//! reported.

use crate::error::{AppError, Result};
use crate::gateway::ToolGateway;
use crate::jsonrpc::JsonRpcRequest;
use crate::registry::{Target, TargetRegistry, Tool};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use futures::future::join_all;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Deadline for a routed call.
pub const ROUTE_TIMEOUT: Duration = Duration::from_secs(15);

/// Deadline for each per-target `get_methods` call during aggregation.
pub const AGGREGATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
pub struct GatewayOptions {
    pub route_timeout: Duration,
    pub aggregate_timeout: Duration,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            route_timeout: ROUTE_TIMEOUT,
            aggregate_timeout: AGGREGATE_TIMEOUT,
        }
    }
}

/// A successful backend answer, relayed byte-for-byte.
#[derive(Debug, Clone)]
pub struct Relayed {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

/// Per-target outcomes of a `get_methods` fan-out, in registry order.
#[derive(Debug)]
pub struct AggregatedMethods {
    pub entries: Vec<(Tool, Result<Value>)>,
}

impl Serialize for AggregatedMethods {
    /// Wire shape: `{ "aggregated": [[name, response | "error message"], ...] }`.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        struct Entries<'a>(&'a [(Tool, Result<Value>)]);

        impl Serialize for Entries<'_> {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
                for (tool, outcome) in self.0 {
                    let value = match outcome {
                        Ok(response) => response.clone(),
                        Err(e) => Value::String(e.to_string()),
                    };
                    seq.serialize_element(&(tool.as_str(), value))?;
                }
                seq.end()
            }
        }

        #[derive(Serialize)]
        struct Wire<'a> {
            aggregated: Entries<'a>,
        }

        Wire {
            aggregated: Entries(&self.entries),
        }
        .serialize(serializer)
    }
}

/// Reverse proxy over a [`TargetRegistry`].
#[derive(Clone)]
pub struct Gateway {
    registry: Arc<TargetRegistry>,
    http: reqwest::Client,
    options: GatewayOptions,
}

impl Gateway {
    pub fn new(registry: TargetRegistry, options: GatewayOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::downstream(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(
            targets = registry.len(),
            route_timeout_ms = options.route_timeout.as_millis() as u64,
            aggregate_timeout_ms = options.aggregate_timeout.as_millis() as u64,
            "Gateway initialized"
        );

        Ok(Self {
            registry: Arc::new(registry),
            http,
            options,
        })
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Route a raw request body to the named target.
    ///
    /// # Errors
    /// - `TargetNotFound` if `target_name` is not registered (checked before the body is parsed)
    /// - `ValidationError` if the body is not a JSON-RPC request
    /// - `DownstreamError` on transport failure, timeout, or a non-success backend status
    pub async fn route(&self, target_name: &str, body: &[u8]) -> Result<Relayed> {
        let target = self
            .registry
            .get(target_name)
            .ok_or_else(|| AppError::TargetNotFound(target_name.to_string()))?;

        let request = JsonRpcRequest::from_slice(body)?;

        // Forwarded as received: `"id": null` and unknown members are kept.
        let start = Instant::now();
        let outcome = self
            .forward(target, body.to_vec(), self.options.route_timeout)
            .await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let label = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!(
            "mcp_route_requests_total",
            "target" => target.tool.as_str(),
            "outcome" => label
        )
        .increment(1);
        metrics::histogram!("mcp_route_latency_ms").record(elapsed_ms as f64);

        tracing::debug!(
            target_name = target.tool.as_str(),
            method = %request.method,
            elapsed_ms,
            outcome = label,
            "Routed call completed"
        );

        outcome
    }

    /// Call `get_methods` on every target concurrently and collect each outcome independently.
    pub async fn aggregate_methods(&self) -> AggregatedMethods {
        let timeout = self.options.aggregate_timeout;
        let calls = self.registry.iter().map(|target| async move {
            let outcome = async {
                let payload = JsonRpcRequest::new("get_methods", None).to_vec()?;
                let relayed = self.forward(target, payload, timeout).await?;
                parse_json(&relayed.body)
            }
            .await;

            if let Err(e) = &outcome {
                tracing::warn!(
                    target_name = target.tool.as_str(),
                    error = %e,
                    "get_methods failed"
                );
            }

            (target.tool, outcome)
        });

        let entries = join_all(calls).await;

        metrics::counter!("mcp_get_methods_requests_total").increment(1);

        AggregatedMethods { entries }
    }

    /// Send one JSON body to `target` and wait at most `deadline` for the whole exchange.
    async fn forward(
        &self,
        target: &Target,
        payload: Vec<u8>,
        deadline: Duration,
    ) -> Result<Relayed> {
        let url = format!("{}/", target.base_url);

        let exchange = async {
            let response = self
                .http
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload)
                .send()
                .await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = tokio::time::timeout(deadline, exchange)
            .await
            .map_err(|_| {
                AppError::downstream(format!(
                    "Request to {} timed out after {}ms",
                    target.tool,
                    deadline.as_millis()
                ))
            })?
            .map_err(|e| {
                AppError::downstream(format!("Request to {} failed: {}", target.tool, e))
            })?;

        if !status.is_success() {
            return Err(AppError::DownstreamError {
                status: Some(status.as_u16()),
                message: format!("{} responded with status {}", target.tool, status),
                details: details_from_body(&body),
            });
        }

        // Relay verbatim, but only if the backend really spoke JSON.
        parse_json(&body).map_err(|_| AppError::DownstreamError {
            status: None,
            message: format!("{} returned a non-JSON body", target.tool),
            details: details_from_body(&body),
        })?;

        Ok(Relayed {
            status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK),
            body: Bytes::from(body.to_vec()),
        })
    }
}

#[async_trait]
impl ToolGateway for Gateway {
    async fn call(&self, target: &str, request: &JsonRpcRequest) -> Result<Value> {
        let body = request.to_vec()?;
        let relayed = self.route(target, &body).await?;
        parse_json(&relayed.body)
    }
}

fn parse_json(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::downstream(format!("Backend returned invalid JSON: {}", e)))
}

/// Backend body as JSON when possible, as a string otherwise, `None` when empty.
fn details_from_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    Some(
        serde_json::from_slice(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned())),
    )
}
