//! MCP gateway: routes JSON-RPC calls to tool backends.

pub mod client;
pub mod proxy;

pub use client::{HttpGatewayClient, CLIENT_TIMEOUT};
pub use proxy::{
    AggregatedMethods, Gateway, GatewayOptions, Relayed, AGGREGATE_TIMEOUT, ROUTE_TIMEOUT,
};

use crate::error::Result;
use crate::jsonrpc::JsonRpcRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Anything that can deliver a JSON-RPC call to a named tool backend.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    async fn call(&self, target: &str, request: &JsonRpcRequest) -> Result<Value>;
}

#[async_trait]
impl<T: ToolGateway + ?Sized> ToolGateway for Arc<T> {
    async fn call(&self, target: &str, request: &JsonRpcRequest) -> Result<Value> {
        (**self).call(target, request).await
    }
}
