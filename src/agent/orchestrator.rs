//! Combines the parser, a gateway, and the retriever into one answer.

use crate::agent::parser::{parse, ParsedQuery};
use crate::error::Result;
use crate::gateway::ToolGateway;
use crate::jsonrpc::JsonRpcRequest;
use crate::retrieval::ContextSource;
use serde::Serialize;
use serde_json::{Map, Value};

/// Results the agent pulls from the retriever.
pub const DEFAULT_CONTEXT_K: usize = 2;

/// Characters kept from each retrieved chunk.
pub const DEFAULT_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Clone, Copy)]
pub struct AgentOptions {
    pub context_k: usize,
    pub preview_chars: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            context_k: DEFAULT_CONTEXT_K,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextPreview {
    pub text: String,
    pub source_file: String,
    pub sequence_index: usize,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub parsed: ParsedQuery,
    pub mcp_snippet: Value,
    pub rag_context_preview: Vec<ContextPreview>,
}

pub struct Agent<G, C> {
    gateway: G,
    context: C,
    options: AgentOptions,
}

impl<G: ToolGateway, C: ContextSource> Agent<G, C> {
    pub fn new(gateway: G, context: C, options: AgentOptions) -> Self {
        Self {
            gateway,
            context,
            options,
        }
    }

    /// Answer a raw query.
    ///
    /// The tool call goes out first. A failed call is reported inline in
    /// `mcp_snippet`; the retrieval lookup runs on the unparsed query either
    /// way. Only retrieval errors (including a failed index build) are
    /// returned as `Err`.
    pub async fn handle(&self, raw_query: &str) -> Result<AgentResponse> {
        let parsed = parse(raw_query);
        let request = JsonRpcRequest::new(parsed.action.clone(), Some(args_to_params(&parsed)));

        let mcp_snippet = match self.gateway.call(parsed.tool.as_str(), &request).await {
            Ok(response) => extract_result(response),
            Err(e) => {
                tracing::warn!(
                    tool = parsed.tool.as_str(),
                    action = %parsed.action,
                    error = %e,
                    "Tool call failed; continuing with retrieval"
                );
                serde_json::to_value(e.to_body()).unwrap_or(Value::Null)
            }
        };

        let rag_context_preview = self
            .context
            .retriever()
            .await?
            .retrieve(raw_query, self.options.context_k)
            .await?
            .into_iter()
            .map(|scored| ContextPreview {
                text: truncate_chars(&scored.chunk.text, self.options.preview_chars),
                source_file: scored.chunk.source_file,
                sequence_index: scored.chunk.sequence_index,
                score: scored.score,
            })
            .collect();

        metrics::counter!("agent_requests_total").increment(1);

        Ok(AgentResponse {
            parsed,
            mcp_snippet,
            rag_context_preview,
        })
    }
}

fn args_to_params(parsed: &ParsedQuery) -> Value {
    Value::Object(
        parsed
            .args
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<Map<String, Value>>(),
    )
}

/// The `result` member of a JSON-RPC response, or the whole body if absent.
fn extract_result(mut response: Value) -> Value {
    match response.get_mut("result") {
        Some(result) => result.take(),
        None => response,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::inference::HashEmbedder;
    use crate::ingestion::Chunker;
    use crate::registry::Tool;
    use crate::retrieval::Retriever;
    use std::sync::Arc;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records calls and answers with a fixed outcome.
    struct StubGateway {
        response: std::result::Result<Value, String>,
        calls: Mutex<Vec<(String, JsonRpcRequest)>>,
    }

    impl StubGateway {
        fn ok(response: Value) -> Self {
            Self {
                response: Ok(response),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolGateway for StubGateway {
        async fn call(&self, target: &str, request: &JsonRpcRequest) -> Result<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((target.to_string(), request.clone()));
            match &self.response {
                Ok(v) => Ok(v.clone()),
                Err(msg) => Err(AppError::downstream(msg.clone())),
            }
        }
    }

    async fn retriever_with(files: &[(&str, &str)]) -> Arc<Retriever> {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).unwrap();
        }
        let mut r = Retriever::new(Arc::new(HashEmbedder::default()), Chunker::default());
        r.ingest(dir.path()).await.unwrap();
        Arc::new(r)
    }

    #[tokio::test]
    async fn test_forwards_parsed_call_and_unwraps_result() {
        let gateway = Arc::new(StubGateway::ok(
            json!({ "jsonrpc": "2.0", "id": "1", "result": ["a.txt", "b.txt"] }),
        ));
        let retriever = retriever_with(&[("notes.md", "filesystem listing notes")]).await;
        let agent = Agent::new(Arc::clone(&gateway), retriever, AgentOptions::default());

        let response = agent.handle("filesystem list_files path=./src").await.unwrap();

        assert_eq!(response.parsed.tool, Tool::Filesystem);
        assert_eq!(response.mcp_snippet, json!(["a.txt", "b.txt"]));

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "filesystem");
        assert_eq!(calls[0].1.method, "list_files");
        assert_eq!(calls[0].1.params, Some(json!({ "path": "./src" })));
    }

    #[tokio::test]
    async fn test_gateway_failure_is_inline_and_retrieval_still_runs() {
        let gateway = StubGateway::failing("github responded with status 500");
        let retriever =
            retriever_with(&[("a.md", "alpha"), ("b.md", "beta"), ("c.md", "gamma")]).await;
        let agent = Agent::new(gateway, retriever, AgentOptions::default());

        let response = agent.handle("github list_repos").await.unwrap();

        assert_eq!(response.mcp_snippet["error"], "github responded with status 500");
        assert_eq!(response.rag_context_preview.len(), 2);
    }

    #[tokio::test]
    async fn test_preview_truncated() {
        let gateway = StubGateway::ok(json!({ "error": { "code": -32601, "message": "nope" } }));
        let long = "é".repeat(1700);
        let retriever = retriever_with(&[("long.md", long.as_str())]).await;
        let options = AgentOptions {
            context_k: 2,
            preview_chars: 50,
        };
        let agent = Agent::new(gateway, retriever, options);

        let response = agent.handle("anything").await.unwrap();

        // No `result` member: the whole body is kept.
        assert_eq!(response.mcp_snippet["error"]["code"], -32601);
        assert_eq!(response.rag_context_preview.len(), 2);
        assert!(response
            .rag_context_preview
            .iter()
            .all(|p| p.text.chars().count() <= 50));
    }

    /// An index that can never be built.
    struct MissingCorpus;

    #[async_trait]
    impl ContextSource for MissingCorpus {
        async fn retriever(&self) -> Result<Arc<Retriever>> {
            Err(AppError::IngestError("docs directory not found".to_string()))
        }
    }

    #[tokio::test]
    async fn test_tool_is_called_before_index_failure_surfaces() {
        let gateway = Arc::new(StubGateway::ok(json!({ "result": [] })));
        let agent = Agent::new(Arc::clone(&gateway), MissingCorpus, AgentOptions::default());

        let err = agent.handle("github list_repos").await.unwrap_err();

        assert!(matches!(err, AppError::IngestError(_)));
        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "github");
    }

    #[test]
    fn test_wire_field_names() {
        let response = AgentResponse {
            parsed: parse(""),
            mcp_snippet: json!(null),
            rag_context_preview: vec![],
        };
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["parsed"]["tool"], "filesystem");
        assert_eq!(wire["parsed"]["action"], "get_methods");
        assert!(wire.get("mcpSnippet").is_some());
        assert!(wire["ragContextPreview"].is_array());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }
}
