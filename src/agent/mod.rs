//! Natural-language-ish front end: parse a command, call the tool, add retrieved context.

pub mod orchestrator;
pub mod parser;

pub use orchestrator::{
    Agent, AgentOptions, AgentResponse, ContextPreview, DEFAULT_CONTEXT_K, DEFAULT_PREVIEW_CHARS,
};
pub use parser::{parse, ParsedQuery, DEFAULT_ACTION, DEFAULT_TOOL};
