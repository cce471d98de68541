//! Type definitions for the ingestion module.

use serde::{Deserialize, Serialize};

/// A bounded window of a source document, the unit of retrieval.
///
/// Chunks are created once during ingestion and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunk {
    /// Window contents
    pub text: String,

    /// Path of the file the window was cut from
    pub source_file: String,

    /// Position of this window within its source file, starting at 0
    pub sequence_index: usize,
}

impl DocumentChunk {
    pub fn new(text: String, source_file: String, sequence_index: usize) -> Self {
        Self {
            text,
            source_file,
            sequence_index,
        }
    }
}

/// A file read from the corpus directory.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: String,
    pub contents: String,
}
