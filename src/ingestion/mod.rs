//! Ingestion module for turning a documents directory into retrievable chunks.
//!
//! Loading walks the corpus and reads files; chunking cuts each file into
//! fixed-size overlapping windows ready for embedding.

pub mod chunker;
pub mod loader;
pub mod types;

pub use chunker::{Chunker, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use loader::load_documents;
pub use types::{DocumentChunk, SourceDocument};
