//! Document extraction, chunking, and the in-memory embedding index.

pub mod document;
pub mod error;
pub mod index;

pub use error::IndexError;
pub use index::{DocumentIndex, ScoredChunk};
