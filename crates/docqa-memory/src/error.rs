#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("cannot build an index from zero chunks")]
    EmptyInput,

    #[error("embedding request failed: {0}")]
    Embedding(#[from] docqa_llm::LlmError),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding model mismatch: index built with {indexed}, query uses {query}")]
    ModelMismatch { indexed: String, query: String },
}
