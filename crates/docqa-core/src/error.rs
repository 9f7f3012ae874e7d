use docqa_llm::LlmError;
use docqa_memory::IndexError;
use docqa_memory::document::DocumentError;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("no document has been processed yet")]
    NoDocument,

    #[error("question is empty")]
    EmptyQuestion,
}

/// Every failure a caller of [`crate::Pipeline`] can observe.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to extract document text: {0}")]
    Extraction(#[from] DocumentError),

    #[error("embedding service error: {0}")]
    EmbeddingService(#[from] IndexError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("answer generation failed: {0}")]
    Generation(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_is_transparent() {
        let err = PipelineError::from(QueryError::NoDocument);
        assert_eq!(err.to_string(), "no document has been processed yet");
    }

    #[test]
    fn llm_error_maps_to_generation() {
        let err = PipelineError::from(LlmError::RateLimited);
        assert!(matches!(err, PipelineError::Generation(_)));
        assert_eq!(err.to_string(), "answer generation failed: rate limited");
    }

    #[test]
    fn index_error_maps_to_embedding_service() {
        let err = PipelineError::from(IndexError::EmptyInput);
        assert!(matches!(err, PipelineError::EmbeddingService(_)));
    }
}
