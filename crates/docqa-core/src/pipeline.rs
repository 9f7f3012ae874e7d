use std::time::Duration;

use docqa_llm::{EmbeddingProvider, LlmError, LlmProvider};
use docqa_memory::document::{Document, DocumentError, DocumentExtractor, TextSplitter};
use docqa_memory::{DocumentIndex, ScoredChunk};

use crate::config::Config;
use crate::error::{PipelineError, QueryError};
use crate::responder::Responder;
use crate::session::Session;

/// Summary of one successful processing action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub source: String,
    pub pages: usize,
    pub characters: usize,
    pub chunks: usize,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Chunks the answer was grounded in, nearest first.
    pub sources: Vec<ScoredChunk>,
}

/// Extract, chunk, index, retrieve and answer.
///
/// Holds no per-document state: every operation takes the caller's [`Session`].
/// Steps run one at a time, one embedding request per chunk.
pub struct Pipeline<E, G> {
    embedder: E,
    responder: Responder<G>,
    splitter: TextSplitter,
    top_k: usize,
    embedding_timeout: Duration,
}

impl<E: EmbeddingProvider, G: LlmProvider> Pipeline<E, G> {
    #[must_use]
    pub fn new(embedder: E, llm: G, config: &Config) -> Self {
        Self {
            embedder,
            responder: Responder::new(llm, Duration::from_secs(config.timeouts.llm_seconds)),
            splitter: TextSplitter::new(config.chunking.splitter_config()),
            top_k: config.retrieval.top_k.max(1),
            embedding_timeout: Duration::from_secs(config.timeouts.embedding_seconds),
        }
    }

    #[must_use]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    #[must_use]
    pub fn responder(&self) -> &Responder<G> {
        &self.responder
    }

    #[must_use]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    fn timed_embedder(&self) -> TimedEmbedder<'_, E> {
        TimedEmbedder {
            inner: &self.embedder,
            timeout: self.embedding_timeout,
        }
    }

    /// Build a fresh index for `document` and install it in `session`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Extraction`] when the document cannot be read or has no
    /// text, [`PipelineError::EmbeddingService`] when the index cannot be built.
    /// On error `session` is left as it was.
    pub async fn process_document(
        &self,
        session: &mut Session,
        extractor: &dyn DocumentExtractor,
        document: Document,
    ) -> Result<ProcessReport, PipelineError> {
        tracing::info!(source = %document.source, bytes = document.bytes.len(), "processing document");

        let extracted = extractor.extract(document).await?;
        if extracted.is_blank() {
            return Err(DocumentError::NoText.into());
        }

        let chunks = self.splitter.split(&extracted);
        let chunk_count = chunks.len();
        tracing::debug!(chunks = chunk_count, "document split");

        let index = DocumentIndex::build(chunks, &self.timed_embedder()).await?;

        let report = ProcessReport {
            source: extracted.source.clone(),
            pages: extracted.pages,
            characters: extracted.text.chars().count(),
            chunks: chunk_count,
        };
        session.replace(extracted.source, index);

        tracing::info!(
            source = %report.source,
            pages = report.pages,
            characters = report.characters,
            chunks = report.chunks,
            "document processed"
        );
        Ok(report)
    }

    /// Top-K chunks of the session's document for `question`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Query`] without a processed document or with a blank
    /// question, [`PipelineError::EmbeddingService`] when the question cannot
    /// be embedded.
    pub async fn retrieve(
        &self,
        session: &Session,
        question: &str,
    ) -> Result<Vec<ScoredChunk>, PipelineError> {
        let index = session.index().ok_or(QueryError::NoDocument)?;
        let question = question.trim();
        if question.is_empty() {
            return Err(QueryError::EmptyQuestion.into());
        }

        let results = index
            .query(question, &self.timed_embedder(), self.top_k)
            .await?;
        tracing::debug!(
            top_k = self.top_k,
            returned = results.len(),
            best = results.first().map(|r| r.score),
            "retrieved chunks"
        );
        Ok(results)
    }

    /// Retrieve and generate an answer grounded in the retrieved chunks.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::retrieve`], or [`PipelineError::Generation`].
    pub async fn ask(&self, session: &Session, question: &str) -> Result<Answer, PipelineError> {
        let sources = self.retrieve(session, question).await?;
        let text = self.responder.answer(question.trim(), &sources).await?;
        tracing::info!(sources = sources.len(), "question answered");
        Ok(Answer { text, sources })
    }
}

/// Bounds every embedding request by the configured timeout.
struct TimedEmbedder<'a, E> {
    inner: &'a E,
    timeout: Duration,
}

impl<E: EmbeddingProvider> EmbeddingProvider for TimedEmbedder<'_, E> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        tokio::time::timeout(self.timeout, self.inner.embed(text))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))?
    }

    fn embedding_model(&self) -> &str {
        self.inner.embedding_model()
    }
}

#[cfg(test)]
mod tests {
    use docqa_llm::mock::{HashEmbedder, MockProvider};
    use docqa_memory::IndexError;
    use docqa_memory::document::TextExtractor;

    use super::*;

    fn pipeline(embedder: HashEmbedder, llm: MockProvider) -> Pipeline<HashEmbedder, MockProvider> {
        Pipeline::new(embedder, llm, &Config::default())
    }

    fn text(contents: &str) -> Document {
        Document::new(contents.as_bytes().to_vec(), "notes.txt")
    }

    #[tokio::test]
    async fn report_describes_document() {
        let p = pipeline(HashEmbedder::default(), MockProvider::default());
        let mut session = Session::new();
        let report = p
            .process_document(&mut session, &TextExtractor::default(), text("Hello world."))
            .await
            .unwrap();
        assert_eq!(
            report,
            ProcessReport {
                source: "notes.txt".into(),
                pages: 1,
                characters: 12,
                chunks: 1,
            }
        );
        assert_eq!(session.source(), Some("notes.txt"));
    }

    #[tokio::test]
    async fn whitespace_document_rejected() {
        let p = pipeline(HashEmbedder::default(), MockProvider::default());
        let mut session = Session::new();
        let result = p
            .process_document(&mut session, &TextExtractor::default(), text(" \n\t "))
            .await;
        assert!(matches!(
            result,
            Err(PipelineError::Extraction(DocumentError::NoText))
        ));
        assert!(!session.is_ready());
    }

    #[tokio::test]
    async fn blank_question_rejected() {
        let p = pipeline(HashEmbedder::default(), MockProvider::default());
        let mut session = Session::new();
        p.process_document(&mut session, &TextExtractor::default(), text("Some text."))
            .await
            .unwrap();
        let result = p.ask(&session, "   ").await;
        assert!(matches!(
            result,
            Err(PipelineError::Query(QueryError::EmptyQuestion))
        ));
    }

    #[tokio::test]
    async fn question_embedding_failure_is_embedding_service_error() {
        let p = pipeline(HashEmbedder::new(64).failing_after(1), MockProvider::default());
        let mut session = Session::new();
        p.process_document(&mut session, &TextExtractor::default(), text("One chunk."))
            .await
            .unwrap();
        let result = p.retrieve(&session, "anything").await;
        assert!(matches!(
            result,
            Err(PipelineError::EmbeddingService(IndexError::Embedding(_)))
        ));
    }

    #[tokio::test]
    async fn generation_failure_is_generation_error() {
        let p = pipeline(HashEmbedder::default(), MockProvider::failing());
        let mut session = Session::new();
        p.process_document(&mut session, &TextExtractor::default(), text("One chunk."))
            .await
            .unwrap();
        let result = p.ask(&session, "What is here?").await;
        assert!(matches!(result, Err(PipelineError::Generation(_))));
    }

    #[tokio::test]
    async fn retrieve_returns_at_most_top_k() {
        let mut config = Config::default();
        config.chunking.chunk_size = 20;
        config.chunking.chunk_overlap = 0;
        config.retrieval.top_k = 2;
        let p = Pipeline::new(HashEmbedder::default(), MockProvider::default(), &config);
        let mut session = Session::new();
        let report = p
            .process_document(
                &mut session,
                &TextExtractor::default(),
                text("Alpha one.\nBravo two.\nCharlie three.\nDelta four.\n"),
            )
            .await
            .unwrap();
        assert!(report.chunks > 2);
        let results = p.retrieve(&session, "Charlie").await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].chunk.content.contains("Charlie"));
    }

    struct SlowEmbedder;

    impl EmbeddingProvider for SlowEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![1.0])
        }

        fn embedding_model(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn embedding_timeout_enforced() {
        let p = Pipeline {
            embedder: SlowEmbedder,
            responder: Responder::new(MockProvider::default(), Duration::from_secs(1)),
            splitter: TextSplitter::new(Config::default().chunking.splitter_config()),
            top_k: 4,
            embedding_timeout: Duration::from_millis(20),
        };
        let mut session = Session::new();
        let result = p
            .process_document(&mut session, &TextExtractor::default(), text("Some text."))
            .await;
        assert!(matches!(
            result,
            Err(PipelineError::EmbeddingService(IndexError::Embedding(
                LlmError::Timeout(_)
            )))
        ));
    }
}
