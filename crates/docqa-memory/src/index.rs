//! Flat in-memory nearest-neighbour index over one document's chunks.

use docqa_llm::EmbeddingProvider;

use crate::document::Chunk;
use crate::error::IndexError;

#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug)]
struct IndexedChunk {
    chunk: Chunk,
    vector: Vec<f32>,
}

/// Embeddings of every chunk of one document, searched exhaustively by cosine similarity.
#[derive(Debug)]
pub struct DocumentIndex {
    entries: Vec<IndexedChunk>,
    embedding_model: String,
    dimensions: usize,
}

impl DocumentIndex {
    /// Embed every chunk in order and build the index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::EmptyInput`] for zero chunks, [`IndexError::Embedding`]
    /// when the backend fails, and [`IndexError::DimensionMismatch`] when it returns
    /// vectors of inconsistent length.
    pub async fn build<E: EmbeddingProvider>(
        chunks: Vec<Chunk>,
        embedder: &E,
    ) -> Result<Self, IndexError> {
        if chunks.is_empty() {
            return Err(IndexError::EmptyInput);
        }

        let mut entries = Vec::with_capacity(chunks.len());
        let mut dimensions = 0;
        for chunk in chunks {
            let vector = embedder.embed(&chunk.content).await?;
            if dimensions == 0 {
                dimensions = vector.len();
            }
            if vector.is_empty() || vector.len() != dimensions {
                return Err(IndexError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
            tracing::debug!(chunk_index = chunk.chunk_index, "chunk embedded");
            entries.push(IndexedChunk { chunk, vector });
        }

        tracing::info!(
            chunks = entries.len(),
            dimensions,
            model = embedder.embedding_model(),
            "document index built"
        );

        Ok(Self {
            entries,
            embedding_model: embedder.embedding_model().to_owned(),
            dimensions,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[must_use]
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|e| &e.chunk)
    }

    /// Top `k` chunks by cosine similarity, nearest first; ties keep chunk order.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] if `vector` has the wrong length.
    pub fn search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        if vector.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|e| ScoredChunk {
                chunk: e.chunk.clone(),
                score: cosine_similarity(vector, &e.vector),
            })
            .collect();

        // Stable sort: equal scores stay in chunk order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }

    /// Embed `question` with the model that built the index and return the top `k` chunks.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ModelMismatch`] when `embedder` uses a different model,
    /// or any error from embedding and [`Self::search`].
    pub async fn query<E: EmbeddingProvider>(
        &self,
        question: &str,
        embedder: &E,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        if embedder.embedding_model() != self.embedding_model {
            return Err(IndexError::ModelMismatch {
                indexed: self.embedding_model.clone(),
                query: embedder.embedding_model().to_owned(),
            });
        }
        let vector = embedder.embed(question).await?;
        self.search(&vector, k)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let similarity = dot / (norm_a * norm_b);
    // Overflowing components give inf/inf.
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}
