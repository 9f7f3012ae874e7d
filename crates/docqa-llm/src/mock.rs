//! Test-only mock providers.

use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::{EmbeddingProvider, LlmProvider, Message};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    pub fail_chat: bool,
    pub fail_embed: bool,
    /// Milliseconds to sleep before returning a chat response.
    pub delay_ms: u64,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            embedding: vec![0.0; 8],
            fail_chat: false,
            fail_embed: false,
            delay_ms: 0,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            fail_embed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Every message list passed to `chat`, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for MockProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail_chat {
            return Err(LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}

impl EmbeddingProvider for MockProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
        if self.fail_embed {
            return Err(LlmError::Other("mock embedding error".into()));
        }
        Ok(self.embedding.clone())
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn embedding_model(&self) -> &str {
        "mock-constant"
    }
}

/// Deterministic bag-of-words embedder.
///
/// Each lowercased alphanumeric token is hashed into one of `dims` buckets,
/// so texts sharing words get a higher cosine similarity.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dims: usize,
    model: String,
    calls: Arc<Mutex<usize>>,
    fail_after: Option<usize>,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl HashEmbedder {
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self {
            dims: dims.max(1),
            model: "mock-hash".into(),
            calls: Arc::new(Mutex::new(0)),
            fail_after: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Fail every call after the first `n` successful ones.
    #[must_use]
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    #[must_use]
    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dims];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = blake3::hash(token.to_lowercase().as_bytes());
            let bytes = hash.as_bytes();
            let bucket = u64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]);
            #[expect(clippy::cast_possible_truncation)]
            let idx = (bucket % self.dims as u64) as usize;
            vector[idx] += 1.0;
        }
        vector
    }
}

impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let mut calls = self.calls.lock().unwrap();
        if let Some(limit) = self.fail_after
            && *calls >= limit
        {
            return Err(LlmError::Other("mock embedding quota exhausted".into()));
        }
        *calls += 1;
        Ok(self.vectorize(text))
    }

    fn embedding_model(&self) -> &str {
        &self.model
    }
}
