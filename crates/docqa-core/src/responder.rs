use std::fmt::Write as _;
use std::time::Duration;

use docqa_llm::{LlmError, LlmProvider, Message};
use docqa_memory::ScoredChunk;

pub const SYSTEM_PROMPT: &str = "Use the following pieces of context to answer the user's question. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Grounds one question in retrieved chunks and asks the chat backend for an answer.
pub struct Responder<G> {
    llm: G,
    timeout: Duration,
}

impl<G: LlmProvider> Responder<G> {
    #[must_use]
    pub fn new(llm: G, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    #[must_use]
    pub fn llm(&self) -> &G {
        &self.llm
    }

    /// # Errors
    ///
    /// Returns the backend error, [`LlmError::Timeout`] when the call exceeds
    /// the configured timeout, or [`LlmError::Other`] for a blank completion.
    pub async fn answer(&self, question: &str, context: &[ScoredChunk]) -> Result<String, LlmError> {
        let messages = build_messages(question, context);
        tracing::debug!(
            provider = self.llm.name(),
            chunks = context.len(),
            "requesting grounded answer"
        );

        let text = tokio::time::timeout(self.timeout, self.llm.chat(&messages))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        if text.trim().is_empty() {
            return Err(LlmError::Other("model returned an empty answer".into()));
        }
        Ok(text)
    }
}

/// System instruction, then the context chunks separated by blank lines and the question.
#[must_use]
pub fn build_messages(question: &str, context: &[ScoredChunk]) -> Vec<Message> {
    let mut user = String::new();
    for (i, scored) in context.iter().enumerate() {
        if i > 0 {
            user.push_str("\n\n");
        }
        user.push_str(&scored.chunk.content);
    }
    let _ = write!(user, "\n\nQuestion: {question}");

    vec![Message::system(SYSTEM_PROMPT), Message::user(user)]
}

#[cfg(test)]
mod tests {
    use docqa_llm::Role;
    use docqa_llm::mock::MockProvider;
    use docqa_memory::document::Chunk;

    use super::*;

    fn scored(content: &str, chunk_index: usize) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                content: content.into(),
                chunk_index,
                start: 0,
                end: content.chars().count(),
            },
            score: 1.0,
        }
    }

    #[test]
    fn messages_carry_context_then_question() {
        let messages = build_messages(
            "What color is the sky?",
            &[scored("The sky is blue.", 0), scored("Grass is green.", 1)],
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(
            messages[1].content,
            "The sky is blue.\n\nGrass is green.\n\nQuestion: What color is the sky?"
        );
    }

    #[tokio::test]
    async fn answer_returns_completion() {
        let llm = MockProvider::with_responses(vec!["Blue.".into()]);
        let responder = Responder::new(llm, Duration::from_secs(5));
        let answer = responder
            .answer("What color is the sky?", &[scored("The sky is blue.", 0)])
            .await
            .unwrap();
        assert_eq!(answer, "Blue.");

        let requests = responder.llm().requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0][1].content.contains("The sky is blue."));
    }

    #[tokio::test]
    async fn backend_failure_propagates() {
        let responder = Responder::new(MockProvider::failing(), Duration::from_secs(5));
        let result = responder.answer("q", &[scored("c", 0)]).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
        assert_eq!(responder.llm().requests().len(), 1);
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let llm = MockProvider::default().with_delay(500);
        let responder = Responder::new(llm, Duration::from_millis(20));
        let result = responder.answer("q", &[scored("c", 0)]).await;
        assert!(matches!(result, Err(LlmError::Timeout(_))));
    }

    #[tokio::test]
    async fn blank_completion_is_error() {
        let llm = MockProvider::with_responses(vec!["   \n".into()]);
        let responder = Responder::new(llm, Duration::from_secs(5));
        let result = responder.answer("q", &[scored("c", 0)]).await;
        assert!(result.is_err());
    }
}
