//! Embedding and chat completion backends behind capability traits.

pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod openai;
pub mod provider;

pub use error::LlmError;
pub use provider::{EmbeddingProvider, LlmProvider, Message, Role};
