//! Configuration, session state, and the document question-answering pipeline.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod responder;
pub mod secret;
pub mod session;

pub use config::Config;
pub use error::{PipelineError, QueryError};
pub use pipeline::{Answer, Pipeline, ProcessReport};
pub use responder::Responder;
pub use session::Session;
