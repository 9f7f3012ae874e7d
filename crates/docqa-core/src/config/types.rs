use serde::{Deserialize, Serialize};

use docqa_memory::document::{DEFAULT_MAX_FILE_SIZE, SplitterConfig, splitter};

use crate::secret::Secret;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-3.5-turbo".into()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".into()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

/// OpenAI-compatible backend used for both embeddings and chat completions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "splitter::default_separators")]
    pub separators: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            separators: splitter::default_separators(),
        }
    }
}

impl ChunkingConfig {
    #[must_use]
    pub fn splitter_config(&self) -> SplitterConfig {
        SplitterConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            separators: self.separators.clone(),
        }
    }
}

fn default_top_k() -> usize {
    4
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Chunks handed to the responder per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DocumentConfig {
    /// Bytes; larger documents are rejected before parsing.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_embedding_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_llm_timeout")]
    pub llm_seconds: u64,
    #[serde(default = "default_embedding_timeout")]
    pub embedding_seconds: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            llm_seconds: default_llm_timeout(),
            embedding_seconds: default_embedding_timeout(),
        }
    }
}

/// Secrets resolved from the environment after loading; never read from the file.
#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub openai_api_key: Option<Secret>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serialize_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let back: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(back.llm.model, config.llm.model);
        assert_eq!(back.llm.base_url, config.llm.base_url);
        assert_eq!(back.chunking.separators, config.chunking.separators);
        assert_eq!(back.retrieval.top_k, config.retrieval.top_k);
        assert_eq!(back.document.max_file_size, config.document.max_file_size);
    }

    #[test]
    fn secrets_not_serialized() {
        let mut config = Config::default();
        config.secrets.openai_api_key = Some(Secret::new("sk-do-not-write"));
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        assert!(!toml_str.contains("sk-do-not-write"));
    }

    #[test]
    fn splitter_config_copies_chunking() {
        let chunking = ChunkingConfig {
            chunk_size: 50,
            chunk_overlap: 5,
            separators: vec!["\n\n".into()],
        };
        let sc = chunking.splitter_config();
        assert_eq!(sc.chunk_size, 50);
        assert_eq!(sc.chunk_overlap, 5);
        assert_eq!(sc.separators, vec!["\n\n".to_owned()]);
    }
}
