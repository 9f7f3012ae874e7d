use std::str::FromStr;

use super::Config;
use crate::secret::secret_from_env;

/// Checked in order; the first non-blank value wins.
pub const API_KEY_VARS: [&str; 2] = ["DOCQA_OPENAI_API_KEY", "OPENAI_API_KEY"];

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    let v = std::env::var(key).ok()?;
    if let Ok(parsed) = v.trim().parse::<T>() {
        Some(parsed)
    } else {
        tracing::warn!("ignoring invalid {key} value: {v}");
        None
    }
}

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DOCQA_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Some(temperature) = parsed::<f32>("DOCQA_LLM_TEMPERATURE") {
            self.llm.temperature = temperature;
        }
        if let Some(tokens) = parsed::<u32>("DOCQA_LLM_MAX_TOKENS") {
            self.llm.max_tokens = tokens;
        }
        if let Some(size) = parsed::<usize>("DOCQA_CHUNK_SIZE") {
            self.chunking.chunk_size = size;
        }
        if let Some(overlap) = parsed::<usize>("DOCQA_CHUNK_OVERLAP") {
            self.chunking.chunk_overlap = overlap;
        }
        if let Some(k) = parsed::<usize>("DOCQA_RETRIEVAL_TOP_K") {
            self.retrieval.top_k = k;
        }
        if let Some(bytes) = parsed::<u64>("DOCQA_MAX_FILE_SIZE") {
            self.document.max_file_size = bytes;
        }
        if let Some(secs) = parsed::<u64>("DOCQA_TIMEOUT_LLM") {
            self.timeouts.llm_seconds = secs;
        }
        if let Some(secs) = parsed::<u64>("DOCQA_TIMEOUT_EMBEDDING") {
            self.timeouts.embedding_seconds = secs;
        }
    }

    pub(crate) fn resolve_secrets(&mut self) {
        self.secrets.openai_api_key = secret_from_env(&API_KEY_VARS);
        if self.secrets.openai_api_key.is_none() {
            tracing::debug!("no OpenAI API key found in environment");
        }
    }
}
