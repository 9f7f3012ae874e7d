use super::types::{Chunk, ExtractedText};

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Upper bound on characters per chunk.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
    /// Boundary strings, highest priority first.
    pub separators: Vec<String>,
}

#[must_use]
pub fn default_separators() -> Vec<String> {
    ["\n", ".", "!", "?", " "]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: default_separators(),
        }
    }
}

/// Splits text into overlapping chunks, preferring separator boundaries.
///
/// Every chunk is an exact slice of the input. Dropping the first
/// `prev.end - next.start` characters of each chunk after the first and
/// concatenating reconstructs the input.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl TextSplitter {
    /// Overlap is clamped below `chunk_size` and empty separators are dropped.
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        let chunk_size = config.chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: config.chunk_overlap.min(chunk_size - 1),
            separators: config
                .separators
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn split(&self, extracted: &ExtractedText) -> Vec<Chunk> {
        self.split_text(&extracted.text)
    }

    #[must_use]
    pub fn split_text(&self, text: &str) -> Vec<Chunk> {
        // bounds[i] is the byte offset of char i; the last entry is text.len().
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut prev_end = 0;

        while start < total {
            let end = if total - start <= self.chunk_size {
                total
            } else {
                let limit = start + self.chunk_size;
                let lower = prev_end.max(start + self.chunk_overlap);
                split_point(text, &bounds, start, lower, limit, &self.separators)
            };

            chunks.push(Chunk {
                content: text[bounds[start]..bounds[end]].to_owned(),
                chunk_index: chunks.len(),
                start,
                end,
            });

            if end == total {
                break;
            }
            prev_end = end;
            start = self.next_start(text, &bounds, start, end);
        }

        chunks
    }

    /// Start of the chunk following `start..end`, inside its last `chunk_overlap` chars.
    fn next_start(&self, text: &str, bounds: &[usize], start: usize, end: usize) -> usize {
        if self.chunk_overlap == 0 {
            return end;
        }
        let lo = end.saturating_sub(self.chunk_overlap).max(start + 1);
        if lo >= end {
            return end;
        }

        let region = &text[bounds[lo]..bounds[end]];
        for sep in &self.separators {
            let boundary = region
                .match_indices(sep.as_str())
                .map(|(pos, m)| char_index(bounds, bounds[lo] + pos + m.len()))
                .find(|&p| p < end);
            if let Some(p) = boundary {
                return p;
            }
        }
        lo
    }
}

/// End of the chunk starting at `start`, in `(lower, limit]`.
///
/// Takes the last occurrence of the highest-priority separator that lands in
/// range, falling through to lower priorities and finally a hard cut at `limit`.
fn split_point(
    text: &str,
    bounds: &[usize],
    start: usize,
    lower: usize,
    limit: usize,
    separators: &[String],
) -> usize {
    let Some((sep, rest)) = separators.split_first() else {
        return limit;
    };

    let window = &text[bounds[start]..bounds[limit]];
    if let Some(pos) = window.rfind(sep.as_str()) {
        let end = char_index(bounds, bounds[start] + pos + sep.len());
        if end > lower {
            return end;
        }
    }

    split_point(text, bounds, start, lower, limit, rest)
}

fn char_index(bounds: &[usize], byte: usize) -> usize {
    bounds.binary_search(&byte).unwrap_or_else(|i| i)
}
