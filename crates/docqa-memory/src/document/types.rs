/// Raw bytes of one uploaded file.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Vec<u8>,
    /// File path or caller-supplied name, used in logs and reports.
    pub source: String,
}

impl Document {
    #[must_use]
    pub fn new(bytes: Vec<u8>, source: impl Into<String>) -> Self {
        Self {
            bytes,
            source: source.into(),
        }
    }
}

/// Text of every page, concatenated in page order without a separator.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub pages: usize,
    pub source: String,
}

impl ExtractedText {
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A contiguous slice of the extracted text.
///
/// `start` and `end` are character offsets into [`ExtractedText::text`];
/// `content` holds exactly the characters in `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub content: String,
    pub chunk_index: usize,
    pub start: usize,
    pub end: usize,
}
