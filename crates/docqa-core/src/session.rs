use docqa_memory::DocumentIndex;

/// Per-caller state: at most one processed document.
///
/// Starts empty. [`crate::Pipeline::process_document`] replaces the index
/// only after a complete build, so a failed rebuild keeps the previous one.
#[derive(Debug, Default)]
pub struct Session {
    loaded: Option<Loaded>,
}

#[derive(Debug)]
struct Loaded {
    source: String,
    index: DocumentIndex,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.loaded.is_some()
    }

    /// Source label of the processed document.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.source.as_str())
    }

    #[must_use]
    pub fn index(&self) -> Option<&DocumentIndex> {
        self.loaded.as_ref().map(|l| &l.index)
    }

    pub fn clear(&mut self) {
        self.loaded = None;
    }

    pub(crate) fn replace(&mut self, source: String, index: DocumentIndex) {
        self.loaded = Some(Loaded { source, index });
    }
}
