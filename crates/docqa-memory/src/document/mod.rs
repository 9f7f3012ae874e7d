pub mod error;
pub mod loader;
pub mod splitter;
pub mod types;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

pub use error::DocumentError;
pub use loader::TextExtractor;
pub use splitter::{SplitterConfig, TextSplitter};
pub use types::{Chunk, Document, ExtractedText};

#[cfg(feature = "pdf")]
pub use loader::PdfExtractor;

/// Default maximum document size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait DocumentExtractor: Send + Sync {
    /// Consume the document and return its text.
    fn extract(&self, document: Document) -> BoxFuture<'_, Result<ExtractedText, DocumentError>>;

    fn supported_extensions(&self) -> &[&str];
}

/// Pick an extractor by file extension.
///
/// # Errors
///
/// Returns [`DocumentError::UnsupportedFormat`] for unknown or missing extensions.
pub fn extractor_for_path(
    path: &Path,
    max_file_size: u64,
) -> Result<Box<dyn DocumentExtractor>, DocumentError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    #[cfg(feature = "pdf")]
    if ext == "pdf" {
        return Ok(Box::new(PdfExtractor { max_file_size }));
    }

    let text = TextExtractor { max_file_size };
    if text.supported_extensions().contains(&ext.as_str()) {
        return Ok(Box::new(text));
    }

    Err(DocumentError::UnsupportedFormat(if ext.is_empty() {
        path.display().to_string()
    } else {
        ext
    }))
}

/// Read the file at `path` into a [`Document`], rejecting it by size before reading.
///
/// # Errors
///
/// Returns [`DocumentError::FileTooLarge`] when the file exceeds `max_file_size`,
/// or [`DocumentError::Io`] when it cannot be inspected or read.
pub async fn read_document(path: &Path, max_file_size: u64) -> Result<Document, DocumentError> {
    let meta = tokio::fs::metadata(path).await?;
    if meta.len() > max_file_size {
        return Err(DocumentError::FileTooLarge(meta.len()));
    }
    let bytes = tokio::fs::read(path).await?;
    Ok(Document::new(bytes, path.display().to_string()))
}

fn check_size(document: &Document, max_size: u64) -> Result<(), DocumentError> {
    let len = document.bytes.len() as u64;
    if len > max_size {
        return Err(DocumentError::FileTooLarge(len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_extensions_select_text_extractor() {
        for name in ["notes.txt", "README.md", "doc.Markdown"] {
            let extractor = extractor_for_path(Path::new(name), DEFAULT_MAX_FILE_SIZE).unwrap();
            assert!(extractor.supported_extensions().contains(&"txt"));
        }
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn pdf_extension_selects_pdf_extractor() {
        let extractor =
            extractor_for_path(Path::new("/tmp/Report.PDF"), DEFAULT_MAX_FILE_SIZE).unwrap();
        assert_eq!(extractor.supported_extensions(), &["pdf"]);
    }

    #[test]
    fn unknown_extension_rejected() {
        let result = extractor_for_path(Path::new("data.docx"), DEFAULT_MAX_FILE_SIZE);
        assert!(matches!(result, Err(DocumentError::UnsupportedFormat(ext)) if ext == "docx"));
    }

    #[tokio::test]
    async fn read_document_loads_bytes_and_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let document = read_document(&path, DEFAULT_MAX_FILE_SIZE).await.unwrap();
        assert_eq!(document.bytes, b"hello");
        assert_eq!(document.source, path.display().to_string());
    }

    #[tokio::test]
    async fn read_document_rejects_oversized_file_by_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, [b'a'; 64]).unwrap();

        let result = read_document(&path, 16).await;
        assert!(matches!(result, Err(DocumentError::FileTooLarge(64))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn read_document_checks_size_before_reading() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.txt");
        std::fs::write(&path, [b'a'; 64]).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Unreadable contents, yet the size limit is still reported.
        let result = read_document(&path, 16).await;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(matches!(result, Err(DocumentError::FileTooLarge(64))));
    }

    #[tokio::test]
    async fn read_document_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_document(&dir.path().join("absent.txt"), DEFAULT_MAX_FILE_SIZE).await;
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }

    #[test]
    fn missing_extension_reports_path() {
        let result = extractor_for_path(Path::new("/tmp/noext"), DEFAULT_MAX_FILE_SIZE);
        assert!(matches!(result, Err(DocumentError::UnsupportedFormat(p)) if p == "/tmp/noext"));
    }
}
