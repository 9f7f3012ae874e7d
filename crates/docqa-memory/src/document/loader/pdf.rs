use super::super::{
    BoxFuture, DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentExtractor, ExtractedText,
    check_size,
};

/// Writers may put junk before the header; readers accept it within the first KiB.
const HEADER_SEARCH_WINDOW: usize = 1024;

pub struct PdfExtractor {
    pub max_file_size: u64,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, document: Document) -> BoxFuture<'_, Result<ExtractedText, DocumentError>> {
        let max_size = self.max_file_size;
        Box::pin(async move {
            check_size(&document, max_size)?;
            if !has_pdf_header(&document.bytes) {
                return Err(DocumentError::Pdf("missing %PDF- header".into()));
            }

            let Document { bytes, source } = document;
            // The parser panics on some malformed inputs; the blocking task contains it.
            let pages = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem_by_pages(&bytes)
                    .map_err(|e| DocumentError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| DocumentError::Pdf(format!("parser aborted: {e}")))??;

            let empty_pages = pages.iter().filter(|p| p.trim().is_empty()).count();
            if empty_pages > 0 {
                tracing::debug!(source = %source, empty_pages, "PDF pages without extractable text");
            }

            Ok(ExtractedText {
                pages: pages.len(),
                text: pages.concat(),
                source,
            })
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}
