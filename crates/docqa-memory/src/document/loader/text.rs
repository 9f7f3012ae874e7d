use super::super::{
    BoxFuture, DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentExtractor, ExtractedText,
    check_size,
};

/// Plain UTF-8 text, treated as a single page.
pub struct TextExtractor {
    pub max_file_size: u64,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentExtractor for TextExtractor {
    fn extract(&self, document: Document) -> BoxFuture<'_, Result<ExtractedText, DocumentError>> {
        let max_size = self.max_file_size;
        Box::pin(async move {
            check_size(&document, max_size)?;

            let Document { bytes, source } = document;
            let mut text = String::from_utf8(bytes)?;
            if text.starts_with('\u{feff}') {
                text.remove(0);
            }

            Ok(ExtractedText {
                text,
                pages: 1,
                source,
            })
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md", "markdown"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn extract_text_document() {
        let doc = Document::new(b"hello world".to_vec(), "test.txt");
        let extracted = TextExtractor::default().extract(doc).await.unwrap();
        assert_eq!(extracted.text, "hello world");
        assert_eq!(extracted.pages, 1);
        assert_eq!(extracted.source, "test.txt");
    }

    #[tokio::test]
    async fn byte_order_mark_stripped() {
        let doc = Document::new("\u{feff}# Title".as_bytes().to_vec(), "readme.md");
        let extracted = TextExtractor::default().extract(doc).await.unwrap();
        assert_eq!(extracted.text, "# Title");
    }

    #[tokio::test]
    async fn empty_document_is_blank() {
        let doc = Document::new(Vec::new(), "empty.txt");
        let extracted = TextExtractor::default().extract(doc).await.unwrap();
        assert!(extracted.is_blank());
    }

    #[tokio::test]
    async fn invalid_utf8_rejected() {
        let doc = Document::new(vec![0xff, 0xfe, 0x00, 0xc3], "bin.txt");
        let result = TextExtractor::default().extract(doc).await;
        assert!(matches!(result, Err(DocumentError::InvalidUtf8(_))));
    }

    #[tokio::test]
    async fn file_too_large_rejected() {
        let doc = Document::new(b"x".to_vec(), "big.txt");
        let extractor = TextExtractor { max_file_size: 0 };
        let result = extractor.extract(doc).await;
        assert!(matches!(result, Err(DocumentError::FileTooLarge(1))));
    }

    #[test]
    fn supported_extensions_list() {
        let extractor = TextExtractor::default();
        let exts = extractor.supported_extensions();
        assert!(exts.contains(&"txt"));
        assert!(exts.contains(&"md"));
        assert!(exts.contains(&"markdown"));
    }
}
