#[cfg(feature = "pdf")]
mod pdf;
mod text;

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;
pub use text::TextExtractor;
