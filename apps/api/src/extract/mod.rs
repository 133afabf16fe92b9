//! PDF text extraction.
//!
//! Two-stage extraction: `pdf-extract` first, raw page text via `lopdf` as
//! the fallback. A document that defeats both yields an empty string and a
//! warning. Extraction failure is recoverable; the candidate is simply
//! dropped before scoring.

use tracing::warn;

/// Extracts plain text from PDF bytes with whitespace normalized.
/// Returns an empty string when no extractor can read the document.
pub fn extract_pdf_text(bytes: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => normalize_whitespace(&text),
        Err(primary) => {
            warn!("pdf-extract failed ({primary}); falling back to lopdf");
            match lopdf_page_text(bytes) {
                Ok(text) => normalize_whitespace(&text),
                Err(fallback) => {
                    warn!("lopdf fallback failed ({fallback}); treating document as empty");
                    String::new()
                }
            }
        }
    }
}

fn lopdf_page_text(bytes: &[u8]) -> Result<String, lopdf::Error> {
    let doc = lopdf::Document::load_mem(bytes)?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages)
}

/// Collapses consecutive whitespace to single spaces and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(
            normalize_whitespace("a  b\t\tc\n\nd"),
            "a b c d"
        );
    }

    #[test]
    fn test_normalize_trims_ends() {
        assert_eq!(normalize_whitespace("  hello world \n"), "hello world");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize_whitespace("   \n\t "), "");
    }

    #[test]
    fn test_unreadable_bytes_yield_empty_string() {
        assert_eq!(extract_pdf_text(b"definitely not a pdf"), "");
    }

    #[test]
    fn test_empty_bytes_yield_empty_string() {
        assert_eq!(extract_pdf_text(&[]), "");
    }
}
