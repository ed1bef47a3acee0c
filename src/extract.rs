//! Document text extraction.
//!
//! PDFs go through `pdf-extract` first and fall back to `lopdf`, which rebuilds the
//! text page by page. Everything else is decoded as UTF-8, dropping invalid bytes.

use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("PDF text extraction failed: {fallback} (primary extractor: {primary})")]
    Pdf { primary: String, fallback: String },
    #[error("extraction worker failed: {0}")]
    Worker(String),
}

/// Plain text pulled out of an uploaded document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub text: String,
    pub char_count: usize,
}

impl ExtractionResult {
    fn new(text: String) -> Self {
        let char_count = text.chars().count();
        Self { text, char_count }
    }
}

type PdfExtractor = fn(&[u8]) -> Result<String, String>;

/// Extract plain text from a document.
///
/// `filename` is only used as a type hint: names ending in `.pdf` (any case) are parsed
/// as PDF, anything else is treated as text. Text decoding never fails.
pub fn extract(bytes: &[u8], filename: &str) -> Result<ExtractionResult, ExtractError> {
    if is_pdf(filename) {
        let text = extract_pdf_with(bytes, primary_pdf_text, fallback_pdf_text)?;
        Ok(ExtractionResult::new(text))
    } else {
        Ok(ExtractionResult::new(decode_text(bytes)))
    }
}

/// Run [`extract`] on the blocking pool so large documents do not stall the runtime.
pub async fn extract_blocking(
    bytes: Vec<u8>,
    filename: String,
) -> Result<ExtractionResult, ExtractError> {
    tokio::task::spawn_blocking(move || extract(&bytes, &filename))
        .await
        .map_err(|e| ExtractError::Worker(e.to_string()))?
}

fn is_pdf(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

/// Decode bytes as UTF-8, discarding invalid sequences
fn decode_text(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

fn extract_pdf_with(
    bytes: &[u8],
    primary: PdfExtractor,
    fallback: PdfExtractor,
) -> Result<String, ExtractError> {
    let primary_err = match primary(bytes) {
        Ok(text) => {
            debug!(chars = text.len(), "extracted PDF text with pdf-extract");
            return Ok(text);
        }
        Err(e) => e,
    };

    warn!(error = %primary_err, "pdf-extract failed, falling back to lopdf");
    match fallback(bytes) {
        Ok(text) => {
            info!(chars = text.len(), "extracted PDF text with lopdf fallback");
            Ok(text)
        }
        Err(fallback_err) => Err(ExtractError::Pdf {
            primary: primary_err,
            fallback: fallback_err,
        }),
    }
}

fn primary_pdf_text(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed streams
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err("pdf-extract panicked while parsing the document".to_string()),
    }
}

/// Rebuild document text page by page, in page order
fn fallback_pdf_text(bytes: &[u8]) -> Result<String, String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;

    let mut pages = Vec::new();
    for page_num in doc.get_pages().keys() {
        let text = doc
            .extract_text(&[*page_num])
            .map_err(|e| format!("page {page_num}: {e}"))?;
        pages.push(text);
    }

    Ok(pages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a small PDF with one line of text per page.
    fn sample_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn plain_text_is_decoded_verbatim() {
        let result = extract("hello wörld".as_bytes(), "notes.txt").unwrap();
        assert_eq!(result.text, "hello wörld");
        assert_eq!(result.char_count, 11);
    }

    #[test]
    fn invalid_utf8_is_dropped_not_replaced() {
        let bytes = [b'a', 0xff, 0xfe, b'b', 0xc3];
        let result = extract(&bytes, "blob.bin").unwrap();
        assert_eq!(result.text, "ab");
        assert!(result.text.len() <= bytes.len());
    }

    #[test]
    fn arbitrary_bytes_never_fail_and_never_grow() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let result = extract(&bytes, "").unwrap();
        assert!(result.text.len() <= bytes.len());
        assert!(result.char_count <= bytes.len());
    }

    #[test]
    fn pdf_hint_is_case_insensitive() {
        assert!(is_pdf("Report.PDF"));
        assert!(is_pdf("a.pdf"));
        assert!(!is_pdf("a.pdf.txt"));
    }

    #[test]
    fn primary_success_skips_fallback() {
        fn ok(_: &[u8]) -> Result<String, String> {
            Ok("primary".to_string())
        }
        fn unreachable(_: &[u8]) -> Result<String, String> {
            panic!("fallback must not run")
        }
        assert_eq!(extract_pdf_with(b"", ok, unreachable).unwrap(), "primary");
    }

    #[test]
    fn failing_primary_uses_lopdf_pages_in_order() {
        fn broken(_: &[u8]) -> Result<String, String> {
            Err("malformed stream".to_string())
        }
        let pdf = sample_pdf(&["First page", "Second page"]);

        let text = extract_pdf_with(&pdf, broken, fallback_pdf_text).unwrap();
        let first = text.find("First").expect("first page text");
        let second = text.find("Second").expect("second page text");
        assert!(first < second);
    }

    #[test]
    fn both_failures_surface_the_fallback_error() {
        fn broken(_: &[u8]) -> Result<String, String> {
            Err("primary broke".to_string())
        }
        fn also_broken(_: &[u8]) -> Result<String, String> {
            Err("fallback broke".to_string())
        }
        let err = extract_pdf_with(b"", broken, also_broken).unwrap_err();
        match err {
            ExtractError::Pdf { primary, fallback } => {
                assert_eq!(primary, "primary broke");
                assert_eq!(fallback, "fallback broke");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_pdf_is_an_extraction_error() {
        let err = extract(b"definitely not a pdf", "upload.pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf { .. }));
    }

    #[tokio::test]
    async fn blocking_extraction_matches_inline() {
        let result = extract_blocking(b"abc".to_vec(), "a.md".to_string())
            .await
            .unwrap();
        assert_eq!(result, extract(b"abc", "a.md").unwrap());
    }
}
