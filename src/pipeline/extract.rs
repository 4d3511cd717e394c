//! Page-capped text extraction via `lopdf`.
//!
//! The cap bounds both decode latency and the size of the prompt sent to
//! the completion service. Pages beyond the cap are never decoded — not
//! decoded-then-discarded — so a 400-page annual report costs the same as
//! a two-page excerpt.
//!
//! Extraction is deliberately literal: pages are concatenated in page
//! order with no normalisation beyond what the decoder itself performs.
//! An unreadable document is an error, never an empty success; emptiness
//! of a *readable* document is judged by the caller (see
//! [`crate::error::AuditError::EmptyExtraction`]).

use crate::error::AuditError;
use lopdf::Document;
use tracing::debug;

/// Text recovered from a capped read of the document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Concatenated page text, in page order.
    pub text: String,
    /// Total pages in the document.
    pub page_count: usize,
    /// Pages actually decoded (`min(page_count, max_pages)`).
    pub pages_used: usize,
}

impl Extraction {
    /// Characters of extracted text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// True when no usable text was recovered.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Decode text from the first `max_pages` pages of a PDF payload.
///
/// Synchronous — lopdf does no async I/O. Async entry points run this
/// under `spawn_blocking`.
pub fn extract_text(bytes: &[u8], max_pages: usize) -> Result<Extraction, AuditError> {
    let doc = Document::load_mem(bytes).map_err(|e| AuditError::CorruptPdf {
        detail: e.to_string(),
    })?;

    if doc.is_encrypted() {
        return Err(AuditError::CorruptPdf {
            detail: "document is encrypted".into(),
        });
    }

    // BTreeMap keys are the 1-indexed page numbers, already in page order.
    let pages = doc.get_pages();
    let page_count = pages.len();
    let selected: Vec<u32> = pages.keys().copied().take(max_pages).collect();
    let pages_used = selected.len();

    let mut text = String::new();
    for &page in &selected {
        let page_text =
            doc.extract_text(&[page])
                .map_err(|e| AuditError::ExtractionFailed {
                    page,
                    detail: e.to_string(),
                })?;
        text.push_str(&page_text);
    }

    debug!(
        "Extracted {} chars from {}/{} pages",
        text.chars().count(),
        pages_used,
        page_count
    );

    Ok(Extraction {
        text,
        page_count,
        pages_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a minimal text-bearing PDF with one page per entry in `pages`.
    fn make_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let kids_len = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => kids_len,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn five_page_document_is_capped_at_two_pages_in_order() {
        let bytes = make_pdf(&["alpha one", "bravo two", "charlie three", "delta", "echo"]);
        let ex = extract_text(&bytes, 2).unwrap();

        assert_eq!(ex.page_count, 5);
        assert_eq!(ex.pages_used, 2);
        assert!(ex.text.contains("alpha one"));
        assert!(ex.text.contains("bravo two"));
        assert!(!ex.text.contains("charlie"), "page 3 must never be decoded");
        // Page order preserved
        let a = ex.text.find("alpha").unwrap();
        let b = ex.text.find("bravo").unwrap();
        assert!(a < b);
    }

    #[test]
    fn one_page_document_uses_its_single_page() {
        let bytes = make_pdf(&["Scope 1: 500 tCO2e"]);
        let ex = extract_text(&bytes, 2).unwrap();
        assert_eq!(ex.page_count, 1);
        assert_eq!(ex.pages_used, 1);
        assert!(ex.text.contains("Scope 1: 500 tCO2e"));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let err = extract_text(b"%PDF-1.5 but then garbage", 2).unwrap_err();
        assert!(matches!(err, AuditError::CorruptPdf { .. }), "got {err:?}");
    }

    #[test]
    fn blank_page_extracts_as_blank_not_error() {
        let bytes = make_pdf(&["   "]);
        let ex = extract_text(&bytes, 2).unwrap();
        assert!(ex.is_blank());
    }

    #[test]
    fn cap_of_one_reads_only_first_page() {
        let bytes = make_pdf(&["first", "second"]);
        let ex = extract_text(&bytes, 1).unwrap();
        assert_eq!(ex.pages_used, 1);
        assert!(ex.text.contains("first"));
        assert!(!ex.text.contains("second"));
    }
}
