//! PDF document converter implementation.

use rayon::prelude::*;

use crate::detect::MIME_PDF;
use crate::error::Result;
use crate::model::{number_lines, PageContent, ParsedContent};
use crate::parser::{extract_page_spans, group_into_lines, LopdfBackend, PageId, PdfBackend};

use super::{ConvertOptions, DocumentConverter};

/// PDF document converter.
///
/// One page per native PDF page. Fragments are grouped into lines by
/// baseline proximity, lines run top to bottom and are numbered from 1 on
/// every page. Pages are extracted in parallel when
/// [`ConvertOptions::parallel`] is set and reassembled in page order.
#[derive(Debug, Clone, Default)]
pub struct PdfConverter {
    _private: (),
}

impl PdfConverter {
    /// Create a new PDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_PDF]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let backend = LopdfBackend::load_bytes(bytes)?;
        Ok(ParsedContent::from_pages(extract_pages(&backend, options.parallel)))
    }
}

/// Extract every page of a document in page order.
pub fn extract_pages<B: PdfBackend + ?Sized>(backend: &B, parallel: bool) -> Vec<PageContent> {
    let pages: Vec<(u32, PageId)> = backend.pages().into_iter().collect();
    log::debug!("pdf: {} pages", pages.len());

    if parallel {
        pages
            .par_iter()
            .map(|&(number, id)| extract_page(backend, number, id))
            .collect()
    } else {
        pages
            .iter()
            .map(|&(number, id)| extract_page(backend, number, id))
            .collect()
    }
}

/// A page that fails to decode is kept as a blank page.
fn extract_page<B: PdfBackend + ?Sized>(backend: &B, number: u32, id: PageId) -> PageContent {
    let page_number = number as usize;
    match extract_page_spans(backend, id) {
        Ok(spans) => {
            let texts = group_into_lines(spans)
                .iter()
                .map(|line| line.text())
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>();
            PageContent::from_lines(page_number, number_lines(texts, 1))
        }
        Err(e) => {
            log::warn!("Failed to extract text from page {}: {}", number, e);
            PageContent::new(page_number, "", Vec::new())
        }
    }
}
