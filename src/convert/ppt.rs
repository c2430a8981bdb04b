//! PowerPoint 97-2003 converter.

use crate::detect::MIME_PPT;
use crate::error::Result;
use crate::model::ParsedContent;
use crate::parser::ppt_binary;
use crate::render::visitor::{walk, NoCharts, SlideCollector};

use super::pptx::slides_to_content;
use super::{ConvertOptions, DocumentConverter};

const FORMAT: &str = "PPT";

/// Legacy `.ppt` decks: slide text atoms grouped per slide, one page per
/// slide, laid out like `.pptx` slides.
#[derive(Debug, Clone, Default)]
pub struct PptConverter {
    _private: (),
}

impl PptConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PptConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_PPT]
    }

    fn name(&self) -> &str {
        "ppt"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, _options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let texts = ppt_binary::read_slides(bytes.to_vec())?
            .iter()
            .map(|nodes| {
                let mut collector = SlideCollector::new(&NoCharts);
                walk(nodes, &mut collector);
                collector.finish()
            })
            .collect();
        slides_to_content(texts, FORMAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_rejects_non_ole() {
        let err = PptConverter::new()
            .convert_bytes(b"PK\x03\x04", MIME_PPT, &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { format: "PPT", .. }));
    }

    #[test]
    fn test_mime_mismatch() {
        let err = PptConverter::new()
            .convert_bytes(b"", "application/pdf", &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
