//! Plain-text converter.

use crate::detect::MIME_TEXT;
use crate::error::Result;
use crate::model::{number_lines, ParsedContent};
use crate::paginate;
use crate::parser::encoding;

use super::{ConvertOptions, DocumentConverter};

/// Plain text: one line per source line, batched by line window.
///
/// Line numbers run across the whole document. `content` is the decoded
/// file text as-is.
#[derive(Debug, Clone, Default)]
pub struct TextConverter {
    _private: (),
}

impl TextConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for TextConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_TEXT]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let text = encoding::decode_text(bytes).text;
        let lines = number_lines(text.lines().map(str::trim), 1);
        let pages = paginate::by_line_window(lines, options.window());
        Ok(ParsedContent::new(text, pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_windows() {
        let body: String = (1..=120).map(|i| format!("line {}\n", i)).collect();
        let parsed = TextConverter::new()
            .convert_bytes(body.as_bytes(), MIME_TEXT, &ConvertOptions::default())
            .unwrap();

        let sizes: Vec<usize> = parsed.pages.iter().map(|p| p.lines.len()).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
        assert_eq!(parsed.pages[2].page_number, 3);
        assert_eq!(parsed.pages[1].lines[0].line_number, 51);
        assert_eq!(parsed.content, body);
    }

    #[test]
    fn test_keeps_blank_lines_and_trims() {
        let parsed = TextConverter::new()
            .convert_bytes(b"  a  \r\n\r\nb", MIME_TEXT, &ConvertOptions::default())
            .unwrap();
        let texts: Vec<&str> = parsed.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "", "b"]);
    }

    #[test]
    fn test_utf16_input() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend("héllo\nwörld".encode_utf16().flat_map(|u| u.to_le_bytes()));
        let parsed = TextConverter::new()
            .convert_bytes(&bytes, MIME_TEXT, &ConvertOptions::default())
            .unwrap();
        assert_eq!(parsed.pages[0].text, "héllo\nwörld");
    }
}
