//! Word 97-2003 converter.

use crate::detect::MIME_DOC;
use crate::error::{Error, Result};
use crate::model::{number_lines, ParsedContent};
use crate::paginate;
use crate::parser::word_binary;

use super::{ConvertOptions, DocumentConverter};

/// Legacy `.doc` files: body text split into non-empty lines, batched by
/// line window with running line numbers.
#[derive(Debug, Clone, Default)]
pub struct DocConverter {
    _private: (),
}

impl DocConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for DocConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_DOC]
    }

    fn name(&self) -> &str {
        "doc"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let body = word_binary::extract_text(bytes.to_vec())?;
        paginate_body(&body, options.window())
    }
}

fn paginate_body(body: &str, window: usize) -> Result<ParsedContent> {
    let lines = number_lines(
        body.split('\n')
            .map(|l| l.trim_end())
            .filter(|l| !l.trim().is_empty()),
        1,
    );
    if lines.is_empty() {
        return Err(Error::extraction("DOC", "document body is empty"));
    }
    Ok(ParsedContent::new(
        body.trim().to_string(),
        paginate::by_line_window(lines, window),
    ))
}
