//! XML converter: text content, one node's text per line.

use crate::detect::{MIME_TEXT_XML, MIME_XML};
use crate::error::Result;
use crate::model::{number_lines, ParsedContent};
use crate::paginate;
use crate::parser::encoding;
use crate::parser::xml_tree::{self, XmlElement, XmlNode};

use super::{ConvertOptions, DocumentConverter};

const FORMAT: &str = "XML";

/// XML documents reduced to their character data.
///
/// Text nodes are emitted depth-first; attribute values and
/// whitespace-only text are skipped. Multi-line text nodes contribute one
/// line per non-empty source line.
#[derive(Debug, Clone, Default)]
pub struct XmlConverter {
    _private: (),
}

impl XmlConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for XmlConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_XML, MIME_TEXT_XML]
    }

    fn name(&self) -> &str {
        "xml"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let text = encoding::decode_text(bytes).text;
        let root = xml_tree::parse(text.trim_start_matches('\u{FEFF}'), FORMAT)?;

        let mut texts = Vec::new();
        collect_texts(&root, &mut texts);
        let content = texts.join("\n");

        let lines = number_lines(
            content
                .split('\n')
                .filter(|l| !l.trim().is_empty())
                .map(str::trim),
            1,
        );
        let pages = paginate::by_line_window(lines, options.window());
        Ok(ParsedContent::new(content, pages))
    }
}

fn collect_texts(el: &XmlElement, out: &mut Vec<String>) {
    for child in &el.children {
        match child {
            XmlNode::Text(t) if !t.trim().is_empty() => out.push(t.trim().to_string()),
            XmlNode::Text(_) => {}
            XmlNode::Element(e) => collect_texts(e, out),
        }
    }
}
