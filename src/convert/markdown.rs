//! Markdown converter.

use pulldown_cmark::{html, Options, Parser};

use crate::detect::MIME_MARKDOWN;
use crate::error::Result;
use crate::model::{number_lines, ParsedContent};
use crate::paginate;
use crate::parser::encoding;
use crate::render::cleanup::{decode_entities, expand_markdown_extensions, strip_tags};

use super::{ConvertOptions, DocumentConverter};

/// Markdown rendered to HTML and reduced back to plain text.
///
/// Pages hold up to the line window of trimmed lines; a page's text joins
/// them with single spaces. `content` is the whole plain text.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    _private: (),
}

impl MarkdownConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for MarkdownConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_MARKDOWN]
    }

    fn name(&self) -> &str {
        "markdown"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let source = encoding::decode_text(bytes).text;
        let plain = markdown_to_plain(&source, options.markdown_extensions);
        let lines = number_lines(plain.split('\n').map(str::trim), 1);
        let pages = paginate::by_line_window_spaced(lines, options.window());
        Ok(ParsedContent::new(plain, pages))
    }
}

/// Render Markdown to HTML, then strip the tags.
pub fn markdown_to_plain(source: &str, extensions: bool) -> String {
    let source = if extensions {
        expand_markdown_extensions(source)
    } else {
        source.to_string()
    };

    let mut parser_options = Options::empty();
    parser_options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(&source, parser_options);

    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, parser);

    decode_entities(&strip_tags(&rendered)).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_plain() {
        let plain = markdown_to_plain("# Title\n\nSome *emphasis* & ~~old~~ ==hot==\n\n- one\n- two\n", true);
        assert_eq!(plain, "Title\nSome emphasis & old hot\n\none\ntwo");
    }

    #[test]
    fn test_extensions_disabled_keep_markers() {
        let plain = markdown_to_plain("==hot==", false);
        assert_eq!(plain, "==hot==");
    }

    #[test]
    fn test_pages_are_space_joined() {
        let source: String = (1..=4).map(|i| format!("line{}  \n", i)).collect();
        let parsed = MarkdownConverter::new()
            .convert_bytes(
                source.as_bytes(),
                MIME_MARKDOWN,
                &ConvertOptions::new().with_lines_per_page(2),
            )
            .unwrap();
        assert_eq!(parsed.page_count(), 2);
        assert_eq!(parsed.pages[0].text, "line1 line2");
        assert_eq!(parsed.pages[1].lines[1].line_number, 4);
    }
}
