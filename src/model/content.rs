//! Normalized output types.

use serde::{Deserialize, Serialize};

/// Paginated text extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedContent {
    /// Display name of the source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Path the file was read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Declared MIME type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Full document text
    pub content: String,

    /// Pages in document order
    pub pages: Vec<PageContent>,
}

impl ParsedContent {
    /// Create a result from its pages and full text.
    pub fn new(content: impl Into<String>, pages: Vec<PageContent>) -> Self {
        Self {
            content: content.into(),
            pages,
            ..Default::default()
        }
    }

    /// Create a result whose content is the newline-join of the page texts.
    pub fn from_pages(pages: Vec<PageContent>) -> Self {
        let content = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(content, pages)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of lines across all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    /// Iterate over every line in page order.
    pub fn lines(&self) -> impl Iterator<Item = &LineContent> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    /// Check if no text was extracted.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.lines.is_empty())
    }
}

/// One page of normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// Page number (1-indexed)
    pub page_number: usize,

    /// Page text, derived from `lines`
    pub text: String,

    /// Lines in reading order
    pub lines: Vec<LineContent>,
}

impl PageContent {
    /// Create a page with the given text and lines.
    pub fn new(page_number: usize, text: impl Into<String>, lines: Vec<LineContent>) -> Self {
        Self {
            page_number,
            text: text.into(),
            lines,
        }
    }

    /// Create a page whose text is the newline-join of its lines.
    pub fn from_lines(page_number: usize, lines: Vec<LineContent>) -> Self {
        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(page_number, text, lines)
    }
}

/// One line of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineContent {
    /// Line number (1-indexed; per page or per document depending on format)
    pub line_number: usize,

    /// Line text
    pub text: String,
}

impl LineContent {
    /// Create a new line.
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
        }
    }
}

/// Number lines sequentially starting at `first`.
pub fn number_lines<I, S>(texts: I, first: usize) -> Vec<LineContent>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(i, t)| LineContent::new(first + i, t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_camel_case() {
        let page = PageContent::from_lines(1, vec![LineContent::new(1, "hello")]);
        let content = ParsedContent::from_pages(vec![page]);
        let json = serde_json::to_string(&content).unwrap();
        assert!(json.contains("\"pageNumber\":1"));
        assert!(json.contains("\"lineNumber\":1"));
        assert!(!json.contains("fileName"));
    }

    #[test]
    fn test_from_pages_joins_text() {
        let pages = vec![
            PageContent::from_lines(1, number_lines(["a", "b"], 1)),
            PageContent::from_lines(2, number_lines(["c"], 1)),
        ];
        let content = ParsedContent::from_pages(pages);
        assert_eq!(content.content, "a\nb\nc");
        assert_eq!(content.line_count(), 3);
        assert!(!content.is_empty());
    }
}
