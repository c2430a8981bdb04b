//! Pagination strategies.
//!
//! Each converter picks one of these explicitly. They are kept separate
//! because their page boundaries and page texts differ observably.

use crate::model::{LineContent, PageContent};

/// Default window for line-batched formats.
pub const DEFAULT_LINES_PER_PAGE: usize = 50;

/// Default window when spreadsheet rows are re-batched.
pub const DEFAULT_SHEET_LINES_PER_PAGE: usize = 10;

/// Batch lines into pages of at most `lines_per_page` lines.
///
/// Pages are numbered from 1. The final page is emitted even when short.
/// Page text is the newline-join of the trimmed line texts. A window of 0
/// is treated as 1.
pub fn by_line_window(lines: Vec<LineContent>, lines_per_page: usize) -> Vec<PageContent> {
    window(lines, lines_per_page, 1, "\n")
}

/// Same batching as [`by_line_window`], numbering pages from `first_page`.
pub fn by_line_window_from(
    lines: Vec<LineContent>,
    lines_per_page: usize,
    first_page: usize,
) -> Vec<PageContent> {
    window(lines, lines_per_page, first_page, "\n")
}

/// Line-window batching whose page text joins lines with a single space.
///
/// Used for Markdown, where a page reads as one run of prose.
pub fn by_line_window_spaced(lines: Vec<LineContent>, lines_per_page: usize) -> Vec<PageContent> {
    window(lines, lines_per_page, 1, " ")
}

/// Put every line on page 1, newline-joined.
pub fn single_page(lines: Vec<LineContent>) -> Vec<PageContent> {
    vec![PageContent::from_lines(1, lines)]
}

fn window(
    lines: Vec<LineContent>,
    lines_per_page: usize,
    first_page: usize,
    joiner: &str,
) -> Vec<PageContent> {
    let size = lines_per_page.max(1);
    let mut pages = Vec::with_capacity(lines.len().div_ceil(size));
    let mut current: Vec<LineContent> = Vec::with_capacity(size);

    for line in lines {
        current.push(line);
        if current.len() == size {
            let batch = std::mem::replace(&mut current, Vec::with_capacity(size));
            pages.push(make_page(first_page + pages.len(), batch, joiner));
        }
    }
    if !current.is_empty() {
        pages.push(make_page(first_page + pages.len(), current, joiner));
    }
    pages
}

fn make_page(page_number: usize, lines: Vec<LineContent>, joiner: &str) -> PageContent {
    let text = lines
        .iter()
        .map(|l| l.text.trim())
        .collect::<Vec<_>>()
        .join(joiner);
    PageContent::new(page_number, text, lines)
}
