//! HTML converter.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Node, Selector};

use crate::detect::MIME_HTML;
use crate::error::{Error, Result};
use crate::model::{LineContent, ParsedContent};
use crate::paginate;
use crate::parser::encoding;
use crate::render::cleanup::html_to_plain;

use super::{ConvertOptions, DocumentConverter};

const FORMAT: &str = "HTML";

/// Elements whose direct text is merged into the preceding line.
const INLINE_ELEMENTS: &[&str] = &["span", "a", "b", "i", "strong", "em", "abbr", "img"];

/// Elements whose content is never text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// HTML documents as a single page of lines.
///
/// The body is walked depth-first with an explicit stack:
/// - text nodes become lines, each distinct text emitted once per document
/// - a `tr` becomes one `| cell | cell |` line and its cells are not
///   visited again
/// - inline elements append their direct text to the previous line
/// - any other element bumps the line counter, so line numbers mark block
///   boundaries rather than count lines
///
/// `content` joins the lines with blank lines between them.
#[derive(Debug, Clone, Default)]
pub struct HtmlConverter {
    _private: (),
}

impl HtmlConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for HtmlConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_HTML]
    }

    fn name(&self) -> &str {
        "html"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, _options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let text = encoding::decode_text(bytes).text;
        let lines = extract_lines(&text)?;
        let content = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(ParsedContent::new(content, paginate::single_page(lines)))
    }
}

enum Item<'a> {
    Text(&'a str),
    Element(ElementRef<'a>),
}

fn child_items<'a>(el: ElementRef<'a>) -> Vec<Item<'a>> {
    el.children()
        .filter_map(|child| match child.value() {
            Node::Text(t) => Some(Item::Text(&**t)),
            Node::Element(_) => ElementRef::wrap(child).map(Item::Element),
            _ => None,
        })
        .collect()
}

/// Trimmed, non-empty direct text children of `el`.
fn direct_texts(el: ElementRef<'_>) -> Vec<&str> {
    child_items(el)
        .into_iter()
        .filter_map(|item| match item {
            Item::Text(t) => Some(t.trim()).filter(|t| !t.is_empty()),
            Item::Element(_) => None,
        })
        .collect()
}

/// A cell's direct text, or the plain text of its inline children when it
/// has none.
fn cell_text(cell: ElementRef<'_>) -> String {
    let direct = direct_texts(cell).concat();
    if direct.is_empty() {
        html_to_plain(&cell.inner_html())
    } else {
        direct
    }
}

fn row_line(tr: ElementRef<'_>) -> String {
    let mut row = String::from("|");
    for item in child_items(tr) {
        match item {
            Item::Text(t) => {
                let t = t.trim();
                if !t.is_empty() {
                    row.push_str(&format!(" {} |", t));
                }
            }
            Item::Element(cell) => {
                row.push_str(&format!(" {} |", cell_text(cell)));
            }
        }
    }
    row
}

/// Walk the document body into numbered lines.
pub fn extract_lines(html: &str) -> Result<Vec<LineContent>> {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("body").expect("static selector");
    let body = document
        .select(&body_selector)
        .next()
        .ok_or_else(|| Error::extraction(FORMAT, "no <body> element"))?;

    let mut lines: Vec<LineContent> = Vec::new();
    let mut line_number = 1usize;
    let mut seen: HashSet<String> = HashSet::new();
    let mut visited = HashSet::new();

    let mut stack = child_items(body);
    stack.reverse();

    while let Some(item) = stack.pop() {
        let el = match item {
            Item::Text(t) => {
                let t = t.trim();
                if !t.is_empty() && seen.insert(t.to_string()) {
                    lines.push(LineContent::new(line_number, t));
                }
                continue;
            }
            Item::Element(el) => el,
        };
        if !visited.insert(el.id()) {
            continue;
        }

        let name = el.value().name();
        match name {
            "tr" => {
                lines.push(LineContent::new(line_number, row_line(el).trim()));
                line_number += 1;
                continue;
            }
            "td" | "th" => continue,
            n if SKIPPED_ELEMENTS.contains(&n) => continue,
            n if INLINE_ELEMENTS.contains(&n) => {
                let inline = direct_texts(el).join(" ");
                if !inline.is_empty() {
                    seen.insert(inline.clone());
                    match lines.last_mut() {
                        Some(last) => {
                            last.text.push(' ');
                            last.text.push_str(&inline);
                        }
                        None => lines.push(LineContent::new(line_number, inline)),
                    }
                }
            }
            _ => line_number += 1,
        }

        let mut children = child_items(el);
        children.reverse();
        stack.extend(children);
    }

    Ok(lines)
}
