//! Word (OOXML) converter.

use crate::detect::MIME_DOCX;
use crate::error::{Error, Result};
use crate::model::{number_lines, ContentNode, ParsedContent, Table, TableRow};
use crate::paginate;
use crate::parser::package::Package;
use crate::parser::xml_tree::{self, XmlElement};
use crate::render::table_to_markdown;

use super::{ConvertOptions, DocumentConverter};

const FORMAT: &str = "DOCX";
const DOCUMENT_PART: &str = "word/document.xml";

/// `.docx` files: paragraphs and tables of the main document part in
/// document order.
///
/// Runs of one paragraph join into one line; each table becomes a markdown
/// table on its own lines. Non-empty lines are numbered across the document
/// and batched by line window.
#[derive(Debug, Clone, Default)]
pub struct DocxConverter {
    _private: (),
}

impl DocxConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for DocxConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_DOCX]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let mut package = Package::open(bytes.to_vec(), FORMAT)?;
        let xml = package.require_part(DOCUMENT_PART)?;
        let nodes = document_nodes(&xml)?;
        let content = fold_nodes(&nodes);

        let lines = number_lines(content.split('\n').filter(|l| !l.trim().is_empty()), 1);
        if lines.is_empty() {
            return Err(Error::extraction(FORMAT, "document body is empty"));
        }
        log::debug!("docx: {} nodes, {} lines", nodes.len(), lines.len());
        Ok(ParsedContent::new(
            content,
            paginate::by_line_window(lines, options.window()),
        ))
    }
}

/// Adapt `word/document.xml` into content nodes.
pub fn document_nodes(xml: &str) -> Result<Vec<ContentNode>> {
    let root = xml_tree::parse(xml, FORMAT)?;
    let body = root
        .child("w:body")
        .ok_or_else(|| Error::extraction(FORMAT, "missing w:body"))?;
    let mut nodes = Vec::new();
    adapt(body, None, &mut nodes);
    Ok(nodes)
}

fn adapt(el: &XmlElement, paragraph: Option<usize>, out: &mut Vec<ContentNode>) {
    for child in el.elements() {
        match child.name.as_str() {
            "w:tbl" => out.push(ContentNode::Table(read_table(child))),
            "w:p" => adapt(child, Some(child.id), out),
            "w:t" => {
                let text = child.text();
                if !text.is_empty() {
                    out.push(ContentNode::run(text, paragraph));
                }
            }
            // the fallback repeats the text of the chosen alternative
            "mc:Fallback" => {}
            _ => adapt(child, paragraph, out),
        }
    }
}

fn read_table(tbl: &XmlElement) -> Table {
    let mut table = Table::new();
    for tr in tbl.children_named("w:tr") {
        let cells = tr.children_named("w:tc").map(|tc| {
            tc.children_named("w:p")
                .map(|p| paragraph_text(p).trim().to_string())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        });
        table.add_row(TableRow::from_cells(cells));
    }
    table
}

fn paragraph_text(p: &XmlElement) -> String {
    let mut runs = Vec::new();
    p.find_all("w:t", &mut runs);
    runs.iter().map(|t| t.text()).collect()
}

/// Running state of the document fold.
#[derive(Debug, Default)]
struct Accumulator {
    text: String,
    container: Option<usize>,
}

impl Accumulator {
    fn push(mut self, node: &ContentNode) -> Self {
        match node {
            ContentNode::Text { text, container } => {
                let same_paragraph = container.is_some() && *container == self.container;
                if !same_paragraph && !self.text.is_empty() && !self.text.ends_with('\n') {
                    self.text.push('\n');
                }
                self.text.push_str(text);
                self.container = *container;
            }
            ContentNode::Table(table) => {
                if !self.text.is_empty() && !self.text.ends_with('\n') {
                    self.text.push('\n');
                }
                if !table.is_empty() {
                    self.text.push_str(&table_to_markdown(table));
                    self.text.push('\n');
                }
                self.container = None;
            }
            ContentNode::Group(children) => return children.iter().fold(self, Accumulator::push),
            ContentNode::ChartRef(_) => {}
        }
        self
    }
}

/// Fold nodes into the document text.
pub fn fold_nodes(nodes: &[ContentNode]) -> String {
    nodes.iter().fold(Accumulator::default(), Accumulator::push).text
}
