//! PowerPoint (OOXML) converter.

use std::collections::HashMap;

use crate::detect::MIME_PPTX;
use crate::error::{Error, Result};
use crate::model::{number_lines, Chart, ContentNode, PageContent, ParsedContent, Table, TableRow};
use crate::parser::chart::parse_chart;
use crate::parser::package::{part_number, resolve_target, Package, Relationship, REL_CHART};
use crate::parser::xml_tree::{self, XmlElement};
use crate::render::visitor::{walk, ChartResolver, SlideCollector};

use super::{ConvertOptions, DocumentConverter};

const FORMAT: &str = "PPTX";
const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// `.pptx` decks: one page per slide in slide-number order.
///
/// A slide's text is its paragraphs, tables and charts, one block per line
/// group. Charts are resolved through the slide's relationships; a chart
/// that cannot be found leaves a diagnostic line in its place.
#[derive(Debug, Clone, Default)]
pub struct PptxConverter {
    _private: (),
}

impl PptxConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PptxConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_PPTX]
    }

    fn name(&self) -> &str {
        "pptx"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, _options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let mut package = Package::open(bytes.to_vec(), FORMAT)?;

        let mut slides: Vec<(u32, String)> = package
            .part_names()
            .into_iter()
            .filter(|name| name.starts_with(SLIDE_PREFIX) && name.ends_with(".xml"))
            .filter_map(|name| part_number(&name).map(|n| (n, name)))
            .collect();
        slides.sort();
        log::debug!("pptx: {} slides", slides.len());

        let mut texts = Vec::with_capacity(slides.len());
        for (_, part) in &slides {
            let xml = package.require_part(part)?;
            let nodes = slide_nodes(&xml)?;
            let charts = SlideCharts::load(&mut package, part);
            let mut collector = SlideCollector::new(&charts);
            walk(&nodes, &mut collector);
            texts.push(collector.finish());
        }

        slides_to_content(texts, FORMAT)
    }
}

/// One page per slide text, lines numbered from 1 on every page.
pub(super) fn slides_to_content(texts: Vec<String>, format: &'static str) -> Result<ParsedContent> {
    if texts.is_empty() {
        return Err(Error::extraction(format, "presentation has no slides"));
    }
    let content = texts.join("\n");
    let pages = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let lines = if text.is_empty() {
                Vec::new()
            } else {
                number_lines(text.split('\n'), 1)
            };
            PageContent::new(i + 1, text, lines)
        })
        .collect();
    Ok(ParsedContent::new(content, pages))
}

/// Adapt a slide part into content nodes.
pub fn slide_nodes(xml: &str) -> Result<Vec<ContentNode>> {
    let root = xml_tree::parse(xml, FORMAT)?;
    let mut nodes = Vec::new();
    adapt(&root, &mut nodes);
    Ok(nodes)
}

fn adapt(el: &XmlElement, out: &mut Vec<ContentNode>) {
    for child in el.elements() {
        match child.name.as_str() {
            "a:p" => {
                let text = paragraph_text(child);
                if !text.trim().is_empty() {
                    out.push(ContentNode::text(text));
                }
            }
            "a:tbl" => out.push(ContentNode::Table(read_table(child))),
            "c:chart" => {
                if let Some(id) = child.attr("r:id") {
                    out.push(ContentNode::ChartRef(id.to_string()));
                }
            }
            "p:grpSp" => {
                let mut children = Vec::new();
                adapt(child, &mut children);
                out.push(ContentNode::Group(children));
            }
            "mc:Fallback" => {}
            _ => adapt(child, out),
        }
    }
}

fn paragraph_text(p: &XmlElement) -> String {
    let mut runs = Vec::new();
    p.find_all("a:t", &mut runs);
    runs.iter().map(|t| t.text()).collect()
}

fn read_table(tbl: &XmlElement) -> Table {
    let mut table = Table::new();
    for tr in tbl.children_named("a:tr") {
        let cells = tr.children_named("a:tc").map(|tc| {
            let mut paragraphs = Vec::new();
            tc.find_all("a:p", &mut paragraphs);
            paragraphs
                .iter()
                .map(|p| paragraph_text(p).trim().to_string())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        });
        table.add_row(TableRow::from_cells(cells));
    }
    table
}

/// A chart part's XML, or why it could not be read.
type ChartPart = std::result::Result<String, String>;

/// Chart parts reachable from one slide, read up front.
struct SlideCharts {
    rels: HashMap<String, Relationship>,
    slide_part: String,
    parts: HashMap<String, ChartPart>,
}

impl SlideCharts {
    /// Read failures are kept per chart and surface when that chart is
    /// resolved. A broken relationship part leaves the slide without charts.
    fn load(package: &mut Package, slide_part: &str) -> Self {
        let rels = package.relationships(slide_part).unwrap_or_else(|e| {
            log::warn!("{}: ignoring relationships: {}", slide_part, e);
            HashMap::new()
        });
        let mut parts = HashMap::new();
        for rel in rels.values().filter(|r| r.is_type(REL_CHART) && !r.external) {
            let path = resolve_target(slide_part, &rel.target);
            match package.read_part(&path) {
                Ok(Some(xml)) => {
                    parts.insert(path, Ok(xml));
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("{}: {}", path, e);
                    parts.insert(path, Err(e.to_string()));
                }
            }
        }
        Self {
            rels,
            slide_part: slide_part.to_string(),
            parts,
        }
    }
}

impl ChartResolver for SlideCharts {
    fn resolve_chart(&self, rel_id: &str) -> Result<Chart> {
        let rel = self
            .rels
            .get(rel_id)
            .filter(|r| r.is_type(REL_CHART))
            .ok_or_else(|| {
                Error::UnresolvedReference(format!("未找到对应的图表 XML: {}", rel_id))
            })?;
        let path = resolve_target(&self.slide_part, &rel.target);
        match self.parts.get(&path) {
            Some(Ok(xml)) => parse_chart(xml),
            Some(Err(message)) => Err(Error::extraction(FORMAT, message.clone())),
            None => Err(Error::UnresolvedReference(format!("图表文件缺失: {}", path))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = r#"<p:sld xmlns:p="p" xmlns:a="a" xmlns:c="c" xmlns:r="r"><p:cSld><p:spTree>
<p:sp><p:txBody><a:p><a:r><a:t>Title</a:t></a:r><a:r><a:t> here</a:t></a:r></a:p><a:p/></p:txBody></p:sp>
<p:grpSp><p:sp><p:txBody><a:p><a:r><a:t>Grouped</a:t></a:r></a:p></p:txBody></p:sp></p:grpSp>
<p:graphicFrame><a:graphic><a:graphicData><a:tbl>
  <a:tr><a:tc><a:txBody><a:p><a:r><a:t>K</a:t></a:r></a:p></a:txBody></a:tc><a:tc><a:txBody><a:p><a:r><a:t>V</a:t></a:r></a:p></a:txBody></a:tc></a:tr>
</a:tbl></a:graphicData></a:graphic></p:graphicFrame>
<p:graphicFrame><a:graphic><a:graphicData><c:chart r:id="rId9"/></a:graphicData></a:graphic></p:graphicFrame>
</p:spTree></p:cSld></p:sld>"#;

    #[test]
    fn test_slide_nodes() {
        let nodes = slide_nodes(SLIDE).unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0], ContentNode::text("Title here"));
        assert_eq!(nodes[1], ContentNode::Group(vec![ContentNode::text("Grouped")]));
        assert!(matches!(&nodes[2], ContentNode::Table(t) if t.rows[0].cells == vec!["K", "V"]));
        assert_eq!(nodes[3], ContentNode::ChartRef("rId9".into()));
    }

    #[test]
    fn test_unresolved_chart_becomes_diagnostic() {
        let charts = SlideCharts {
            rels: HashMap::new(),
            slide_part: "ppt/slides/slide1.xml".into(),
            parts: HashMap::new(),
        };
        let nodes = slide_nodes(SLIDE).unwrap();
        let mut collector = SlideCollector::new(&charts);
        walk(&nodes, &mut collector);
        assert_eq!(
            collector.finish(),
            "Title here\nGrouped\n| K | V |\n| --- | --- |\n未找到对应的图表 XML: rId9"
        );
    }

    #[test]
    fn test_missing_chart_part() {
        let mut rels = HashMap::new();
        rels.insert(
            "rId9".to_string(),
            Relationship {
                id: "rId9".into(),
                rel_type: "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart".into(),
                target: "../charts/chart3.xml".into(),
                external: false,
            },
        );
        let charts = SlideCharts {
            rels,
            slide_part: "ppt/slides/slide1.xml".into(),
            parts: HashMap::new(),
        };
        let err = charts.resolve_chart("rId9").unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(ref m) if m == "图表文件缺失: ppt/charts/chart3.xml"));
    }

    #[test]
    fn test_unreadable_chart_part() {
        let mut rels = HashMap::new();
        rels.insert(
            "rId2".to_string(),
            Relationship {
                id: "rId2".into(),
                rel_type: "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart".into(),
                target: "../charts/chart1.xml".into(),
                external: false,
            },
        );
        let mut parts = HashMap::new();
        parts.insert("ppt/charts/chart1.xml".to_string(), Err("invalid deflate stream".to_string()));
        let charts = SlideCharts {
            rels,
            slide_part: "ppt/slides/slide1.xml".into(),
            parts,
        };

        let nodes = vec![ContentNode::text("Hello"), ContentNode::ChartRef("rId2".into())];
        let mut collector = SlideCollector::new(&charts);
        walk(&nodes, &mut collector);
        let text = collector.finish();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Hello");
        assert!(lines[1].starts_with("图表解析失败: "));
        assert!(lines[1].contains("invalid deflate stream"));
    }

    #[test]
    fn test_slides_to_content() {
        let parsed = slides_to_content(vec!["a\nb".into(), "c".into()], FORMAT).unwrap();
        assert_eq!(parsed.content, "a\nb\nc");
        assert_eq!(parsed.pages[1].page_number, 2);
        assert_eq!(parsed.pages[1].lines[0].line_number, 1);
        assert!(slides_to_content(Vec::new(), FORMAT).is_err());
    }
}
