//! Visitor over office content nodes.
//!
//! Tree adapters produce [`ContentNode`]s; [`walk`] drives a [`NodeVisitor`]
//! over them in document order, descending into groups.
//!
//! # Example
//!
//! ```
//! use docnorm::model::{ContentNode, Table};
//! use docnorm::render::visitor::{walk, NodeVisitor, VisitorAction};
//!
//! #[derive(Default)]
//! struct CountTables(usize);
//!
//! impl NodeVisitor for CountTables {
//!     fn visit_table(&mut self, _table: &Table) -> VisitorAction {
//!         self.0 += 1;
//!         VisitorAction::Continue
//!     }
//! }
//!
//! let nodes = vec![
//!     ContentNode::text("intro"),
//!     ContentNode::Group(vec![ContentNode::Table(Table::new())]),
//! ];
//! let mut counter = CountTables::default();
//! walk(&nodes, &mut counter);
//! assert_eq!(counter.0, 1);
//! ```

use crate::error::{Error, Result};
use crate::model::{Chart, ContentNode, Table};

use super::markdown::{chart_block, table_to_markdown};

/// Diagnostic emitted when a chart part carries no series.
pub const CHART_NO_DATA: &str = "未找到图表数据";

/// Action returned by visitor methods to steer the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Keep walking.
    #[default]
    Continue,

    /// Do not descend into this group.
    SkipChildren,

    /// Abort the walk.
    Stop,
}

/// Callbacks for each node kind. All default to `Continue`.
pub trait NodeVisitor {
    /// Called for each text node.
    fn visit_text(&mut self, text: &str, container: Option<usize>) -> VisitorAction {
        let _ = (text, container);
        VisitorAction::Continue
    }

    /// Called for each table.
    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        let _ = table;
        VisitorAction::Continue
    }

    /// Called for each chart reference.
    fn visit_chart_ref(&mut self, rel_id: &str) -> VisitorAction {
        let _ = rel_id;
        VisitorAction::Continue
    }

    /// Called before a group's children.
    fn enter_group(&mut self, children: &[ContentNode]) -> VisitorAction {
        let _ = children;
        VisitorAction::Continue
    }

    /// Called after a group's children (not called when skipped).
    fn leave_group(&mut self) {}
}

/// Walk nodes depth-first in order. Returns `Stop` if the visitor stopped.
pub fn walk<V: NodeVisitor + ?Sized>(nodes: &[ContentNode], visitor: &mut V) -> VisitorAction {
    for node in nodes {
        let action = match node {
            ContentNode::Text { text, container } => visitor.visit_text(text, *container),
            ContentNode::Table(table) => visitor.visit_table(table),
            ContentNode::ChartRef(id) => visitor.visit_chart_ref(id),
            ContentNode::Group(children) => match visitor.enter_group(children) {
                VisitorAction::Continue => {
                    let inner = walk(children, visitor);
                    if inner == VisitorAction::Stop {
                        return VisitorAction::Stop;
                    }
                    visitor.leave_group();
                    VisitorAction::Continue
                }
                other => other,
            },
        };
        if action == VisitorAction::Stop {
            return VisitorAction::Stop;
        }
    }
    VisitorAction::Continue
}

/// Resolves chart references to chart data.
///
/// Unresolvable references are reported as [`Error::UnresolvedReference`]
/// carrying the diagnostic text to show in place of the chart.
pub trait ChartResolver {
    fn resolve_chart(&self, rel_id: &str) -> Result<Chart>;
}

/// Resolver for sources that cannot carry charts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCharts;

impl ChartResolver for NoCharts {
    fn resolve_chart(&self, rel_id: &str) -> Result<Chart> {
        Err(Error::UnresolvedReference(format!(
            "未找到对应的图表 XML: {}",
            rel_id
        )))
    }
}

/// Collects a slide's text blocks: one per text node, one per table, and
/// the title/table/diagnostic blocks of each chart.
pub struct SlideCollector<'a> {
    charts: &'a dyn ChartResolver,
    blocks: Vec<String>,
}

impl<'a> SlideCollector<'a> {
    /// Create a collector resolving charts through `charts`.
    pub fn new(charts: &'a dyn ChartResolver) -> Self {
        Self {
            charts,
            blocks: Vec::new(),
        }
    }

    /// Slide text: blocks joined by newlines.
    pub fn finish(self) -> String {
        self.blocks.join("\n")
    }
}

impl NodeVisitor for SlideCollector<'_> {
    fn visit_text(&mut self, text: &str, _container: Option<usize>) -> VisitorAction {
        let text = text.trim();
        if !text.is_empty() {
            self.blocks.push(text.to_string());
        }
        VisitorAction::Continue
    }

    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        if !table.is_empty() {
            self.blocks.push(table_to_markdown(table));
        }
        VisitorAction::Continue
    }

    fn visit_chart_ref(&mut self, rel_id: &str) -> VisitorAction {
        match self.charts.resolve_chart(rel_id) {
            Ok(chart) => {
                if chart.is_empty() {
                    if let Some(title) = chart.title.as_deref() {
                        self.blocks
                            .push(format!("{}{}", super::markdown::CHART_TITLE_PREFIX, title));
                    }
                    self.blocks.push(CHART_NO_DATA.to_string());
                } else {
                    self.blocks.extend(chart_block(&chart));
                }
            }
            Err(Error::UnresolvedReference(note)) => {
                log::warn!("chart {} unresolved: {}", rel_id, note);
                self.blocks.push(note);
            }
            Err(e) => {
                log::warn!("chart {} could not be read: {}", rel_id, e);
                self.blocks.push(format!("图表解析失败: {}", e));
            }
        }
        VisitorAction::Continue
    }
}
