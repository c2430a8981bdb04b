//! Rendering: markdown tables, markup cleanup, JSON output, node visitors.

pub mod cleanup;
mod json;
mod markdown;
pub mod visitor;

pub use json::{to_json, Envelope, JsonFormat};
pub use markdown::{
    chart_block, chart_to_markdown, grid_to_markdown_lines, table_to_markdown,
    CHART_CATEGORY_HEADER, CHART_TITLE_PREFIX,
};
pub use visitor::{walk, ChartResolver, NoCharts, NodeVisitor, SlideCollector, VisitorAction};
