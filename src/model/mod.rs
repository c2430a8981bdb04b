//! Document model types.
//!
//! `ParsedContent` is the normalized output every converter produces. Tables,
//! charts and content nodes are the intermediate representation office
//! converters build before folding into lines.

mod chart;
mod content;
mod node;
mod table;

pub use chart::{Chart, ChartPoint, ChartSeries};
pub use content::{number_lines, LineContent, PageContent, ParsedContent};
pub use node::ContentNode;
pub use table::{Grid, GridCell, Table, TableRow};
