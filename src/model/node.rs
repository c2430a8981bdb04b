//! Content nodes produced by the office tree adapters.

use super::Table;

/// One unit of office document content in reading order.
///
/// Tree adapters turn format-specific XML (or binary records) into a flat or
/// nested sequence of these; a single [`NodeVisitor`](crate::render::NodeVisitor)
/// then folds them into lines.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    /// A run of text. `container` identifies the paragraph the run belongs
    /// to; consecutive runs with the same container share a line.
    Text {
        text: String,
        container: Option<usize>,
    },

    /// A table, rendered as markdown.
    Table(Table),

    /// A reference to an embedded chart part, by relationship id.
    ChartRef(String),

    /// A group of nodes (shape groups on slides).
    Group(Vec<ContentNode>),
}

impl ContentNode {
    /// Text node with its own line.
    pub fn text(text: impl Into<String>) -> Self {
        ContentNode::Text {
            text: text.into(),
            container: None,
        }
    }

    /// Text node belonging to a paragraph container, if any.
    pub fn run(text: impl Into<String>, container: Option<usize>) -> Self {
        ContentNode::Text {
            text: text.into(),
            container,
        }
    }
}
