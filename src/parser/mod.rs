//! Format-level decoders used by the converters.

pub mod backend;
pub mod chart;
pub mod encoding;
pub mod layout;
pub mod ole;
pub mod package;
pub mod ppt_binary;
pub mod sheet;
pub mod word_binary;
pub mod xml_tree;

pub use backend::{ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use chart::parse_chart;
pub use encoding::{decode_text, Decoded};
pub use layout::{extract_page_spans, group_into_lines, TextLine, TextSpan};
pub use package::{Package, Relationship};
pub use sheet::{read_workbook, Sheet};
pub use xml_tree::{XmlElement, XmlNode};
