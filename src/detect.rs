//! Format classification from declared MIME types.
//!
//! The dispatcher trusts the MIME type supplied by the caller; this module
//! maps those strings onto [`Format`] and hosts the small helpers the upload
//! boundary uses to clean up names and misreported types.

use std::path::Path;

use crate::error::{Error, Result};

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_MARKDOWN: &str = "text/markdown";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_HTML: &str = "text/html";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_PPT: &str = "application/vnd.ms-powerpoint";
pub const MIME_PPTX: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const MIME_XML: &str = "application/xml";
pub const MIME_TEXT_XML: &str = "text/xml";
pub const MIME_JSON: &str = "application/json";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// Every MIME type the dispatcher accepts, in display order.
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    MIME_TEXT,
    MIME_MARKDOWN,
    MIME_PDF,
    MIME_HTML,
    MIME_DOCX,
    MIME_DOC,
    MIME_XLS,
    MIME_XLSX,
    MIME_PPT,
    MIME_PPTX,
    MIME_XML,
    MIME_TEXT_XML,
    MIME_JSON,
];

/// Document format family selected from a MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Text,
    Json,
    Xml,
    Markdown,
    Html,
    Doc,
    Docx,
    Ppt,
    Pptx,
    Spreadsheet,
    Pdf,
}

impl Format {
    /// Classify an exact MIME string. Parameters such as `; charset=` are
    /// not accepted; the boundary is expected to pass the bare type.
    pub fn from_mime(mime: &str) -> Result<Self> {
        let format = match mime {
            MIME_TEXT => Format::Text,
            MIME_JSON => Format::Json,
            MIME_XML | MIME_TEXT_XML => Format::Xml,
            MIME_MARKDOWN => Format::Markdown,
            MIME_HTML => Format::Html,
            MIME_DOC => Format::Doc,
            MIME_DOCX => Format::Docx,
            MIME_PPT => Format::Ppt,
            MIME_PPTX => Format::Pptx,
            MIME_XLS | MIME_XLSX => Format::Spreadsheet,
            MIME_PDF => Format::Pdf,
            other => return Err(Error::UnsupportedFormat(other.to_string())),
        };
        Ok(format)
    }

    /// Short upper-case label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Format::Text => "TXT",
            Format::Json => "JSON",
            Format::Xml => "XML",
            Format::Markdown => "Markdown",
            Format::Html => "HTML",
            Format::Doc => "DOC",
            Format::Docx => "DOCX",
            Format::Ppt => "PPT",
            Format::Pptx => "PPTX",
            Format::Spreadsheet => "Spreadsheet",
            Format::Pdf => "PDF",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the dispatcher accepts this MIME type.
pub fn is_supported(mime: &str) -> bool {
    Format::from_mime(mime).is_ok()
}

/// Map a file extension (without the dot, any case) to its MIME type.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext.to_ascii_lowercase().as_str() {
        "txt" | "text" | "log" => MIME_TEXT,
        "md" | "markdown" => MIME_MARKDOWN,
        "pdf" => MIME_PDF,
        "html" | "htm" => MIME_HTML,
        "docx" => MIME_DOCX,
        "doc" => MIME_DOC,
        "xls" => MIME_XLS,
        "xlsx" => MIME_XLSX,
        "ppt" => MIME_PPT,
        "pptx" => MIME_PPTX,
        "xml" => MIME_XML,
        "json" => MIME_JSON,
        _ => return None,
    };
    Some(mime)
}

/// Fix MIME types that upload clients commonly misreport.
///
/// Markdown files frequently arrive as `application/octet-stream`; every
/// other declared type is returned unchanged.
pub fn correct_mime_type<'a>(path: &Path, declared: &'a str) -> &'a str {
    if declared != MIME_OCTET_STREAM {
        return declared;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if matches!(ext.to_ascii_lowercase().as_str(), "md" | "markdown") => {
            MIME_MARKDOWN
        }
        _ => declared,
    }
}

/// Display name for a stored upload.
///
/// Stored files are named `<timestamp>_<original name>`; everything up to the
/// first underscore is dropped. Names without an underscore are kept whole.
pub fn display_file_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match base.split_once('_') {
        Some((_, rest)) if !rest.is_empty() => rest.to_string(),
        _ => base,
    }
}
