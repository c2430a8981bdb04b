//! Document converters and the MIME-keyed dispatcher.
//!
//! Every supported format family has a [`DocumentConverter`]. The
//! [`ConverterRegistry`] maps declared MIME types onto converters and
//! decorates each result with the source file's name, path and type.
//!
//! # Example
//!
//! ```no_run
//! use docnorm::convert::{ConverterRegistry, ConvertOptions};
//! use std::path::Path;
//!
//! fn main() -> docnorm::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let options = ConvertOptions::new().with_lines_per_page(40);
//!     let parsed = registry.normalize(Path::new("notes.txt"), "text/plain", &options)?;
//!     println!("{} pages", parsed.page_count());
//!     Ok(())
//! }
//! ```

mod doc;
mod docx;
mod html;
mod json;
mod markdown;
mod pdf;
mod ppt;
mod pptx;
mod spreadsheet;
mod text;
mod xml;

pub use doc::DocConverter;
pub use docx::DocxConverter;
pub use html::HtmlConverter;
pub use json::JsonConverter;
pub use markdown::MarkdownConverter;
pub use pdf::PdfConverter;
pub use ppt::PptConverter;
pub use pptx::PptxConverter;
pub use spreadsheet::SpreadsheetConverter;
pub use text::TextConverter;
pub use xml::XmlConverter;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::detect::{self, Format};
use crate::error::{Error, Result};
use crate::model::ParsedContent;
use crate::paginate::{DEFAULT_LINES_PER_PAGE, DEFAULT_SHEET_LINES_PER_PAGE};

/// How spreadsheet output is split into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetPagination {
    /// One page per sheet, numbered by sheet position.
    #[default]
    PerSheet,

    /// Re-batch each sheet's rendered rows into windows of this many lines,
    /// numbering pages continuously across sheets.
    LineWindow(usize),
}

impl SheetPagination {
    /// Line-window mode with the default window.
    pub fn line_window() -> Self {
        SheetPagination::LineWindow(DEFAULT_SHEET_LINES_PER_PAGE)
    }
}

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Lines per page for line-window formats; `None` uses each
    /// converter's default.
    pub lines_per_page: Option<usize>,

    /// Spreadsheet page layout
    pub sheet_pagination: SheetPagination,

    /// Rewrite `~~x~~` and `==x==` before rendering Markdown
    pub markdown_extensions: bool,

    /// Lay out PDF pages concurrently
    pub parallel: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            lines_per_page: None,
            sheet_pagination: SheetPagination::default(),
            markdown_extensions: true,
            parallel: true,
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line window for line-batched formats.
    pub fn with_lines_per_page(mut self, lines: usize) -> Self {
        self.lines_per_page = Some(lines);
        self
    }

    /// Set spreadsheet pagination.
    pub fn with_sheet_pagination(mut self, mode: SheetPagination) -> Self {
        self.sheet_pagination = mode;
        self
    }

    /// Enable or disable the Markdown strike-through/highlight pre-pass.
    pub fn with_markdown_extensions(mut self, enabled: bool) -> Self {
        self.markdown_extensions = enabled;
        self
    }

    /// Enable or disable parallel PDF page layout.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The configured window, or [`DEFAULT_LINES_PER_PAGE`].
    pub fn window(&self) -> usize {
        self.lines_per_page.unwrap_or(DEFAULT_LINES_PER_PAGE)
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new document format.
pub trait DocumentConverter: Send + Sync {
    /// MIME types this converter accepts, exactly as declared by callers.
    fn mime_types(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert an in-memory document.
    fn convert_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent>;

    /// Convert the file at `path`.
    fn convert(&self, path: &Path, mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let bytes = std::fs::read(path)?;
        self.convert_bytes(&bytes, mime, options)
    }

    /// Check if this converter accepts the given MIME type.
    fn supports_mime(&self, mime: &str) -> bool {
        self.mime_types().iter().any(|m| *m == mime)
    }

    /// Fail with [`Error::UnsupportedFormat`] unless `mime` is accepted.
    fn check_mime(&self, mime: &str) -> Result<()> {
        if self.supports_mime(mime) {
            Ok(())
        } else {
            Err(Error::UnsupportedFormat(format!(
                "{} (expected by {} converter)",
                mime,
                self.name()
            )))
        }
    }
}

/// Registry for document converters.
///
/// The registry maps MIME types to converters and provides the
/// [`normalize`](ConverterRegistry::normalize) dispatch entry point.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with a converter for every recognized MIME type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TextConverter::new()));
        registry.register(Arc::new(JsonConverter::new()));
        registry.register(Arc::new(XmlConverter::new()));
        registry.register(Arc::new(MarkdownConverter::new()));
        registry.register(Arc::new(HtmlConverter::new()));
        registry.register(Arc::new(DocConverter::new()));
        registry.register(Arc::new(DocxConverter::new()));
        registry.register(Arc::new(PptConverter::new()));
        registry.register(Arc::new(PptxConverter::new()));
        registry.register(Arc::new(SpreadsheetConverter::new()));
        registry.register(Arc::new(PdfConverter::new()));
        registry
    }

    /// Register a converter.
    ///
    /// The converter will be registered for all its MIME types, replacing
    /// earlier registrations.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for mime in converter.mime_types() {
            self.converters.insert(mime.to_string(), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by MIME type.
    pub fn get_by_mime(&self, mime: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(mime).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a MIME type is routed.
    pub fn supports(&self, mime: &str) -> bool {
        self.converters.contains_key(mime)
    }

    /// All routed MIME types, sorted.
    pub fn supported_mime_types(&self) -> Vec<&str> {
        let mut mimes: Vec<&str> = self.converters.keys().map(|s| s.as_str()).collect();
        mimes.sort_unstable();
        mimes
    }

    fn route(&self, mime: &str) -> Result<Arc<dyn DocumentConverter>> {
        let format = Format::from_mime(mime)?;
        self.get_by_mime(mime).ok_or_else(|| {
            Error::UnsupportedFormat(format!("{} (no {} converter registered)", mime, format))
        })
    }

    /// Convert the file at `path` using the converter for `mime`, and fill
    /// in the file name, path and MIME type of the result.
    pub fn normalize(&self, path: &Path, mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        let converter = self.route(mime)?;
        log::debug!("{}: {} via {}", path.display(), mime, converter.name());
        let mut parsed = converter.convert(path, mime, options)?;
        parsed.file_name = Some(detect::display_file_name(path));
        parsed.file_path = Some(path.display().to_string());
        parsed.mime_type = Some(mime.to_string());
        Ok(parsed)
    }

    /// Convert in-memory bytes using the converter for `mime`.
    pub fn normalize_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        let converter = self.route(mime)?;
        let mut parsed = converter.convert_bytes(bytes, mime, options)?;
        parsed.mime_type = Some(mime.to_string());
        Ok(parsed)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
