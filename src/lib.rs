//! # docnorm
//!
//! Multi-format document normalization for Rust.
//!
//! This library takes a stored file and its declared MIME type and produces
//! one paginated text model for every supported format: plain text, JSON,
//! XML, HTML, Markdown, Word (`.doc`/`.docx`), PowerPoint (`.ppt`/`.pptx`),
//! Excel (`.xls`/`.xlsx`) and PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docnorm::{normalize, ConvertOptions};
//!
//! fn main() -> docnorm::Result<()> {
//!     let parsed = normalize("report.pdf", "application/pdf", &ConvertOptions::default())?;
//!
//!     for page in &parsed.pages {
//!         println!("page {}: {} lines", page.page_number, page.lines.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **MIME dispatch**: one converter per format family, chosen by the
//!   declared MIME type
//! - **Reading order**: PDF lines rebuilt from glyph positions, OOXML bodies
//!   walked in document order
//! - **Tables and charts**: rendered as markdown pipe tables
//! - **Parallel processing**: uses Rayon for multi-page PDFs

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod paginate;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{ConvertOptions, ConverterRegistry, DocumentConverter, SheetPagination};
pub use detect::{correct_mime_type, display_file_name, mime_for_extension, Format};
pub use error::{Error, Result};
pub use model::{Chart, ContentNode, LineContent, PageContent, ParsedContent, Table, TableRow};
pub use render::{Envelope, JsonFormat};

use std::path::Path;

/// Normalize a stored file according to its declared MIME type.
///
/// Fails with [`Error::UnsupportedFormat`] when no converter accepts `mime`.
/// The result carries the file's display name, path and MIME type.
///
/// # Example
///
/// ```no_run
/// use docnorm::{normalize, ConvertOptions};
///
/// let options = ConvertOptions::new().with_lines_per_page(20);
/// let parsed = normalize("notes.txt", "text/plain", &options).unwrap();
/// println!("{}", parsed.content);
/// ```
pub fn normalize<P: AsRef<Path>>(path: P, mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
    ConverterRegistry::with_defaults().normalize(path.as_ref(), mime, options)
}

/// Normalize an in-memory document.
///
/// Same as [`normalize`] without the file-name and path decoration.
pub fn normalize_bytes(bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
    ConverterRegistry::with_defaults().normalize_bytes(bytes, mime, options)
}

/// Normalize a file on tokio's blocking pool.
#[cfg(feature = "async")]
pub async fn normalize_async<P: AsRef<Path>>(
    path: P,
    mime: &str,
    options: ConvertOptions,
) -> Result<ParsedContent> {
    let path = path.as_ref().to_path_buf();
    let mime = mime.to_string();
    tokio::task::spawn_blocking(move || normalize(&path, &mime, &options))
        .await
        .map_err(|e| Error::Other(format!("normalization task failed: {}", e)))?
}

/// Builder-style entry point that holds a registry and options.
///
/// # Example
///
/// ```no_run
/// use docnorm::{Docnorm, SheetPagination};
///
/// let parsed = Docnorm::new()
///     .with_sheet_pagination(SheetPagination::line_window())
///     .sequential()
///     .parse("book.xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
///     .unwrap();
/// println!("{} pages", parsed.page_count());
/// ```
pub struct Docnorm {
    registry: ConverterRegistry,
    options: ConvertOptions,
}

impl Docnorm {
    /// Create a normalizer with every built-in converter.
    pub fn new() -> Self {
        Self {
            registry: ConverterRegistry::with_defaults(),
            options: ConvertOptions::default(),
        }
    }

    /// Override the line window of line-batched formats.
    pub fn with_lines_per_page(mut self, lines: usize) -> Self {
        self.options = self.options.with_lines_per_page(lines);
        self
    }

    /// Choose how spreadsheet sheets become pages.
    pub fn with_sheet_pagination(mut self, mode: SheetPagination) -> Self {
        self.options = self.options.with_sheet_pagination(mode);
        self
    }

    /// Disable the `~~x~~` / `==x==` Markdown pre-pass.
    pub fn without_markdown_extensions(mut self) -> Self {
        self.options = self.options.with_markdown_extensions(false);
        self
    }

    /// Extract PDF pages one at a time.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.with_parallel(false);
        self
    }

    /// Register an additional converter, replacing any with the same MIME types.
    pub fn with_converter(mut self, converter: std::sync::Arc<dyn DocumentConverter>) -> Self {
        self.registry.register(converter);
        self
    }

    /// Normalize a stored file.
    pub fn parse<P: AsRef<Path>>(&self, path: P, mime: &str) -> Result<ParsedContent> {
        self.registry.normalize(path.as_ref(), mime, &self.options)
    }

    /// Normalize an in-memory document.
    pub fn parse_bytes(&self, bytes: &[u8], mime: &str) -> Result<ParsedContent> {
        self.registry.normalize_bytes(bytes, mime, &self.options)
    }

    /// Options in effect.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }
}

impl Default for Docnorm {
    fn default() -> Self {
        Self::new()
    }
}
