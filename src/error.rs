//! Error types for docnorm library.

use std::io;
use thiserror::Error;

/// Result type alias for docnorm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document normalization.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the input file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The declared MIME type is not recognized, or does not match the
    /// converter it was handed to.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The underlying container could not be decoded.
    #[error("Failed to parse {format} file: {message}")]
    Extraction {
        /// Short format label (e.g. "PDF", "DOCX").
        format: &'static str,
        /// Format-specific description of what went wrong.
        message: String,
    },

    /// A reference inside a container (e.g. a chart relationship) could not
    /// be resolved. Callers degrade this to a diagnostic line.
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// Error while rendering output (JSON, markdown).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an extraction failure for the given format.
    pub fn extraction(format: &'static str, message: impl Into<String>) -> Self {
        Error::Extraction {
            format,
            message: message.into(),
        }
    }

    /// Status code the boundary layer reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::UnsupportedFormat(_) => 415,
            Error::Io(e) if e.kind() == io::ErrorKind::NotFound => 404,
            _ => 500,
        }
    }

    /// Whether the error is recoverable inside a single document.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnresolvedReference(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::extraction("PDF", err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedFormat("image/png".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: image/png");

        let err = Error::extraction("DOCX", "missing word/document.xml");
        assert_eq!(
            err.to_string(),
            "Failed to parse DOCX file: missing word/document.xml"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::UnsupportedFormat("x".into()).status_code(), 415);
        assert_eq!(Error::extraction("PDF", "bad xref").status_code(), 500);
        assert!(Error::UnresolvedReference("rId3".into()).is_recoverable());
        assert!(!Error::Other("x".into()).is_recoverable());
    }
}
