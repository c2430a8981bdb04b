//! JSON rendering and the response envelope.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ParsedContent;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any serde value in the requested format.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Response wrapper returned to callers of the upload boundary.
///
/// Success: `{code: 200, success: true, data}`. Failure: `{code, success:
/// false, message}` plus `stack` in development mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ParsedContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
}

impl Envelope {
    /// Wrap a successful result.
    pub fn ok(data: ParsedContent) -> Self {
        Self {
            code: 200,
            success: true,
            data: Some(data),
            message: None,
            stack: None,
        }
    }

    /// Wrap an error. `dev` adds the error's source chain as `stack`.
    pub fn from_error(err: &Error, dev: bool) -> Self {
        let stack = dev.then(|| {
            let mut chain = vec![format!("{:?}", err)];
            let mut source = std::error::Error::source(err);
            while let Some(cause) = source {
                chain.push(cause.to_string());
                source = cause.source();
            }
            chain
        });
        Self {
            code: err.status_code(),
            success: false,
            data: None,
            message: Some(err.to_string()),
            stack,
        }
    }

    /// Build the envelope for a pipeline outcome.
    pub fn from_result(result: Result<ParsedContent>, dev: bool) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::from_error(&e, dev),
        }
    }
}
