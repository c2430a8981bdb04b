//! JSON converter: flattened `key: value` lines.

use serde_json::Value;

use crate::detect::MIME_JSON;
use crate::error::{Error, Result};
use crate::model::{number_lines, ParsedContent};
use crate::paginate;
use crate::parser::encoding;

use super::{ConvertOptions, DocumentConverter};

const FORMAT: &str = "JSON";

/// JSON documents flattened depth-first into dotted-key lines.
///
/// `{"a": {"b": [1, 2]}}` becomes `a.b.0: 1` and `a.b.1: 2`. Empty objects
/// and arrays contribute nothing; a top-level scalar is a single line.
#[derive(Debug, Clone, Default)]
pub struct JsonConverter {
    _private: (),
}

impl JsonConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for JsonConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_JSON]
    }

    fn name(&self) -> &str {
        "json"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let text = encoding::decode_text(bytes).text;
        let value: Value = serde_json::from_str(text.trim_start_matches('\u{FEFF}'))
            .map_err(|e| Error::extraction(FORMAT, e.to_string()))?;

        let mut entries = Vec::new();
        flatten(&value, "", &mut entries);
        let lines = number_lines(entries, 1);
        Ok(ParsedContent::from_pages(paginate::by_line_window(
            lines,
            options.window(),
        )))
    }
}

/// Depth-first flatten into `key: value` strings.
pub fn flatten(value: &Value, prefix: &str, out: &mut Vec<String>) {
    let key = |k: &str| {
        if prefix.is_empty() {
            k.to_string()
        } else {
            format!("{}.{}", prefix, k)
        }
    };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(v, &key(k), out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten(v, &key(&i.to_string()), out);
            }
        }
        scalar => {
            let rendered = match scalar {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if prefix.is_empty() {
                out.push(rendered);
            } else {
                out.push(format!("{}: {}", prefix, rendered));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(json: &str) -> Result<ParsedContent> {
        JsonConverter::new().convert_bytes(json.as_bytes(), MIME_JSON, &ConvertOptions::default())
    }

    #[test]
    fn test_flatten_nested() {
        let parsed = convert(r#"{"name": "doc", "meta": {"tags": ["a", "b"], "size": 3, "x": null, "ok": true}, "empty": {}}"#).unwrap();
        let lines: Vec<&str> = parsed.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "name: doc",
                "meta.tags.0: a",
                "meta.tags.1: b",
                "meta.size: 3",
                "meta.x: null",
                "meta.ok: true"
            ]
        );
        assert_eq!(parsed.content, lines.join("\n"));
    }

    #[test]
    fn test_top_level_scalar() {
        let parsed = convert("42").unwrap();
        assert_eq!(parsed.pages[0].text, "42");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            convert("{\"a\": "),
            Err(Error::Extraction { format: "JSON", .. })
        ));
    }

    #[test]
    fn test_line_window() {
        let body = format!(
            "[{}]",
            (0..7).map(|i| i.to_string()).collect::<Vec<_>>().join(",")
        );
        let parsed = JsonConverter::new()
            .convert_bytes(
                body.as_bytes(),
                MIME_JSON,
                &ConvertOptions::new().with_lines_per_page(3),
            )
            .unwrap();
        assert_eq!(parsed.page_count(), 3);
        assert_eq!(parsed.pages[2].lines[0].text, "6: 6");
        assert_eq!(parsed.pages[2].lines[0].line_number, 7);
    }
}
