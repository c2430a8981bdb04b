//! Markup stripping and whitespace cleanup.

use std::sync::OnceLock;

use regex::Regex;

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("static pattern"))
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("static pattern"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

fn strike_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"~~([^~\n]+?)~~").expect("static pattern"))
}

fn highlight_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"==([^=\n]+?)==").expect("static pattern"))
}

/// Remove every `<...>` tag, keeping the text between them.
pub fn strip_tags(html: &str) -> String {
    tag_regex().replace_all(html, "").into_owned()
}

/// Decode the named entities an HTML renderer emits plus numeric references.
///
/// Unknown named entities are left as written.
pub fn decode_entities(text: &str) -> String {
    entity_regex()
        .replace_all(text, |caps: &regex::Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or(body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{00A0}'),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    whitespace_regex().replace_all(text.trim(), " ").into_owned()
}

/// Plain text of an HTML fragment, whitespace collapsed.
pub fn html_to_plain(html: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_tags(html)))
}

/// Rewrite `~~x~~` to `<del>x</del>` and `==x==` to `<mark>x</mark>`.
pub fn expand_markdown_extensions(markdown: &str) -> String {
    let struck = strike_regex().replace_all(markdown, "<del>$1</del>");
    highlight_regex()
        .replace_all(&struck, "<mark>$1</mark>")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>World</b></p>"), "Hello World");
        assert_eq!(strip_tags("no tags"), "no tags");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_html_to_plain() {
        assert_eq!(html_to_plain("<div>\n  one\n\t<i>two</i> </div>"), "one two");
    }

    #[test]
    fn test_expand_markdown_extensions() {
        assert_eq!(
            expand_markdown_extensions("~~old~~ and ==new=="),
            "<del>old</del> and <mark>new</mark>"
        );
        assert_eq!(expand_markdown_extensions("a == b"), "a == b");
    }
}
