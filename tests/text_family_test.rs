//! End-to-end tests for the text-family and markup converters.

use std::fs;
use std::path::PathBuf;

use docnorm::{normalize, ConvertOptions, Error};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, body: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_plain_text_pages_of_fifty() {
    let dir = tempfile::tempdir().unwrap();
    let body: String = (1..=120).map(|i| format!("row {}\n", i)).collect();
    let path = write(&dir, "1700000000000_rows.txt", body.as_bytes());

    let parsed = normalize(&path, "text/plain", &ConvertOptions::default()).unwrap();
    let sizes: Vec<usize> = parsed.pages.iter().map(|p| p.lines.len()).collect();
    assert_eq!(sizes, vec![50, 50, 20]);

    // running line numbers, concatenation reproduces the source lines
    let texts: Vec<&str> = parsed.lines().map(|l| l.text.as_str()).collect();
    let expected: Vec<String> = (1..=120).map(|i| format!("row {}", i)).collect();
    assert_eq!(texts, expected);
    assert_eq!(parsed.pages[2].lines[19].line_number, 120);
    assert_eq!(parsed.file_name.as_deref(), Some("rows.txt"));
}

#[test]
fn test_plain_text_custom_window() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "short.txt", b"a\nb\nc\nd\ne");
    let parsed = normalize(&path, "text/plain", &ConvertOptions::new().with_lines_per_page(2)).unwrap();
    assert_eq!(parsed.page_count(), 3);
    assert_eq!(parsed.pages[2].text, "e");
}

#[test]
fn test_plain_text_utf16() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = vec![0xFF, 0xFE];
    for unit in "héllo\nwörld".encode_utf16() {
        body.extend_from_slice(&unit.to_le_bytes());
    }
    let path = write(&dir, "wide.txt", &body);
    let parsed = normalize(&path, "text/plain", &ConvertOptions::default()).unwrap();
    assert_eq!(parsed.pages[0].text, "héllo\nwörld");
}

#[test]
fn test_json_flattened_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "config.json",
        br#"{"server": {"host": "localhost", "ports": [80, 443]}, "debug": false}"#,
    );
    let parsed = normalize(&path, "application/json", &ConvertOptions::default()).unwrap();
    let texts: Vec<&str> = parsed.lines().map(|l| l.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "server.host: localhost",
            "server.ports.0: 80",
            "server.ports.1: 443",
            "debug: false",
        ]
    );
}

#[test]
fn test_json_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "broken.json", b"{\"a\": [1, 2");
    let err = normalize(&path, "application/json", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Extraction { format: "JSON", .. }));
}

#[test]
fn test_xml_text_leaves() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "feed.xml",
        b"<?xml version=\"1.0\"?>\n<feed>\n  <entry><title>First</title><empty/></entry>\n  <entry><title>Second</title></entry>\n</feed>",
    );
    for mime in ["application/xml", "text/xml"] {
        let parsed = normalize(&path, mime, &ConvertOptions::default()).unwrap();
        assert_eq!(parsed.content, "First\nSecond");
        assert_eq!(parsed.pages[0].lines[1].line_number, 2);
    }
}

#[test]
fn test_xml_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "bad.xml", b"<a><b></a>");
    let err = normalize(&path, "application/xml", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Extraction { .. }));
}

#[test]
fn test_xml_deep_nesting_fails_cleanly() {
    let depth = 200_000;
    let xml = format!("{}x{}", "<a>".repeat(depth), "</a>".repeat(depth));
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "deep.xml", xml.as_bytes());

    let err = normalize(&path, "application/xml", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Extraction { format: "XML", .. }));
    assert_eq!(err.status_code(), 500);
}

#[test]
fn test_html_inline_merge_single_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "page.html", b"<html><body><p>Hello <b>World</b></p></body></html>");
    let parsed = normalize(&path, "text/html", &ConvertOptions::default()).unwrap();
    assert_eq!(parsed.page_count(), 1);
    assert_eq!(parsed.pages[0].lines.len(), 1);
    assert_eq!(parsed.pages[0].lines[0].text, "Hello World");
}

#[test]
fn test_html_never_splits_pages() {
    let dir = tempfile::tempdir().unwrap();
    let body: String = (0..80).map(|i| format!("<p>para {}</p>", i)).collect();
    let path = write(&dir, "long.html", body.as_bytes());
    let parsed = normalize(&path, "text/html", &ConvertOptions::new().with_lines_per_page(10)).unwrap();
    assert_eq!(parsed.page_count(), 1);
    assert_eq!(parsed.pages[0].lines.len(), 80);
}

#[test]
fn test_markdown_space_joined_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "notes.md", b"# Notes\n\nAlpha ~~beta~~\n\n1. one\n2. two\n");
    let parsed = normalize(&path, "text/markdown", &ConvertOptions::new().with_lines_per_page(3)).unwrap();
    assert_eq!(parsed.content, "Notes\nAlpha beta\n\none\ntwo");
    assert_eq!(parsed.pages[0].text, "Notes Alpha beta ");
    assert_eq!(parsed.pages[1].text, "one two");
}

#[test]
fn test_mime_mismatch_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "data.csv", b"a,b\n1,2\n");
    let err = normalize(&path, "text/csv", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}
