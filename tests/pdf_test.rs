//! End-to-end tests for PDF line reconstruction.

use docnorm::detect::MIME_PDF;
use docnorm::{normalize, normalize_bytes, ConvertOptions, Error};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// A page's text as (x, y, text) draws, in drawing order.
type Draws<'a> = &'a [(i64, i64, &'a str)];

fn build_pdf(pages: &[Draws]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for draws in pages {
        let mut operations = Vec::new();
        for (x, y, text) in draws.iter() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12i64.into()]));
            operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_lines_grouped_by_baseline() {
    let bytes = build_pdf(&[&[
        (300, 700, "right"),
        (72, 540, "bottom"),
        (72, 703, "left"),
        (150, 699, "middle"),
    ]]);
    let parsed = normalize_bytes(&bytes, MIME_PDF, &ConvertOptions::default()).unwrap();

    assert_eq!(parsed.page_count(), 1);
    let page = &parsed.pages[0];
    let texts: Vec<&str> = page.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["left middle right", "bottom"]);
    assert_eq!(page.lines[1].line_number, 2);
}

#[test]
fn test_native_pages_restart_line_numbers() {
    let bytes = build_pdf(&[
        &[(72, 700, "First page"), (72, 680, "more")],
        &[],
        &[(72, 700, "Third page")],
    ]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("1700000000_deck.pdf");
    std::fs::write(&path, &bytes).unwrap();

    for parallel in [true, false] {
        let options = ConvertOptions::new().with_parallel(parallel);
        let parsed = normalize(&path, MIME_PDF, &options).unwrap();
        let numbers: Vec<usize> = parsed.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(parsed.pages[1].lines.is_empty());
        assert_eq!(parsed.pages[2].lines[0].line_number, 1);
        assert_eq!(parsed.content, "First page\nmore\n\nThird page");
        assert_eq!(parsed.file_name.as_deref(), Some("deck.pdf"));
    }
}

#[test]
fn test_line_window_does_not_repaginate_pdf() {
    let draws: Vec<(i64, i64, String)> = (0..30).map(|i| (72, 760 - i * 20, format!("line {}", i))).collect();
    let draws: Vec<(i64, i64, &str)> = draws.iter().map(|(x, y, t)| (*x, *y, t.as_str())).collect();
    let bytes = build_pdf(&[&draws]);
    let options = ConvertOptions::new().with_lines_per_page(5);
    let parsed = normalize_bytes(&bytes, MIME_PDF, &options).unwrap();
    assert_eq!(parsed.page_count(), 1);
    assert_eq!(parsed.pages[0].lines.len(), 30);
}

#[test]
fn test_corrupt_pdf() {
    let err = normalize_bytes(b"definitely not a pdf", MIME_PDF, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Extraction { format: "PDF", .. } | Error::Io(_)));
}
