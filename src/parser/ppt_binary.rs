//! PowerPoint 97-2003 (`.ppt`) slide text from the record stream.
//!
//! Only text atoms are read. Records are walked recursively; slide
//! containers open a new bucket so text lands on the slide it belongs to.
//! Text found outside any slide container is kept separately and used when
//! the file yields no slide-scoped text at all.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::ContentNode;

use super::encoding;
use super::ole::{self, read_u16_le, read_u32_le, utf16le_lossy};

const FORMAT: &str = "PPT";
const RECORD_HEADER_LEN: usize = 8;
const CONTAINER_VERSION: u16 = 0x000F;
/// Containers nested deeper than this are skipped.
const MAX_CONTAINER_DEPTH: usize = 64;

/// Text-bearing atoms: TextCharsAtom, TextBytesAtom, CString, and the
/// slide-list text atom.
fn is_text_record(record_type: u16) -> bool {
    matches!(record_type, 0x0FA0 | 0x0FA8 | 0x0FBA | 0x0D45)
}

/// Slide, notes and main-master containers, plus the slide-list container.
fn is_slide_container(version: u16, record_type: u16) -> bool {
    (version == CONTAINER_VERSION && matches!(record_type, 0x03EE | 0x03F8 | 0x0FF0))
        || record_type == 0x0FF1
}

#[derive(Debug, Default)]
struct TextBucket {
    lines: Vec<String>,
    seen: HashSet<String>,
}

impl TextBucket {
    fn push(&mut self, line: &str) {
        if self.seen.insert(line.to_string()) {
            self.lines.push(line.to_string());
        }
    }
}

#[derive(Debug, Default)]
struct RecordWalk {
    slides: Vec<TextBucket>,
    loose: TextBucket,
}

/// Read a `.ppt` file into per-slide node lists.
pub fn read_slides(bytes: Vec<u8>) -> Result<Vec<Vec<ContentNode>>> {
    let mut file = ole::open(bytes, FORMAT)?;
    let stream = ole::read_stream(&mut file, "PowerPoint Document", FORMAT)?
        .ok_or_else(|| Error::extraction(FORMAT, "missing PowerPoint Document stream"))?;
    Ok(slides_from_stream(&stream))
}

/// Walk the records of a `PowerPoint Document` stream.
pub fn slides_from_stream(stream: &[u8]) -> Vec<Vec<ContentNode>> {
    let mut walk = RecordWalk::default();
    collect_records(stream, 0, stream.len(), None, 0, &mut walk);
    log::debug!(
        "ppt record walk: {} slides, {} loose lines",
        walk.slides.len(),
        walk.loose.lines.len()
    );

    let to_nodes = |bucket: TextBucket| -> Vec<ContentNode> {
        bucket.lines.into_iter().map(ContentNode::text).collect()
    };

    if walk.slides.is_empty() {
        if walk.loose.lines.is_empty() {
            return Vec::new();
        }
        return vec![to_nodes(walk.loose)];
    }
    walk.slides.into_iter().map(to_nodes).collect()
}

fn collect_records(
    data: &[u8],
    offset: usize,
    length: usize,
    slide: Option<usize>,
    depth: usize,
    walk: &mut RecordWalk,
) {
    if depth > MAX_CONTAINER_DEPTH {
        log::warn!("ppt: record containers nested deeper than {}, skipping", MAX_CONTAINER_DEPTH);
        return;
    }
    let end = offset.saturating_add(length).min(data.len());
    let mut pos = offset;

    while pos + RECORD_HEADER_LEN <= end {
        let (Some(ver_inst), Some(record_type), Some(size)) = (
            read_u16_le(data, pos),
            read_u16_le(data, pos + 2),
            read_u32_le(data, pos + 4),
        ) else {
            break;
        };
        let size = size as usize;
        let body = pos + RECORD_HEADER_LEN;
        let body_end = body.saturating_add(size);
        if body_end > end {
            break;
        }
        let version = ver_inst & 0x000F;

        if size > 0 && is_slide_container(version, record_type) {
            walk.slides.push(TextBucket::default());
            let index = walk.slides.len() - 1;
            collect_records(data, body, size, Some(index), depth + 1, walk);
            if walk.slides.last().is_some_and(|b| b.lines.is_empty()) {
                walk.slides.pop();
            }
        } else if size > 0 && version == CONTAINER_VERSION {
            collect_records(data, body, size, slide, depth + 1, walk);
        } else if size > 0 {
            if let Some(text) = decode_text_record(record_type, &data[body..body_end]) {
                for line in text.lines().map(str::trim) {
                    if line.is_empty() || line.contains('\u{FFFD}') {
                        continue;
                    }
                    match slide.and_then(|i| walk.slides.get_mut(i)) {
                        Some(bucket) => bucket.push(line),
                        None => walk.loose.push(line),
                    }
                }
            }
        }
        pos = body_end;
    }
}

/// Decode a text atom payload, mapping paragraph and vertical-tab breaks to
/// newlines.
fn decode_text_record(record_type: u16, payload: &[u8]) -> Option<String> {
    if !is_text_record(record_type) || payload.is_empty() {
        return None;
    }
    let decoded = if looks_like_utf16(payload) {
        utf16le_lossy(payload)
    } else if looks_like_single_byte(payload) {
        encoding::decode_text(payload).text
    } else {
        return None;
    };

    let cleaned: String = decoded
        .chars()
        .filter_map(|c| match c {
            '\0' => None,
            '\r' | '\u{0B}' => Some('\n'),
            '\t' => Some(' '),
            c if (c as u32) < 0x20 && c != '\n' => None,
            c => Some(c),
        })
        .collect();
    (!cleaned.trim().is_empty()).then_some(cleaned)
}

fn looks_like_utf16(payload: &[u8]) -> bool {
    if payload.len() < 4 || payload.len() % 2 != 0 {
        return false;
    }
    let units = payload.len() / 2;
    let printable = payload
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .filter(|&u| matches!(u, 0x09 | 0x0A | 0x0D) || (u >= 0x20 && !(0xD800..0xF000).contains(&u)))
        .count();
    printable * 2 >= units && payload.iter().skip(1).step_by(2).any(|&b| b == 0)
}

fn looks_like_single_byte(payload: &[u8]) -> bool {
    if payload.len() < 3 {
        return false;
    }
    let printable = payload
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || matches!(b, b'\r' | b'\n' | b'\t'))
        .count();
    printable * 2 >= payload.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ver_inst: u16, record_type: u16, body: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + body.len());
        out.extend_from_slice(&ver_inst.to_le_bytes());
        out.extend_from_slice(&record_type.to_le_bytes());
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
        out
    }

    fn chars_atom(text: &str) -> Vec<u8> {
        let body: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        record(0x0000, 0x0FA0, &body)
    }

    fn bytes_atom(text: &str) -> Vec<u8> {
        record(0x0000, 0x0FA8, text.as_bytes())
    }

    fn slide(children: &[Vec<u8>]) -> Vec<u8> {
        record(0x000F, 0x03EE, &children.concat())
    }

    fn texts(nodes: &[ContentNode]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|n| match n {
                ContentNode::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_slides_in_order_with_dedupe() {
        let stream = [
            slide(&[chars_atom("Title one"), bytes_atom("Body\rBody")]),
            slide(&[chars_atom("Second")]),
        ]
        .concat();
        let slides = slides_from_stream(&stream);
        assert_eq!(slides.len(), 2);
        assert_eq!(texts(&slides[0]), vec!["Title one", "Body"]);
        assert_eq!(texts(&slides[1]), vec!["Second"]);
    }

    #[test]
    fn test_empty_slide_dropped_and_nested_container() {
        let nested = record(0x000F, 0x0FF0, &[]);
        let stream = [
            nested,
            slide(&[record(0x000F, 0x040C, &chars_atom("Deep"))]),
        ]
        .concat();
        let slides = slides_from_stream(&stream);
        assert_eq!(slides.len(), 1);
        assert_eq!(texts(&slides[0]), vec!["Deep"]);
    }

    #[test]
    fn test_loose_text_fallback() {
        let stream = [bytes_atom("Loose text"), bytes_atom("Loose text")].concat();
        let slides = slides_from_stream(&stream);
        assert_eq!(slides.len(), 1);
        assert_eq!(texts(&slides[0]), vec!["Loose text"]);
    }

    /// `inner` wrapped in `levels` plain containers.
    fn wrap(inner: Vec<u8>, levels: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(levels * 8 + inner.len());
        for i in 0..levels {
            let size = (inner.len() + (levels - 1 - i) * 8) as u32;
            out.extend_from_slice(&0x000Fu16.to_le_bytes());
            out.extend_from_slice(&0x040Cu16.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
        }
        out.extend_from_slice(&inner);
        out
    }

    #[test]
    fn test_deep_container_nesting_is_bounded() {
        let deep = wrap(slide(&[chars_atom("Lost")]), 200_000);
        assert!(slides_from_stream(&deep).is_empty());

        let shallow = wrap(slide(&[chars_atom("Kept")]), 10);
        let slides = slides_from_stream(&shallow);
        assert_eq!(texts(&slides[0]), vec!["Kept"]);
    }

    #[test]
    fn test_truncated_record_stops() {
        let mut stream = chars_atom("ok");
        stream.truncate(stream.len() - 1);
        assert!(slides_from_stream(&stream).is_empty());
    }

    #[test]
    fn test_read_slides_requires_stream() {
        assert!(read_slides(b"not ole".to_vec()).is_err());
    }
}
