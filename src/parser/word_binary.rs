//! Word 97-2003 (`.doc`) body text via the FIB and piece table.

use encoding_rs::WINDOWS_1252;

use crate::error::{Error, Result};

use super::ole::{self, read_u16_le, read_u32_le, utf16le_lossy};

const FORMAT: &str = "DOC";
const WORD_MAGIC: u16 = 0xA5EC;
/// Index of the fcClx/lcbClx pair in FibRgFcLcb97.
const CLX_PAIR_INDEX: usize = 33;

/// The parts of the File Information Block needed to find the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fib {
    pub use_table1: bool,
    pub fc_min: u32,
    pub fc_mac: u32,
    pub fc_clx: u32,
    pub lcb_clx: u32,
}

impl Fib {
    /// Name of the table stream the piece table lives in.
    pub fn table_stream(&self) -> &'static str {
        if self.use_table1 {
            "1Table"
        } else {
            "0Table"
        }
    }
}

/// A run of characters stored contiguously in the WordDocument stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPiece {
    pub cp_start: u32,
    pub cp_end: u32,
    pub file_offset: u32,
    pub unicode: bool,
}

/// Extract the body text of a `.doc` file.
pub fn extract_text(bytes: Vec<u8>) -> Result<String> {
    let mut file = ole::open(bytes, FORMAT)?;
    let word = ole::read_stream(&mut file, "WordDocument", FORMAT)?
        .ok_or_else(|| Error::extraction(FORMAT, "missing WordDocument stream"))?;
    let fib = parse_fib(&word)
        .ok_or_else(|| Error::extraction(FORMAT, "not a Word 97-2003 document"))?;
    let table = ole::read_stream(&mut file, fib.table_stream(), FORMAT)?;
    Ok(text_from_streams(&word, table.as_deref(), &fib))
}

/// Decode text using the piece table, falling back to the fcMin..fcMac range.
pub fn text_from_streams(word: &[u8], table: Option<&[u8]>, fib: &Fib) -> String {
    let mut raw = String::new();
    if let Some(table) = table {
        let pieces = parse_text_pieces(table, fib.fc_clx, fib.lcb_clx);
        raw = decode_pieces(word, &pieces);
    }
    if raw.is_empty() {
        log::debug!("no piece table text, reading fcMin..fcMac");
        raw = decode_simple_range(word, fib.fc_min, fib.fc_mac);
    }
    normalize_word_text(&raw)
}

/// Parse the FIB at the start of the WordDocument stream.
pub fn parse_fib(word: &[u8]) -> Option<Fib> {
    if word.len() < 256 || read_u16_le(word, 0)? != WORD_MAGIC {
        return None;
    }
    let flags = read_u16_le(word, 0x0A)?;
    let fc_min = read_u32_le(word, 0x18)?;
    let fc_mac = read_u32_le(word, 0x1C)?;

    let mut pos = 32usize;
    let csw = read_u16_le(word, pos)? as usize;
    pos += 2 + csw * 2;
    let cslw = read_u16_le(word, pos)? as usize;
    pos += 2 + cslw * 4;
    let pairs = read_u16_le(word, pos)? as usize;
    pos += 2;
    if word.len() < pos + pairs * 8 {
        return None;
    }

    let (fc_clx, lcb_clx) = if pairs > CLX_PAIR_INDEX {
        let at = pos + CLX_PAIR_INDEX * 8;
        (read_u32_le(word, at)?, read_u32_le(word, at + 4)?)
    } else {
        (0, 0)
    };

    Some(Fib {
        use_table1: flags & 0x0200 != 0,
        fc_min,
        fc_mac,
        fc_clx,
        lcb_clx,
    })
}

/// Read the piece descriptors from the Clx in the table stream.
pub fn parse_text_pieces(table: &[u8], fc_clx: u32, lcb_clx: u32) -> Vec<TextPiece> {
    let start = fc_clx as usize;
    let end = start + lcb_clx as usize;
    if lcb_clx == 0 || end > table.len() {
        return Vec::new();
    }
    let clx = &table[start..end];
    let mut pos = 0usize;

    while pos < clx.len() {
        match clx[pos] {
            // Prc: skip grpprl
            0x01 => {
                let Some(cb) = read_u16_le(clx, pos + 1) else {
                    break;
                };
                pos += 3 + cb as usize;
            }
            // Pcdt: the piece table itself
            0x02 => {
                let Some(lcb) = read_u32_le(clx, pos + 1).map(|v| v as usize) else {
                    break;
                };
                let body = pos + 5;
                let Some(plc) = clx.get(body..body + lcb) else {
                    break;
                };
                return read_plc_pcd(plc);
            }
            _ => break,
        }
    }
    Vec::new()
}

fn read_plc_pcd(plc: &[u8]) -> Vec<TextPiece> {
    if plc.len() < 4 {
        return Vec::new();
    }
    let count = (plc.len() - 4) / 12;
    let cps: Vec<u32> = (0..=count)
        .filter_map(|i| read_u32_le(plc, i * 4))
        .collect();
    let pcds = &plc[(count + 1) * 4..];

    (0..count)
        .filter_map(|i| {
            let fc = read_u32_le(pcds, i * 8 + 2)?;
            let unicode = fc & 0x4000_0000 == 0;
            let file_offset = if unicode {
                fc
            } else {
                (fc & 0x3FFF_FFFF) / 2
            };
            Some(TextPiece {
                cp_start: *cps.get(i)?,
                cp_end: *cps.get(i + 1)?,
                file_offset,
                unicode,
            })
        })
        .collect()
}

/// Concatenate the text of every piece.
pub fn decode_pieces(word: &[u8], pieces: &[TextPiece]) -> String {
    let mut out = String::new();
    for piece in pieces.iter().filter(|p| p.cp_end > p.cp_start) {
        let chars = (piece.cp_end - piece.cp_start) as usize;
        let len = if piece.unicode { chars * 2 } else { chars };
        let start = piece.file_offset as usize;
        let Some(slice) = word.get(start..start + len) else {
            continue;
        };
        if piece.unicode {
            out.push_str(&utf16le_lossy(slice));
        } else {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(slice);
            out.push_str(&text);
        }
    }
    out
}

/// Fallback for files without a usable piece table: treat fcMin..fcMac as
/// UTF-16LE.
pub fn decode_simple_range(word: &[u8], fc_min: u32, fc_mac: u32) -> String {
    let start = fc_min as usize;
    let end = (fc_mac as usize).min(word.len());
    if end <= start + 4 {
        return String::new();
    }
    utf16le_lossy(&word[start..end])
}

/// Map Word control characters to plain text.
///
/// Field instructions (between 0x13 and 0x14) are dropped while field
/// results are kept; cell marks become tabs, row ends and paragraph marks
/// become newlines.
pub fn normalize_word_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    // true once the field has passed its separator
    let mut fields: Vec<bool> = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{13}' => fields.push(false),
            '\u{14}' => {
                if let Some(last) = fields.last_mut() {
                    *last = true;
                }
            }
            '\u{15}' => {
                fields.pop();
            }
            _ if fields.iter().any(|in_result| !in_result) => {}
            '\u{07}' => {
                if chars.peek() == Some(&'\u{07}') {
                    while chars.peek() == Some(&'\u{07}') {
                        chars.next();
                    }
                    out.push('\n');
                } else {
                    out.push('\t');
                }
            }
            '\r' | '\u{0B}' | '\u{0C}' | '\u{1E}' | '\u{1F}' => out.push('\n'),
            '\t' | '\n' => out.push(c),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal WordDocument stream: FIB with the Clx pair, text at 0x200.
    fn word_stream(text: &str) -> Vec<u8> {
        let mut w = vec![0u8; 0x200];
        w[0..2].copy_from_slice(&WORD_MAGIC.to_le_bytes());
        w[0x0A..0x0C].copy_from_slice(&0x0200u16.to_le_bytes());
        let pos = 32;
        w[pos..pos + 2].copy_from_slice(&0u16.to_le_bytes());
        w[pos + 2..pos + 4].copy_from_slice(&0u16.to_le_bytes());
        w[pos + 4..pos + 6].copy_from_slice(&34u16.to_le_bytes());
        let at = pos + 6 + CLX_PAIR_INDEX * 8;
        w[at..at + 4].copy_from_slice(&0u32.to_le_bytes());
        w[at + 4..at + 8].copy_from_slice(&21u32.to_le_bytes());
        w.extend(text.encode_utf16().flat_map(|u| u.to_le_bytes()));
        w
    }

    fn table_stream(chars: u32) -> Vec<u8> {
        let mut t = vec![0x02];
        t.extend_from_slice(&16u32.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes());
        t.extend_from_slice(&chars.to_le_bytes());
        t.extend_from_slice(&0u16.to_le_bytes());
        t.extend_from_slice(&0x200u32.to_le_bytes());
        t.extend_from_slice(&0u16.to_le_bytes());
        t
    }

    #[test]
    fn test_fib_and_pieces() {
        let text = "Hello\rWorld\r";
        let word = word_stream(text);
        let fib = parse_fib(&word).unwrap();
        assert!(fib.use_table1);
        assert_eq!(fib.table_stream(), "1Table");
        assert_eq!((fib.fc_clx, fib.lcb_clx), (0, 21));

        let table = table_stream(text.chars().count() as u32);
        let pieces = parse_text_pieces(&table, fib.fc_clx, fib.lcb_clx);
        assert_eq!(pieces.len(), 1);
        assert!(pieces[0].unicode);
        assert_eq!(text_from_streams(&word, Some(&table), &fib), "Hello\nWorld\n");
    }

    #[test]
    fn test_not_a_word_stream() {
        assert!(parse_fib(&[0u8; 300]).is_none());
        assert!(parse_fib(&[0u8; 10]).is_none());
    }

    #[test]
    fn test_normalize_fields_and_cells() {
        let raw = "See \u{13} HYPERLINK \"x\" \u{14}link\u{15} now\rA\u{07}B\u{07}\u{07}";
        assert_eq!(normalize_word_text(raw), "See link now\nA\tB\n");
    }

    #[test]
    fn test_compressed_piece() {
        let mut word = vec![0u8; 8];
        word.extend_from_slice(b"caf\xe9");
        let pieces = vec![TextPiece {
            cp_start: 0,
            cp_end: 4,
            file_offset: 8,
            unicode: false,
        }];
        assert_eq!(decode_pieces(&word, &pieces), "café");
    }
}
