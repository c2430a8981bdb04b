//! Character encoding detection for text-family inputs.
//!
//! Order of checks: byte-order mark, UTF-16 zero-byte pattern, strict UTF-8,
//! then a scored pass over legacy encodings common in uploaded documents.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Legacy encodings tried when the input is not valid UTF-8.
const LEGACY_LABELS: &[&str] = &["gb18030", "big5", "shift_jis", "euc-kr", "windows-1252"];

/// Bytes sampled for the UTF-16 heuristic.
const UTF16_SAMPLE: usize = 4096;

/// Decoded text plus the encoding that produced it.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// Detect the encoding of `bytes` and decode to a `String`.
///
/// Never fails: the last resort is a lossy windows-1252 decode.
pub fn decode_text(bytes: &[u8]) -> Decoded {
    let decoded = detect_and_decode(bytes);
    log::debug!("decoded {} bytes as {}", bytes.len(), decoded.encoding.name());
    decoded
}

fn detect_and_decode(bytes: &[u8]) -> Decoded {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return Decoded {
            text: text.into_owned(),
            encoding,
        };
    }

    if let Some(encoding) = sniff_utf16(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(bytes);
        return Decoded {
            text: text.into_owned(),
            encoding,
        };
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Decoded {
            text: text.to_string(),
            encoding: UTF_8,
        };
    }

    let mut best: Option<(i64, Decoded)> = None;
    for label in LEGACY_LABELS {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            continue;
        };
        let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes)
        else {
            continue;
        };
        let score = plausibility(&text);
        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((
                score,
                Decoded {
                    text: text.into_owned(),
                    encoding,
                },
            ));
        }
    }

    match best {
        Some((_, decoded)) => decoded,
        None => {
            let encoding = encoding_rs::WINDOWS_1252;
            let (text, _) = encoding.decode_without_bom_handling(bytes);
            Decoded {
                text: text.into_owned(),
                encoding,
            }
        }
    }
}

/// UTF-16 without BOM shows up as a zero byte in every other position for
/// mostly-ASCII text.
fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
    let sample = &bytes[..bytes.len().min(UTF16_SAMPLE)];
    if sample.len() < 4 || sample.len() % 2 != 0 {
        return None;
    }
    let pairs = sample.len() / 2;
    let even_zeros = sample.iter().step_by(2).filter(|b| **b == 0).count();
    let odd_zeros = sample.iter().skip(1).step_by(2).filter(|b| **b == 0).count();

    let mostly = |n: usize| n * 10 >= pairs * 4;
    let rarely = |n: usize| n * 20 <= pairs;
    if mostly(odd_zeros) && rarely(even_zeros) {
        Some(UTF_16LE)
    } else if mostly(even_zeros) && rarely(odd_zeros) {
        Some(UTF_16BE)
    } else {
        None
    }
}

/// Score decoded text: common scripts count up, controls and private-use
/// characters count down hard.
fn plausibility(text: &str) -> i64 {
    text.chars()
        .map(|c| match c as u32 {
            0x09 | 0x0A | 0x0D => 1,
            0x20..=0x7E => 1,
            0x00..=0x1F | 0x7F..=0x9F => -20,
            0xE000..=0xF8FF => -20,
            0x4E00..=0x9FFF => 3,
            0x3040..=0x30FF => 3,
            0xAC00..=0xD7AF => 3,
            0x3000..=0x303F | 0xFF00..=0xFF60 => 2,
            0xFF61..=0xFF9F => -1,
            0x00C0..=0x00FF => 1,
            _ => 0,
        })
        .sum()
}
