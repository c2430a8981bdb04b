//! Compound File Binary (OLE2) stream access for legacy Office formats.

use std::io::{Cursor, Read};

use crate::error::{Error, Result};

/// An opened compound file held in memory.
pub type OleFile = cfb::CompoundFile<Cursor<Vec<u8>>>;

/// Open a compound file. `format` labels errors.
pub fn open(bytes: Vec<u8>, format: &'static str) -> Result<OleFile> {
    cfb::CompoundFile::open(Cursor::new(bytes))
        .map_err(|e| Error::extraction(format, format!("not a compound file: {}", e)))
}

/// Read a root-level stream, `None` when absent.
pub fn read_stream(ole: &mut OleFile, name: &str, format: &'static str) -> Result<Option<Vec<u8>>> {
    let path = format!("/{}", name);
    if !ole.is_stream(&path) {
        return Ok(None);
    }
    let mut stream = ole
        .open_stream(&path)
        .map_err(|e| Error::extraction(format, format!("{}: {}", name, e)))?;
    let mut data = Vec::new();
    stream
        .read_to_end(&mut data)
        .map_err(|e| Error::extraction(format, format!("{}: {}", name, e)))?;
    Ok(Some(data))
}

pub(crate) fn read_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

pub(crate) fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Decode UTF-16LE bytes, ignoring a trailing odd byte.
pub(crate) fn utf16le_lossy(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_roundtrip_stream() {
        let mut comp = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        {
            let mut s = comp.create_stream("/Data").unwrap();
            s.write_all(b"payload").unwrap();
        }
        comp.flush().unwrap();
        let bytes = comp.into_inner().into_inner();

        let mut ole = open(bytes, "DOC").unwrap();
        assert_eq!(read_stream(&mut ole, "Data", "DOC").unwrap().unwrap(), b"payload");
        assert!(read_stream(&mut ole, "Missing", "DOC").unwrap().is_none());
    }

    #[test]
    fn test_open_rejects_garbage() {
        assert!(open(b"plain text".to_vec(), "DOC").is_err());
    }

    #[test]
    fn test_utf16le_lossy() {
        assert_eq!(utf16le_lossy(&[0x48, 0x00, 0x69, 0x00, 0x21]), "Hi");
    }
}
