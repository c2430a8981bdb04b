//! OOXML package access: zip parts and relationship parts.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::{Error, Result};

use super::{encoding, xml_tree};

/// Relationship type suffix for embedded charts.
pub const REL_CHART: &str = "/relationships/chart";

/// One `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Whether the relationship type ends with `suffix`.
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

/// An opened OOXML package held in memory.
pub struct Package {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    format: &'static str,
}

impl Package {
    /// Open a package from its bytes. `format` labels errors.
    pub fn open(bytes: Vec<u8>, format: &'static str) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::extraction(format, format!("not a valid zip package: {}", e)))?;
        Ok(Self { archive, format })
    }

    /// Part names in archive order.
    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Whether a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read a part as text, `None` when absent.
    ///
    /// Parts are decoded by byte-order mark, so UTF-16 parts read as well as
    /// UTF-8 ones.
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>> {
        let mut file = match self.archive.by_name(name) {
            Ok(f) => f,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(Error::extraction(self.format, format!("{}: {}", name, e))),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| Error::extraction(self.format, format!("{}: {}", name, e)))?;
        Ok(Some(encoding::decode_text(&bytes).text))
    }

    /// Read a required part.
    pub fn require_part(&mut self, name: &str) -> Result<String> {
        self.read_part(name)?
            .ok_or_else(|| Error::extraction(self.format, format!("missing part {}", name)))
    }

    /// Relationships of `part`, keyed by id. Empty when the part has no
    /// relationship part.
    pub fn relationships(&mut self, part: &str) -> Result<HashMap<String, Relationship>> {
        let rels_name = rels_part_name(part);
        let Some(xml) = self.read_part(&rels_name)? else {
            return Ok(HashMap::new());
        };
        parse_relationships(&xml, self.format)
    }
}

/// Name of the relationship part for `part`, e.g.
/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_part_name(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Parse a `.rels` part.
pub fn parse_relationships(
    xml: &str,
    format: &'static str,
) -> Result<HashMap<String, Relationship>> {
    let root = xml_tree::parse(xml, format)?;
    let mut rels = HashMap::new();
    for el in root.elements().filter(|e| e.local_name() == "Relationship") {
        let (Some(id), Some(target)) = (el.attr("Id"), el.attr("Target")) else {
            continue;
        };
        let rel = Relationship {
            id: id.to_string(),
            rel_type: el.attr("Type").unwrap_or_default().to_string(),
            target: target.to_string(),
            external: el.attr("TargetMode") == Some("External"),
        };
        rels.insert(rel.id.clone(), rel);
    }
    Ok(rels)
}

/// Resolve a relationship target against the part that owns it.
///
/// `("ppt/slides/slide1.xml", "../charts/chart1.xml")` resolves to
/// `ppt/charts/chart1.xml`; absolute targets (`/ppt/...`) drop the slash.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(abs) = target.strip_prefix('/') {
        return abs.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for seg in target.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Trailing number of a part name, e.g. `ppt/slides/slide12.xml` -> 12.
pub fn part_number(name: &str) -> Option<u32> {
    let stem = name.rsplit('/').next()?.strip_suffix(".xml")?;
    let digits_at = stem.find(|c: char| c.is_ascii_digit())?;
    stem[digits_at..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rels_part_name() {
        assert_eq!(
            rels_part_name("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(rels_part_name("root.xml"), "_rels/root.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../charts/chart1.xml"),
            "ppt/charts/chart1.xml"
        );
        assert_eq!(
            resolve_target("word/document.xml", "media/image1.png"),
            "word/media/image1.png"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "/ppt/charts/chart2.xml"),
            "ppt/charts/chart2.xml"
        );
    }

    #[test]
    fn test_part_number() {
        assert_eq!(part_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(part_number("ppt/slides/slide.xml"), None);
        assert_eq!(part_number("ppt/slides/_rels/slide1.xml.rels"), None);
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart1.xml"/>
<Relationship Id="rId3" Type="http://x/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;
        let rels = parse_relationships(xml, "PPTX").unwrap();
        assert_eq!(rels.len(), 2);
        assert!(rels["rId2"].is_type(REL_CHART));
        assert!(rels["rId3"].external);
    }
}
