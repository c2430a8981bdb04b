//! Workbook reading with calamine: sheets to grids with merge information.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader, Sheets};
use chrono::Timelike;

use crate::error::{Error, Result};
use crate::model::{Grid, GridCell};

/// Merged range as ((start row, start col), (end row, end col)), inclusive,
/// in absolute sheet coordinates.
pub type MergeRange = ((u32, u32), (u32, u32));

/// One worksheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
}

/// Read every worksheet in workbook order.
pub fn read_workbook(bytes: Vec<u8>) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::extraction("Spreadsheet", e.to_string()))?;

    if let Sheets::Xlsx(xlsx) = &mut workbook {
        if let Err(e) = xlsx.load_merged_regions() {
            log::warn!("merged regions unavailable: {}", e);
        }
    }

    let names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| Error::extraction("Spreadsheet", format!("sheet {}: {}", name, e)))?;
        let merges = merges_for(&workbook, &name);
        log::debug!(
            "sheet {}: {:?} cells, {} merged ranges",
            name,
            range.get_size(),
            merges.len()
        );
        sheets.push(Sheet {
            grid: build_grid(&range, &merges),
            name,
        });
    }
    Ok(sheets)
}

fn merges_for(workbook: &Sheets<Cursor<Vec<u8>>>, name: &str) -> Vec<MergeRange> {
    match workbook {
        Sheets::Xlsx(xlsx) => xlsx
            .merged_regions_by_sheet(name)
            .into_iter()
            .map(|(_, _, d)| (d.start, d.end))
            .collect(),
        Sheets::Xls(xls) => xls
            .worksheet_merge_cells(name)
            .unwrap_or_default()
            .into_iter()
            .map(|d| (d.start, d.end))
            .collect(),
        _ => Vec::new(),
    }
}

/// Build a grid from a cell range, marking merged non-anchor cells with
/// their anchor's text.
pub fn build_grid(range: &Range<Data>, merges: &[MergeRange]) -> Grid {
    let mut rows: Vec<Vec<GridCell>> = range
        .rows()
        .map(|row| row.iter().map(|c| GridCell::new(cell_text(c))).collect())
        .collect();

    let Some((row0, col0)) = range.start() else {
        return Grid { rows };
    };

    for &((sr, sc), (er, ec)) in merges {
        let anchor = range
            .get_value((sr, sc))
            .map(cell_text)
            .unwrap_or_default();
        for r in sr..=er {
            for c in sc..=ec {
                if (r, c) == (sr, sc) || r < row0 || c < col0 {
                    continue;
                }
                let (ri, ci) = ((r - row0) as usize, (c - col0) as usize);
                if let Some(cell) = rows.get_mut(ri).and_then(|row| row.get_mut(ci)) {
                    if !cell.has_text() {
                        cell.merged = Some(anchor.clone());
                    }
                }
            }
        }
    }

    Grid { rows }
}

/// Display text of a cell value.
pub fn cell_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => datetime_text(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

/// Date-formatted cells as ISO dates, with the time when it is not
/// midnight. Durations keep their serial value.
fn datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        return dt.as_f64().to_string();
    }
    match dt.as_datetime() {
        Some(datetime) if dt.as_f64() < 1.0 => datetime.format("%H:%M:%S").to_string(),
        Some(datetime) if datetime.num_seconds_from_midnight() == 0 => {
            datetime.format("%Y-%m-%d").to_string()
        }
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}
