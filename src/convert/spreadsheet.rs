//! Spreadsheet converter (XLSX and XLS).

use crate::detect::{MIME_XLS, MIME_XLSX};
use crate::error::{Error, Result};
use crate::model::{number_lines, PageContent, ParsedContent};
use crate::paginate;
use crate::parser::sheet::{read_workbook, Sheet};
use crate::render::grid_to_markdown_lines;

use super::{ConvertOptions, DocumentConverter, SheetPagination};

const FORMAT: &str = "Spreadsheet";

/// Workbooks rendered sheet by sheet as column-aligned pipe tables.
///
/// With [`SheetPagination::PerSheet`] each sheet is one page numbered by its
/// position in the workbook. With [`SheetPagination::LineWindow`] each
/// sheet's rows are re-batched and pages are numbered continuously. In both
/// modes line numbers restart at 1 for every sheet and `content` joins the
/// sheet tables with blank lines.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetConverter {
    _private: (),
}

impl SpreadsheetConverter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for SpreadsheetConverter {
    fn mime_types(&self) -> &[&str] {
        &[MIME_XLSX, MIME_XLS]
    }

    fn name(&self) -> &str {
        "spreadsheet"
    }

    fn convert_bytes(&self, bytes: &[u8], mime: &str, options: &ConvertOptions) -> Result<ParsedContent> {
        self.check_mime(mime)?;
        let sheets = read_workbook(bytes.to_vec())?;
        render_sheets(&sheets, options.sheet_pagination)
    }
}

/// Lay out rendered sheets as pages.
pub fn render_sheets(sheets: &[Sheet], mode: SheetPagination) -> Result<ParsedContent> {
    if sheets.is_empty() {
        return Err(Error::extraction(FORMAT, "workbook has no sheets"));
    }

    let rendered: Vec<Vec<String>> = sheets
        .iter()
        .map(|sheet| grid_to_markdown_lines(&sheet.grid))
        .collect();
    let content = rendered
        .iter()
        .map(|rows| rows.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");

    let pages = match mode {
        SheetPagination::PerSheet => rendered
            .into_iter()
            .enumerate()
            .map(|(i, rows)| PageContent::from_lines(i + 1, number_lines(rows, 1)))
            .collect(),
        SheetPagination::LineWindow(window) => {
            let mut pages: Vec<PageContent> = Vec::new();
            for rows in rendered {
                let first_page = pages.len() + 1;
                pages.extend(paginate::by_line_window_from(
                    number_lines(rows, 1),
                    window,
                    first_page,
                ));
            }
            pages
        }
    };

    Ok(ParsedContent::new(content, pages))
}
