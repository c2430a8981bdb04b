//! Markdown rendering for tables, charts and spreadsheet grids.

use crate::model::{Chart, Grid, Table};

/// Header label of the category column in chart tables.
pub const CHART_CATEGORY_HEADER: &str = "类别";

/// Prefix of the line carrying a chart's title.
pub const CHART_TITLE_PREFIX: &str = "**图表标题**: ";

/// Render a table as a pipe table, first row as header.
///
/// The separator row is sized to the header's column count. An empty table
/// renders as an empty string. No trailing newline.
pub fn table_to_markdown(table: &Table) -> String {
    let Some(header) = table.header() else {
        return String::new();
    };

    let mut lines = Vec::with_capacity(table.row_count() + 1);
    lines.push(pipe_row(&header.cells));
    lines.push(separator_row(header.cells.len()));
    for row in table.body() {
        lines.push(pipe_row(&row.cells));
    }
    lines.join("\n")
}

/// Render chart series as a table with one row per category and one column
/// per series. Missing values render as empty cells.
pub fn chart_to_markdown(chart: &Chart) -> String {
    let mut header = Vec::with_capacity(chart.series.len() + 1);
    header.push(CHART_CATEGORY_HEADER.to_string());
    header.extend(chart.series.iter().map(|s| s.key.clone()));

    let mut rows = vec![header];
    for (idx, label) in chart.categories() {
        let mut row = Vec::with_capacity(chart.series.len() + 1);
        row.push(label);
        for series in &chart.series {
            row.push(series.value_at(idx).unwrap_or_default().to_string());
        }
        rows.push(row);
    }
    table_to_markdown(&Table::from_cells(rows))
}

/// Render a chart as markdown blocks: optional title line, then the table.
pub fn chart_block(chart: &Chart) -> Vec<String> {
    let mut blocks = Vec::with_capacity(2);
    if let Some(title) = chart.title.as_deref().filter(|t| !t.trim().is_empty()) {
        blocks.push(format!("{}{}", CHART_TITLE_PREFIX, title.trim()));
    }
    blocks.push(chart_to_markdown(chart));
    blocks
}

/// Render a spreadsheet grid as column-aligned pipe rows.
///
/// Blank rows are dropped. The header is the row with the most non-empty
/// cells (first wins ties) and the separator is inserted right after it.
/// Column widths account for merged-range text, but only anchor cells print
/// their text.
pub fn grid_to_markdown_lines(grid: &Grid) -> Vec<String> {
    let columns = grid.column_count();
    let rows: Vec<_> = grid
        .rows
        .iter()
        .filter(|r| r.iter().any(|c| c.has_text()))
        .collect();
    if rows.is_empty() || columns == 0 {
        return Vec::new();
    }

    let mut header_idx = 0;
    let mut best = 0;
    for (i, row) in rows.iter().enumerate() {
        let filled = row.iter().filter(|c| c.has_text()).count();
        if filled > best {
            best = filled;
            header_idx = i;
        }
    }

    let mut widths: Vec<usize> = (0..columns)
        .map(|c| match rows[header_idx].get(c) {
            Some(cell) if cell.has_text() => cell.text.trim().chars().count(),
            _ => 3,
        })
        .collect();
    for row in &rows {
        for (c, cell) in row.iter().enumerate() {
            widths[c] = widths[c].max(cell.width_text().chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(c, &w)| {
                let text = row
                    .get(c)
                    .filter(|cell| cell.has_text())
                    .map(|cell| cell.text.trim())
                    .unwrap_or("");
                format!(" {:<w$} ", text)
            })
            .collect();
        lines.push(format!("|{}|", cells.join("|")));

        if i == header_idx {
            let sep: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
            lines.push(format!("|{}|", sep.join("|")));
        }
    }
    lines
}

fn pipe_row(cells: &[String]) -> String {
    let mut out = String::from("|");
    for cell in cells {
        out.push(' ');
        out.push_str(&cell.replace('\n', " "));
        out.push_str(" |");
    }
    out
}

fn separator_row(columns: usize) -> String {
    let mut out = String::from("|");
    for _ in 0..columns {
        out.push_str(" --- |");
    }
    out
}
