//! Fixed-width text preview of extracted rows.

use crate::model::RowSet;

/// Cells wider than this are cut and marked with an ellipsis.
const MAX_CELL_WIDTH: usize = 32;

/// Render the first `n` rows as a fixed-width table.
///
/// The header line holds 0-based column numbers and each line starts with
/// its 0-based row number. Short rows are padded with blank cells for
/// display only.
pub fn preview_table(rows: &RowSet, n: usize) -> String {
    let shown = rows.preview(n);
    let columns = shown.iter().map(|r| r.width()).max().unwrap_or(0);

    let cells: Vec<Vec<String>> = shown
        .iter()
        .map(|row| {
            let mut line: Vec<String> = row.values().map(display_cell).collect();
            line.resize(columns, String::new());
            line
        })
        .collect();

    let index_width = shown.len().saturating_sub(1).to_string().len();
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            cells
                .iter()
                .map(|line| line[col].chars().count())
                .chain(std::iter::once(col.to_string().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (col, width) in widths.iter().enumerate() {
        out.push_str("  ");
        out.push_str(&pad(&col.to_string(), *width));
    }
    out.push('\n');

    for (idx, line) in cells.iter().enumerate() {
        out.push_str(&pad(&idx.to_string(), index_width));
        for (cell, width) in line.iter().zip(&widths) {
            out.push_str("  ");
            out.push_str(&pad(cell, *width));
        }
        out.push('\n');
    }

    // Trailing padding on the last column is noise
    out.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_cell(value: &str) -> String {
    let flat: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() > MAX_CELL_WIDTH {
        let cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", cut)
    } else {
        flat
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
