//! Plain-text rendering of a table for terminal output.
//!
//! Cell text is arbitrary user input, so all sizing works on terminal
//! display width (not byte length) and truncation stays on char
//! boundaries.

use confgridlib::Table;
use console::{measure_text_width, Style};

/// Widest a single column may render; longer cells are truncated with a
/// ".." prefix so the tail (usually the interesting part) stays visible.
const MAX_CELL_WIDTH: usize = 40;

/// Truncate a value to at most `max_width` display columns, adding a ".."
/// prefix if needed. Cuts only on char boundaries.
fn truncate(value: &str, max_width: usize) -> String {
    if measure_text_width(value) <= max_width {
        return value.to_string();
    }
    let budget = max_width.saturating_sub(2);
    let mut start = value.len();
    for (idx, _) in value.char_indices().rev() {
        if measure_text_width(&value[idx..]) > budget {
            break;
        }
        start = idx;
    }
    format!("..{}", &value[start..])
}

/// Left-pad a value with spaces to the given display width.
fn pad(value: &str, width: usize) -> String {
    let deficit = width.saturating_sub(measure_text_width(value));
    format!("{value}{}", " ".repeat(deficit))
}

/// Compute the display width of each column: the widest of the header and
/// every cell, capped at [`MAX_CELL_WIDTH`].
fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|name| measure_text_width(name))
        .collect();
    for row in table.rows() {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(measure_text_width(cell));
        }
    }
    widths.iter().map(|w| (*w).min(MAX_CELL_WIDTH)).collect()
}

/// Render a table as an aligned text grid with a row-index column, a bold
/// header line, and a dash separator.
pub fn render_table(table: &Table) -> String {
    if table.is_empty() {
        return String::new();
    }
    let widths = column_widths(table);
    let index_width = table.row_count().saturating_sub(1).to_string().len().max(1);
    let header_style = Style::new().bold();

    let mut out = String::new();

    let mut header = format!("{:>index_width$}", "#");
    for (name, &width) in table.columns().iter().zip(&widths) {
        header.push_str("  ");
        header.push_str(&pad(&truncate(name, width), width));
    }
    out.push_str(&header_style.apply_to(header.trim_end()).to_string());
    out.push('\n');

    let total_width = index_width + widths.iter().map(|w| w + 2).sum::<usize>();
    out.push_str(&"-".repeat(total_width));
    out.push('\n');

    for (index, row) in table.rows().iter().enumerate() {
        let mut line = format!("{index:>index_width$}");
        for (cell, &width) in row.iter().zip(&widths) {
            line.push_str("  ");
            line.push_str(&pad(&truncate(cell, width), width));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}
