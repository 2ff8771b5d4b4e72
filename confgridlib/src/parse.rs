//! Parsing of clipboard-pasted spreadsheet text.
//!
//! Spreadsheet applications put tab-separated text on the clipboard, one
//! line per row. Splitting happens on literal tabs only, so a field with
//! internal spaces ("New York City") stays one field. Fields are trimmed of
//! surrounding whitespace and blank lines are skipped.

use crate::error::ConfgridError;
use crate::Result;

/// The transient, structured result of parsing pasted spreadsheet text.
///
/// Never persisted; it only exists between parsing and the import merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PastedBlock {
    /// Column names from the first line, when parsed with a header.
    pub header: Option<Vec<String>>,
    /// Data rows, each an ordered list of string fields.
    pub rows: Vec<Vec<String>>,
}

/// Parse pasted tab-separated text into a [`PastedBlock`].
///
/// With `has_header` the first non-blank line becomes the column names and
/// the rest become data rows; without it every line is a data row and the
/// caller supplies the column names.
///
/// Fails with [`ConfgridError::Parse`] when there are no non-blank lines or
/// when any line's field count differs from the first line's.
pub fn parse_pasted(text: &str, has_header: bool) -> Result<PastedBlock> {
    let mut lines = Vec::new();
    for (number, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let fields: Vec<String> = raw
            .split('\t')
            .map(|field| field.trim().to_string())
            .collect();
        lines.push((number + 1, fields));
    }

    let Some((_, first)) = lines.first() else {
        return Err(ConfgridError::Parse(
            "no data pasted; paste at least one row".to_string(),
        ));
    };
    let width = first.len();
    for (number, fields) in &lines {
        if fields.len() != width {
            return Err(ConfgridError::Parse(format!(
                "line {number} has {} fields but the first line has {width}",
                fields.len()
            )));
        }
    }

    let mut rows: Vec<Vec<String>> = lines.into_iter().map(|(_, fields)| fields).collect();
    let header = has_header.then(|| rows.remove(0));

    Ok(PastedBlock { header, rows })
}
