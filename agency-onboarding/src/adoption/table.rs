//! Locating and measuring the adoption table inside a document.

/// Marker of the heading the adoption table sits under.
pub const DEFAULT_TABLE_MARKER: &str = "Adoption by transit providers";

/// Cell content widths used when the table's own widths cannot be measured.
pub const LEGACY_COLUMN_WIDTHS: [usize; 7] = [51, 17, 12, 20, 13, 11, 10];

/// Where the adoption table sits in a document, as line indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpan {
    /// Line containing the marker.
    pub marker: usize,

    /// First table line (the header).
    pub start: usize,

    /// Last contiguous table line.
    pub end: usize,
}

/// Result of looking for the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLocation {
    /// No line contains the marker.
    MarkerNotFound,

    /// The marker exists but no table follows it.
    NoTable {
        /// Line containing the marker.
        marker: usize,
    },

    /// The table was found.
    Found(TableSpan),
}

/// Finds the first table following the first line containing `marker`.
///
/// Lines whose trimmed form starts with `|` are table lines. Lines between the
/// marker and the table are skipped; the table ends at the first non-table
/// line after it.
#[must_use]
pub fn locate_table(lines: &[&str], marker: &str) -> TableLocation {
    let Some(marker_index) = lines.iter().position(|line| line.contains(marker)) else {
        return TableLocation::MarkerNotFound;
    };

    let mut start = None;
    let mut end = None;
    for (index, line) in lines.iter().enumerate().skip(marker_index + 1) {
        if is_table_line(line) {
            start.get_or_insert(index);
            end = Some(index);
        } else if end.is_some() {
            break;
        }
    }

    match (start, end) {
        (Some(start), Some(end)) => TableLocation::Found(TableSpan {
            marker: marker_index,
            start,
            end,
        }),
        _ => TableLocation::NoTable {
            marker: marker_index,
        },
    }
}

/// Returns true for lines that belong to a pipe table.
#[must_use]
pub fn is_table_line(line: &str) -> bool {
    line.trim().starts_with('|')
}

/// Splits a table line into its cells, without the outer pipes.
///
/// Escaped pipes (`\|`) stay inside their cell.
#[must_use]
pub fn split_cells(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut cell_start = 0;
    let mut escaped = false;
    for (index, ch) in inner.char_indices() {
        match ch {
            '\\' => escaped = !escaped,
            '|' if !escaped => {
                cells.push(&inner[cell_start..index]);
                cell_start = index + 1;
            }
            _ => escaped = false,
        }
    }
    cells.push(&inner[cell_start..]);
    cells
}

/// Measures the content width of each column from a table line.
///
/// A cell is written as `| content |`, so its content width is its length
/// minus the two padding spaces.
#[must_use]
pub fn column_widths(line: &str) -> Vec<usize> {
    split_cells(line)
        .iter()
        .map(|cell| cell.chars().count().saturating_sub(2))
        .collect()
}

/// Returns the plain text of a row's first cell, bold markers removed.
#[must_use]
pub fn first_cell_text(line: &str) -> Option<String> {
    split_cells(line).first().map(|cell| {
        let text = cell.trim();
        let text = text.strip_prefix("**").unwrap_or(text);
        let text = text.strip_suffix("**").unwrap_or(text);
        text.trim().replace("\\|", "|")
    })
}
