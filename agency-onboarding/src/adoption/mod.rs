//! Adoption table updates.
//!
//! The published docs list every agency in a markdown table under the
//! "Adoption by transit providers" heading. This module appends a row for a
//! new agency, aligned to the table's existing column widths. Lines already in
//! the document are never modified.

mod launch_date;
mod table;

pub use launch_date::{normalize_launch_date, normalize_optional_launch_date, PLANNED};
pub use table::{
    column_widths, is_table_line, locate_table, split_cells, TableLocation, TableSpan,
    DEFAULT_TABLE_MARKER, LEGACY_COLUMN_WIDTHS,
};

use crate::agency::AgencyInput;
use serde::Serialize;
use tracing::{debug, info};

/// Cell written for metrics that are not measured yet.
pub const NOT_YET_MEASURED: &str = "\\*";

/// The row added for an agency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptionRow {
    /// Agency long name.
    pub name: String,

    /// Normalized launch date.
    pub launch_date: String,
}

impl AdoptionRow {
    /// Builds the row for an agency.
    #[must_use]
    pub fn for_agency(agency: &AgencyInput) -> Self {
        Self {
            name: agency.long_name().to_string(),
            launch_date: normalize_optional_launch_date(agency.launch_date()),
        }
    }

    /// Renders the row with each cell padded to its column's width.
    ///
    /// Columns after the first two are filled with [`NOT_YET_MEASURED`].
    /// Fewer than three widths falls back to [`LEGACY_COLUMN_WIDTHS`].
    #[must_use]
    pub fn render(&self, widths: &[usize]) -> String {
        let widths = if widths.len() < 3 {
            &LEGACY_COLUMN_WIDTHS[..]
        } else {
            widths
        };

        let name = format!("**{}**", escape_cell(&self.name));
        let launch_date = escape_cell(&self.launch_date);
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(index, &width)| {
                let content = match index {
                    0 => name.as_str(),
                    1 => launch_date.as_str(),
                    _ => NOT_YET_MEASURED,
                };
                format!("{content:<width$}")
            })
            .collect();

        format!("| {} |", cells.join(" | "))
    }
}

/// Escapes pipes so a value stays inside one cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// What [`insert_adoption_row`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableMutation {
    /// A row was inserted.
    Inserted {
        /// The inserted line.
        row: String,
        /// Zero-based line index of the inserted row.
        line: usize,
    },

    /// The marker heading is not in the document.
    TableNotFound,

    /// The marker exists but no table follows it.
    TableEndNotFound,
}

/// A document after an attempted row insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptionUpdate {
    /// Resulting document; identical to the input unless a row was inserted.
    pub document: String,

    /// What happened.
    pub outcome: TableMutation,
}

impl AdoptionUpdate {
    /// Returns true if the document changed.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self.outcome, TableMutation::Inserted { .. })
    }
}

/// Appends the agency's row to the end of the adoption table.
///
/// A missing marker or table leaves the document untouched. The row is added
/// even if the agency is already listed; see [`contains_agency`].
#[must_use]
pub fn insert_adoption_row(document: &str, agency: &AgencyInput, marker: &str) -> AdoptionUpdate {
    let lines: Vec<&str> = document.split('\n').collect();

    let span = match locate_table(&lines, marker) {
        TableLocation::Found(span) => span,
        TableLocation::MarkerNotFound => {
            info!(marker, "Adoption table marker not found, leaving document unchanged");
            return AdoptionUpdate {
                document: document.to_string(),
                outcome: TableMutation::TableNotFound,
            };
        }
        TableLocation::NoTable { marker: line } => {
            info!(line, "No table after adoption marker, leaving document unchanged");
            return AdoptionUpdate {
                document: document.to_string(),
                outcome: TableMutation::TableEndNotFound,
            };
        }
    };

    let widths = lines.get(span.start).map(|h| column_widths(h)).unwrap_or_default();
    let mut row = AdoptionRow::for_agency(agency).render(&widths);
    debug!(row = %row, "Computed adoption row");

    let last = lines.get(span.end).copied().unwrap_or_default();
    let indent = &last[..last.len() - last.trim_start().len()];
    row.insert_str(0, indent);

    let mut updated: Vec<String> = lines.iter().map(|line| (*line).to_string()).collect();
    let line = span.end + 1;
    let inserted = if last.ends_with('\r') {
        format!("{row}\r")
    } else {
        row.clone()
    };
    updated.insert(line, inserted);

    AdoptionUpdate {
        document: updated.join("\n"),
        outcome: TableMutation::Inserted { row, line },
    }
}

/// Returns true if the adoption table already has a row for `long_name`.
///
/// Names are compared case-insensitively, ignoring bold markers.
#[must_use]
pub fn contains_agency(document: &str, marker: &str, long_name: &str) -> bool {
    let lines: Vec<&str> = document.split('\n').collect();
    let TableLocation::Found(span) = locate_table(&lines, marker) else {
        return false;
    };

    let wanted = long_name.trim().to_lowercase();
    lines[span.start..=span.end]
        .iter()
        .filter_map(|line| table::first_cell_text(line))
        .any(|name| name.to_lowercase() == wanted)
}
