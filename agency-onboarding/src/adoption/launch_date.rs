//! Launch date normalization for the adoption table.

/// Shown when no launch date was given.
pub const PLANNED: &str = "Planned";

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Converts a free-text launch date to the table's format.
///
/// - `"March 2026"`, `"mar 2026"` and `"Marc 2026"` become `"3/2026 (target)"`
/// - blank input becomes `"Planned"`
/// - anything else, e.g. `"07/2025"`, is returned trimmed
#[must_use]
pub fn normalize_launch_date(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return PLANNED.to_string();
    }

    let mut parts = trimmed.split_whitespace();
    if let (Some(month), Some(first_year_part)) = (parts.next(), parts.next()) {
        let year: String = std::iter::once(first_year_part).chain(parts).collect();
        if let Some(month) = month_number(month) {
            if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
                return format!("{month}/{year} (target)");
            }
        }
    }

    trimmed.to_string()
}

/// Normalizes an optional launch date; `None` is treated as blank.
#[must_use]
pub fn normalize_optional_launch_date(input: Option<&str>) -> String {
    normalize_launch_date(input.unwrap_or_default())
}

/// Maps an English month name to 1-12.
///
/// Only the first three letters count, so `"Sept"`, `"Marc"` and `"Mayo"` all
/// match; shorter words never do.
fn month_number(name: &str) -> Option<usize> {
    let name = name.trim_end_matches(['.', ',']).to_lowercase();
    let prefix = name.get(..3).filter(|_| name.chars().count() >= 3)?;

    MONTHS
        .iter()
        .position(|month| month.starts_with(prefix))
        .map(|index| index + 1)
}
