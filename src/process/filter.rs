// src/process/filter.rs
use tracing::{debug, trace};

use crate::process::Row;

/// Marker the statement prints on its carried-forward balance line.
pub const OPENING_BALANCE_MARKER: &str = "OPENING BALANCE";

/// Position of the description column, whatever its header says.
pub const DESCRIPTION_COLUMN: usize = 1;

/// Why a normalized row is not a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exclusion {
    OpeningBalance,
    Blank,
    RepeatedHeader,
}

impl Exclusion {
    pub fn as_str(&self) -> &str {
        match self {
            Exclusion::OpeningBalance => "opening_balance",
            Exclusion::Blank => "blank",
            Exclusion::RepeatedHeader => "repeated_header",
        }
    }
}

fn joined_upper(cells: &[String]) -> String {
    cells.join(",").to_uppercase()
}

/// Returns the first exclusion rule `row` trips, if any.
pub fn exclusion(row: &[String], headers: &[String]) -> Option<Exclusion> {
    let opening = row
        .get(DESCRIPTION_COLUMN)
        .map(|desc| desc.to_uppercase().contains(OPENING_BALANCE_MARKER))
        .unwrap_or(false);
    if opening {
        return Some(Exclusion::OpeningBalance);
    }
    if row.iter().all(|cell| cell.trim().is_empty()) {
        return Some(Exclusion::Blank);
    }
    if joined_upper(row) == joined_upper(headers) {
        return Some(Exclusion::RepeatedHeader);
    }
    None
}

/// Drop every row that is not a real transaction, keeping survivors in order.
pub fn filter_rows(headers: &[String], rows: Vec<Row>) -> Vec<Row> {
    let before = rows.len();
    let kept: Vec<Row> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match exclusion(&row, headers) {
            Some(reason) => {
                trace!(row = idx, reason = reason.as_str(), "dropping row");
                None
            }
            None => Some(row),
        })
        .collect();
    debug!(before, after = kept.len(), "filtered rows");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn headers() -> Vec<String> {
        strings(&["Date", "Description", "Amount"])
    }

    #[test]
    fn drops_blank_rows() {
        assert_eq!(
            exclusion(&strings(&["", "", ""]), &headers()),
            Some(Exclusion::Blank)
        );
        assert_eq!(
            exclusion(&strings(&["  ", "\t", ""]), &headers()),
            Some(Exclusion::Blank)
        );
    }

    #[test]
    fn drops_repeated_header_case_insensitively() {
        assert_eq!(
            exclusion(&strings(&["DATE", "description", "Amount"]), &headers()),
            Some(Exclusion::RepeatedHeader)
        );
    }

    #[test]
    fn drops_opening_balance_by_description_position() {
        let row = strings(&["Jun 01", "Opening Balance b/f", "1,000.00"]);
        assert_eq!(exclusion(&row, &headers()), Some(Exclusion::OpeningBalance));

        // the marker anywhere else does not count
        let row = strings(&["Opening Balance", "Rent", "1,000.00"]);
        assert_eq!(exclusion(&row, &headers()), None);
    }

    #[test]
    fn keeps_transactions_in_order() {
        let rows = vec![
            strings(&["Date", "Description", "Amount"]),
            strings(&["Jun 01", "OPENING BALANCE", "10.00"]),
            strings(&["Jun 02", "Rent", "100.00"]),
            strings(&["", " ", ""]),
            strings(&["Jun 03", "Groceries", "50.00"]),
        ];

        let kept = filter_rows(&headers(), rows);
        assert_eq!(
            kept,
            vec![
                strings(&["Jun 02", "Rent", "100.00"]),
                strings(&["Jun 03", "Groceries", "50.00"]),
            ]
        );
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let rows = vec![
            strings(&["Jun 02", "Rent", "100.00"]),
            strings(&["", "", ""]),
            strings(&["Jun 03", "", ""]),
        ];
        let once = filter_rows(&headers(), rows);
        let twice = filter_rows(&headers(), once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn partially_blank_rows_survive() {
        let row = strings(&["", "", "0.00"]);
        assert_eq!(exclusion(&row, &headers()), None);
    }
}
