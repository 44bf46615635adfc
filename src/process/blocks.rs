// src/process/blocks.rs
use tracing::{debug, instrument, trace};

use crate::process::split::{split_cell, CellLines};
use crate::process::{RawBlock, Row};

/// Expand every block into its stacked rows, in block order and then line order.
///
/// The number of rows a block produces is the line count of its first cell.
/// Columns with fewer lines than that are padded with empty strings, and
/// columns missing from the block altogether count as empty.
#[instrument(level = "debug", skip_all, fields(columns = headers.len(), blocks = blocks.len()))]
pub fn normalize_blocks(headers: &[String], blocks: &[RawBlock]) -> Vec<Row> {
    let width = headers.len();
    let mut rows = Vec::new();

    for (idx, block) in blocks.iter().enumerate() {
        let columns: Vec<Vec<&str>> = (0..width)
            .map(|col| cell_lines(block, col).iter().collect())
            .collect();
        let expanded = cell_lines(block, 0).count();
        trace!(block = idx, rows = expanded, "expanding block");

        for offset in 0..expanded {
            let row: Row = columns
                .iter()
                .map(|lines| lines.get(offset).copied().unwrap_or_default().to_string())
                .collect();
            rows.push(row);
        }
    }

    debug!(rows = rows.len(), "normalized blocks");
    rows
}

fn cell_lines(block: &RawBlock, col: usize) -> CellLines<'_> {
    split_cell(block.get(col).map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn expands_a_stacked_block() {
        let headers = strings(&["Date", "Description", "Amount"]);
        let blocks = vec![strings(&[
            "Jun 01\nJun 02",
            "Rent\nGroceries",
            "100.00\n50.00",
        ])];

        let rows = normalize_blocks(&headers, &blocks);
        assert_eq!(
            rows,
            vec![
                strings(&["Jun 01", "Rent", "100.00"]),
                strings(&["Jun 02", "Groceries", "50.00"]),
            ]
        );
    }

    #[test]
    fn short_and_missing_columns_are_padded() {
        let headers = strings(&["Date", "Description", "Amount", "Balance"]);
        let blocks = vec![strings(&["Jun 01\nJun 02\nJun 03", "Rent", "100.00\n\n7.50"])];

        let rows = normalize_blocks(&headers, &blocks);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == headers.len()));
        assert_eq!(rows[0], strings(&["Jun 01", "Rent", "100.00", ""]));
        assert_eq!(rows[1], strings(&["Jun 02", "", "", ""]));
        assert_eq!(rows[2], strings(&["Jun 03", "", "7.50", ""]));
    }

    #[test]
    fn row_count_follows_the_first_column_only() {
        let headers = strings(&["Date", "Description"]);
        let blocks = vec![
            strings(&["", "orphan\nlines"]),
            strings(&["Jun 04", "Coffee\nextra"]),
        ];

        let rows = normalize_blocks(&headers, &blocks);
        assert_eq!(rows, vec![strings(&["Jun 04", "Coffee"])]);
    }

    #[test]
    fn keeps_block_then_line_order() {
        let headers = strings(&["Date", "Description"]);
        let blocks = vec![
            strings(&["Jun 09\nJun 01", "b\na"]),
            strings(&["May 30", "c"]),
        ];

        let rows = normalize_blocks(&headers, &blocks);
        let dates: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(dates, vec!["Jun 09", "Jun 01", "May 30"]);
    }

    #[test]
    fn extra_cells_beyond_the_header_are_dropped() {
        let headers = strings(&["Date"]);
        let blocks = vec![strings(&["Jun 01", "spill", "over"])];
        assert_eq!(normalize_blocks(&headers, &blocks), vec![strings(&["Jun 01"])]);
    }
}
