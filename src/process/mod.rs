// src/process/mod.rs
pub mod blocks;
pub mod filter;
pub mod split;
pub mod validate;

use tracing::{info, instrument};

pub use blocks::normalize_blocks;
pub use filter::filter_rows;
pub use split::{split_cell, CellLines};
pub use validate::{is_valid_cell, ColumnKind};

/// One statement row, one cell per header column.
pub type Row = Vec<String>;

/// One element of the extraction response after the header: a cell per
/// column, each cell possibly holding several stacked rows.
pub type RawBlock = Vec<String>;

/// Headers plus transaction rows, ready to be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl StatementTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Turn the decoded response elements (header first, then blocks) into a
/// filtered table.
///
/// Returns `None` when the response carries no block at all; that is the
/// "nothing usable" outcome, not an error.
#[instrument(level = "info", skip_all, fields(elements = elements.len()))]
pub fn build_table(elements: Vec<Vec<String>>) -> Option<StatementTable> {
    let mut elements = elements.into_iter();
    let headers = elements.next()?;
    let blocks: Vec<RawBlock> = elements.collect();
    if blocks.is_empty() {
        info!("response has a header but no blocks");
        return None;
    }

    let normalized = normalize_blocks(&headers, &blocks);
    let rows = filter_rows(&headers, normalized);
    info!(columns = headers.len(), rows = rows.len(), "built statement table");
    Some(StatementTable { headers, rows })
}
