// src/session/reconcile.rs
use std::collections::BTreeSet;
use tracing::{debug, trace};

use crate::process::Row;
use crate::session::state::RowState;

/// Live rows tracked against a committed baseline.
///
/// A row is dirty exactly when some cell differs from the baseline row at
/// the same index. Dirtiness is recomputed from the cells on every edit, so
/// typing a value back to what it was makes the row clean again. Only
/// [`commit_row`](Self::commit_row) moves the baseline.
///
/// Row and column indices out of range are caller bugs and panic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditReconciler {
    rows: Vec<Row>,
    baseline: Vec<Row>,
    dirty: BTreeSet<usize>,
}

impl EditReconciler {
    pub fn new(rows: Vec<Row>) -> Self {
        let baseline = rows.clone();
        Self {
            rows,
            baseline,
            dirty: BTreeSet::new(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn baseline(&self) -> &[Row] {
        &self.baseline
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dirty row indices, ascending.
    pub fn dirty_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.dirty.iter().copied()
    }

    pub fn state(&self, row: usize) -> RowState {
        self.check_row(row);
        if self.dirty.contains(&row) {
            RowState::Dirty
        } else {
            RowState::Clean
        }
    }

    /// Store `value` at (`row`, `col`) and recompute that row's state.
    pub fn edit_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> RowState {
        self.check_row(row);
        let width = self.rows[row].len();
        assert!(
            col < width,
            "column {} out of range for row {} with {} columns",
            col,
            row,
            width
        );

        self.rows[row][col] = value.into();
        let state = self.recompute(row);
        trace!(row, col, state = state.as_str(), "cell edited");
        state
    }

    /// Make the row's current values its new baseline. Committing a clean
    /// row changes nothing.
    pub fn commit_row(&mut self, row: usize) {
        self.check_row(row);
        if self.dirty.remove(&row) {
            self.baseline[row] = self.rows[row].clone();
            debug!(row, "row committed");
        }
    }

    /// Put the baseline values back into the row.
    pub fn revert_row(&mut self, row: usize) {
        self.check_row(row);
        if self.dirty.remove(&row) {
            self.rows[row] = self.baseline[row].clone();
            debug!(row, "row reverted");
        }
    }

    /// Commit every dirty row; returns how many were committed.
    pub fn commit_all(&mut self) -> usize {
        let dirty: Vec<usize> = self.dirty_rows().collect();
        for &row in &dirty {
            self.commit_row(row);
        }
        dirty.len()
    }

    /// Revert every dirty row; returns how many were reverted.
    pub fn revert_all(&mut self) -> usize {
        let dirty: Vec<usize> = self.dirty_rows().collect();
        for &row in &dirty {
            self.revert_row(row);
        }
        dirty.len()
    }

    fn recompute(&mut self, row: usize) -> RowState {
        if self.rows[row] == self.baseline[row] {
            self.dirty.remove(&row);
            RowState::Clean
        } else {
            self.dirty.insert(row);
            RowState::Dirty
        }
    }

    fn check_row(&self, row: usize) {
        assert!(
            row < self.rows.len(),
            "row {} out of range for table with {} rows",
            row,
            self.rows.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> EditReconciler {
        EditReconciler::new(vec![
            strings(&["Jun 01", "Rent", "100.00"]),
            strings(&["Jun 02", "Groceries", "50.00"]),
        ])
    }

    fn assert_dirty_matches_diff(rec: &EditReconciler) {
        for row in 0..rec.len() {
            let differs = rec.rows()[row] != rec.baseline()[row];
            assert_eq!(rec.state(row).is_dirty(), differs, "row {row}");
        }
    }

    #[test]
    fn starts_clean() {
        let rec = sample();
        assert_eq!(rec.dirty_rows().count(), 0);
        assert_eq!(rec.state(0), RowState::Clean);
    }

    #[test]
    fn editing_back_to_the_original_cleans_the_row() {
        let mut rec = sample();
        assert_eq!(rec.edit_cell(0, 2, "100.0"), RowState::Dirty);
        assert_eq!(rec.dirty_rows().collect::<Vec<_>>(), vec![0]);

        assert_eq!(rec.edit_cell(0, 2, "100.00"), RowState::Clean);
        assert_eq!(rec.dirty_rows().count(), 0);
    }

    #[test]
    fn a_row_stays_dirty_while_any_cell_differs() {
        let mut rec = sample();
        rec.edit_cell(1, 1, "Food");
        rec.edit_cell(1, 2, "55.00");
        assert_eq!(rec.edit_cell(1, 1, "Groceries"), RowState::Dirty);
        assert_eq!(rec.edit_cell(1, 2, "50.00"), RowState::Clean);
        assert_dirty_matches_diff(&rec);
    }

    #[test]
    fn editing_to_the_same_value_is_not_dirty() {
        let mut rec = sample();
        assert_eq!(rec.edit_cell(0, 1, "Rent"), RowState::Clean);
    }

    #[test]
    fn commit_moves_the_baseline() {
        let mut rec = sample();
        rec.edit_cell(0, 2, "120.00");
        rec.commit_row(0);

        assert_eq!(rec.state(0), RowState::Clean);
        assert_eq!(rec.baseline()[0], rec.rows()[0]);
        assert_eq!(rec.baseline()[0][2], "120.00");

        // the committed value is now the reference
        assert_eq!(rec.edit_cell(0, 2, "100.00"), RowState::Dirty);
        assert_eq!(rec.edit_cell(0, 2, "120.00"), RowState::Clean);
    }

    #[test]
    fn committing_a_clean_row_is_a_no_op() {
        let mut rec = sample();
        let before = rec.clone();
        rec.commit_row(1);
        assert_eq!(rec, before);
    }

    #[test]
    fn revert_restores_the_baseline() {
        let mut rec = sample();
        rec.edit_cell(1, 0, "Jun 03");
        rec.edit_cell(1, 2, "oops");
        rec.revert_row(1);

        assert_eq!(rec.rows()[1], strings(&["Jun 02", "Groceries", "50.00"]));
        assert_eq!(rec.state(1), RowState::Clean);
    }

    #[test]
    fn bulk_commit_and_revert() {
        let mut rec = sample();
        rec.edit_cell(0, 1, "Mortgage");
        rec.edit_cell(1, 1, "Market");
        assert_eq!(rec.commit_all(), 2);
        assert_eq!(rec.baseline()[1][1], "Market");

        rec.edit_cell(0, 1, "Rent");
        assert_eq!(rec.revert_all(), 1);
        assert_eq!(rec.rows()[0][1], "Mortgage");
        assert_dirty_matches_diff(&rec);
    }

    #[test]
    fn dirty_set_tracks_diff_through_a_long_edit_sequence() {
        let mut rec = sample();
        let edits = [
            (0, 0, "Jun 1"),
            (1, 2, "5.00"),
            (0, 0, "Jun 01"),
            (1, 1, ""),
            (1, 2, "50.00"),
            (0, 2, "1,000.00"),
            (1, 1, "Groceries"),
        ];
        for (row, col, value) in edits {
            rec.edit_cell(row, col, value);
            assert_dirty_matches_diff(&rec);
        }
        assert_eq!(rec.dirty_rows().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    #[should_panic(expected = "row 5 out of range")]
    fn editing_a_missing_row_panics() {
        sample().edit_cell(5, 0, "x");
    }

    #[test]
    #[should_panic(expected = "column 3 out of range")]
    fn editing_a_missing_column_panics() {
        sample().edit_cell(0, 3, "x");
    }
}
