// src/session/mod.rs
pub mod reconcile;
pub mod state;

use anyhow::{bail, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{error, info, instrument, warn};

use crate::extract::{decode_elements, ExtractClient};
use crate::process::{build_table, is_valid_cell, Row, StatementTable};

pub use reconcile::EditReconciler;
pub use state::{RowState, UploadState};

/// Shown to the user for any failed upload; transport and service errors
/// are not told apart.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload or parse PDF";

/// Everything the user is working on for the currently loaded statement.
///
/// Headers, rows, baseline and dirty set are always replaced together.
#[derive(Debug, Default)]
pub struct Session {
    headers: Vec<String>,
    rows: EditReconciler,
    upload: UploadState,
    last_error: Option<String>,
}

/// Puts the upload state back to idle when the request finishes or is dropped.
struct InFlightGuard<'a>(&'a mut UploadState);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.0 = UploadState::Idle;
    }
}

/// What an upload left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Loaded { rows: usize },
    NoData,
    Failed,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        self.rows.rows()
    }

    pub fn baseline(&self) -> &[Row] {
        self.rows.baseline()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dirty_rows(&self) -> Vec<usize> {
        self.rows.dirty_rows().collect()
    }

    pub fn row_state(&self, row: usize) -> RowState {
        self.rows.state(row)
    }

    /// Mark an upload as outstanding. Refused while one already is.
    pub fn begin_upload(&mut self) -> Result<()> {
        if self.upload == UploadState::InFlight {
            bail!("an upload is already in progress");
        }
        self.upload = UploadState::InFlight;
        Ok(())
    }

    /// Replace the whole session with what the service returned.
    pub fn accept_response(&mut self, body: &Value) -> UploadOutcome {
        self.upload = UploadState::Idle;
        self.last_error = None;
        match build_table(decode_elements(body)) {
            Some(table) => {
                let rows = table.rows.len();
                self.load(table);
                info!(rows, "statement loaded");
                UploadOutcome::Loaded { rows }
            }
            None => {
                self.clear();
                warn!("extraction returned nothing usable");
                UploadOutcome::NoData
            }
        }
    }

    /// Drop everything after a failed upload.
    pub fn fail_upload(&mut self, err: &anyhow::Error) -> UploadOutcome {
        error!("upload failed: {:#}", err);
        self.upload = UploadState::Idle;
        self.clear();
        self.last_error = Some(UPLOAD_FAILED_MESSAGE.to_string());
        UploadOutcome::Failed
    }

    /// Upload `pdf_path` through `client` and load the result. A single attempt.
    ///
    /// Dropping the returned future mid-request leaves the session as it was,
    /// back in [`UploadState::Idle`].
    #[instrument(level = "info", skip(self, client), fields(path = %pdf_path.display()))]
    pub async fn upload(&mut self, client: &ExtractClient, pdf_path: &Path) -> Result<UploadOutcome> {
        self.begin_upload()?;
        let result = {
            let _in_flight = InFlightGuard(&mut self.upload);
            client.extract_file(pdf_path).await
        };
        let outcome = match result {
            Ok(body) => self.accept_response(&body),
            Err(err) => self.fail_upload(&err),
        };
        Ok(outcome)
    }

    fn load(&mut self, table: StatementTable) {
        let StatementTable { headers, rows } = table;
        self.headers = headers;
        self.rows = EditReconciler::new(rows);
    }

    fn clear(&mut self) {
        self.headers.clear();
        self.rows = EditReconciler::default();
    }

    /// Column index for a header name, ignoring case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name.trim()))
    }

    pub fn edit_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> RowState {
        self.rows.edit_cell(row, col, value)
    }

    pub fn commit_row(&mut self, row: usize) {
        self.rows.commit_row(row)
    }

    pub fn revert_row(&mut self, row: usize) {
        self.rows.revert_row(row)
    }

    pub fn commit_all(&mut self) -> usize {
        self.rows.commit_all()
    }

    pub fn revert_all(&mut self) -> usize {
        self.rows.revert_all()
    }

    /// Live validity of one cell. Never cached.
    pub fn is_cell_valid(&self, row: usize, col: usize) -> bool {
        is_valid_cell(&self.headers[col], &self.rows.rows()[row][col])
    }

    /// Every (row, column) currently failing its column rule.
    pub fn invalid_cells(&self) -> Vec<(usize, usize)> {
        let headers = &self.headers;
        self.rows
            .rows()
            .iter()
            .enumerate()
            .flat_map(move |(r, row)| {
                row.iter()
                    .zip(headers)
                    .enumerate()
                    .filter(|(_, (value, header))| !is_valid_cell(header, value))
                    .map(move |(c, _)| (r, c))
            })
            .collect()
    }

    /// Plain-text rendering: dirty rows carry `*`, invalid cells a trailing `!`.
    pub fn render(&self) -> String {
        if self.headers.is_empty() {
            return match &self.last_error {
                Some(msg) => format!("{}\n", msg),
                None => "No data yet.\n".to_string(),
            };
        }

        let mut grid: Vec<Vec<String>> = Vec::with_capacity(self.rows.len() + 1);
        let mut head = vec!["#".to_string()];
        head.extend(self.headers.iter().cloned());
        grid.push(head);
        for (r, row) in self.rows.rows().iter().enumerate() {
            let marker = if self.row_state(r).is_dirty() { "*" } else { "" };
            let mut line = vec![format!("{}{}", r, marker)];
            for (c, value) in row.iter().enumerate() {
                let flag = if self.is_cell_valid(r, c) { "" } else { "!" };
                line.push(format!("{}{}", value, flag));
            }
            grid.push(line);
        }

        let widths: Vec<usize> = (0..grid[0].len())
            .map(|c| grid.iter().map(|l| l[c].chars().count()).max().unwrap_or(0))
            .collect();
        let mut out = String::new();
        for line in &grid {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
                .collect();
            out.push_str(cells.join(" | ").trim_end());
            out.push('\n');
        }
        if self.rows.is_empty() {
            out.push_str("(no transactions)\n");
        }
        out
    }
}
