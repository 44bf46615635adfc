// src/export/mod.rs
use anyhow::anyhow;
use std::str::FromStr;

pub mod csv;
pub mod xlsx;

pub use self::csv::{to_csv_string, write_csv};
pub use self::xlsx::write_xlsx;

/// Export formats the shell offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(anyhow!("unknown export format {:?}", other)),
        }
    }
}
