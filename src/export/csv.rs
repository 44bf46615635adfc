// src/export/csv.rs
use anyhow::{bail, Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::{fs, path::Path};
use tracing::info;

use crate::process::Row;

/// Header line as plain comma-joined names, then one line per row with every
/// cell double-quoted. Lines end in `\n`; there is no trailing newline.
pub fn to_csv_string(headers: &[String], rows: &[Row]) -> Result<String> {
    if headers.is_empty() {
        bail!("nothing to export");
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).context("encoding CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV writer: {}", e))?;
    let body = String::from_utf8(bytes).context("CSV output is not UTF-8")?;

    let mut out = headers.join(",");
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body.strip_suffix('\n').unwrap_or(&body));
    }
    Ok(out)
}

pub fn write_csv(path: &Path, headers: &[String], rows: &[Row]) -> Result<()> {
    let text = to_csv_string(headers, rows)?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "wrote CSV export");
    Ok(())
}
