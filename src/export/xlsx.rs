// src/export/xlsx.rs
use anyhow::{bail, Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

use crate::process::Row;

/// One sheet: a bold header row, then every row in table order.
pub fn write_xlsx(path: &Path, sheet_name: &str, headers: &[String], rows: &[Row]) -> Result<()> {
    if headers.is_empty() {
        bail!("nothing to export");
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(sheet_name)
            .with_context(|| format!("invalid sheet name {:?}", sheet_name))?;

        for (c, name) in headers.iter().enumerate() {
            sheet.write_string_with_format(0, c as u16, name, &header_format)?;
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate().take(headers.len()) {
                sheet.write_string((r + 1) as u32, c as u16, value)?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "wrote spreadsheet export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, DataType, Reader, Xlsx};
    use tempfile::tempdir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn workbook_reads_back_in_row_order() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.xlsx");
        let headers = strings(&["Date", "Description", "Amount"]);
        let rows = vec![
            strings(&["Jun 01", "Rent", "100.00"]),
            strings(&["Jun 02", "", "50.00"]),
            strings(&["Jun 03", "Coffee", "4.50"]),
        ];

        write_xlsx(&path, "Transactions", &headers, &rows)?;

        let mut workbook: Xlsx<_> = open_workbook(&path)?;
        assert_eq!(workbook.sheet_names(), vec!["Transactions".to_string()]);
        let range = workbook.worksheet_range("Transactions")?;
        let read: Vec<Vec<String>> = range
            .rows()
            .map(|cells| {
                cells
                    .iter()
                    .map(|c| c.get_string().unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        assert_eq!(read.len(), rows.len() + 1);
        assert_eq!(read[0], headers);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(&read[r + 1], row, "row {r}");
        }
        Ok(())
    }

    #[test]
    fn uses_the_configured_sheet_name() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("june.xlsx");
        write_xlsx(&path, "June 2024", &strings(&["Date"]), &[strings(&["Jun 01"])])?;

        let workbook: Xlsx<_> = open_workbook(&path)?;
        assert_eq!(workbook.sheet_names(), vec!["June 2024".to_string()]);
        Ok(())
    }

    #[test]
    fn refuses_an_empty_table() {
        let dir = tempdir().unwrap();
        assert!(write_xlsx(&dir.path().join("x.xlsx"), "Transactions", &[], &[]).is_err());
    }
}
