// src/process/split.rs

/// The physical lines of one extracted cell.
///
/// A single cell coming back from the extraction service can hold several
/// statement rows stacked on top of each other; each line is one of them.
/// The value is `Copy`, so iterating it any number of times always starts
/// from the first line again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellLines<'a> {
    text: &'a str,
}

/// Split a cell into its lines. A missing or empty cell has no lines.
pub fn split_cell(cell: Option<&str>) -> CellLines<'_> {
    CellLines {
        text: cell.unwrap_or(""),
    }
}

impl<'a> CellLines<'a> {
    /// Lazily yields every line, with `\n` / `\r\n` terminators stripped.
    pub fn iter(&self) -> std::str::Lines<'a> {
        self.text.lines()
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

impl<'a> IntoIterator for CellLines<'a> {
    type Item = &'a str;
    type IntoIter = std::str::Lines<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.text.lines()
    }
}
