use crate::types::*;
use log::debug;

/// How far searches look before giving up
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// A single sheet of text cells. Empty cells are blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub(crate) rows: Vec<Vec<String>>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    pub fn max_column(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell text, or None when blank or outside the sheet
    pub fn get(&self, cell: CellRef) -> Option<&str> {
        self.rows
            .get(cell.row - 1)
            .and_then(|row| row.get(cell.column - 1))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Set a cell, growing the sheet as needed
    pub fn set(&mut self, cell: CellRef, value: impl Into<String>) {
        if self.rows.len() < cell.row {
            self.rows.resize_with(cell.row, Vec::new);
        }
        let row = &mut self.rows[cell.row - 1];
        if row.len() < cell.column {
            row.resize(cell.column, String::new());
        }
        row[cell.column - 1] = value.into();
    }

    pub fn is_blank(&self, cell: CellRef) -> bool {
        self.get(cell).is_none()
    }

    /// First cell holding `value`, scanning each column top to bottom from
    /// A1, within `columns` columns and `rows` rows
    pub fn find(&self, value: &str, columns: usize, rows: usize) -> Result<CellRef> {
        for column in 1..=columns {
            for row in 1..=rows {
                let cell = CellRef { column, row };
                if self.get(cell) == Some(value) {
                    debug!("Found '{}' at {}", value, cell);
                    return Ok(cell);
                }
            }
        }
        Err(WorkbookError::NotFound(format!(
            "Could not find '{}' within {} columns and {} rows",
            value, columns, rows
        )))
    }

    /// Value to the right of the first cell holding `value`
    pub fn find_value_beside(&self, value: &str, columns: usize, rows: usize) -> Result<Option<&str>> {
        let cell = self.find(value, columns, rows)?;
        Ok(self.get(cell.right()))
    }

    /// First non-blank cell strictly below `cell`
    pub fn find_non_blank_below(&self, cell: CellRef) -> Result<CellRef> {
        let mut here = cell;
        for _ in 0..DEFAULT_SEARCH_LIMIT {
            here = here.down();
            if !self.is_blank(here) {
                return Ok(here);
            }
        }
        Err(WorkbookError::NotFound(format!(
            "No values found within {} rows of {}",
            DEFAULT_SEARCH_LIMIT, cell
        )))
    }

    /// First non-blank cell strictly to the right of `cell`
    pub fn find_non_blank_beside(&self, cell: CellRef) -> Result<CellRef> {
        let mut here = cell;
        for _ in 0..DEFAULT_SEARCH_LIMIT {
            here = here.right();
            if !self.is_blank(here) {
                return Ok(here);
            }
        }
        Err(WorkbookError::NotFound(format!(
            "No values found within {} columns of {}",
            DEFAULT_SEARCH_LIMIT, cell
        )))
    }

    fn run(&self, start: CellRef, step: fn(CellRef) -> CellRef) -> Vec<String> {
        let mut out = Vec::new();
        let mut here = start;
        while let Some(value) = self.get(here) {
            out.push(value.to_string());
            here = step(here);
        }
        out
    }

    /// The run of values below `cell`, skipping leading blanks and stopping
    /// at the first blank after them
    pub fn find_values_below(&self, cell: CellRef) -> Result<Vec<String>> {
        let start = self.find_non_blank_below(cell)?;
        Ok(self.run(start, CellRef::down))
    }

    /// The run of values to the right of `cell`, as for `find_values_below`
    pub fn find_values_beside(&self, cell: CellRef) -> Result<Vec<String>> {
        let start = self.find_non_blank_beside(cell)?;
        Ok(self.run(start, CellRef::right))
    }

    /// Write values into the cells below `cell`
    pub fn put_values_below<S: Into<String>>(&mut self, cell: CellRef, values: impl IntoIterator<Item = S>) {
        let mut here = cell;
        for value in values {
            here = here.down();
            self.set(here, value);
        }
    }

    /// Write values into the cells to the right of `cell`
    pub fn put_values_beside<S: Into<String>>(&mut self, cell: CellRef, values: impl IntoIterator<Item = S>) {
        let mut here = cell;
        for value in values {
            here = here.right();
            self.set(here, value);
        }
    }

    /// Look up a value in a table whose row names run down from `corner` and
    /// whose column names run across from it
    pub fn find_value_in_table(
        &self,
        corner: CellRef,
        row_name: &str,
        column_name: &str,
    ) -> Result<Option<&str>> {
        let row = (corner.row..corner.row + DEFAULT_SEARCH_LIMIT).find(|&row| {
            self.get(CellRef {
                row,
                column: corner.column,
            }) == Some(row_name)
        });
        let column = (corner.column..corner.column + DEFAULT_SEARCH_LIMIT).find(|&column| {
            self.get(CellRef {
                row: corner.row,
                column,
            }) == Some(column_name)
        });

        match (row, column) {
            (Some(row), Some(column)) => Ok(self.get(CellRef { column, row })),
            _ => Err(WorkbookError::NotFound(format!(
                "Cannot find cell for ({}, {}) in table at {}",
                row_name, column_name, corner
            ))),
        }
    }
}
