use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid cell coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, WorkbookError>;

/// A 1-based cell position, written like `B3`. Built through `new` or
/// parsing, so neither coordinate is ever 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub(crate) column: usize,
    pub(crate) row: usize,
}

impl CellRef {
    pub fn new(column: usize, row: usize) -> Result<Self> {
        if column == 0 || row == 0 {
            return Err(WorkbookError::InvalidCoordinate(format!(
                "column {} row {} (both start at 1)",
                column, row
            )));
        }
        Ok(Self { column, row })
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn down(self) -> Self {
        Self {
            row: self.row + 1,
            ..self
        }
    }

    pub fn right(self) -> Self {
        Self {
            column: self.column + 1,
            ..self
        }
    }

    /// None on the first row
    pub fn up(self) -> Option<Self> {
        (self.row > 1).then(|| Self {
            row: self.row - 1,
            ..self
        })
    }

    /// None on the first column
    pub fn left(self) -> Option<Self> {
        (self.column > 1).then(|| Self {
            column: self.column - 1,
            ..self
        })
    }
}

/// Column letters for a 1-based column: 1 → A, 27 → AA
pub fn column_name(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}

impl FromStr for CellRef {
    type Err = WorkbookError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || WorkbookError::InvalidCoordinate(s.to_string());
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let column = letters
            .to_ascii_uppercase()
            .bytes()
            .try_fold(0usize, |acc, b| {
                acc.checked_mul(26)?.checked_add((b - b'A' + 1) as usize)
            })
            .ok_or_else(invalid)?;
        let row: usize = digits.parse().map_err(|_| invalid())?;
        CellRef::new(column, row).map_err(|_| invalid())
    }
}

/// Title and body text for one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardText {
    pub title: String,
    pub body: String,
}
