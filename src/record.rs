//! Row access for function evaluation.

/// A single row as seen by expression evaluation.
pub trait Record {
    /// String value of column `col`, or `None` when it is NULL.
    ///
    /// Columns past the end of the row read as NULL.
    fn str_a(&self, col: usize) -> Option<&str>;

    fn column_count(&self) -> usize;
}

/// Owned in-memory row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: Vec<Option<String>>,
}

impl Row {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    /// Single-column row.
    pub fn single(value: Option<&str>) -> Self {
        Self {
            values: vec![value.map(str::to_string)],
        }
    }
}

impl From<Vec<Option<&str>>> for Row {
    fn from(values: Vec<Option<&str>>) -> Self {
        Self::new(values.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

impl Record for Row {
    fn str_a(&self, col: usize) -> Option<&str> {
        self.values.get(col).and_then(|v| v.as_deref())
    }

    fn column_count(&self) -> usize {
        self.values.len()
    }
}
