use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResultSetError {
    #[error("row has {actual} fields, header has {expected}")]
    ArityMismatch { expected: usize, actual: usize },
}

/// Header row plus data rows, all of the header's arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    header: Row,
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(header: Row) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Row) -> Result<(), ResultSetError> {
        if row.arity() != self.header.arity() {
            return Err(ResultSetError::ArityMismatch {
                expected: self.header.arity(),
                actual: row.arity(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &Row {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header first, then data rows.
    pub fn iter_all(&self) -> impl Iterator<Item = &Row> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }
}
