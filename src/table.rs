use crate::schema::{Column, Schema};

/// One trip record: string cells parallel to the table header. An empty cell
/// is a null value.
pub type Row = Vec<String>;

/// Ordered collection of rows sharing a header. Created by the loader,
/// transformed stage by stage, and gone once written.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn schema(&self) -> Schema {
        Schema::detect(&self.columns)
    }
}

/// Typed access to one row's known cells. Null and malformed values surface
/// as `None`; callers decide whether that rejects the row.
pub struct RowView<'a> {
    row: &'a Row,
    schema: &'a Schema,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a Row, schema: &'a Schema) -> Self {
        Self { row, schema }
    }

    /// Raw cell text for a known column; `None` if the column is absent or
    /// the cell is empty.
    pub fn cell(&self, column: Column) -> Option<&'a str> {
        let idx = self.schema.index(column)?;
        let value = self.row.get(idx)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn float(&self, column: Column) -> Option<f64> {
        self.cell(column)?.parse().ok()
    }

    pub fn integer(&self, column: Column) -> Option<i64> {
        self.cell(column)?.parse().ok()
    }
}
