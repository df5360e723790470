use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{Column, FilterError, Schema, Value};

/**
 * Read access to the current row of an input page.
 * Columns are addressed by their position in the page schema, names may repeat.
 */
pub trait RecordReader {
    fn is_null(&self, column: usize) -> Result<bool, FilterError>;
    fn get_boolean(&self, column: usize) -> Result<bool, FilterError>;
    fn get_long(&self, column: usize) -> Result<i64, FilterError>;
    fn get_double(&self, column: usize) -> Result<f64, FilterError>;
    fn get_string(&self, column: usize) -> Result<&str, FilterError>;
    fn get_json(&self, column: usize) -> Result<&serde_json::Value, FilterError>;
    fn get_timestamp(&self, column: usize) -> Result<DateTime<Utc>, FilterError>;
}

/**
 * Write access to the row being built in an output page, columns are addressed by position
 */
pub trait RecordBuilder {
    fn set_null(&mut self, column: usize) -> Result<(), FilterError>;
    fn set_boolean(&mut self, column: usize, value: bool) -> Result<(), FilterError>;
    fn set_long(&mut self, column: usize, value: i64) -> Result<(), FilterError>;
    fn set_double(&mut self, column: usize, value: f64) -> Result<(), FilterError>;
    fn set_string(&mut self, column: usize, value: String) -> Result<(), FilterError>;
    fn set_json(&mut self, column: usize, value: serde_json::Value) -> Result<(), FilterError>;
    fn set_timestamp(&mut self, column: usize, value: DateTime<Utc>) -> Result<(), FilterError>;

    /**
     * Commit the current row and start a new one
     */
    fn add_record(&mut self);
}

fn column_at(schema: &Schema, column: usize) -> Result<&Column, FilterError> {
    schema.columns.get(column).ok_or_else(|| {
        FilterError::InternalError(format!(
            "column #{} is out of range, schema has {} columns",
            column,
            schema.columns.len()
        ))
    })
}

/**
 * Reads rows of an in-memory page, one at a time.
 * `advance_row` must be called before the first row can be read.
 */
pub struct PageReader {
    schema: Arc<Schema>,
    rows: Vec<Vec<Value>>,
    current: Option<usize>,
}

impl PageReader {
    pub fn new(schema: Arc<Schema>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            schema,
            rows,
            current: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn has_next_row(&self) -> bool {
        self.current.map_or(0, |idx| idx + 1) < self.rows.len()
    }

    /**
     * Move to the next row, returns false and stays put if the page is exhausted
     */
    pub fn advance_row(&mut self) -> bool {
        if !self.has_next_row() {
            return false;
        }
        self.current = Some(self.current.map_or(0, |idx| idx + 1));
        true
    }

    fn cell(&self, column: usize) -> Result<&Value, FilterError> {
        let row = self
            .current
            .and_then(|idx| self.rows.get(idx))
            .ok_or_else(|| FilterError::InternalError("no current row to read".to_string()))?;
        column_at(&self.schema, column)?;
        row.get(column)
            .ok_or(FilterError::InvalidRowLength(self.schema.columns.len(), row.len()))
    }

    /**
     * Wraps a type mismatch with the column name
     */
    fn typed<T>(&self, column: usize, v: Result<T, FilterError>) -> Result<T, FilterError> {
        v.map_err(|e| match e {
            FilterError::InvalidValueType(actual, expected) => FilterError::InvalidColumnType(
                self.schema.columns[column].name.clone(),
                expected,
                actual,
            ),
            e => e,
        })
    }
}

impl RecordReader for PageReader {
    fn is_null(&self, column: usize) -> Result<bool, FilterError> {
        Ok(self.cell(column)?.is_null())
    }

    fn get_boolean(&self, column: usize) -> Result<bool, FilterError> {
        self.typed(column, self.cell(column)?.get_bool())
    }

    fn get_long(&self, column: usize) -> Result<i64, FilterError> {
        self.typed(column, self.cell(column)?.get_long())
    }

    fn get_double(&self, column: usize) -> Result<f64, FilterError> {
        self.typed(column, self.cell(column)?.get_double())
    }

    fn get_string(&self, column: usize) -> Result<&str, FilterError> {
        self.typed(column, self.cell(column)?.get_string())
    }

    fn get_json(&self, column: usize) -> Result<&serde_json::Value, FilterError> {
        self.typed(column, self.cell(column)?.get_json())
    }

    fn get_timestamp(&self, column: usize) -> Result<DateTime<Utc>, FilterError> {
        self.typed(column, self.cell(column)?.get_timestamp())
    }
}

/**
 * Collects output rows in memory, cells that are never set stay null
 */
pub struct PageBuilder {
    schema: Arc<Schema>,
    current: Vec<Value>,
    rows: Vec<Vec<Value>>,
}

impl PageBuilder {
    pub fn new(schema: Arc<Schema>) -> Self {
        let current = vec![Value::Null; schema.columns.len()];
        Self {
            schema,
            current,
            rows: vec![],
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /**
     * Number of committed rows
     */
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /**
     * Take all committed rows, a row that was started but never added is dropped
     */
    pub fn finish(self) -> Vec<Vec<Value>> {
        self.rows
    }

    fn set(&mut self, column: usize, value: Value) -> Result<(), FilterError> {
        column_at(&self.schema, column)?;
        self.current[column] = value;
        Ok(())
    }
}

impl RecordBuilder for PageBuilder {
    fn set_null(&mut self, column: usize) -> Result<(), FilterError> {
        self.set(column, Value::Null)
    }

    fn set_boolean(&mut self, column: usize, value: bool) -> Result<(), FilterError> {
        self.set(column, Value::Bool(value))
    }

    fn set_long(&mut self, column: usize, value: i64) -> Result<(), FilterError> {
        self.set(column, Value::Long(value))
    }

    fn set_double(&mut self, column: usize, value: f64) -> Result<(), FilterError> {
        self.set(column, Value::Double(value))
    }

    fn set_string(&mut self, column: usize, value: String) -> Result<(), FilterError> {
        self.set(column, Value::String(value.into()))
    }

    fn set_json(&mut self, column: usize, value: serde_json::Value) -> Result<(), FilterError> {
        self.set(column, Value::Json(value))
    }

    fn set_timestamp(&mut self, column: usize, value: DateTime<Utc>) -> Result<(), FilterError> {
        self.set(column, Value::Timestamp(value))
    }

    fn add_record(&mut self) {
        let next = vec![Value::Null; self.schema.columns.len()];
        self.rows.push(std::mem::replace(&mut self.current, next));
    }
}

#[cfg(test)]
mod tests {
    use crate::filter::ValueType;

    use super::*;

    fn gen_schema() -> Arc<Schema> {
        Arc::new(
            vec![
                Column::new("a", ValueType::String),
                Column::new("b", ValueType::Long),
            ]
            .into(),
        )
    }

    #[test]
    fn test_reader_iteration() {
        let mut reader = PageReader::new(
            gen_schema(),
            vec![
                vec![Value::from("x"), Value::from(1)],
                vec![Value::Null, Value::from(2)],
            ],
        );

        // Nothing to read before the first advance
        assert!(matches!(reader.is_null(0), Err(FilterError::InternalError(_))));

        assert!(reader.has_next_row());
        assert!(reader.advance_row());
        assert_eq!(reader.get_string(0), Ok("x"));
        assert_eq!(reader.get_long(1), Ok(1));

        assert!(reader.advance_row());
        assert_eq!(reader.is_null(0), Ok(true));
        assert_eq!(reader.get_long(1), Ok(2));

        assert!(!reader.has_next_row());
        assert!(!reader.advance_row());
        assert_eq!(reader.get_long(1), Ok(2));
    }

    #[test]
    fn test_reader_type_mismatch() {
        let mut reader = PageReader::new(gen_schema(), vec![vec![Value::from(1), Value::from(1)]]);
        reader.advance_row();
        assert_eq!(
            reader.get_string(0),
            Err(FilterError::InvalidColumnType(
                "a".to_string(),
                ValueType::String,
                ValueType::Long
            ))
        );
        assert!(matches!(reader.get_long(2), Err(FilterError::InternalError(_))));
    }

    #[test]
    fn test_repeated_column_names() {
        let schema: Arc<Schema> = Arc::new(
            vec![
                Column::new("a", ValueType::String),
                Column::new("a", ValueType::String),
            ]
            .into(),
        );
        let mut reader = PageReader::new(schema.clone(), vec![vec![Value::from("x"), Value::from("y")]]);
        reader.advance_row();
        assert_eq!(reader.get_string(0), Ok("x"));
        assert_eq!(reader.get_string(1), Ok("y"));

        let mut builder = PageBuilder::new(schema);
        builder.set_string(1, "y".to_string()).unwrap();
        builder.set_string(0, "x".to_string()).unwrap();
        builder.add_record();
        assert_eq!(builder.finish(), vec![vec![Value::from("x"), Value::from("y")]]);
    }

    #[test]
    fn test_builder() {
        let mut builder = PageBuilder::new(gen_schema());
        builder.set_string(0, "x".to_string()).unwrap();
        builder.set_long(1, 1).unwrap();
        builder.add_record();
        builder.set_long(1, 2).unwrap();
        builder.add_record();
        // Started but never added
        builder.set_null(0).unwrap();
        assert!(matches!(builder.set_long(2, 3), Err(FilterError::InternalError(_))));
        assert_eq!(builder.len(), 2);
        assert_eq!(
            builder.finish(),
            vec![
                vec![Value::from("x"), Value::from(1)],
                vec![Value::Null, Value::from(2)],
            ]
        );
    }
}
