use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{FilterError, Value, ValueType};

/**
 * The column definition
 */
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /**
     * Column name
     */
    pub name: String,

    /**
     * Column type
     */
    #[serde(rename = "type")]
    pub column_type: ValueType,
}

impl Column {
    pub fn new<T>(name: T, column_type: ValueType) -> Self
    where
        T: ToString,
    {
        Self {
            name: name.to_string(),
            column_type,
        }
    }
}

/**
 * Schema is an ordered collection of columns
 */
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl<T> From<T> for Schema
where
    T: IntoIterator<Item = Column>,
{
    fn from(columns: T) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }
}

impl FromIterator<Column> for Schema {
    fn from_iter<T: IntoIterator<Item = Column>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl Schema {
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name == column_name)
    }

    /**
     * Find the column by name, the first one wins if the name is duplicated
     */
    pub fn lookup_column(&self, column_name: &str) -> Result<&Column, FilterError> {
        self.columns
            .iter()
            .find(|column| column.name == column_name)
            .ok_or_else(|| FilterError::ColumnNotFound(column_name.to_owned()))
    }

    pub fn dump(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{} as {}", c.name, c.column_type))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/**
 * The DataSet interface
 * A DataSet is a stream of rows, each row is a collection of fields aligned to the schema.
 * DataSet works like an iterator, it can only be used once.
 */
#[async_trait]
pub trait DataSet: Sync + Send {
    /**
     * Get the schema of the data set
     */
    fn schema(&self) -> &Schema;

    /**
     * Get the next row of the data set, returns None if there is no more row
     */
    async fn next(&mut self) -> Option<Result<Vec<Value>, FilterError>>;

    /**
     * Get all rows of the data set in order, the first failed row aborts the whole evaluation
     */
    async fn eval(&mut self) -> Result<(Schema, Vec<Vec<Value>>), FilterError> {
        let mut rows = Vec::new();
        while let Some(row) = self.next().await {
            rows.push(row?);
        }
        Ok((self.schema().clone(), rows))
    }
}

/**
 * Some common operations to create a data set
 */
pub struct DataSetCreator;

impl DataSetCreator {
    /**
     * Create an empty data set which contains no row
     */
    pub fn empty(schema: Schema) -> Box<dyn DataSet> {
        EagerDataSet::new(schema, vec![])
    }

    /**
     * Create a data set from a vector of rows
     */
    pub fn eager<T>(schema: Schema, rows: T) -> Box<dyn DataSet>
    where
        T: IntoIterator<Item = Vec<Value>>,
    {
        EagerDataSet::new(schema, rows.into_iter().collect())
    }
}

#[derive(Clone, Debug)]
struct EagerDataSet {
    schema: Schema,
    rows: VecDeque<Vec<Value>>,
}

impl EagerDataSet {
    fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Box<Self> {
        Box::new(Self {
            schema,
            rows: rows.into(),
        })
    }
}

#[async_trait]
impl DataSet for EagerDataSet {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn next(&mut self) -> Option<Result<Vec<Value>, FilterError>> {
        self.rows.pop_front().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_schema() -> Schema {
        vec![
            Column::new("col1", ValueType::Long),
            Column::new("col2", ValueType::String),
            Column::new("col3", ValueType::Bool),
        ]
        .into()
    }

    #[test]
    fn test_lookup_column() {
        let schema = gen_schema();
        assert_eq!(
            schema.lookup_column("col2").unwrap(),
            &Column::new("col2", ValueType::String)
        );
        assert_eq!(schema.get_column_index("col3"), Some(2));
        assert_eq!(
            schema.lookup_column("missing"),
            Err(FilterError::ColumnNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_schema_from_json() {
        let schema: Schema = serde_json::from_str(
            r#"[{"name": "col1", "type": "long"}, {"name": "col2", "type": "string"}, {"name": "col3", "type": "boolean"}]"#,
        )
        .unwrap();
        assert_eq!(schema, gen_schema());
        assert_eq!(schema.dump(), "col1 as long, col2 as string, col3 as boolean");
    }

    #[tokio::test]
    async fn test_eager_eval_keeps_order() {
        let rows = vec![
            vec![Value::from(10), Value::from("foo"), Value::from(true)],
            vec![Value::from(20), Value::Null, Value::from(false)],
            vec![Value::from(30), Value::from("bar"), Value::Null],
        ];
        let (schema, ret) = DataSetCreator::eager(gen_schema(), rows.clone())
            .eval()
            .await
            .unwrap();
        assert_eq!(schema, gen_schema());
        assert_eq!(ret, rows);
    }

    #[tokio::test]
    async fn test_empty() {
        let (schema, rows) = DataSetCreator::empty(gen_schema()).eval().await.unwrap();
        assert_eq!(schema, gen_schema());
        assert!(rows.is_empty());
    }
}
