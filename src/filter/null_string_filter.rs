use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::{Appliable, Logged};

use super::{
    DataSet, FilterConfig, FilterError, NullMarkerTable, PageBuilder, PageReader, RecordBuilder,
    RecordTransformer, Schema, Transformation, Value, ValueType,
};

/**
 * The null_string filter stage.
 * Built once per run from the configuration and the input schema, read-only afterwards.
 */
#[derive(Clone, Debug)]
pub struct NullStringFilter {
    config: FilterConfig,
    transformer: RecordTransformer,
}

impl NullStringFilter {
    /**
     * Check every configured column exists in the input schema and build the marker table.
     * Returns the output schema, which is always identical to the input schema.
     */
    pub fn validate_and_build(
        config: FilterConfig,
        input_schema: &Schema,
    ) -> Result<(Schema, Self), FilterError> {
        for column_config in &config.columns {
            let column = input_schema
                .lookup_column(&column_config.name)
                .map_err(|_| FilterError::UnknownColumn(column_config.name.clone()))?;
            if column.column_type != ValueType::String {
                warn!(
                    "Column {} is {}, its null marker \"{}\" will never match",
                    column.name, column.column_type, column_config.null_string
                );
            }
        }

        let markers = Arc::new(NullMarkerTable::new(&config.columns));
        let input_schema = Arc::new(input_schema.clone());
        let output_schema = input_schema.clone();
        info!(
            "null_string filter ready, {} of {} columns have a marker",
            markers.len(),
            input_schema.columns.len()
        );
        let transformer = RecordTransformer::new(input_schema, output_schema.clone(), markers);
        Ok((
            output_schema.as_ref().clone(),
            Self {
                config,
                transformer,
            },
        ))
    }

    /**
     * Parse the JSON configuration then validate it against the input schema
     */
    pub fn load(def: &str, input_schema: &Schema) -> Result<(Schema, Self), FilterError> {
        let config = FilterConfig::from_json(def)
            .log()?
            .then(|c| debug!("{} null_string rules loaded", c.columns.len()));
        Self::validate_and_build(config, input_schema).log()
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn input_schema(&self) -> &Schema {
        self.transformer.input_schema()
    }

    pub fn output_schema(&self) -> &Schema {
        self.transformer.output_schema()
    }

    pub fn transformer(&self) -> &RecordTransformer {
        &self.transformer
    }

    pub fn transform_row(&self, row: Vec<Value>) -> Result<Vec<Value>, FilterError> {
        self.transformer.transform_row(row)
    }

    /**
     * Drive the transformer over every remaining row of `reader`, returns the number of rows written
     */
    pub fn process_page(
        &self,
        reader: &mut PageReader,
        builder: &mut PageBuilder,
    ) -> Result<usize, FilterError> {
        let mut count = 0;
        while reader.has_next_row() {
            reader.advance_row();
            self.transformer.transform_record(&*reader, &mut *builder)?;
            builder.add_record();
            count += 1;
        }
        Ok(count)
    }

    /**
     * Process disjoint partitions on separate tasks, results are returned in partition order.
     * The first failed partition fails the whole run.
     */
    #[instrument(level = "trace", skip_all)]
    pub async fn process_partitions(
        &self,
        partitions: Vec<Box<dyn DataSet>>,
    ) -> Result<Vec<Vec<Vec<Value>>>, FilterError> {
        debug!("Processing {} partitions", partitions.len());
        let handles = partitions
            .into_iter()
            .map(|partition| {
                let dataset = self.transform(partition);
                tokio::spawn(async move {
                    let (_, rows) = dataset?.eval().await?;
                    Ok::<_, FilterError>(rows)
                })
            })
            .collect::<Vec<_>>();
        join_all(handles)
            .await
            .into_iter()
            .map(|r| r.map_err(|e| FilterError::InternalError(e.to_string()))?)
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "type": "null_string",
            "columns": self.config.columns,
            "schema": self.input_schema(),
        })
    }
}

impl Transformation for NullStringFilter {
    fn get_output_schema(&self, _input_schema: &Schema) -> Schema {
        self.output_schema().clone()
    }

    fn transform(&self, dataset: Box<dyn DataSet>) -> Result<Box<dyn DataSet>, FilterError> {
        if dataset.schema() != self.input_schema() {
            return Err(FilterError::SchemaMismatch(format!(
                "filter expects ({}), data set has ({})",
                self.input_schema().dump(),
                dataset.schema().dump()
            )));
        }
        Ok(Box::new(NullStringDataSet {
            input: dataset,
            transformer: self.transformer.clone(),
        }))
    }

    fn dump(&self) -> String {
        format!(
            "null-string {}",
            self.config
                .columns
                .iter()
                .map(|c| format!("{} = \"{}\"", c.name, c.null_string.escape_default()))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

struct NullStringDataSet {
    input: Box<dyn DataSet>,
    transformer: RecordTransformer,
}

#[async_trait]
impl DataSet for NullStringDataSet {
    fn schema(&self) -> &Schema {
        self.transformer.output_schema()
    }

    async fn next(&mut self) -> Option<Result<Vec<Value>, FilterError>> {
        let row = self.input.next().await?;
        Some(row.and_then(|row| self.transformer.transform_row(row)))
    }
}
