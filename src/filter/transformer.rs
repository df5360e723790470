use std::sync::Arc;

use super::{Column, FilterError, NullMarkerTable, RecordBuilder, RecordReader, Schema, Value, ValueType};

/**
 * Maps one input row to one output row of the same schema.
 * String cells equal to the configured marker of their column become null, everything else is copied.
 * Only holds shared read-only state, so it can be cloned into as many workers as needed.
 */
#[derive(Clone, Debug)]
pub struct RecordTransformer {
    input_schema: Arc<Schema>,
    output_schema: Arc<Schema>,
    markers: Arc<NullMarkerTable>,
    // Output columns sit at the same positions as input columns
    aligned: bool,
}

impl RecordTransformer {
    pub fn new(
        input_schema: Arc<Schema>,
        output_schema: Arc<Schema>,
        markers: Arc<NullMarkerTable>,
    ) -> Self {
        let aligned = Arc::ptr_eq(&input_schema, &output_schema) || input_schema == output_schema;
        Self {
            input_schema,
            output_schema,
            markers,
            aligned,
        }
    }

    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    pub fn markers(&self) -> &NullMarkerTable {
        &self.markers
    }

    /**
     * Transform a single cell according to the declared type of its column
     */
    pub fn transform_value(&self, column: &Column, value: Value) -> Result<Value, FilterError> {
        match (column.column_type, value) {
            // Existing nulls stay null whatever the type is
            (_, Value::Null) => Ok(Value::Null),
            (ValueType::String, Value::String(s)) => {
                if self.markers.matches(&column.name, &s) {
                    Ok(Value::Null)
                } else {
                    Ok(Value::String(s))
                }
            }
            (ValueType::Bool, v @ Value::Bool(_))
            | (ValueType::Long, v @ Value::Long(_))
            | (ValueType::Double, v @ Value::Double(_))
            | (ValueType::Json, v @ Value::Json(_))
            | (ValueType::Timestamp, v @ Value::Timestamp(_)) => Ok(v),
            (expected, v) => Err(FilterError::InvalidColumnType(
                column.name.clone(),
                expected,
                v.value_type(),
            )),
        }
    }

    /**
     * Transform a row aligned to the input schema, the output is aligned to the output schema
     */
    pub fn transform_row(&self, row: Vec<Value>) -> Result<Vec<Value>, FilterError> {
        if row.len() != self.input_schema.columns.len() {
            return Err(FilterError::InvalidRowLength(
                self.input_schema.columns.len(),
                row.len(),
            ));
        }
        if self.aligned {
            return row
                .into_iter()
                .zip(self.output_schema.columns.iter())
                .map(|(value, column)| self.transform_value(column, value))
                .collect();
        }
        self.output_schema
            .columns
            .iter()
            .map(|column| {
                let idx = self.input_index(column)?;
                self.transform_value(column, row[idx].clone())
            })
            .collect()
    }

    /**
     * Transform the current row of `reader` into the current row of `builder`.
     * The caller commits the output row.
     */
    pub fn transform_record(
        &self,
        reader: &dyn RecordReader,
        builder: &mut dyn RecordBuilder,
    ) -> Result<(), FilterError> {
        for (output_idx, output_column) in self.output_schema.columns.iter().enumerate() {
            let input_idx = if self.aligned {
                output_idx
            } else {
                self.input_index(output_column)?
            };
            if reader.is_null(input_idx)? {
                builder.set_null(output_idx)?;
                continue;
            }
            match output_column.column_type {
                ValueType::Bool => builder.set_boolean(output_idx, reader.get_boolean(input_idx)?)?,
                ValueType::Long => builder.set_long(output_idx, reader.get_long(input_idx)?)?,
                ValueType::Double => builder.set_double(output_idx, reader.get_double(input_idx)?)?,
                ValueType::Json => builder.set_json(output_idx, reader.get_json(input_idx)?.clone())?,
                ValueType::Timestamp => {
                    builder.set_timestamp(output_idx, reader.get_timestamp(input_idx)?)?
                }
                ValueType::String => {
                    let value = reader.get_string(input_idx)?;
                    if self.markers.matches(&output_column.name, value) {
                        builder.set_null(output_idx)?
                    } else {
                        builder.set_string(output_idx, value.to_owned())?
                    }
                }
                ValueType::Null => Err(FilterError::InternalError(format!(
                    "column {} has no concrete type",
                    output_column.name
                )))?,
            }
        }
        Ok(())
    }

    /**
     * Output columns are resolved in the input schema by name, a miss means the schemas diverged
     */
    fn input_index(&self, output_column: &Column) -> Result<usize, FilterError> {
        self.input_schema
            .get_column_index(&output_column.name)
            .ok_or_else(|| {
                FilterError::InternalError(format!(
                    "output column {} has no counterpart in the input schema",
                    output_column.name
                ))
            })
    }
}
