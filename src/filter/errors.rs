use thiserror::Error;

use super::ValueType;

// All errors that can be returned by the filter.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FilterError {
    // Unknown error, mostly I/O in the host
    #[error("{0}")]
    Unknown(String),

    // Configured column doesn't exist in the input schema
    #[error("Column '{0}' is configured for null_string but doesn't exist in the input schema.")]
    UnknownColumn(String),

    // Configuration is not valid JSON, or a required field is missing
    #[error("Invalid null_string configuration: {0}")]
    InvalidConfig(String),

    // Column is not found
    #[error("Column '{0}' not found.")]
    ColumnNotFound(String),

    // Row has incorrect number of fields
    #[error("Expecting row with {0} columns, but got {1}")]
    InvalidRowLength(usize, usize),

    // Field in row has incorrect type
    #[error("Expecting column {0} to be {1}, but got {2}")]
    InvalidColumnType(String, ValueType, ValueType),

    // Value is not in the expected type
    #[error("Assume value is {1:?}, but actual type is {0:?}.")]
    InvalidValueType(ValueType, ValueType),

    // The data set fed into a stage doesn't carry the schema the stage was built with
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    // String format error
    #[error("String {0} is not a valid {1:?}.")]
    FormatError(String, ValueType),

    #[error("Invalid JSON string {0}")]
    InvalidJsonString(String),

    // Broken invariant during row processing, the run must abort
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl FilterError {
    /// True if the error was raised while validating the configuration, before any row is processed
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            FilterError::UnknownColumn(_) | FilterError::InvalidConfig(_)
        )
    }
}
