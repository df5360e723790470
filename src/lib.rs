mod common;
mod filter;

pub use common::{Appliable, Logged};
pub use filter::{
    Column, ColumnConfig, DataSet, DataSetCreator, FilterConfig, FilterError, NullMarkerTable,
    NullStringFilter, PageBuilder, PageReader, RecordBuilder, RecordReader, RecordTransformer,
    Schema, Transformation, Value, ValueType,
};
