mod config;
mod dataset;
mod errors;
mod marker_table;
mod null_string_filter;
mod record;
mod transformation;
mod transformer;
mod value;

pub use config::{ColumnConfig, FilterConfig};
pub use dataset::{Column, DataSet, DataSetCreator, Schema};
pub use errors::FilterError;
pub use marker_table::NullMarkerTable;
pub use null_string_filter::NullStringFilter;
pub use record::{PageBuilder, PageReader, RecordBuilder, RecordReader};
pub use transformation::Transformation;
pub use transformer::RecordTransformer;
pub use value::{Value, ValueType};
