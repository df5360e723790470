use std::fmt::Debug;

use super::{DataSet, FilterError, Schema};

/**
 * A pipeline stage, turns one data set into another one
 */
pub trait Transformation: Sync + Send + Debug {
    fn get_output_schema(&self, input_schema: &Schema) -> Schema;
    fn transform(&self, dataset: Box<dyn DataSet>) -> Result<Box<dyn DataSet>, FilterError>;

    fn dump(&self) -> String;
}
