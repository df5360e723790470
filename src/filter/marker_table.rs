use std::collections::HashMap;

use tracing::debug;

use super::ColumnConfig;

/**
 * Column name to null marker, built once at setup and only read afterwards
 */
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullMarkerTable {
    markers: HashMap<String, String>,
}

impl NullMarkerTable {
    pub fn new<'a, T>(configs: T) -> Self
    where
        T: IntoIterator<Item = &'a ColumnConfig>,
    {
        let mut markers = HashMap::new();
        for config in configs {
            debug!("Column {} uses null marker \"{}\"", config.name, config.null_string);
            // Later entries for the same column replace earlier ones
            markers.insert(config.name.clone(), config.null_string.clone());
        }
        Self { markers }
    }

    pub fn get(&self, column_name: &str) -> Option<&str> {
        self.markers.get(column_name).map(String::as_str)
    }

    /**
     * True if a marker is configured for the column and the value is exactly that marker
     */
    pub fn matches(&self, column_name: &str, value: &str) -> bool {
        self.get(column_name) == Some(value)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.markers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
