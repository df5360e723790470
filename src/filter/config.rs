use serde::{Deserialize, Serialize};

use super::FilterError;

/**
 * One user rule: values of column `name` equal to `null_string` become null
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,

    /**
     * Exact-match literal, no wildcards and no trimming
     */
    pub null_string: String,
}

impl ColumnConfig {
    pub fn new<N, S>(name: N, null_string: S) -> Self
    where
        N: ToString,
        S: ToString,
    {
        Self {
            name: name.to_string(),
            null_string: null_string.to_string(),
        }
    }
}

/**
 * The filter configuration, keys other than `columns` are left to the host
 */
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub columns: Vec<ColumnConfig>,
}

impl FilterConfig {
    pub fn new(columns: Vec<ColumnConfig>) -> Self {
        Self { columns }
    }

    pub fn from_json(def: &str) -> Result<Self, FilterError> {
        serde_json::from_str(def).map_err(|e| FilterError::InvalidConfig(e.to_string()))
    }
}

impl FromIterator<ColumnConfig> for FilterConfig {
    fn from_iter<T: IntoIterator<Item = ColumnConfig>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let config = FilterConfig::from_json(
            r#"{
                "type": "null_string",
                "columns": [
                    {"name": "a", "null_string": ""},
                    {"name": "b", "null_string": "\\N"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            config,
            FilterConfig::new(vec![
                ColumnConfig::new("a", ""),
                ColumnConfig::new("b", "\\N"),
            ])
        );
        assert_eq!(config.columns[1].null_string.len(), 2);
    }

    #[test]
    fn test_empty_columns() {
        let config = FilterConfig::from_json(r#"{"columns": []}"#).unwrap();
        assert!(config.columns.is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let e = FilterConfig::from_json(r#"{"type": "null_string"}"#).unwrap_err();
        assert!(e.is_configuration_error());
        assert!(e.to_string().contains("columns"));

        let e = FilterConfig::from_json(r#"{"columns": [{"name": "a"}]}"#).unwrap_err();
        assert!(e.to_string().contains("null_string"));

        let e = FilterConfig::from_json(r#"{"columns": [{"name": "a", "null_string": 1}]}"#)
            .unwrap_err();
        assert!(matches!(e, FilterError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            FilterConfig::from_json("columns: []"),
            Err(FilterError::InvalidConfig(_))
        ));
    }
}
