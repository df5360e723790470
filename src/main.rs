use clap::Parser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, metadata::LevelFilter};
use tracing_subscriber::EnvFilter;

use null_string_filter::{
    Appliable, DataSetCreator, FilterError, Logged, NullStringFilter, Schema, Transformation,
    Value,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Filter configuration file name
    #[arg(short, long, env = "NULL_STRING_CONFIG")]
    config: String,

    /// Input schema file name
    #[arg(short, long, env = "INPUT_SCHEMA_FILE")]
    schema: String,

    /// Newline-delimited JSON input, `-` reads from stdin
    #[arg(short, long, default_value = "-", env = "INPUT_FILE")]
    input: String,
}

async fn load_file(path: &str) -> Result<String, FilterError> {
    debug!("Reading file at {}", path);
    Ok(if path == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .map(|_| buf)
            .log()
            .map_err(|e| FilterError::Unknown(e.to_string()))
    } else {
        tokio::fs::read_to_string(path)
            .await
            .log()
            .map_err(|e| FilterError::Unknown(e.to_string()))
    }?
    .then(|s| {
        debug!(
            "Successfully read file at {}, file length is {}",
            path,
            s.len()
        );
    }))
}

/**
 * Every line is a JSON object keyed by column name, absent columns are null
 */
fn parse_rows(schema: &Schema, input: &str) -> Result<Vec<Vec<Value>>, FilterError> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut data: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(line).map_err(|e| FilterError::InvalidJsonString(e.to_string()))?;
            schema
                .columns
                .iter()
                .map(|c| match data.remove(&c.name) {
                    Some(v) => Value::from_json(v, c.column_type),
                    None => Ok(Value::Null),
                })
                .collect()
        })
        .collect()
}

/**
 * Render transformed rows as newline-delimited JSON objects keyed by output column name
 */
fn rows_to_ndjson(schema: &Schema, rows: &[Vec<Value>]) -> String {
    let mut out = String::new();
    for row in rows {
        let obj: serde_json::Map<String, serde_json::Value> = schema
            .columns
            .iter()
            .zip(row.iter())
            .map(|(c, v)| (c.name.clone(), v.clone().into()))
            .collect();
        out.push_str(&serde_json::Value::Object(obj).to_string());
        out.push('\n');
    }
    out
}

/**
 * Stdin can only be consumed once
 */
fn check_stdin_args(args: &Args) -> Result<(), FilterError> {
    let stdin_args = [&args.config, &args.schema, &args.input]
        .into_iter()
        .filter(|path| path.as_str() == "-")
        .count();
    if stdin_args > 1 {
        return Err(FilterError::InvalidConfig(format!(
            "{} arguments read from stdin, at most one can be `-`",
            stdin_args
        )));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), FilterError> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("LOG_LEVEL")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    check_stdin_args(&args).log()?;

    let schema: Schema = serde_json::from_str(&load_file(&args.schema).await?)
        .map_err(|e| FilterError::InvalidJsonString(e.to_string()))
        .log()?;
    let (output_schema, null_string) =
        NullStringFilter::load(&load_file(&args.config).await?, &schema)?;
    info!("{}", null_string.dump());

    let rows = parse_rows(&schema, &load_file(&args.input).await?).log()?;
    let (_, rows) = null_string
        .transform(DataSetCreator::eager(schema, rows))?
        .eval()
        .await
        .log()?;

    let out = rows_to_ndjson(&output_schema, &rows);
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(out.as_bytes())
        .await
        .and(stdout.flush().await)
        .map_err(|e| FilterError::Unknown(e.to_string()))?;
    info!("{} rows written", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use null_string_filter::{Column, ValueType};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_rows() {
        let schema: Schema = vec![
            Column::new("a", ValueType::String),
            Column::new("b", ValueType::Long),
        ]
        .into();
        let rows = parse_rows(&schema, "{\"a\": \"x\", \"b\": 1}\n\n{\"b\": null, \"c\": true}\n").unwrap();
        assert_eq!(
            rows,
            vec![
                vec![Value::from("x"), Value::from(1)],
                vec![Value::Null, Value::Null],
            ]
        );
        assert!(matches!(
            parse_rows(&schema, "[1, 2]"),
            Err(FilterError::InvalidJsonString(_))
        ));
        assert!(matches!(
            parse_rows(&schema, "{\"b\": \"1\"}"),
            Err(FilterError::FormatError(_, ValueType::Long))
        ));
    }

    #[test]
    fn test_rows_to_ndjson() {
        let schema: Schema = vec![
            Column::new("name", ValueType::String),
            Column::new("id", ValueType::Long),
            Column::new("ts", ValueType::Timestamp),
        ]
        .into();
        let out = rows_to_ndjson(
            &schema,
            &[
                vec![
                    Value::from("x"),
                    Value::from(1),
                    Value::from(Utc.with_ymd_and_hms(2015, 7, 13, 0, 0, 0).unwrap()),
                ],
                vec![Value::Null, Value::from(2), Value::Null],
            ],
        );
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(
            lines,
            vec![
                json!({"name": "x", "id": 1, "ts": "2015-07-13T00:00:00+00:00"}),
                json!({"name": null, "id": 2, "ts": null}),
            ]
        );
        assert!(out.ends_with('\n'));
        assert_eq!(rows_to_ndjson(&schema, &[]), "");
    }

    #[tokio::test]
    async fn test_failed_run_renders_no_rows() {
        let schema: Schema = vec![Column::new("name", ValueType::String)].into();
        let (output_schema, filter) = NullStringFilter::load(
            r#"{"columns": [{"name": "name", "null_string": "-"}]}"#,
            &schema,
        )
        .unwrap();
        let rows = vec![vec![Value::from("-")], vec![Value::from(1)]];
        let result = filter
            .transform(DataSetCreator::eager(schema, rows))
            .unwrap()
            .eval()
            .await
            .map(|(_, rows)| rows_to_ndjson(&output_schema, &rows));
        assert!(matches!(result, Err(FilterError::InvalidColumnType(..))));
    }

    #[test]
    fn test_single_stdin_argument() {
        let args = Args::try_parse_from(["null-string-filter", "-c", "config.json", "-s", "schema.json"]).unwrap();
        assert_eq!(args.input, "-");
        assert!(check_stdin_args(&args).is_ok());

        let args = Args::try_parse_from(["null-string-filter", "-c", "-", "-s", "schema.json"]).unwrap();
        assert!(matches!(
            check_stdin_args(&args),
            Err(FilterError::InvalidConfig(_))
        ));

        let args = Args::try_parse_from([
            "null-string-filter", "-c", "config.json", "-s", "-", "-i", "rows.json",
        ])
        .unwrap();
        assert!(check_stdin_args(&args).is_ok());
    }
}
