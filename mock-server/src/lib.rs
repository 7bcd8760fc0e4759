pub mod table;

use std::ops::RangeInclusive;

use axum::{
    extract::{Multipart, Path, Query, Request},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

use crate::table::{column_type, parse_csv, Table, DATA_TYPES, SAMPLE_TYPES};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub service: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A handler failure rendered as `{"detail": ...}` with `status`.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    detail: String,
}

impl AppError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(status = self.status.as_u16(), detail = %self.detail, "request failed");
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// `format` wins over `Accept`; JSON unless either asks for CSV.
pub fn negotiate(format: Option<&str>, accept: Option<&str>) -> Result<OutputFormat, AppError> {
    match format.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => Ok(OutputFormat::Json),
        Some("csv") => Ok(OutputFormat::Csv),
        Some(other) => Err(AppError::bad_request(format!(
            "Invalid format: {other}. Supported formats are: csv, json"
        ))),
        None if accept.is_some_and(|a| a.contains("text/csv")) => Ok(OutputFormat::Csv),
        None => Ok(OutputFormat::Json),
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/data/generate", get(generate_data))
        .route("/api/data/sample", get(sample_catalog))
        .route("/api/data/sample/{sample_type}", get(get_sample))
        .route("/api/data/upload", post(upload_file))
        .layer(middleware::from_fn(audit_log))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn audit_log(request: Request, next: Next) -> Response {
    tracing::info!(method = %request.method(), path = %request.uri().path(), "request received");
    next.run(request).await
}

type QueryPairs = Vec<(String, String)>;

fn first<'a>(pairs: &'a QueryPairs, name: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

fn bounded(pairs: &QueryPairs, name: &str, default: usize, range: RangeInclusive<usize>) -> Result<usize, AppError> {
    let Some(raw) = first(pairs, name) else {
        return Ok(default);
    };
    match raw.parse::<usize>() {
        Ok(n) if range.contains(&n) => Ok(n),
        _ => Err(AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "{name} must be an integer between {} and {}",
                range.start(),
                range.end()
            ),
        )),
    }
}

fn accept(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::ACCEPT).and_then(|v| v.to_str().ok())
}

fn render(table: &Table, format: OutputFormat, filename: &str) -> Response {
    match format {
        OutputFormat::Json => Json(table.to_json()).into_response(),
        OutputFormat::Csv => (
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={filename}"),
                ),
            ],
            table.to_csv(),
        )
            .into_response(),
    }
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        service: "mock-server".to_string(),
    })
}

async fn generate_data(
    Query(pairs): Query<QueryPairs>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let rows = bounded(&pairs, "rows", 10, 1..=1000)?;
    let columns = bounded(&pairs, "columns", 10, 1..=20)?;
    let data_types: Vec<String> = pairs
        .iter()
        .filter(|(k, _)| k == "data_types")
        .map(|(_, v)| v.clone())
        .collect();
    if let Some(bad) = data_types.iter().find(|t| !DATA_TYPES.contains(&t.as_str())) {
        return Err(AppError::bad_request(format!(
            "Invalid data type: {bad}. Valid types are: {}",
            DATA_TYPES.join(", ")
        )));
    }
    let format = negotiate(first(&pairs, "format"), accept(&headers))?;

    let table = Table::generate(rows, columns, &data_types);
    Ok(render(&table, format, &format!("generated_data_{rows}x{columns}.csv")))
}

async fn sample_catalog() -> Json<Value> {
    Json(json!({
        "message": "Sample data endpoint",
        "available_samples": SAMPLE_TYPES,
        "formats": ["csv", "json"],
        "usage": "Use /api/data/sample/{sample_type}?format=csv to download a specific sample",
    }))
}

async fn get_sample(
    Path(sample_type): Path<String>,
    Query(pairs): Query<QueryPairs>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let invalid = || {
        AppError::bad_request(format!(
            "Invalid sample type. Valid types are: {}",
            SAMPLE_TYPES.join(", ")
        ))
    };
    if !SAMPLE_TYPES.contains(&sample_type.as_str()) {
        return Err(invalid());
    }
    let rows = bounded(&pairs, "rows", 100, 1..=1000)?;
    let format = negotiate(first(&pairs, "format"), accept(&headers))?;

    let table = Table::sample(&sample_type, rows).ok_or_else(invalid)?;
    Ok(render(&table, format, &format!("{sample_type}_sample.csv")))
}

async fn upload_file(mut multipart: Multipart) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.to_string()))?;
        upload = Some((filename, bytes));
        break;
    }
    let (filename, bytes) = upload.ok_or_else(|| AppError::bad_request("Missing file field"))?;

    let file_type = if filename.ends_with(".csv") {
        "csv"
    } else if filename.ends_with(".json") {
        "json"
    } else {
        return Err(AppError::bad_request("Uploaded file must be a CSV or JSON file"));
    };

    let text = String::from_utf8_lossy(&bytes);
    let mut summary = match file_type {
        "csv" => summarize_csv(&text),
        _ => {
            let parsed: Value = serde_json::from_str(&text)
                .map_err(|_| AppError::bad_request("Invalid JSON file"))?;
            summarize_json(parsed)
        }
    };
    summary.insert("filename".into(), json!(filename));
    summary.insert("file_type".into(), json!(file_type));
    summary.insert("api_version".into(), json!(VERSION));

    tracing::info!(%filename, file_type, "processed upload");
    Ok((StatusCode::CREATED, Json(Value::Object(summary))))
}

fn summarize_csv(text: &str) -> Map<String, Value> {
    let mut records = parse_csv(text).into_iter();
    let columns = records.next().unwrap_or_default();
    let rows: Vec<Vec<String>> = records.collect();
    let column_types: Map<String, Value> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells = rows.iter().map(|row| row.get(i).map_or("", String::as_str));
            (name.clone(), json!(column_type(cells)))
        })
        .collect();
    let sample_rows: Vec<Value> = rows
        .iter()
        .take(5)
        .map(|row| {
            let record: Map<String, Value> = columns
                .iter()
                .cloned()
                .zip(row.iter().map(|cell| infer(cell)))
                .collect();
            Value::Object(record)
        })
        .collect();

    let mut summary = Map::new();
    summary.insert("row_count".into(), json!(rows.len()));
    summary.insert("column_count".into(), json!(columns.len()));
    summary.insert("columns".into(), json!(columns));
    summary.insert("column_types".into(), Value::Object(column_types));
    summary.insert("sample_rows".into(), Value::Array(sample_rows));
    summary
}

fn infer(cell: &str) -> Value {
    if let Ok(n) = cell.parse::<i64>() {
        return json!(n);
    }
    if let Ok(x) = cell.parse::<f64>() {
        return json!(x);
    }
    Value::String(cell.to_string())
}

fn summarize_json(parsed: Value) -> Map<String, Value> {
    let mut summary = Map::new();
    match parsed {
        Value::Array(items) if items.first().is_some_and(Value::is_object) => {
            let columns: Vec<String> = items[0]
                .as_object()
                .map(|o| o.keys().cloned().collect())
                .unwrap_or_default();
            summary.insert("row_count".into(), json!(items.len()));
            summary.insert("column_count".into(), json!(columns.len()));
            summary.insert("columns".into(), json!(columns));
            summary.insert("sample_rows".into(), json!(items.iter().take(5).collect::<Vec<_>>()));
        }
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(data)) => {
                summary.insert("row_count".into(), json!(data.len()));
                summary.insert(
                    "metadata".into(),
                    object.remove("metadata").unwrap_or_else(|| json!({})),
                );
                summary.insert("sample_rows".into(), json!(data.iter().take(5).collect::<Vec<_>>()));
            }
            Some(other) => {
                object.insert("data".into(), other);
                summary = object;
            }
            None => summary = object,
        },
        other => {
            summary.insert("data".into(), other);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parameter_overrides_accept() {
        assert_eq!(negotiate(Some("JSON"), Some("text/csv")).unwrap(), OutputFormat::Json);
        assert_eq!(negotiate(Some("csv"), None).unwrap(), OutputFormat::Csv);
    }

    #[test]
    fn accept_header_selects_csv() {
        assert_eq!(negotiate(None, Some("text/csv, */*")).unwrap(), OutputFormat::Csv);
        assert_eq!(negotiate(None, Some("application/json")).unwrap(), OutputFormat::Json);
        assert_eq!(negotiate(None, None).unwrap(), OutputFormat::Json);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = negotiate(Some("xml"), None).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn bounded_applies_default_and_range() {
        let pairs = vec![("rows".to_string(), "5".to_string()), ("columns".to_string(), "99".to_string())];
        assert_eq!(bounded(&pairs, "rows", 10, 1..=1000).unwrap(), 5);
        assert_eq!(bounded(&pairs, "missing", 10, 1..=1000).unwrap(), 10);
        let err = bounded(&pairs, "columns", 10, 1..=20).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn csv_summary_counts_rows_and_columns() {
        let summary = summarize_csv("id,name\n1,Ann\n2,\"Lee, Bo\"\n");
        assert_eq!(summary["row_count"], 2);
        assert_eq!(summary["column_count"], 2);
        assert_eq!(summary["sample_rows"][0]["id"], 1);
        assert_eq!(summary["sample_rows"][1]["name"], "Lee, Bo");
        assert_eq!(summary["column_types"], json!({"id": "int64", "name": "object"}));
    }

    #[test]
    fn csv_summary_counts_quoted_line_breaks_as_one_row() {
        let summary = summarize_csv("id,note\r\n1,\"first\r\nsecond\"\r\n2,plain\r\n");
        assert_eq!(summary["row_count"], 2);
        assert_eq!(summary["sample_rows"][0]["note"], "first\r\nsecond");
        assert_eq!(summary["sample_rows"][1]["id"], 2);
    }

    #[test]
    fn json_summary_handles_record_arrays() {
        let summary = summarize_json(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}]));
        assert_eq!(summary["row_count"], 2);
        assert_eq!(summary["columns"], json!(["a", "b"]));
    }

    #[test]
    fn json_summary_handles_data_envelopes() {
        let summary = summarize_json(json!({"metadata": {"rows": 1}, "data": [{"x": 1}]}));
        assert_eq!(summary["row_count"], 1);
        assert_eq!(summary["metadata"]["rows"], 1);
    }

    #[test]
    fn json_summary_wraps_scalars() {
        let summary = summarize_json(json!(42));
        assert_eq!(summary["data"], 42);
    }
}
