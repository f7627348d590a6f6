//! JSON loader.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object: `{"a":1}`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns are the union of object keys in first-seen order; a key missing from a row is null.
//! Values must be scalars: nested objects/arrays are reported as unsupported.

use std::fs;
use std::path::Path;

use serde_json::Map;

use crate::error::{ImportError, ImportResult};
use crate::types::{Column, DataType, Table, Value};

use super::loader::Loader;
use super::report::ImportReport;

/// Loader for `.json` / `.ndjson` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn load(&self, path: &Path) -> ImportResult<(Table, ImportReport)> {
        let bytes = fs::read(path).map_err(|e| ImportError::parse(path, e))?;
        let text = String::from_utf8(bytes).map_err(|e| ImportError::parse(path, e))?;

        let (objects, ndjson) = parse_objects(&text).map_err(|e| ImportError::parse(path, e))?;
        let table = build_table(path, &objects)?;

        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ndjson") => "ndjson",
            _ => "json",
        };
        let mut report = ImportReport::new(format, path, &table).with_note("JSON read in one shot");
        if ndjson {
            report.push_note("parsed as NDJSON");
        }
        Ok((table, report))
    }
}

/// Shape problems in JSON input.
#[derive(Debug, thiserror::Error)]
pub enum JsonShapeError {
    #[error("json input is empty")]
    Empty,

    #[error("json must be an object, an array of objects, or NDJSON")]
    NotObjects,

    #[error("row {row} is not a json object")]
    RowNotObject { row: usize },

    #[error("invalid ndjson at line {line}: {source}")]
    Ndjson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("column '{column}' mixes {first} and {second} values (row {row})")]
    MixedTypes {
        column: String,
        first: DataType,
        second: DataType,
        row: usize,
    },
}

type JsonObject = Map<String, serde_json::Value>;

/// Parse `input` into row objects; the flag is `true` when the NDJSON fallback was used.
fn parse_objects(input: &str) -> Result<(Vec<JsonObject>, bool), JsonShapeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(JsonShapeError::Empty);
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let objects = match v {
            serde_json::Value::Array(items) => into_objects(items)?,
            serde_json::Value::Object(obj) => vec![obj],
            _ => return Err(JsonShapeError::NotObjects),
        };
        return Ok((objects, false));
    }

    // Fall back to NDJSON.
    let mut values = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v = serde_json::from_str::<serde_json::Value>(line)
            .map_err(|source| JsonShapeError::Ndjson { line: i + 1, source })?;
        values.push(v);
    }
    Ok((into_objects(values)?, true))
}

fn into_objects(values: Vec<serde_json::Value>) -> Result<Vec<JsonObject>, JsonShapeError> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx0, v)| match v {
            serde_json::Value::Object(obj) => Ok(obj),
            _ => Err(JsonShapeError::RowNotObject { row: idx0 + 1 }),
        })
        .collect()
}

fn build_table(path: &Path, objects: &[JsonObject]) -> ImportResult<Table> {
    let mut names: Vec<&str> = Vec::new();
    for obj in objects {
        for key in obj.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key);
            }
        }
    }

    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let cells: Vec<Option<&serde_json::Value>> = objects.iter().map(|o| o.get(name)).collect();
        let data_type = infer_column_type(path, name, &cells)?;
        let values = cells
            .into_iter()
            .map(|cell| convert_json_value(cell, data_type))
            .collect();
        columns.push(Column::new(name, data_type, values));
    }

    Ok(Table::new(columns))
}

fn scalar_type(v: &serde_json::Value) -> Option<DataType> {
    match v {
        serde_json::Value::Bool(_) => Some(DataType::Bool),
        serde_json::Value::Number(n) if n.is_i64() => Some(DataType::Int64),
        serde_json::Value::Number(_) => Some(DataType::Float64),
        serde_json::Value::String(_) => Some(DataType::Utf8),
        _ => None,
    }
}

fn infer_column_type(
    path: &Path,
    column: &str,
    cells: &[Option<&serde_json::Value>],
) -> ImportResult<DataType> {
    let mut seen: Option<DataType> = None;
    for (idx0, cell) in cells.iter().enumerate() {
        let row = idx0 + 1;
        let v = match cell {
            None | Some(serde_json::Value::Null) => continue,
            Some(serde_json::Value::Object(_)) => {
                return Err(ImportError::unsupported_feature(
                    path,
                    format!("nested object in column '{column}' (row {row})"),
                ));
            }
            Some(serde_json::Value::Array(_)) => {
                return Err(ImportError::unsupported_feature(
                    path,
                    format!("array value in column '{column}' (row {row})"),
                ));
            }
            Some(v) => v,
        };

        let Some(dt) = scalar_type(v) else { continue };
        seen = match (seen, dt) {
            (None, dt) => Some(dt),
            (Some(a), b) if a == b => Some(a),
            (Some(DataType::Int64), DataType::Float64) | (Some(DataType::Float64), DataType::Int64) => {
                Some(DataType::Float64)
            }
            (Some(first), second) => {
                return Err(ImportError::parse(
                    path,
                    JsonShapeError::MixedTypes {
                        column: column.to_string(),
                        first,
                        second,
                        row,
                    },
                ));
            }
        };
    }
    Ok(seen.unwrap_or(DataType::Utf8))
}

fn convert_json_value(cell: Option<&serde_json::Value>, data_type: DataType) -> Value {
    let Some(v) = cell else {
        return Value::Null;
    };
    match (data_type, v) {
        (DataType::Bool, serde_json::Value::Bool(b)) => Value::Bool(*b),
        (DataType::Int64, serde_json::Value::Number(n)) => n.as_i64().map_or(Value::Null, Value::Int64),
        (DataType::Float64, serde_json::Value::Number(n)) => n.as_f64().map_or(Value::Null, Value::Float64),
        (DataType::Utf8, serde_json::Value::String(s)) => Value::Utf8(s.clone()),
        _ => Value::Null,
    }
}
