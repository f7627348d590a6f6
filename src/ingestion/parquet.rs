//! Parquet loader.

use std::path::Path;

use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{ImportError, ImportResult};
use crate::types::{Column, DataType, Table, Value};

use super::loader::Loader;
use super::report::ImportReport;

/// Loader for `.parquet` / `.pq` files.
///
/// Notes:
/// - Only flat schemas are supported; any top-level group (struct/list/map) is reported as
///   [`ImportError::UnsupportedFeature`]
/// - Uses the Parquet record API (`RowIter`) and reads every row group in one pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetLoader;

impl Loader for ParquetLoader {
    fn load(&self, path: &Path) -> ImportResult<(Table, ImportReport)> {
        let reader = SerializedFileReader::try_from(path).map_err(|e| ImportError::parse(path, e))?;

        let names = top_level_columns(path, &reader)?;

        let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        for (idx0, row_res) in reader.into_iter().enumerate() {
            let row_num = idx0 + 1;
            let row = row_res.map_err(|e| ImportError::parse(path, e))?;

            let mut fields = 0usize;
            for ((name, field), out) in row.get_column_iter().zip(values.iter_mut()) {
                out.push(convert_parquet_field(path, row_num, name, field)?);
                fields += 1;
            }
            if fields != names.len() {
                return Err(ImportError::parse(
                    path,
                    format!("row {row_num} has {fields} columns, schema has {}", names.len()),
                ));
            }
        }

        let columns = names
            .into_iter()
            .zip(values)
            .map(|(name, vals)| {
                let data_type = vals
                    .iter()
                    .find_map(Value::data_type)
                    .unwrap_or(DataType::Utf8);
                Column::new(name, data_type, vals)
            })
            .collect();
        let table = Table::new(columns);

        let report = ImportReport::new("parquet", path, &table)
            .with_note("Parquet read via record API in one pass");
        Ok((table, report))
    }
}

fn top_level_columns(
    path: &Path,
    reader: &SerializedFileReader<std::fs::File>,
) -> ImportResult<Vec<String>> {
    let schema = reader.metadata().file_metadata().schema_descr();
    let mut names = Vec::new();
    for field in schema.root_schema().get_fields() {
        if field.is_group() {
            return Err(ImportError::unsupported_feature(
                path,
                format!("nested column '{}'", field.name()),
            ));
        }
        names.push(field.name().to_string());
    }
    Ok(names)
}

fn convert_parquet_field(path: &Path, row: usize, column: &str, f: &Field) -> ImportResult<Value> {
    match f {
        Field::Null => Ok(Value::Null),
        Field::Bool(b) => Ok(Value::Bool(*b)),
        Field::Byte(v) => Ok(Value::Int64(i64::from(*v))),
        Field::Short(v) => Ok(Value::Int64(i64::from(*v))),
        Field::Int(v) => Ok(Value::Int64(i64::from(*v))),
        Field::Long(v) => Ok(Value::Int64(*v)),
        Field::UByte(v) => Ok(Value::Int64(i64::from(*v))),
        Field::UShort(v) => Ok(Value::Int64(i64::from(*v))),
        Field::UInt(v) => Ok(Value::Int64(i64::from(*v))),
        Field::ULong(v) => i64::try_from(*v).map(Value::Int64).map_err(|_| {
            ImportError::parse(
                path,
                format!("row {row} column '{column}': u64 value {v} out of range for i64"),
            )
        }),
        Field::Float(v) => Ok(Value::Float64(f64::from(*v))),
        Field::Double(v) => Ok(Value::Float64(*v)),
        Field::Str(s) => Ok(Value::Utf8(s.clone())),
        other => Err(ImportError::unsupported_feature(
            path,
            format!("column '{column}' holds an unsupported value type (row {row}: {other})"),
        )),
    }
}
