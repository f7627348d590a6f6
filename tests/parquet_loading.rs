use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use edamorph_core::ingestion::load_table;
use edamorph_core::types::{DataType, Value};
use edamorph_core::ImportErrorKind;

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("edamorph-parquet-{nanos}.{ext}"))
}

fn write_people_parquet(path: &PathBuf) {
    let schema_str = r#"
    message schema {
      REQUIRED INT64 id;
      OPTIONAL BINARY name (UTF8);
      REQUIRED DOUBLE score;
      REQUIRED BOOLEAN active;
    }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::Int64ColumnWriter(w) => {
                w.write_batch(&[1_i64, 2_i64], None, None).unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                // Second row is null.
                w.write_batch(&[ByteArray::from("Ada")], Some(&[1_i16, 0][..]), None)
                    .unwrap();
            }
            ColumnWriter::DoubleColumnWriter(w) => {
                w.write_batch(&[98.5_f64, 87.25_f64], None, None).unwrap();
            }
            ColumnWriter::BoolColumnWriter(w) => {
                w.write_batch(&[true, false], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

/// Writes a file with the given schema and no row groups.
fn write_schema_only_parquet(path: &PathBuf, schema_str: &str) {
    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let writer = SerializedFileWriter::new(file, schema, props).unwrap();
    writer.close().unwrap();
}

#[test]
fn load_parquet_auto_by_extension() {
    let path = tmp_file("parquet");
    write_people_parquet(&path);

    let (table, report) = load_table(&path).unwrap();

    assert_eq!(table.column_names(), vec!["id", "name", "score", "active"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        table.column("name").unwrap().values,
        vec![Value::Utf8("Ada".to_string()), Value::Null]
    );
    assert_eq!(table.column("score").unwrap().data_type, DataType::Float64);
    assert_eq!(table.column("active").unwrap().values[1], Value::Bool(false));
    assert_eq!(report.format, "parquet");
    assert_eq!(report.rows, 2);
    assert_eq!(report.cols, 4);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn pq_extension_routes_to_parquet() {
    let path = tmp_file("pq");
    write_people_parquet(&path);

    let (_, report) = load_table(&path).unwrap();
    assert_eq!(report.format, "parquet");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn nested_group_is_unsupported_feature() {
    let path = tmp_file("parquet");
    write_schema_only_parquet(
        &path,
        r#"
        message schema {
          REQUIRED INT64 id;
          OPTIONAL group address {
            REQUIRED BINARY city (UTF8);
          }
        }
        "#,
    );

    let err = load_table(&path).unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::UnsupportedFeature);
    assert!(err.to_string().contains("nested column 'address'"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn empty_parquet_file_has_columns_and_no_rows() {
    let path = tmp_file("parquet");
    write_schema_only_parquet(
        &path,
        r#"
        message schema {
          REQUIRED INT64 id;
        }
        "#,
    );

    let (table, report) = load_table(&path).unwrap();
    assert_eq!(table.column_names(), vec!["id"]);
    assert_eq!(report.rows, 0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn garbage_bytes_are_parse_errors() {
    let path = tmp_file("parquet");
    std::fs::write(&path, b"definitely not parquet").unwrap();

    let err = load_table(&path).unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::ParseError);
    assert!(err.to_string().contains(path.to_str().unwrap()));

    let _ = std::fs::remove_file(&path);
}
