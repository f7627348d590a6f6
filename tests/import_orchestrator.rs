use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use edamorph_core::ingestion::{
    load_table, ImportReport, Importer, Loader, LoaderRegistry, DEDUP_NOTE,
};
use edamorph_core::types::{Column, DataType, Table, Value};
use edamorph_core::{ImportError, ImportErrorKind, ImportResult};

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("edamorph-import-{nanos}.{ext}"))
}

/// Returns a fixed set of column names and counts its invocations.
struct FakeLoader {
    names: Vec<&'static str>,
    calls: AtomicUsize,
}

impl FakeLoader {
    fn new(names: Vec<&'static str>) -> Self {
        Self {
            names,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Loader for FakeLoader {
    fn load(&self, path: &Path) -> ImportResult<(Table, ImportReport)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let columns = self
            .names
            .iter()
            .map(|n| Column::new(*n, DataType::Int64, vec![Value::Int64(1)]))
            .collect();
        let table = Table::new(columns);
        let report = ImportReport::new("fake", path, &table).with_note("fake load");
        Ok((table, report))
    }
}

fn registry_with(ext: &str, loader: Arc<FakeLoader>) -> LoaderRegistry {
    let mut registry = LoaderRegistry::new();
    registry.register(ext, loader);
    registry
}

#[test]
fn csv_and_tsv_route_to_the_delimited_loader() {
    let registry = LoaderRegistry::with_default_loaders();
    let importer = Importer::new(&registry);

    let (_, csv_report) = importer.load_table("tests/fixtures/people.csv").unwrap();
    let (_, tsv_report) = importer.load_table("tests/fixtures/people.tsv").unwrap();
    assert_eq!(csv_report.format, "csv");
    assert_eq!(tsv_report.format, "tsv");
}

#[test]
fn end_to_end_duplicate_headers_are_deduped() {
    let (table, report) = load_table("tests/fixtures/t.csv").unwrap();

    assert_eq!(table.column_names(), vec!["name", "name_1", "value"]);
    assert_eq!(table.column("name_1").unwrap().values, vec![Value::Utf8("y".to_string())]);
    assert_eq!(report.format, "csv");
    assert_eq!(report.rows, 1);
    assert_eq!(report.cols, 3);
    assert_eq!(report.notes.len(), 2);
    assert!(!report.notes[0].is_empty());
    assert_eq!(report.notes[1], DEDUP_NOTE);
}

#[test]
fn unique_headers_get_no_dedup_note() {
    let (_, report) = load_table("tests/fixtures/people.csv").unwrap();
    assert!(!report.notes.iter().any(|n| n == DEDUP_NOTE));
}

#[test]
fn report_counts_match_table_after_import() {
    for path in ["tests/fixtures/people.csv", "tests/fixtures/people.tsv", "tests/fixtures/t.csv"] {
        let (table, report) = load_table(path).unwrap();
        assert_eq!(report.rows, table.row_count(), "{path}");
        assert_eq!(report.cols, table.column_count(), "{path}");
    }
}

#[test]
fn dedup_applies_to_any_loader() {
    let fake = Arc::new(FakeLoader::new(vec!["a", "b", "a", "a", "c", "b"]));
    let registry = registry_with(".csv", fake.clone());

    let (table, report) = Importer::new(&registry)
        .load_table("tests/fixtures/people.csv")
        .unwrap();

    assert_eq!(table.column_names(), vec!["a", "b", "a_1", "a_2", "c", "b_1"]);
    assert_eq!(report.format, "fake");
    assert_eq!(report.cols, 6);
    assert_eq!(report.notes, vec!["fake load".to_string(), DEDUP_NOTE.to_string()]);
    assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_file_is_not_found_and_skips_loaders() {
    let fake = Arc::new(FakeLoader::new(vec!["a"]));
    let registry = registry_with(".csv", fake.clone());

    let err = Importer::new(&registry)
        .load_table("/no/such/file.csv")
        .unwrap_err();

    assert_eq!(err.kind(), ImportErrorKind::NotFound);
    assert_eq!(err.path(), Path::new("/no/such/file.csv"));
    assert!(err.to_string().contains("/no/such/file.csv"));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn directory_is_not_found() {
    let err = load_table("tests/fixtures").unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::NotFound);
}

#[test]
fn unregistered_extension_is_unsupported_format() {
    let path = tmp_file("xlsx");
    std::fs::write(&path, b"not really a workbook").unwrap();

    let registry = LoaderRegistry::with_default_loaders();
    let err = Importer::new(&registry).load_table(&path).unwrap_err();

    assert_eq!(err.kind(), ImportErrorKind::UnsupportedFormat);
    assert!(err.to_string().contains(".xlsx"));
    match err {
        ImportError::UnsupportedFormat { extension, .. } => assert_eq!(extension, ".xlsx"),
        other => panic!("unexpected error: {other}"),
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_wins_over_unknown_extension() {
    let err = load_table("/no/such/data.xlsx").unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::NotFound);
}

#[test]
fn extension_lookup_is_case_insensitive() {
    let path = tmp_file("CSV");
    std::fs::write(&path, "x,y\n1,2\n").unwrap();

    let (table, report) = load_table(&path).unwrap();
    assert_eq!(report.format, "csv");
    assert_eq!(table.row_count(), 1);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn loader_errors_propagate_unchanged() {
    let mut registry = LoaderRegistry::new();
    registry.register(
        ".csv",
        Arc::new(|path: &Path| -> ImportResult<(Table, ImportReport)> {
            Err(ImportError::unsupported_feature(path, "fancy construct"))
        }),
    );

    let err = Importer::new(&registry)
        .load_table("tests/fixtures/people.csv")
        .unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::UnsupportedFeature);
    assert!(err.to_string().contains("fancy construct"));
}

#[test]
fn parse_errors_from_real_loader_carry_path() {
    let err = load_table("tests/fixtures/unterminated.csv").unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::ParseError);
    assert!(err.to_string().contains("unterminated.csv"));
}

#[test]
fn open_quote_at_end_of_file_fails_through_the_importer() {
    let registry = LoaderRegistry::with_default_loaders();
    let importer = Importer::new(&registry);
    for fixture in [
        "tests/fixtures/unterminated_last_field.csv",
        "tests/fixtures/unterminated_single_column.csv",
    ] {
        let err = importer.load_table(fixture).unwrap_err();
        assert_eq!(err.kind(), ImportErrorKind::ParseError, "{fixture}");
        assert!(err.to_string().contains(fixture));
    }
}

#[test]
fn one_off_load_table_matches_a_reused_importer() {
    let registry = LoaderRegistry::with_default_loaders();
    let importer = Importer::new(&registry);

    for fixture in ["tests/fixtures/t.csv", "tests/fixtures/people.tsv"] {
        let (shorthand_table, shorthand_report) = load_table(fixture).unwrap();
        let (table, report) = importer.load_table(fixture).unwrap();
        assert_eq!(shorthand_table, table);
        assert_eq!(shorthand_report, report);
    }
}

#[test]
fn registry_can_be_shared_across_threads() {
    let registry = Arc::new(LoaderRegistry::with_default_loaders());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let (table, _) = Importer::new(&registry)
                    .load_table("tests/fixtures/t.csv")
                    .unwrap();
                table.column_names().join(",")
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), "name,name_1,value");
    }
}
