//! CSV/TSV loader.
//!
//! Reads the whole file in one pass (no batching): the first record is the header, every header
//! field becomes a column, and each column's type is inferred from all of its values.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{ImportError, ImportResult};
use crate::types::{Column, DataType, Table, Value};

use super::loader::Loader;
use super::report::ImportReport;

/// Note recorded on every report produced by [`DelimitedLoader`].
pub const ONE_SHOT_NOTE: &str = "CSV read in one shot (no batching)";

/// Parsing options for [`DelimitedLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedOptions {
    /// Treat empty fields in text columns as [`Value::Null`] instead of `Utf8("")`.
    ///
    /// Empty fields in numeric/boolean columns are always null.
    pub strings_can_be_null: bool,
    /// Quote character.
    pub quote: u8,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            strings_can_be_null: true,
            quote: b'"',
        }
    }
}

/// Delimiter-separated values loader; one instance serves both `.csv` and `.tsv`.
#[derive(Debug, Clone, Default)]
pub struct DelimitedLoader {
    options: DelimitedOptions,
}

impl DelimitedLoader {
    pub fn new(options: DelimitedOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DelimitedOptions {
        &self.options
    }

    /// Delimiter and format label for `path`: tab/`"tsv"` for `.tsv`, comma/`"csv"` otherwise.
    pub fn dialect_for(path: &Path) -> (u8, &'static str) {
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
        if is_tsv { (b'\t', "tsv") } else { (b',', "csv") }
    }
}

impl Loader for DelimitedLoader {
    fn load(&self, path: &Path) -> ImportResult<(Table, ImportReport)> {
        let (delimiter, format) = Self::dialect_for(path);

        let bytes = fs::read(path).map_err(|e| ImportError::parse(path, e))?;
        check_quotes_closed(&bytes, delimiter, self.options.quote)
            .map_err(|e| ImportError::parse(path, e))?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .quote(self.options.quote)
            .from_reader(bytes.as_slice());

        let table = read_delimited(&mut rdr, &self.options).map_err(|e| ImportError::parse(path, e))?;
        let report = ImportReport::new(format, path, &table).with_note(ONE_SHOT_NOTE);
        Ok((table, report))
    }
}

/// Read all records from an existing CSV reader into a [`Table`].
///
/// The reader must be configured with headers enabled. A source without a header record
/// (an empty file) is rejected, as are records whose field count differs from the header's.
pub fn read_delimited<R: Read>(
    rdr: &mut csv::Reader<R>,
    options: &DelimitedOptions,
) -> Result<Table, DelimitedError> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(DelimitedError::MissingHeader);
    }

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in rdr.records() {
        let record = result?;
        for (col, field) in raw_columns.iter_mut().zip(record.iter()) {
            col.push(field.to_owned());
        }
    }

    let columns = headers
        .iter()
        .zip(raw_columns)
        .map(|(name, raw)| build_column(name, raw, options))
        .collect();

    Ok(Table::new(columns))
}

/// Failure while reading delimited text.
#[derive(Debug, thiserror::Error)]
pub enum DelimitedError {
    /// Underlying CSV reader error (I/O, UTF-8, unequal field counts, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no header row found (empty input)")]
    MissingHeader,

    /// A quoted field is still open at end of input.
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// Just saw a quote inside a quoted field: either the closing quote or half of `""`.
    QuoteInQuoted,
}

/// Fail if `input` ends inside a quoted field.
///
/// The `csv` reader silently runs an open quote to end of input, which only surfaces as an
/// error when it happens to shorten a record. This tracks quoting the way the reader does
/// (quotes open a field only at its start, `""` escapes a quote) and reports the line where the
/// dangling quote was opened.
pub fn check_quotes_closed(input: &[u8], delimiter: u8, quote: u8) -> Result<(), DelimitedError> {
    let mut state = QuoteState::FieldStart;
    let mut line = 1usize;
    let mut opened_on = 1usize;

    for &b in input {
        state = match state {
            QuoteState::FieldStart if b == quote => {
                opened_on = line;
                QuoteState::Quoted
            }
            QuoteState::FieldStart | QuoteState::Unquoted | QuoteState::QuoteInQuoted
                if b == delimiter || b == b'\n' || b == b'\r' =>
            {
                QuoteState::FieldStart
            }
            QuoteState::FieldStart | QuoteState::Unquoted => QuoteState::Unquoted,
            QuoteState::Quoted if b == quote => QuoteState::QuoteInQuoted,
            QuoteState::Quoted => QuoteState::Quoted,
            QuoteState::QuoteInQuoted if b == quote => QuoteState::Quoted,
            QuoteState::QuoteInQuoted => QuoteState::Unquoted,
        };
        if b == b'\n' {
            line += 1;
        }
    }

    if state == QuoteState::Quoted {
        return Err(DelimitedError::UnterminatedQuote { line: opened_on });
    }
    Ok(())
}

fn build_column(name: &str, raw: Vec<String>, options: &DelimitedOptions) -> Column {
    let data_type = infer_type(&raw);
    let values = raw
        .into_iter()
        .map(|field| convert_field(field, data_type, options))
        .collect();
    Column::new(name, data_type, values)
}

/// Narrowest type every non-empty field parses as: Int64, then Float64, then Bool, else Utf8.
fn infer_type(raw: &[String]) -> DataType {
    let mut non_empty = raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).peekable();
    if non_empty.peek().is_none() {
        return DataType::Utf8;
    }

    let candidates = [DataType::Int64, DataType::Float64, DataType::Bool];
    let mut viable = [true; 3];
    for field in non_empty {
        viable[0] &= field.parse::<i64>().is_ok();
        viable[1] &= field.parse::<f64>().is_ok();
        viable[2] &= parse_bool(field).is_some();
        if !viable.iter().any(|v| *v) {
            return DataType::Utf8;
        }
    }

    candidates
        .into_iter()
        .zip(viable)
        .find_map(|(dt, ok)| ok.then_some(dt))
        .unwrap_or(DataType::Utf8)
}

/// Convert one raw field; `data_type` comes from [`infer_type`] so parsing cannot fail.
fn convert_field(raw: String, data_type: DataType, options: &DelimitedOptions) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() && data_type != DataType::Utf8 {
        return Value::Null;
    }

    match data_type {
        DataType::Utf8 if raw.is_empty() && options.strings_can_be_null => Value::Null,
        DataType::Utf8 => Value::Utf8(raw),
        DataType::Int64 => trimmed.parse().map_or(Value::Null, Value::Int64),
        DataType::Float64 => trimmed.parse().map_or(Value::Null, Value::Float64),
        DataType::Bool => parse_bool(trimmed).map_or(Value::Null, Value::Bool),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" => Some(true),
        "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}
