use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type, UInt64Type,
};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::{DataError, DataResult};
use super::model::{Dataset, Dimension, Measure, Record, required_columns};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a statistics table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least the six required columns
/// * `.json`    – `[{ "state": "...", "year": 2021, ... }, ...]`
/// * `.parquet` – flat table with the same column names
///
/// Columns beyond the required six are ignored.
pub fn load_file(path: &Path) -> DataResult<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" | "txt" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(Dataset::from_records(records))
}

/// Measures are non-negative; anything else is a schema violation.
fn validate(record: Record, location: &str) -> Result<Record, String> {
    if let Some(amount) = record.total_transaction_amount {
        if !amount.is_finite() || amount < 0.0 {
            return Err(format!(
                "{location}: {} must be a non-negative number, got {amount}",
                Measure::TotalTransactionAmount.column()
            ));
        }
    }
    Ok(record)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> DataResult<Vec<Record>> {
    let file = File::open(path).map_err(|e| DataError::access(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    for column in required_columns() {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::schema(path, format!("missing column '{column}'")));
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<Record>().enumerate() {
        let record = result.map_err(|e| csv_error(path, e))?;
        // Header is line 1.
        let record = validate(record, &format!("line {}", row_no + 2))
            .map_err(|msg| DataError::schema(path, msg))?;
        records.push(record);
    }
    Ok(records)
}

fn csv_error(path: &Path, err: csv::Error) -> DataError {
    if err.is_io_error() {
        DataError::access(path, err.into())
    } else {
        DataError::schema(path, err.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape `df.to_json(orient='records')` writes.
fn load_json(path: &Path) -> DataResult<Vec<Record>> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::access(path, e))?;
    let records: Vec<Record> =
        serde_json::from_str(&text).map_err(|e| DataError::schema(path, e.to_string()))?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| validate(rec, &format!("record {i}")))
        .collect::<Result<_, _>>()
        .map_err(|msg| DataError::schema(path, msg))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table. Text columns may be Utf8 or LargeUtf8, integer
/// columns any signed/unsigned 32/64-bit type, and the amount column a float
/// or an integer.
fn load_parquet(path: &Path) -> DataResult<Vec<Record>> {
    let file = File::open(path).map_err(|e| DataError::access(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::schema(path, format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| DataError::schema(path, format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| DataError::schema(path, format!("reading parquet record batch: {e}")))?;
        let offset = records.len();
        read_batch(&batch, offset, &mut records).map_err(|msg| DataError::schema(path, msg))?;
    }
    Ok(records)
}

fn read_batch(batch: &RecordBatch, offset: usize, out: &mut Vec<Record>) -> Result<(), String> {
    let state = column(batch, Dimension::State.column())?;
    let year = column(batch, Dimension::Year.column())?;
    let quarter = column(batch, Dimension::Quarter.column())?;
    let brand = column(batch, Dimension::Brand.column())?;
    let users = column(batch, Measure::TotalUsers.column())?;
    let amount = column(batch, Measure::TotalTransactionAmount.column())?;

    for row in 0..batch.num_rows() {
        let at = format!("row {}", offset + row);
        let user_count = match cell_int(users, row).map_err(|e| format!("{at}: {e}"))? {
            Some(v) => Some(u64::try_from(v).map_err(|_| {
                format!("{at}: {} must be non-negative, got {v}", Measure::TotalUsers.column())
            })?),
            None => None,
        };

        let record = Record {
            state: required(cell_text(state, row), &at, "state")?,
            year: required(cell_int(year, row), &at, "year")?,
            quarter: required(cell_int(quarter, row), &at, "quarter")?,
            brand: required(cell_text(brand, row), &at, "brand")?,
            total_users: user_count,
            total_transaction_amount: cell_float(amount, row).map_err(|e| format!("{at}: {e}"))?,
        };
        out.push(validate(record, &at)?);
    }
    Ok(())
}

// -- Arrow cell helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, String> {
    batch
        .column_by_name(name)
        .ok_or_else(|| format!("missing column '{name}'"))
}

/// Dimension cells must be present.
fn required<T>(cell: Result<Option<T>, String>, at: &str, col: &str) -> Result<T, String> {
    cell.map_err(|e| format!("{at}: {e}"))?
        .ok_or_else(|| format!("{at}: null value in '{col}'"))
}

fn cell_text(col: &ArrayRef, row: usize) -> Result<Option<String>, String> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => Ok(Some(col.as_string::<i32>().value(row).to_string())),
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row).to_string())),
        other => Err(format!("expected a text column, got {other:?}")),
    }
}

fn cell_int(col: &ArrayRef, row: usize) -> Result<Option<i64>, String> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Int32 => i64::from(col.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row),
        DataType::UInt32 => i64::from(col.as_primitive::<UInt32Type>().value(row)),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_err(|_| format!("integer {v} out of range"))?
        }
        other => return Err(format!("expected an integer column, got {other:?}")),
    };
    Ok(Some(value))
}

fn cell_float(col: &ArrayRef, row: usize) -> Result<Option<f64>, String> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Float32 => Ok(Some(f64::from(col.as_primitive::<Float32Type>().value(row)))),
        DataType::Float64 => Ok(Some(col.as_primitive::<Float64Type>().value(row))),
        _ => cell_int(col, row)
            .map(|v| v.map(|i| i as f64))
            .map_err(|_| format!("expected a numeric column, got {:?}", col.data_type())),
    }
}
