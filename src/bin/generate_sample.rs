use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One row of the synthetic statistics table.
#[derive(Debug, Serialize)]
struct Row {
    state: String,
    year: i64,
    quarter: i64,
    brand: String,
    total_users: u64,
    total_transaction_amount: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative jitter in `[1 - spread, 1 + spread)`.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + spread * (2.0 * self.next_f64() - 1.0)
    }
}

const STATES: [(&str, f64); 8] = [
    ("Maharashtra", 9.0),
    ("Karnataka", 7.5),
    ("Telangana", 6.0),
    ("Uttar Pradesh", 5.5),
    ("Rajasthan", 4.0),
    ("Kerala", 2.5),
    ("Assam", 1.2),
    ("Goa", 0.4),
];

const BRANDS: [(&str, f64); 6] = [
    ("Xiaomi", 0.26),
    ("Samsung", 0.21),
    ("Vivo", 0.18),
    ("Oppo", 0.14),
    ("Apple", 0.05),
    ("Others", 0.16),
];

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for (state, weight) in STATES {
        for year in 2018..=2023 {
            // Adoption roughly doubles every two years.
            let growth = 2f64.powf((year - 2018) as f64 / 2.0);
            for quarter in 1..=4 {
                let seasonal = 1.0 + 0.05 * quarter as f64;
                for (brand, share) in BRANDS {
                    let users = 120_000.0 * weight * growth * seasonal * share * rng.jitter(0.15);
                    let per_user = 1_450.0 * rng.jitter(0.25);
                    rows.push(Row {
                        state: state.to_string(),
                        year,
                        quarter,
                        brand: brand.to_string(),
                        total_users: users.round() as u64,
                        total_transaction_amount: (users * per_user * 100.0).round() / 100.0,
                    });
                }
            }
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("state", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("quarter", DataType::Int64, false),
        Field::new("brand", DataType::Utf8, false),
        Field::new("total_users", DataType::Int64, false),
        Field::new("total_transaction_amount", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.state.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.quarter))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.brand.as_str()))),
            Arc::new(Int64Array::from_iter_values(
                rows.iter().map(|r| r.total_users as i64),
            )),
            Arc::new(Float64Array::from_iter_values(
                rows.iter().map(|r| r.total_transaction_amount),
            )),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let csv_path = "phonepe csv data.csv";
    let parquet_path = "phonepe_data.parquet";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    println!(
        "Wrote {} rows ({} states × 6 years × 4 quarters × {} brands) to {csv_path} and {parquet_path}",
        rows.len(),
        STATES.len(),
        BRANDS.len()
    );
    Ok(())
}
