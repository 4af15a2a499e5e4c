pub mod category;
pub mod concurrent_engine;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod monthly;
pub mod partition;
pub mod worker_group;

use std::io::{Read, Write};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use category::CategoryResolver;
use config::AggregatorConfig;
use error::Result;
use models::{CategoryTotals, MonthTotals, Transaction};

/// Read a ledger from CSV with an `id,type,amount,timestamp,mcc,status,owner` header
///
/// Malformed rows are skipped with a warning.
///
/// # Errors
///
/// Fails if the underlying reader fails. Only rows that do not deserialize
/// are skipped.
pub fn read_ledger<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for (line, result) in csv_reader.deserialize().enumerate() {
        match result {
            Ok(transaction) => transactions.push(transaction),
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                tracing::warn!(row = line + 1, error = %err, "skipping malformed ledger row")
            }
        }
    }
    Ok(transactions)
}

/// Aggregate a CSV ledger for one owner and write category totals as CSV
///
/// # Arguments
///
/// * `reader` - Ledger CSV, see [`read_ledger`]
/// * `writer` - Receives `category,amount` rows in major units
/// * `owner_id` - Only this owner's transactions are summed
/// * `config` - Strategy and partition count
/// * `resolver` - Maps raw category codes to labels
///
/// # Errors
///
/// Read and aggregation failures are returned before any output is written.
pub async fn summarize_ledger<R: Read, W: Write>(
    reader: R,
    writer: W,
    owner_id: i64,
    config: &AggregatorConfig,
    resolver: Arc<CategoryResolver>,
) -> Result<()> {
    let transactions: Arc<[Transaction]> = read_ledger(reader)?.into();
    let aggregator = config.build(resolver);
    let totals = aggregator.aggregate(transactions, owner_id).await?;
    write_category_totals(&totals, writer)
}

/// Aggregate a CSV ledger by month and write month totals as CSV
pub async fn summarize_months<R: Read, W: Write>(reader: R, writer: W) -> Result<()> {
    let transactions = read_ledger(reader)?;
    let (totals, grand_total) = monthly::monthly_totals(&transactions).await?;
    write_month_totals(&totals, grand_total, writer)
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    category: &'a str,
    amount: Decimal,
}

#[derive(Serialize)]
struct MonthRow<'a> {
    month: &'a str,
    amount: Decimal,
}

/// Minor units to major units with two decimal places
fn major_units(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}

/// Writer that never emits a header on its own; callers write it first
fn headerless_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer)
}

/// Write category totals as CSV, sorted by category for consistent output
///
/// The header is written even when there are no totals.
pub fn write_category_totals<W: Write>(totals: &CategoryTotals, writer: W) -> Result<()> {
    let mut csv_writer = headerless_writer(writer);
    csv_writer.write_record(["category", "amount"])?;

    let mut rows: Vec<_> = totals.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    for (category, amount) in rows {
        csv_writer.serialize(CategoryRow {
            category,
            amount: major_units(*amount),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write month totals as CSV sorted by month, followed by a `total` row
pub fn write_month_totals<W: Write>(
    totals: &MonthTotals,
    grand_total: i64,
    writer: W,
) -> Result<()> {
    let mut csv_writer = headerless_writer(writer);
    csv_writer.write_record(["month", "amount"])?;

    let mut rows: Vec<_> = totals.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    for (month, amount) in rows {
        csv_writer.serialize(MonthRow {
            month: month.as_str(),
            amount: major_units(*amount),
        })?;
    }
    csv_writer.serialize(MonthRow {
        month: "total",
        amount: major_units(grand_total),
    })?;

    csv_writer.flush()?;
    Ok(())
}
