use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AggregateError, Result};
use crate::models::{finish_totals, MonthKey, MonthTotals, Transaction};
use crate::worker_group::WorkerGroup;

#[derive(Default)]
struct MonthlyState {
    totals: HashMap<MonthKey, i128>,
    grand_total: i128,
}

/// Bucket every transaction's amount by its UTC month
pub fn group_by_month(transactions: &[Transaction]) -> Result<HashMap<MonthKey, Vec<i64>>> {
    let mut buckets: HashMap<MonthKey, Vec<i64>> = HashMap::new();
    for tx in transactions {
        let key = MonthKey::from_timestamp(tx.id, tx.timestamp)?;
        buckets.entry(key).or_default().push(tx.amount);
    }
    Ok(buckets)
}

/// Sum amounts per calendar month, one worker per month, for all owners
///
/// Returns the per-month totals together with the grand total. Both are
/// written under the same lock, so the grand total always equals the sum of
/// the month totals.
///
/// # Errors
///
/// * [`AggregateError::TimestampOutOfRange`] before any worker starts, if a
///   timestamp cannot be represented as a calendar date
/// * [`AggregateError::AmountOverflow`] if a month total or the grand total
///   does not fit in `i64`
pub async fn monthly_totals(transactions: &[Transaction]) -> Result<(MonthTotals, i64)> {
    let buckets = group_by_month(transactions)?;
    tracing::info!(
        transactions = transactions.len(),
        months = buckets.len(),
        "aggregating ledger by month"
    );

    let shared = Arc::new(Mutex::new(MonthlyState::default()));
    let mut workers = WorkerGroup::with_capacity(buckets.len());

    for (key, amounts) in buckets {
        let shared = Arc::clone(&shared);
        workers.spawn(async move {
            let sum: i128 = amounts.iter().copied().map(i128::from).sum();
            tracing::debug!(month = %key, entries = amounts.len(), sum, "month summed");
            let mut state = shared.lock().await;
            state.totals.insert(key, sum);
            state.grand_total += sum;
        });
    }

    workers.join().await?;

    let state = match Arc::try_unwrap(shared) {
        Ok(mutex) => mutex.into_inner(),
        Err(shared) => {
            let state = shared.lock().await;
            MonthlyState {
                totals: state.totals.clone(),
                grand_total: state.grand_total,
            }
        }
    };
    let grand_total =
        i64::try_from(state.grand_total).map_err(|_| AggregateError::AmountOverflow {
            key: "total".to_string(),
        })?;
    Ok((finish_totals(state.totals)?, grand_total))
}
