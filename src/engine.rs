use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::category::CategoryResolver;
use crate::error::{AggregateError, Result};
use crate::models::{finish_totals, CategoryTotals, PartialTotals, Transaction};

/// Common interface over every aggregation strategy
///
/// All implementations must return the same totals for the same input,
/// regardless of how the work is scheduled. A call either returns the fully
/// merged totals or an error, never a partial map.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use spend_aggregator::category::CategoryResolver;
/// use spend_aggregator::concurrent_engine::FanInAggregator;
/// use spend_aggregator::engine::Aggregator;
/// use spend_aggregator::models::Transaction;
///
/// #[tokio::main]
/// async fn main() {
///     let resolver = Arc::new(CategoryResolver::default());
///     // Any strategy can sit behind the trait object
///     let aggregator: Box<dyn Aggregator> = Box::new(FanInAggregator::new(resolver, 8));
///
///     let ledger: Arc<[Transaction]> = vec![
///         Transaction::purchase(1, 2, 1_735_55, 1_577_836_800, "5411"),
///         Transaction::purchase(2, 3, 999, 1_577_836_800, "5411"),
///     ]
///     .into();
///
///     let totals = aggregator.aggregate(ledger, 2).await.unwrap();
///     assert_eq!(totals["Supermarkets"], 1_735_55);
/// }
/// ```
#[async_trait]
pub trait Aggregator: Send + Sync {
    /// Short kebab-case name used in logs and on the command line
    fn name(&self) -> &'static str;

    /// Sum spending per category for one owner
    ///
    /// # Arguments
    ///
    /// * `transactions` - Ledger shared with the workers; never mutated
    /// * `owner_id` - Only this owner's transactions contribute
    ///
    /// # Errors
    ///
    /// * [`AggregateError::InvalidPartitionCount`](crate::error::AggregateError::InvalidPartitionCount)
    ///   before any worker starts, for a zero partition count
    /// * [`AggregateError::AmountOverflow`](crate::error::AggregateError::AmountOverflow)
    ///   if a category total does not fit in `i64`
    async fn aggregate(
        &self,
        transactions: Arc<[Transaction]>,
        owner_id: i64,
    ) -> Result<CategoryTotals>;
}

/// Running per-category sums for `owner_id`, single-threaded
///
/// Transactions of other owners are skipped entirely and never create a key.
/// This is the per-partition unit of work for the reduce-merge and fan-in
/// strategies; their partials are merged exactly before being narrowed.
pub fn accumulate(
    resolver: &CategoryResolver,
    transactions: &[Transaction],
    owner_id: i64,
) -> PartialTotals {
    let mut totals = PartialTotals::new();
    for tx in transactions.iter().filter(|tx| tx.owner_id == owner_id) {
        let label = resolver.resolve(&tx.category_code);
        let amount = i128::from(tx.amount);
        match totals.get_mut(label) {
            Some(total) => *total += amount,
            None => {
                totals.insert(label.to_string(), amount);
            }
        }
    }
    totals
}

/// Sum spending per category for `owner_id`, single-threaded
///
/// This is the baseline every concurrent strategy is checked against.
///
/// # Errors
///
/// [`AggregateError::AmountOverflow`](crate::error::AggregateError::AmountOverflow)
/// if a category total does not fit in `i64`. Intermediate sums may exceed it.
pub fn aggregate(
    resolver: &CategoryResolver,
    transactions: &[Transaction],
    owner_id: i64,
) -> Result<CategoryTotals> {
    finish_totals(accumulate(resolver, transactions, owner_id))
}

/// Total of all transactions whose raw category code is one of `codes`
///
/// Ignores ownership; unknown codes simply contribute nothing.
pub fn sum_by_codes(transactions: &[Transaction], codes: &[&str]) -> Result<i64> {
    let codes: HashSet<&str> = codes.iter().copied().collect();
    let total: i128 = transactions
        .iter()
        .filter(|tx| codes.contains(tx.category_code.as_str()))
        .map(|tx| i128::from(tx.amount))
        .sum();
    i64::try_from(total).map_err(|_| {
        let mut codes: Vec<&str> = codes.into_iter().collect();
        codes.sort_unstable();
        AggregateError::AmountOverflow {
            key: codes.join("+"),
        }
    })
}

/// Sequential baseline behind the [`Aggregator`] interface
pub struct SequentialAggregator {
    resolver: Arc<CategoryResolver>,
}

impl SequentialAggregator {
    pub fn new(resolver: Arc<CategoryResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Aggregator for SequentialAggregator {
    fn name(&self) -> &'static str {
        "sequential"
    }

    async fn aggregate(
        &self,
        transactions: Arc<[Transaction]>,
        owner_id: i64,
    ) -> Result<CategoryTotals> {
        tracing::info!(
            strategy = self.name(),
            owner_id,
            transactions = transactions.len(),
            "aggregating ledger"
        );
        aggregate(&self.resolver, &transactions, owner_id)
    }
}
