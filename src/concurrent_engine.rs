use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::category::CategoryResolver;
use crate::engine::{self, Aggregator};
use crate::error::{AggregateError, Result};
use crate::models::{finish_totals, merge_totals, CategoryTotals, PartialTotals, Transaction};
use crate::partition::partition;
use crate::worker_group::WorkerGroup;

/// Category totals shared between workers behind one exclusive lock
///
/// Each aggregation call builds its own instance; nothing is shared across
/// calls. Clones are handles to the same map. Sums are held exactly and only
/// narrowed to `i64` by [`GuardedTotals::into_inner`], so the result does not
/// depend on the order workers take the lock.
#[derive(Clone, Default)]
pub struct GuardedTotals {
    inner: Arc<Mutex<PartialTotals>>,
}

impl GuardedTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a whole partial map while holding the lock once
    pub async fn merge(&self, partial: PartialTotals) {
        let mut totals = self.inner.lock().await;
        merge_totals(&mut totals, partial);
    }

    /// Add one amount to one label
    pub async fn add(&self, label: &str, amount: i64) {
        let amount = i128::from(amount);
        let mut totals = self.inner.lock().await;
        match totals.get_mut(label) {
            Some(total) => *total += amount,
            None => {
                totals.insert(label.to_string(), amount);
            }
        }
    }

    /// Current running sum for a label, if any transaction contributed to it
    pub async fn get(&self, label: &str) -> Option<i128> {
        self.inner.lock().await.get(label).copied()
    }

    /// Take the final map once every worker has finished
    ///
    /// # Errors
    ///
    /// [`AggregateError::AmountOverflow`] if a total does not fit in `i64`.
    pub async fn into_inner(self) -> Result<CategoryTotals> {
        let totals = match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner(),
            Err(shared) => shared.lock().await.clone(),
        };
        finish_totals(totals)
    }
}

/// Reduce-then-merge strategy
///
/// Each worker runs the sequential aggregator over its own partition with no
/// shared state, then merges the local map into [`GuardedTotals`]. The lock
/// covers only the merge.
pub struct ReduceMergeAggregator {
    resolver: Arc<CategoryResolver>,
    partitions: usize,
}

impl ReduceMergeAggregator {
    /// Create the strategy
    ///
    /// # Arguments
    ///
    /// * `resolver` - Category table shared by every worker
    /// * `partitions` - Upper bound on the number of parallel workers
    ///   - Higher = more parallelism, more merge overhead
    ///   - Zero is rejected by [`Aggregator::aggregate`] before any worker starts
    pub fn new(resolver: Arc<CategoryResolver>, partitions: usize) -> Self {
        Self {
            resolver,
            partitions,
        }
    }
}

#[async_trait]
impl Aggregator for ReduceMergeAggregator {
    fn name(&self) -> &'static str {
        "reduce-merge"
    }

    async fn aggregate(
        &self,
        transactions: Arc<[Transaction]>,
        owner_id: i64,
    ) -> Result<CategoryTotals> {
        let parts = partition(&transactions, self.partitions)?;
        tracing::info!(
            strategy = self.name(),
            owner_id,
            transactions = transactions.len(),
            partitions = parts.len(),
            "aggregating ledger"
        );

        let shared = GuardedTotals::new();
        let mut workers = WorkerGroup::with_capacity(parts.len());

        for (index, part) in parts.into_iter().enumerate() {
            let resolver = Arc::clone(&self.resolver);
            let shared = shared.clone();
            workers.spawn(async move {
                let local = engine::accumulate(&resolver, &part, owner_id);
                tracing::debug!(
                    partition = index,
                    categories = local.len(),
                    "merging partial totals"
                );
                shared.merge(local).await;
            });
        }

        workers.join().await?;
        shared.into_inner().await
    }
}

/// Channel fan-in strategy
///
/// Each worker sends its complete local map as one message. A single
/// collector receives exactly one message per partition and owns the result,
/// so no lock is involved. The queue holds one slot per partition, so no
/// worker can block on a send that is never received.
pub struct FanInAggregator {
    resolver: Arc<CategoryResolver>,
    partitions: usize,
}

impl FanInAggregator {
    /// Create the strategy
    ///
    /// # Arguments
    ///
    /// * `resolver` - Category table shared by every worker
    /// * `partitions` - Upper bound on the number of parallel workers; the
    ///   queue is sized to the partitions actually produced
    pub fn new(resolver: Arc<CategoryResolver>, partitions: usize) -> Self {
        Self {
            resolver,
            partitions,
        }
    }
}

#[async_trait]
impl Aggregator for FanInAggregator {
    fn name(&self) -> &'static str {
        "fan-in"
    }

    async fn aggregate(
        &self,
        transactions: Arc<[Transaction]>,
        owner_id: i64,
    ) -> Result<CategoryTotals> {
        let parts = partition(&transactions, self.partitions)?;
        let expected = parts.len();
        tracing::info!(
            strategy = self.name(),
            owner_id,
            transactions = transactions.len(),
            partitions = expected,
            "aggregating ledger"
        );

        let (sender, mut receiver) = mpsc::channel::<PartialTotals>(expected);
        let mut workers = WorkerGroup::with_capacity(expected);

        for (index, part) in parts.into_iter().enumerate() {
            let resolver = Arc::clone(&self.resolver);
            let sender = sender.clone();
            workers.spawn(async move {
                let local = engine::accumulate(&resolver, &part, owner_id);
                if sender.send(local).await.is_err() {
                    tracing::debug!(partition = index, "collector gone, dropping partial totals");
                }
            });
        }
        // Only worker clones remain, so the queue closes if every worker exits.
        drop(sender);

        let mut result = PartialTotals::new();
        let mut received = 0;
        while received < expected {
            match receiver.recv().await {
                Some(partial) => {
                    merge_totals(&mut result, partial);
                    received += 1;
                }
                None => break,
            }
        }

        workers.join().await?;
        if received < expected {
            return Err(AggregateError::ChannelClosed { expected, received });
        }
        finish_totals(result)
    }
}

/// Direct shared-write strategy
///
/// Workers walk their partition and lock the shared map once per qualifying
/// transaction. Does not use the sequential aggregator.
pub struct DirectSharedAggregator {
    resolver: Arc<CategoryResolver>,
    partitions: usize,
}

impl DirectSharedAggregator {
    /// `partitions` bounds the worker count. Lock traffic grows with the number
    /// of qualifying transactions, not with `partitions`.
    pub fn new(resolver: Arc<CategoryResolver>, partitions: usize) -> Self {
        Self {
            resolver,
            partitions,
        }
    }
}

#[async_trait]
impl Aggregator for DirectSharedAggregator {
    fn name(&self) -> &'static str {
        "direct-shared"
    }

    async fn aggregate(
        &self,
        transactions: Arc<[Transaction]>,
        owner_id: i64,
    ) -> Result<CategoryTotals> {
        let parts = partition(&transactions, self.partitions)?;
        tracing::info!(
            strategy = self.name(),
            owner_id,
            transactions = transactions.len(),
            partitions = parts.len(),
            "aggregating ledger"
        );

        let shared = GuardedTotals::new();
        let mut workers = WorkerGroup::with_capacity(parts.len());

        for (index, part) in parts.into_iter().enumerate() {
            let resolver = Arc::clone(&self.resolver);
            let shared = shared.clone();
            workers.spawn(async move {
                let mut written = 0usize;
                for tx in part.iter().filter(|tx| tx.owner_id == owner_id) {
                    shared
                        .add(resolver.resolve(&tx.category_code), tx.amount)
                        .await;
                    written += 1;
                }
                tracing::debug!(partition = index, written, "partition written");
            });
        }

        workers.join().await?;
        shared.into_inner().await
    }
}
