use std::ops::{Deref, Range};
use std::sync::Arc;

use crate::error::{AggregateError, Result};
use crate::models::Transaction;

/// Contiguous view over part of a shared ledger
///
/// Cloning is cheap (an `Arc` bump) and the view is `'static`, so it can be
/// moved into a spawned task while behaving like an owned slice.
#[derive(Debug, Clone)]
pub struct Partition {
    ledger: Arc<[Transaction]>,
    range: Range<usize>,
}

impl Partition {
    /// Position of this view within the original ledger
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
}

impl Deref for Partition {
    type Target = [Transaction];

    fn deref(&self) -> &[Transaction] {
        &self.ledger[self.range.clone()]
    }
}

/// Split `ledger` into at most `count` contiguous, non-overlapping partitions
///
/// Each partition holds `ceil(len / count)` transactions except the last,
/// which takes whatever remains. Slicing stops as soon as the ledger is
/// exhausted, so fewer than `count` partitions may come back. An empty ledger
/// yields exactly one empty partition.
///
/// # Arguments
///
/// * `ledger` - Shared ledger; every partition keeps a handle to it
/// * `count` - Maximum number of partitions, must be at least 1
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use spend_aggregator::models::Transaction;
/// use spend_aggregator::partition::partition;
///
/// let ledger: Arc<[Transaction]> = (0..7)
///     .map(|id| Transaction::purchase(id, 1, 100, 1_577_836_800, "5411"))
///     .collect();
///
/// let parts = partition(&ledger, 3).unwrap();
/// let sizes: Vec<usize> = parts.iter().map(|part| part.len()).collect();
/// assert_eq!(sizes, vec![3, 3, 1]);
/// assert_eq!(parts[2].range(), 6..7);
///
/// // Ten slots over seven transactions stops at seven partitions
/// assert_eq!(partition(&ledger, 10).unwrap().len(), 7);
/// ```
///
/// # Errors
///
/// [`AggregateError::InvalidPartitionCount`] if `count` is zero.
pub fn partition(ledger: &Arc<[Transaction]>, count: usize) -> Result<Vec<Partition>> {
    if count == 0 {
        return Err(AggregateError::InvalidPartitionCount(count));
    }

    let len = ledger.len();
    let size = len.div_ceil(count);

    let mut partitions = Vec::with_capacity(count.min(len.max(1)));
    let mut start = 0;
    for _ in 0..count {
        let finish = start + size;
        if finish < len {
            partitions.push(Partition {
                ledger: Arc::clone(ledger),
                range: start..finish,
            });
        } else {
            partitions.push(Partition {
                ledger: Arc::clone(ledger),
                range: start..len,
            });
            break;
        }
        start = finish;
    }

    Ok(partitions)
}
