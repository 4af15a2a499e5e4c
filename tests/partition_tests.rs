mod common;

use std::sync::Arc;

use common::generate_ledger;
use spend_aggregator::error::AggregateError;
use spend_aggregator::models::Transaction;
use spend_aggregator::partition::partition;

#[test]
fn test_partitions_cover_ledger_exactly_once() {
    for len in [0usize, 1, 7, 100] {
        for count in [1usize, 3, 10, 100] {
            let ledger: Arc<[Transaction]> = generate_ledger(len, len as u64).into();
            let parts = partition(&ledger, count).unwrap();

            assert!(!parts.is_empty(), "len={} count={}", len, count);
            assert!(parts.len() <= count, "len={} count={}", len, count);

            // Concatenation in order reproduces the ledger
            let joined: Vec<Transaction> = parts.iter().flat_map(|p| p.iter().cloned()).collect();
            assert_eq!(joined.as_slice(), &ledger[..], "len={} count={}", len, count);

            // Ranges are contiguous and non-overlapping
            let mut expected_start = 0;
            for part in &parts {
                assert_eq!(part.range().start, expected_start);
                expected_start = part.range().end;
            }
            assert_eq!(expected_start, len);
        }
    }
}

#[test]
fn test_only_last_partition_is_short() {
    let ledger: Arc<[Transaction]> = generate_ledger(100, 1).into();
    let parts = partition(&ledger, 3).unwrap();

    let sizes: Vec<usize> = parts.iter().map(|p| p.len()).collect();
    assert_eq!(sizes, vec![34, 34, 32]);
}

#[test]
fn test_stops_early_when_ledger_is_exhausted() {
    let ledger: Arc<[Transaction]> = generate_ledger(7, 2).into();
    let parts = partition(&ledger, 10).unwrap();

    assert_eq!(parts.len(), 7);
    assert!(parts.iter().all(|p| p.len() == 1));
}

#[test]
fn test_non_empty_ledger_never_yields_empty_partition() {
    for len in [1usize, 7, 100] {
        for count in [1usize, 3, 10, 100] {
            let ledger: Arc<[Transaction]> = generate_ledger(len, 3).into();
            let parts = partition(&ledger, count).unwrap();
            assert!(
                parts.iter().all(|p| !p.is_empty()),
                "len={} count={}",
                len,
                count
            );
        }
    }
}

#[test]
fn test_empty_ledger_yields_single_empty_partition() {
    let ledger: Arc<[Transaction]> = Vec::<Transaction>::new().into();
    let parts = partition(&ledger, 5).unwrap();

    assert_eq!(parts.len(), 1);
    assert!(parts[0].is_empty());
}

#[test]
fn test_zero_partitions_rejected() {
    let ledger: Arc<[Transaction]> = generate_ledger(10, 4).into();
    let err = partition(&ledger, 0).unwrap_err();

    assert!(matches!(err, AggregateError::InvalidPartitionCount(0)));
}
