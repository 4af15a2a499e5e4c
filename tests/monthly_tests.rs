mod common;

use common::{generate_ledger, make_tx_at, DAY, JAN_2020};
use spend_aggregator::error::AggregateError;
use spend_aggregator::monthly::{group_by_month, monthly_totals};

/// 2020-03-01T00:00:00Z
const MAR_2020: i64 = JAN_2020 + 60 * DAY;
/// 2020-11-01T00:00:00Z
const NOV_2020: i64 = JAN_2020 + 305 * DAY;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_transactions_land_in_their_utc_month() {
    let ledger = vec![
        make_tx_at(1, 2, 100, JAN_2020),
        make_tx_at(2, 3, 200, JAN_2020 + 30 * DAY),
        // Last second of February
        make_tx_at(3, 2, 50, MAR_2020 - 1),
        make_tx_at(4, 2, 25, MAR_2020),
        make_tx_at(5, 9, 7, NOV_2020),
    ];

    let (totals, grand_total) = monthly_totals(&ledger).await.unwrap();

    assert_eq!(totals.len(), 4);
    assert_eq!(totals.get("2020 01"), Some(&300));
    assert_eq!(totals.get("2020 02"), Some(&50));
    assert_eq!(totals.get("2020 03"), Some(&25));
    assert_eq!(totals.get("2020 11"), Some(&7));
    assert_eq!(grand_total, 382);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_grand_total_matches_months_and_inputs() {
    for seed in 0..20 {
        let ledger = generate_ledger(500, seed);
        let (totals, grand_total) = monthly_totals(&ledger).await.unwrap();

        let month_sum: i64 = totals.values().sum();
        let input_sum: i64 = ledger.iter().map(|tx| tx.amount).sum();

        assert_eq!(grand_total, month_sum, "seed={}", seed);
        assert_eq!(grand_total, input_sum, "seed={}", seed);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_empty_ledger_has_no_months() {
    let (totals, grand_total) = monthly_totals(&[]).await.unwrap();
    assert!(totals.is_empty());
    assert_eq!(grand_total, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unrepresentable_timestamp_fails() {
    let ledger = vec![make_tx_at(1, 1, 10, JAN_2020), make_tx_at(2, 1, 10, i64::MAX)];
    let err = monthly_totals(&ledger).await.unwrap_err();

    assert!(matches!(
        err,
        AggregateError::TimestampOutOfRange { id: 2, .. }
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_month_sum_may_pass_i64_max_if_it_returns() {
    let ledger = vec![
        make_tx_at(1, 1, i64::MAX, JAN_2020),
        make_tx_at(2, 1, 1, JAN_2020 + DAY),
        make_tx_at(3, 1, -5, JAN_2020 + 2 * DAY),
    ];
    let (totals, grand_total) = monthly_totals(&ledger).await.unwrap();

    assert_eq!(totals.get("2020 01"), Some(&(i64::MAX - 4)));
    assert_eq!(grand_total, i64::MAX - 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_grand_total_overflow_is_reported() {
    // Each month fits on its own, their sum does not
    let ledger = vec![
        make_tx_at(1, 1, i64::MAX, JAN_2020),
        make_tx_at(2, 1, i64::MAX, MAR_2020),
    ];
    let err = monthly_totals(&ledger).await.unwrap_err();

    assert!(matches!(err, AggregateError::AmountOverflow { key } if key == "total"));
}

#[test]
fn test_group_by_month_keeps_every_amount() {
    let ledger = vec![
        make_tx_at(1, 1, 10, JAN_2020),
        make_tx_at(2, 1, 20, JAN_2020 + DAY),
        make_tx_at(3, 1, 30, MAR_2020),
    ];

    let buckets = group_by_month(&ledger).unwrap();

    let mut january = buckets["2020 01"].clone();
    january.sort();
    assert_eq!(january, vec![10, 20]);
    assert_eq!(buckets["2020 03"], vec![30]);
}
