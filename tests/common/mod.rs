#![allow(dead_code)]

use std::sync::Arc;

use spend_aggregator::category::{CategoryResolver, CategoryTable};
use spend_aggregator::concurrent_engine::{
    DirectSharedAggregator, FanInAggregator, ReduceMergeAggregator,
};
use spend_aggregator::engine::{Aggregator, SequentialAggregator};
use spend_aggregator::models::Transaction;

/// 2020-01-01T00:00:00Z
pub const JAN_2020: i64 = 1_577_836_800;
pub const DAY: i64 = 86_400;

/// Helper to create a purchase
pub fn make_tx(id: i64, owner_id: i64, amount: i64, code: &str) -> Transaction {
    Transaction::purchase(id, owner_id, amount, JAN_2020, code)
}

/// Helper to create a purchase at a specific time
pub fn make_tx_at(id: i64, owner_id: i64, amount: i64, timestamp: i64) -> Transaction {
    Transaction::purchase(id, owner_id, amount, timestamp, "5411")
}

/// Resolver that maps `A` and `B` to themselves and everything else to the fallback
pub fn ab_resolver() -> Arc<CategoryResolver> {
    Arc::new(CategoryResolver::new(CategoryTable::from_pairs([
        ("A", "A"),
        ("B", "B"),
    ])))
}

/// Every strategy, baseline first
pub fn all_aggregators(
    resolver: Arc<CategoryResolver>,
    partitions: usize,
) -> Vec<Box<dyn Aggregator>> {
    vec![
        Box::new(SequentialAggregator::new(Arc::clone(&resolver))),
        Box::new(ReduceMergeAggregator::new(Arc::clone(&resolver), partitions)),
        Box::new(FanInAggregator::new(Arc::clone(&resolver), partitions)),
        Box::new(DirectSharedAggregator::new(resolver, partitions)),
    ]
}

/// Deterministic pseudo-random ledger spread over several owners, codes and months
pub fn generate_ledger(len: usize, seed: u64) -> Vec<Transaction> {
    const CODES: [&str; 6] = ["5411", "5812", "5541", "A", "B", "0000"];

    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        state >> 33
    };

    (0..len)
        .map(|i| {
            let owner_id = (next() % 4) as i64;
            let amount = (next() % 100_000) as i64 - 10_000;
            let timestamp = JAN_2020 + (next() % 365) as i64 * DAY;
            let code = CODES[(next() % CODES.len() as u64) as usize];
            Transaction::purchase(i as i64, owner_id, amount, timestamp, code)
        })
        .collect()
}

/// Build a ledger CSV from transactions
pub fn build_csv(transactions: &[Transaction]) -> String {
    let mut csv = String::from("id,type,amount,timestamp,mcc,status,owner\n");
    for tx in transactions {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            tx.id, tx.tx_type, tx.amount, tx.timestamp, tx.category_code, tx.status, tx.owner_id
        ));
    }
    csv
}
