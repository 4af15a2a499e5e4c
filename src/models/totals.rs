use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use time::OffsetDateTime;

use crate::error::{AggregateError, Result};

/// Category label to accumulated amount
pub type CategoryTotals = HashMap<String, i64>;

/// Month key to accumulated amount
pub type MonthTotals = HashMap<MonthKey, i64>;

/// Running category sums while an aggregation is in flight
///
/// Sums are kept in `i128` so that no ordering of additions can overflow: a
/// ledger would need more than 2^64 entries of `i64::MAX` to exhaust it. The
/// narrowing back to `i64` happens once, in [`finish_totals`], so the outcome
/// depends only on the true total and never on how partials arrive.
pub type PartialTotals = HashMap<String, i128>;

/// Add every entry of `partial` into `into`, creating keys that are absent
pub fn merge_totals<K>(into: &mut HashMap<K, i128>, partial: HashMap<K, i128>)
where
    K: Eq + std::hash::Hash,
{
    for (key, amount) in partial {
        *into.entry(key).or_insert(0) += amount;
    }
}

/// Narrow running sums to their final `i64` values
///
/// # Errors
///
/// [`AggregateError::AmountOverflow`] naming the first key whose total is
/// outside the `i64` range.
pub fn finish_totals<K>(partial: HashMap<K, i128>) -> Result<HashMap<K, i64>>
where
    K: Eq + std::hash::Hash + fmt::Display,
{
    partial
        .into_iter()
        .map(|(key, amount)| match i64::try_from(amount) {
            Ok(amount) => Ok((key, amount)),
            Err(_) => Err(AggregateError::AmountOverflow {
                key: key.to_string(),
            }),
        })
        .collect()
}

/// Calendar month bucket, rendered as `"YYYY MM"` in UTC
///
/// The month is always two digits, so `"2020 03"` and `"2020 11"` sort and
/// compare consistently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey(String);

impl MonthKey {
    pub fn new(year: i32, month: u8) -> Self {
        Self(format!("{:04} {:02}", year, month))
    }

    /// Derive the key for a unix timestamp, normalized to UTC
    pub fn from_timestamp(id: i64, timestamp: i64) -> Result<Self> {
        let date = OffsetDateTime::from_unix_timestamp(timestamp)
            .map_err(|_| AggregateError::TimestampOutOfRange { id, timestamp })?;
        Ok(Self::new(date.year(), u8::from(date.month())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MonthKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
