pub mod totals;
pub mod transaction;

pub use totals::{finish_totals, merge_totals, CategoryTotals, MonthKey, MonthTotals, PartialTotals};
pub use transaction::Transaction;
