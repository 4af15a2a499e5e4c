use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::category::CategoryResolver;
use crate::concurrent_engine::{DirectSharedAggregator, FanInAggregator, ReduceMergeAggregator};
use crate::engine::{Aggregator, SequentialAggregator};

/// Partition count used when none is configured
pub const DEFAULT_PARTITIONS: usize = 100;

/// Which aggregation strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Sequential,
    #[default]
    ReduceMerge,
    FanIn,
    DirectShared,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Sequential,
        Strategy::ReduceMerge,
        Strategy::FanIn,
        Strategy::DirectShared,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::ReduceMerge => "reduce-merge",
            Strategy::FanIn => "fan-in",
            Strategy::DirectShared => "direct-shared",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown strategy '{}', expected one of: sequential, reduce-merge, fan-in, direct-shared",
                    s
                )
            })
    }
}

/// Tuning knobs for an aggregation run
///
/// More partitions means more parallel workers and more merge overhead; fewer
/// means larger batches per worker. A zero count is rejected when the
/// aggregator partitions the ledger, before any worker starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub partitions: usize,
    pub strategy: Strategy,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            partitions: DEFAULT_PARTITIONS,
            strategy: Strategy::default(),
        }
    }
}

impl AggregatorConfig {
    pub fn new(strategy: Strategy, partitions: usize) -> Self {
        Self {
            partitions,
            strategy,
        }
    }

    /// Construct the configured aggregator around `resolver`
    pub fn build(&self, resolver: Arc<CategoryResolver>) -> Box<dyn Aggregator> {
        match self.strategy {
            Strategy::Sequential => Box::new(SequentialAggregator::new(resolver)),
            Strategy::ReduceMerge => Box::new(ReduceMergeAggregator::new(resolver, self.partitions)),
            Strategy::FanIn => Box::new(FanInAggregator::new(resolver, self.partitions)),
            Strategy::DirectShared => {
                Box::new(DirectSharedAggregator::new(resolver, self.partitions))
            }
        }
    }
}
