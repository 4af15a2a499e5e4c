use thiserror::Error;

/// Errors that can occur while aggregating a ledger
/// A call either returns a fully merged result or one of these, never a partial map
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("partition count must be at least 1, got {0}")]
    InvalidPartitionCount(usize),

    #[error("transaction {id} has timestamp {timestamp} outside the supported range")]
    TimestampOutOfRange { id: i64, timestamp: i64 },

    #[error("total for '{key}' does not fit in a 64-bit amount")]
    AmountOverflow { key: String },

    #[error("aggregation worker failed: {0}")]
    WorkerFailed(#[from] tokio::task::JoinError),

    #[error("fan-in queue closed after {received} of {expected} partial results")]
    ChannelClosed { expected: usize, received: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AggregateError>;
