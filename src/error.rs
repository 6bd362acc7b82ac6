use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("pool backing store allocation failed for {capacity} slots: {source}")]
    PoolAllocation {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to parse physics config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
