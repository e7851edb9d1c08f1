use thiserror::Error;

/// Failures raised by the weighted sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SampleError {
    /// No candidates were supplied.
    #[error("cannot sample from an empty candidate list")]
    Empty,

    /// Every candidate carried a zero or negative weight.
    #[error("no candidate has a positive weight")]
    NoPositiveWeight,
}

/// Errors that can arise while catching, selling, or persisting fishing progress.
#[derive(Debug, Error)]
pub enum FishingError {
    /// No usable user identity was supplied by the caller.
    #[error("no user identity available")]
    InvalidUser,

    /// A sell request matched neither a quality name nor an inventory entry.
    #[error("no quality or fish named '{0}' in your bag")]
    UnknownQualityOrName(String),

    /// A sell request was made against an empty inventory.
    #[error("your bag is empty")]
    EmptyInventory,

    /// Wrapper around sampler failures (degenerate weight tables).
    #[error("sampling error: {0}")]
    Sampling(#[from] SampleError),

    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around serde_json errors (catalog seed files).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, seed files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// The currency sink refused a credit.
    #[error("currency error: {0}")]
    Currency(String),

    /// Internal error (poisoned locks, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}
