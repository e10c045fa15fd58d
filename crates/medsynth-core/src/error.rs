use thiserror::Error;

/// Core error type shared across medsynth crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A table name does not match any known entity.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
}

/// Convenience alias for results returned by medsynth crates.
pub type Result<T> = std::result::Result<T, Error>;
