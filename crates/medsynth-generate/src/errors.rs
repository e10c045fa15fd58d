use thiserror::Error;

use medsynth_core::Entity;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("empty foreign key pool for {parent} (required by {child})")]
    EmptyPool { child: Entity, parent: Entity },
    #[error("uniqueness domain '{domain}' exhausted for {table} after {attempts} attempts")]
    DomainExhausted {
        table: Entity,
        domain: String,
        attempts: u32,
    },
    #[error("invalid national id '{value}': {reason}")]
    InvalidNationalId { value: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
