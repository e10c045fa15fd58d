//! Run directories: `config.json`, `generation_report.json` and the
//! `logs.ndjson` event log written next to the generated tables.

mod logging;
mod run;

pub use logging::init_logging;
pub use run::{RunContext, RunPaths, start_run, write_report};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("run directory io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("run artifact serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
