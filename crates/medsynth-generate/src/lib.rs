//! Deterministic synthetic healthcare data generation.
//!
//! Turns a seed, a reference time and foreign-key pools into doctors,
//! patients, appointments, medications, medical readings and system alerts,
//! and hands the assembled tables to an output sink (CSV by default).

pub mod catalog;
pub mod engine;
pub mod errors;
pub mod foreign;
pub mod generators;
pub mod model;
pub mod national_id;
pub mod output;
pub mod uniqueness;

pub use catalog::Catalog;
pub use engine::{DatasetPlan, EntityCounts, GeneratedTable, GenerationEngine, TableData};
pub use errors::GenerationError;
pub use foreign::{ForeignContext, ForeignPools, IdPool, InMemoryForeignContext};
pub use model::{Clock, GenerateOptions, GenerationReport, MedicationConsistency, TableReport};
pub use national_id::{DecodedNationalId, decode_national_id, encode_national_id};
pub use output::{CsvSink, MemorySink, TableSink};
