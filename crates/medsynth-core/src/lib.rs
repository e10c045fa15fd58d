//! Core contracts and helpers for medsynth.
//!
//! This crate defines the entity tables, their canonical column layout, the
//! typed field values rows are made of, and the record structs emitted by the
//! generators.

pub mod entity;
pub mod error;
pub mod records;
pub mod schema;
pub mod value;

pub use entity::Entity;
pub use error::{Error, Result};
pub use records::{
    Appointment, AppointmentStatus, Doctor, Gender, MedicalReading, Medication, Patient, Record,
    Severity, SystemAlert,
};
pub use schema::{ColumnDef, ColumnKind, TableSchema};
pub use value::{FieldValue, Row};

/// Current contract version for generated table layouts.
pub const SCHEMA_VERSION: &str = "0.1";
