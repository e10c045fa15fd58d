use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use medsynth_core::Entity;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Directory where run artifacts are written.
    pub out_dir: PathBuf,
    pub seed: u64,
    /// Instant treated as "now"; the local clock is read once when unset.
    pub reference_time: Option<NaiveDateTime>,
    /// Maximum attempts to build a single row.
    pub max_attempts_row: u32,
    pub medication_consistency: MedicationConsistency,
    /// Write `generation_report.json` next to the tables.
    pub write_report: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            seed: 0,
            reference_time: None,
            max_attempts_row: 50,
            medication_consistency: MedicationConsistency::default(),
            write_report: true,
        }
    }
}

/// How a medication's patient relates to its appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationConsistency {
    /// Appointment and patient drawn independently.
    #[default]
    Loose,
    /// Patient taken from the owning appointment.
    Strict,
}

/// Fixed reference instant for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub now: NaiveDateTime,
}

impl Clock {
    pub fn fixed(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn from_options(options: &GenerateOptions) -> Self {
        Self::fixed(
            options
                .reference_time
                .unwrap_or_else(|| chrono::Local::now().naive_local()),
        )
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: Entity,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub retries: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub reference_time: NaiveDateTime,
    pub tables: Vec<TableReport>,
    pub retries_total: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, reference_time: NaiveDateTime) -> Self {
        Self {
            run_id,
            seed,
            reference_time,
            tables: Vec::new(),
            retries_total: 0,
            bytes_written: 0,
            duration_ms: 0,
            error: None,
        }
    }

    pub fn record_table(&mut self, table: TableReport) {
        self.retries_total += table.retries;
        self.bytes_written += table.bytes_written;
        self.tables.push(table);
    }
}
