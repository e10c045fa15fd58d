use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use medsynth_core::Entity;
use medsynth_generate::{EntityCounts, ForeignPools, GenerateOptions};

use crate::CliError;

/// Contents of a `medsynth.toml` run file.
///
/// ```toml
/// catalog = "catalog.toml"
///
/// [run]
/// seed = 42
/// reference_time = "2025-01-01T08:00:00"
/// medication_consistency = "strict"
///
/// [counts]
/// doctors = 1000
/// patients = 10000
///
/// [pools]
/// doctors = "1..=1001"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunFile {
    pub catalog: Option<PathBuf>,
    pub run: GenerateOptions,
    pub counts: EntityCounts,
    pub pools: ForeignPools,
}

impl RunFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path)?;
        let mut file: RunFile = toml::from_str(&contents)?;
        // Catalog paths are relative to the run file.
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        file.catalog = file.catalog.take().map(|catalog| {
            if catalog.is_relative() {
                base.join(catalog)
            } else {
                catalog
            }
        });
        Ok(file)
    }
}

/// Row count and seed the original table scripts used.
pub fn entity_defaults(entity: Entity) -> (u64, u64) {
    match entity {
        Entity::Doctors => (1_000, 456),
        Entity::Patients => (10_000, 123),
        Entity::Appointments => (20_000, 789),
        Entity::Medications => (25_000, 101_112),
        Entity::MedicalReadings => (50_000, 999),
        Entity::SystemAlerts => (15_000, 131_415),
    }
}

pub fn default_counts() -> EntityCounts {
    let mut counts = EntityCounts::default();
    for entity in Entity::ALL {
        counts.set(entity, entity_defaults(entity).0);
    }
    counts
}

/// Accepts `2025-01-01T08:00:00`, `2025-01-01 08:00:00` or a bare date.
pub fn parse_reference_time(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid reference time '{value}'"))
}
