//! Single-record generators, one per entity table.

mod alert;
mod appointment;
mod doctor;
mod medication;
mod patient;
mod person;
mod reading;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{Rng, RngCore};

use medsynth_core::Record;

use crate::catalog::Catalog;
use crate::errors::GenerationError;
use crate::foreign::ForeignContext;
use crate::model::{Clock, MedicationConsistency};

pub use alert::AlertGenerator;
pub use appointment::AppointmentGenerator;
pub use doctor::{DoctorGenerator, license_code};
pub use medication::{MedicationGenerator, parse_duration_days};
pub use patient::PatientGenerator;
pub use person::PersonIdentity;
pub use reading::{ReadingGenerator, ReadingValue, draw_reading_value};

/// Everything a generator may consult for one record.
pub struct GeneratorContext<'a> {
    pub record_id: i64,
    pub catalog: &'a Catalog,
    pub clock: &'a Clock,
    pub foreign: &'a dyn ForeignContext,
    pub medication_consistency: MedicationConsistency,
}

/// Produces one record of an entity table per call.
pub trait EntityGenerator {
    type Record: Record;

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Self::Record, GenerationError>;

    /// Values that must not repeat within one table, by uniqueness domain.
    fn unique_keys(&self, _record: &Self::Record) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Fail before any row is built when a required input is missing.
    fn check_inputs(&self, ctx: &GeneratorContext<'_>) -> Result<(), GenerationError> {
        let child = Self::Record::ENTITY;
        for &parent in child.parents() {
            if !ctx.foreign.has_pool(parent) {
                return Err(GenerationError::EmptyPool { child, parent });
            }
        }
        Ok(())
    }
}

pub(crate) fn pick<'v>(values: &'v [String], rng: &mut dyn RngCore) -> &'v str {
    if values.is_empty() {
        return "";
    }
    values[rng.random_range(0..values.len())].as_str()
}

pub(crate) fn date_between(start: NaiveDate, end: NaiveDate, rng: &mut dyn RngCore) -> NaiveDate {
    let span = (end - start).num_days();
    if span <= 0 {
        return start;
    }
    start + Duration::days(rng.random_range(0..=span))
}

pub(crate) fn datetime_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> NaiveDateTime {
    let span = (end - start).num_seconds();
    if span <= 0 {
        return start;
    }
    start + Duration::seconds(rng.random_range(0..=span))
}

/// Uniform in the closed interval spanned by `a` and `b`.
pub(crate) fn uniform(a: f64, b: f64, rng: &mut dyn RngCore) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == hi {
        return lo;
    }
    rng.random_range(lo..=hi)
}

pub(crate) fn phone(catalog: &Catalog, rng: &mut dyn RngCore) -> String {
    let prefix = pick(&catalog.phone_prefixes, rng);
    format!("{prefix}{:07}", rng.random_range(0..=9_999_999_u32))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
