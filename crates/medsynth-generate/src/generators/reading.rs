use chrono::Duration;
use rand::{Rng, RngCore};

use medsynth_core::{Entity, MedicalReading};

use crate::catalog::DeviceSpec;
use crate::errors::GenerationError;

use super::{EntityGenerator, GeneratorContext, datetime_between, pick, round2, uniform};

const CRITICAL_PROBABILITY: f64 = 0.10;
const ALERT_PROBABILITY: f64 = 0.90;
/// Slack around the normal range for non-critical draws.
const NORMAL_NOISE: f64 = 0.05;
/// Depth of the critical tails beyond their bound.
const CRITICAL_SPREAD: f64 = 0.20;
const WINDOW_DAYS: i64 = 90;

/// A drawn reading and the branch it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingValue {
    pub value: f64,
    pub is_critical: bool,
}

/// Draw a value for `device`: near-normal most of the time, otherwise from
/// one of the critical tails.
///
/// A device whose ceiling swallows its high tail (oxygen saturation) always
/// draws critical values from the low tail, and vice versa, so a critical
/// value never lands inside the normal range.
pub fn draw_reading_value(device: &DeviceSpec, rng: &mut dyn RngCore) -> ReadingValue {
    if !rng.random_bool(CRITICAL_PROBABILITY) {
        let low = device.normal_min - device.normal_min * NORMAL_NOISE;
        let high = device.normal_max + device.normal_max * NORMAL_NOISE;
        return ReadingValue {
            value: round2(uniform(low, high, rng)),
            is_critical: false,
        };
    }

    let has_low_tail = device.critical_low < device.normal_min;
    let wants_low = rng.random_bool(0.5);
    // A device whose ceiling caps the high tail (oxygen saturation at 100)
    // draws critical values from the low tail only; clamping a high draw
    // would land it inside the normal range.
    let value = if (wants_low && has_low_tail) || !device.has_high_tail() {
        let bound = device.critical_low;
        uniform(bound - bound * CRITICAL_SPREAD, bound, rng)
    } else {
        let bound = device.critical_high;
        let value = uniform(bound, bound + bound * CRITICAL_SPREAD, rng);
        device.ceiling.map_or(value, |ceiling| value.min(ceiling))
    };

    ReadingValue {
        value: round2(value),
        is_critical: true,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReadingGenerator;

impl EntityGenerator for ReadingGenerator {
    type Record = MedicalReading;

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<MedicalReading, GenerationError> {
        let catalog = ctx.catalog;
        let patient_id = ctx
            .foreign
            .pick_fk(Entity::MedicalReadings, Entity::Patients, rng)?;
        let device = &catalog.devices[rng.random_range(0..catalog.devices.len())];
        let reading = draw_reading_value(device, rng);

        let (alert_sent, notes) = if reading.is_critical {
            let alert_sent = rng.random_bool(ALERT_PROBABILITY);
            let note = pick(&catalog.reading_notes.critical, rng).to_string();
            (alert_sent, Some(note))
        } else {
            (false, catalog.reading_notes.normal.draw(rng))
        };

        let now = ctx.clock.now;
        let reading_timestamp = datetime_between(now - Duration::days(WINDOW_DAYS), now, rng);

        Ok(MedicalReading {
            reading_id: ctx.record_id,
            patient_id,
            device_type: device.device_type.clone(),
            reading_value: reading.value,
            unit: device.unit.clone(),
            reading_timestamp,
            is_critical: reading.is_critical,
            alert_sent,
            notes,
        })
    }
}
