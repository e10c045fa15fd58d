use std::cmp::Ordering;

use chrono::{Duration, NaiveDate, NaiveTime};
use rand::{Rng, RngCore};

use medsynth_core::{Appointment, AppointmentStatus, Entity};

use crate::errors::GenerationError;

use super::{EntityGenerator, GeneratorContext, datetime_between, pick};

const LOOKBACK_DAYS: i64 = 365;
const LOOKAHEAD_DAYS: i64 = 90;
const FIRST_HOUR: u32 = 9;
const LAST_HOUR: u32 = 17;
const SLOT_MINUTES: [u32; 4] = [0, 15, 30, 45];

#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentGenerator;

impl EntityGenerator for AppointmentGenerator {
    type Record = Appointment;

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Appointment, GenerationError> {
        let catalog = &ctx.catalog.appointments;
        let patient_id = ctx
            .foreign
            .pick_fk(Entity::Appointments, Entity::Patients, rng)?;
        let doctor_id = ctx
            .foreign
            .pick_fk(Entity::Appointments, Entity::Doctors, rng)?;

        let now = ctx.clock.now;
        let drawn = datetime_between(
            now - Duration::days(LOOKBACK_DAYS),
            now + Duration::days(LOOKAHEAD_DAYS),
            rng,
        );
        let appointment_date = drawn.date();
        let hour = rng.random_range(FIRST_HOUR..=LAST_HOUR);
        let minute = SLOT_MINUTES[rng.random_range(0..SLOT_MINUTES.len())];
        let appointment_time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);

        let status = draw_status(appointment_date, ctx.clock.today(), rng);
        let reason = pick(&catalog.reasons, rng).to_string();

        let (diagnosis, prescription, notes) = match status {
            AppointmentStatus::Completed => (
                Some(pick(&catalog.diagnoses, rng).to_string()),
                Some(pick(&catalog.prescriptions, rng).to_string()),
                Some(pick(&catalog.notes, rng).to_string()),
            ),
            AppointmentStatus::InProgress => (None, None, Some(catalog.in_progress_note.clone())),
            _ => (None, None, None),
        };

        let starts_at = appointment_date.and_time(appointment_time);
        let created_date = starts_at - Duration::days(rng.random_range(1..=30));
        let updated_date = if status == AppointmentStatus::Scheduled {
            created_date
        } else {
            starts_at + Duration::minutes(rng.random_range(30..=120))
        };

        Ok(Appointment {
            appointment_id: ctx.record_id,
            patient_id,
            doctor_id,
            appointment_date,
            appointment_time,
            status,
            reason,
            diagnosis,
            prescription,
            notes,
            created_date,
            updated_date,
        })
    }
}

/// Future dates stay scheduled; past dates settle into a final status.
pub fn draw_status(date: NaiveDate, today: NaiveDate, rng: &mut dyn RngCore) -> AppointmentStatus {
    match date.cmp(&today) {
        Ordering::Greater => AppointmentStatus::Scheduled,
        Ordering::Equal => AppointmentStatus::ALL[rng.random_range(0..AppointmentStatus::ALL.len())],
        Ordering::Less => {
            AppointmentStatus::FINAL[rng.random_range(0..AppointmentStatus::FINAL.len())]
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::catalog::Catalog;
    use crate::foreign::{ForeignContext, InMemoryForeignContext};
    use crate::generators::test_support::{default_foreign, reference_time};
    use crate::model::{Clock, MedicationConsistency};

    use super::*;

    fn generate(seed: u64, foreign: &dyn ForeignContext) -> Result<Appointment, GenerationError> {
        let catalog = Catalog::default();
        let clock = Clock::fixed(reference_time());
        let ctx = GeneratorContext {
            record_id: seed as i64 + 1,
            catalog: &catalog,
            clock: &clock,
            foreign,
            medication_consistency: MedicationConsistency::Loose,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        AppointmentGenerator.generate(&ctx, &mut rng)
    }

    #[test]
    fn status_follows_date() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).expect("date");
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..200 {
            assert_eq!(
                draw_status(today + Duration::days(1), today, &mut rng),
                AppointmentStatus::Scheduled
            );
            let past = draw_status(today - Duration::days(1), today, &mut rng);
            assert!(AppointmentStatus::FINAL.contains(&past));
        }
        let same_day: Vec<_> = (0..500).map(|_| draw_status(today, today, &mut rng)).collect();
        for status in AppointmentStatus::ALL {
            assert!(same_day.contains(&status), "{status} never drawn for today");
        }
    }

    #[test]
    fn content_and_timestamps_track_status() {
        let foreign = default_foreign();
        let today = reference_time().date();
        for seed in 0..400 {
            let appointment = generate(seed, &foreign).expect("appointment");
            let time = appointment.appointment_time;
            assert!((9..=17).contains(&time.hour()));
            assert!(SLOT_MINUTES.contains(&time.minute()));

            if appointment.appointment_date > today {
                assert_eq!(appointment.status, AppointmentStatus::Scheduled);
            }
            let lead = appointment.starts_at() - appointment.created_date;
            assert!((1..=30).contains(&lead.num_days()));

            match appointment.status {
                AppointmentStatus::Completed => {
                    assert!(appointment.diagnosis.is_some());
                    assert!(appointment.prescription.is_some());
                    assert!(appointment.notes.is_some());
                }
                AppointmentStatus::Scheduled => {
                    assert!(appointment.diagnosis.is_none());
                    assert!(appointment.prescription.is_none());
                    assert_eq!(appointment.updated_date, appointment.created_date);
                }
                AppointmentStatus::InProgress => {
                    assert!(appointment.diagnosis.is_none());
                    assert_eq!(
                        appointment.notes.as_deref(),
                        Some("Patient currently in examination room.")
                    );
                }
                _ => assert!(appointment.notes.is_none()),
            }
            if appointment.status != AppointmentStatus::Scheduled {
                let after = appointment.updated_date - appointment.starts_at();
                assert!((30..=120).contains(&after.num_minutes()));
            }
        }
    }

    #[test]
    fn missing_doctor_pool_is_an_error() {
        let foreign =
            InMemoryForeignContext::new().with_pool(Entity::Patients, crate::IdPool::range(1, 5));
        let err = generate(1, &foreign).expect_err("no doctors");
        assert!(matches!(
            err,
            GenerationError::EmptyPool {
                parent: Entity::Doctors,
                ..
            }
        ));
    }
}
