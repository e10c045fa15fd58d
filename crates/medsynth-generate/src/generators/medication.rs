use chrono::Duration;
use rand::RngCore;

use medsynth_core::{Entity, Medication};

use crate::errors::GenerationError;
use crate::model::MedicationConsistency;

use super::{EntityGenerator, GeneratorContext, date_between, pick};

const START_WINDOW_DAYS: i64 = 365;
/// Used for durations without a recognised unit, e.g. `Chronic/Ongoing`.
const OPEN_ENDED_DAYS: i64 = 90;

#[derive(Debug, Default, Clone, Copy)]
pub struct MedicationGenerator;

impl EntityGenerator for MedicationGenerator {
    type Record = Medication;

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Medication, GenerationError> {
        let catalog = &ctx.catalog.medications;
        let appointment_id = ctx
            .foreign
            .pick_fk(Entity::Medications, Entity::Appointments, rng)?;
        let patient_id = match ctx.medication_consistency {
            MedicationConsistency::Loose => {
                ctx.foreign
                    .pick_fk(Entity::Medications, Entity::Patients, rng)?
            }
            MedicationConsistency::Strict => ctx
                .foreign
                .lookup_parent(Entity::Appointments, appointment_id, "patient_id")
                .ok_or_else(|| {
                    GenerationError::InvalidConfig(format!(
                        "appointment {appointment_id} has no known patient"
                    ))
                })?,
        };

        let medication_name = pick(&catalog.names, rng).to_string();
        let dosage = pick(&catalog.dosages, rng).to_string();
        let frequency = pick(&catalog.frequencies, rng).to_string();
        let duration = pick(&catalog.durations, rng).to_string();
        let instructions = pick(&catalog.instructions, rng).to_string();

        let today = ctx.clock.today();
        let start_date = date_between(today - Duration::days(START_WINDOW_DAYS), today, rng);
        let end_date = Duration::try_days(parse_duration_days(&duration))
            .and_then(|length| start_date.checked_add_signed(length))
            .ok_or_else(|| {
                GenerationError::InvalidCatalog(format!(
                    "medication duration '{duration}' runs past the last representable date"
                ))
            })?;

        Ok(Medication {
            medication_id: ctx.record_id,
            appointment_id,
            patient_id,
            medication_name,
            dosage,
            frequency,
            duration,
            start_date,
            end_date,
            instructions,
        })
    }

    fn check_inputs(&self, ctx: &GeneratorContext<'_>) -> Result<(), GenerationError> {
        if !ctx.foreign.has_pool(Entity::Appointments) {
            return Err(GenerationError::EmptyPool {
                child: Entity::Medications,
                parent: Entity::Appointments,
            });
        }
        match ctx.medication_consistency {
            MedicationConsistency::Loose if !ctx.foreign.has_pool(Entity::Patients) => {
                Err(GenerationError::EmptyPool {
                    child: Entity::Medications,
                    parent: Entity::Patients,
                })
            }
            MedicationConsistency::Strict
                if !ctx.foreign.tracks_column(Entity::Appointments, "patient_id") =>
            {
                Err(GenerationError::InvalidConfig(
                    "strict medication consistency needs generated appointments, not an id pool"
                        .to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Days covered by a free-text duration label.
///
/// Units are matched by substring; the embedded digits give the count, with
/// defaults of 3 days, 1 week or 1 month when no digits are present.
pub fn parse_duration_days(label: &str) -> i64 {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    let count = |default: i64| digits.parse::<i64>().unwrap_or(default);
    if label.contains("day") {
        count(3)
    } else if label.contains("week") {
        count(1).saturating_mul(7)
    } else if label.contains("month") {
        count(1).saturating_mul(30)
    } else {
        OPEN_ENDED_DAYS
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use medsynth_core::{Appointment, AppointmentStatus};

    use crate::catalog::Catalog;
    use crate::foreign::{ForeignContext, IdPool, InMemoryForeignContext};
    use crate::generators::test_support::{default_foreign, reference_time};
    use crate::model::Clock;

    use super::*;

    fn context<'a>(
        catalog: &'a Catalog,
        clock: &'a Clock,
        foreign: &'a dyn ForeignContext,
        mode: MedicationConsistency,
    ) -> GeneratorContext<'a> {
        GeneratorContext {
            record_id: 1,
            catalog,
            clock,
            foreign,
            medication_consistency: mode,
        }
    }

    fn appointment(id: i64, patient_id: i64) -> Appointment {
        let day = NaiveDate::from_ymd_opt(2024, 10, 1).expect("date");
        let at = day.and_time(NaiveTime::from_hms_opt(9, 0, 0).expect("time"));
        Appointment {
            appointment_id: id,
            patient_id,
            doctor_id: 1,
            appointment_date: day,
            appointment_time: at.time(),
            status: AppointmentStatus::Completed,
            reason: "Back pain".to_string(),
            diagnosis: Some("Muscle Strain".to_string()),
            prescription: Some("Ibuprofen 400mg".to_string()),
            notes: Some("Patient advised to rest.".to_string()),
            created_date: at,
            updated_date: at,
        }
    }

    #[test]
    fn parses_duration_labels() {
        assert_eq!(parse_duration_days("3 days"), 3);
        assert_eq!(parse_duration_days("10 days"), 10);
        assert_eq!(parse_duration_days("2 weeks"), 14);
        assert_eq!(parse_duration_days("1 month"), 30);
        assert_eq!(parse_duration_days("3 months"), 90);
        assert_eq!(parse_duration_days("a few days"), 3);
        assert_eq!(parse_duration_days("weekly"), 7);
        assert_eq!(parse_duration_days("Chronic/Ongoing"), 90);
        assert_eq!(parse_duration_days(""), 90);
    }

    #[test]
    fn end_date_follows_duration() {
        let catalog = Catalog::default();
        let clock = Clock::fixed(reference_time());
        let foreign = default_foreign();
        let ctx = context(&catalog, &clock, &foreign, MedicationConsistency::Loose);
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let medication = MedicationGenerator.generate(&ctx, &mut rng).expect("medication");
            assert_eq!(
                (medication.end_date - medication.start_date).num_days(),
                parse_duration_days(&medication.duration)
            );
            assert!(medication.start_date <= clock.today());
            assert!(medication.start_date >= clock.today() - Duration::days(365));
            assert!((1..=20_000).contains(&medication.appointment_id));
            assert!((1..=10_000).contains(&medication.patient_id));
        }
    }

    #[test]
    fn overlong_duration_is_a_catalog_error() {
        let mut catalog = Catalog::default();
        catalog.medications.durations = vec!["100000000 days".to_string()];
        let clock = Clock::fixed(reference_time());
        let foreign = default_foreign();
        let ctx = context(&catalog, &clock, &foreign, MedicationConsistency::Loose);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(matches!(
            MedicationGenerator.generate(&ctx, &mut rng),
            Err(GenerationError::InvalidCatalog(_))
        ));
        assert_eq!(parse_duration_days("9223372036854775807 weeks"), i64::MAX);
    }

    #[test]
    fn strict_mode_uses_appointment_owner() {
        let catalog = Catalog::default();
        let clock = Clock::fixed(reference_time());
        let appointments: Vec<_> = (1..=20).map(|id| appointment(id, 100 + id)).collect();
        let mut foreign =
            InMemoryForeignContext::new().with_pool(Entity::Patients, IdPool::range(1, 5));
        foreign.ingest_table(&appointments);

        let ctx = context(&catalog, &clock, &foreign, MedicationConsistency::Strict);
        MedicationGenerator.check_inputs(&ctx).expect("inputs");
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let medication = MedicationGenerator.generate(&ctx, &mut rng).expect("medication");
            assert_eq!(medication.patient_id, medication.appointment_id + 100);
        }
    }

    #[test]
    fn strict_mode_rejects_bare_pools() {
        let catalog = Catalog::default();
        let clock = Clock::fixed(reference_time());
        let foreign = default_foreign();
        let ctx = context(&catalog, &clock, &foreign, MedicationConsistency::Strict);
        assert!(matches!(
            MedicationGenerator.check_inputs(&ctx),
            Err(GenerationError::InvalidConfig(_))
        ));
    }
}
