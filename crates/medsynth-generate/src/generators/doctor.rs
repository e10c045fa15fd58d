use chrono::Duration;
use rand::{Rng, RngCore};

use medsynth_core::Doctor;

use crate::errors::GenerationError;
use crate::uniqueness::{LICENSE_NUMBER, NATIONAL_ID};

use super::person::PersonIdentity;
use super::{EntityGenerator, GeneratorContext, datetime_between, phone, pick, round2};

const MIN_AGE_YEARS: i64 = 25;
const MAX_AGE_YEARS: i64 = 70;
const MAX_EXPERIENCE_YEARS: i64 = 45;
/// Years of training before practice starts counting.
const TRAINING_YEARS: i64 = 24;
const REGISTRATION_WINDOW_DAYS: i64 = 5 * 365;

#[derive(Debug, Default, Clone, Copy)]
pub struct DoctorGenerator;

impl EntityGenerator for DoctorGenerator {
    type Record = Doctor;

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Doctor, GenerationError> {
        let catalog = ctx.catalog;
        let today = ctx.clock.today();
        let person = PersonIdentity::draw(
            catalog,
            today - Duration::days(MAX_AGE_YEARS * 365),
            today - Duration::days(MIN_AGE_YEARS * 365),
            rng,
        )?;

        let specialization = pick(&catalog.specializations, rng).to_string();
        let license_number = format!(
            "{}-{}-{}",
            catalog.license_prefix,
            license_code(&specialization, &catalog.license_fallback_code),
            rng.random_range(100_000..=999_999_u32)
        );
        let phone = phone(catalog, rng);

        let age_years = (today - person.date_of_birth).num_days() / 365;
        let max_experience = (age_years - TRAINING_YEARS).clamp(0, MAX_EXPERIENCE_YEARS);
        let years_of_experience = rng.random_range(0..=max_experience);
        let consultation_fee = round2(rng.random_range(100.0..=800.0));
        let is_active = rng.random_bool(0.5);
        let registration_date = datetime_between(
            ctx.clock.now - Duration::days(REGISTRATION_WINDOW_DAYS),
            ctx.clock.now,
            rng,
        );

        Ok(Doctor {
            doctor_id: ctx.record_id,
            national_id: person.national_id,
            first_name: person.first_name,
            last_name: person.last_name,
            gender: person.gender,
            date_of_birth: person.date_of_birth,
            specialization,
            license_number,
            phone,
            years_of_experience,
            consultation_fee,
            is_active,
            registration_date,
        })
    }

    fn unique_keys(&self, record: &Doctor) -> Vec<(&'static str, String)> {
        vec![
            (NATIONAL_ID, record.national_id.clone()),
            (LICENSE_NUMBER, record.license_number.clone()),
        ]
    }
}

/// First three letters of `specialization`, upper-cased.
pub fn license_code(specialization: &str, fallback: &str) -> String {
    let code: String = specialization
        .chars()
        .filter(|ch| ch.is_alphabetic())
        .take(3)
        .flat_map(char::to_uppercase)
        .collect();
    if code.is_empty() {
        fallback.to_string()
    } else {
        code
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::catalog::Catalog;
    use crate::generators::test_support::{default_foreign, reference_time};
    use crate::model::{Clock, MedicationConsistency};

    use super::*;

    #[test]
    fn license_code_uses_leading_letters() {
        assert_eq!(license_code("Internal Medicine", "GEN"), "INT");
        assert_eq!(license_code("ENT (Otolaryngology)", "GEN"), "ENT");
        assert_eq!(license_code("  4x", "GEN"), "X");
        assert_eq!(license_code("123", "GEN"), "GEN");
    }

    #[test]
    fn doctor_fields_stay_in_range() {
        let catalog = Catalog::default();
        let clock = Clock::fixed(reference_time());
        let foreign = default_foreign();
        let today = clock.today();

        for seed in 0..200_u64 {
            let ctx = GeneratorContext {
                record_id: seed as i64 + 1,
                catalog: &catalog,
                clock: &clock,
                foreign: &foreign,
                medication_consistency: MedicationConsistency::Loose,
            };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let doctor = DoctorGenerator.generate(&ctx, &mut rng).expect("doctor");

            let age_days = (today - doctor.date_of_birth).num_days();
            assert!((25 * 365..=70 * 365).contains(&age_days));
            assert!(doctor.years_of_experience >= 0);
            assert!(doctor.years_of_experience <= 45);
            assert!(doctor.years_of_experience <= age_days / 365 - 24);
            assert!((100.0..=800.0).contains(&doctor.consultation_fee));
            assert_eq!(round2(doctor.consultation_fee), doctor.consultation_fee);
            assert!(doctor.license_number.starts_with("MOH-"));
            let serial = doctor.license_number.rsplit('-').next().expect("serial");
            assert_eq!(serial.len(), 6);
            assert!(doctor.registration_date <= clock.now);
            assert!(doctor.registration_date >= clock.now - Duration::days(5 * 365));
        }
    }
}
