use chrono::Duration;
use fake::Fake;
use fake::faker::address::en::BuildingNumber;
use rand::{Rng, RngCore};

use medsynth_core::Patient;

use crate::catalog::Catalog;
use crate::errors::GenerationError;
use crate::uniqueness::NATIONAL_ID;

use super::person::{PersonIdentity, full_name};
use super::{EntityGenerator, GeneratorContext, datetime_between, phone, pick};

const MIN_AGE_YEARS: i64 = 18;
const MAX_AGE_YEARS: i64 = 80;
const REGISTRATION_WINDOW_DAYS: i64 = 2 * 365;

#[derive(Debug, Default, Clone, Copy)]
pub struct PatientGenerator;

impl EntityGenerator for PatientGenerator {
    type Record = Patient;

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Patient, GenerationError> {
        let catalog = ctx.catalog;
        let today = ctx.clock.today();
        let person = PersonIdentity::draw(
            catalog,
            today - Duration::days(MAX_AGE_YEARS * 365),
            today - Duration::days(MIN_AGE_YEARS * 365),
            rng,
        )?;

        let phone_number = phone(catalog, rng);
        let address = address(catalog, rng);
        let blood_type = pick(&catalog.blood_types, rng).to_string();
        let allergies = catalog.allergies.draw(rng);
        let chronic_diseases = catalog.chronic_diseases.draw(rng);
        let emergency_contact_name = full_name(catalog, rng);
        let emergency_contact_phone = phone(catalog, rng);
        let registration_date = datetime_between(
            ctx.clock.now - Duration::days(REGISTRATION_WINDOW_DAYS),
            ctx.clock.now,
            rng,
        );
        let is_active = rng.random_bool(0.5);

        Ok(Patient {
            patient_id: ctx.record_id,
            national_id: person.national_id,
            first_name: person.first_name,
            last_name: person.last_name,
            date_of_birth: person.date_of_birth,
            gender: person.gender,
            phone: phone_number,
            address,
            blood_type,
            allergies,
            chronic_diseases,
            emergency_contact_name,
            emergency_contact_phone,
            registration_date,
            is_active,
        })
    }

    fn unique_keys(&self, record: &Patient) -> Vec<(&'static str, String)> {
        vec![(NATIONAL_ID, record.national_id.clone())]
    }
}

/// `"<building> <street> <type>, <city>, <governorate>"`.
fn address(catalog: &Catalog, rng: &mut dyn RngCore) -> String {
    let governorate = pick(&catalog.address.governorates, rng);
    let city = pick(catalog.address.cities_for(governorate), rng);
    let street_name = pick(&catalog.address.street_names, rng);
    let street_type = pick(&catalog.address.street_types, rng);
    let building: String = BuildingNumber().fake_with_rng(rng);
    format!("{building} {street_name} {street_type}, {city}, {governorate}")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::generators::test_support::{default_foreign, reference_time};
    use crate::model::{Clock, MedicationConsistency};
    use crate::national_id::decode_national_id;

    use super::*;

    #[test]
    fn patient_fields_follow_catalog() {
        let catalog = Catalog::default();
        let clock = Clock::fixed(reference_time());
        let foreign = default_foreign();
        let today = clock.today();
        let mut saw_null_allergy = false;

        for seed in 0..300_u64 {
            let ctx = GeneratorContext {
                record_id: 1,
                catalog: &catalog,
                clock: &clock,
                foreign: &foreign,
                medication_consistency: MedicationConsistency::Loose,
            };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let patient = PatientGenerator.generate(&ctx, &mut rng).expect("patient");

            let age_days = (today - patient.date_of_birth).num_days();
            assert!((18 * 365..=80 * 365).contains(&age_days));

            let decoded = decode_national_id(&patient.national_id).expect("decode");
            assert_eq!(decoded.gender, patient.gender);
            assert_eq!(decoded.birth_date, patient.date_of_birth);

            let parts: Vec<&str> = patient.address.split(", ").collect();
            assert_eq!(parts.len(), 3, "address '{}'", patient.address);
            assert!(catalog.address.governorates.iter().any(|g| g == parts[2]));
            assert!(
                catalog
                    .address
                    .cities_for(parts[2])
                    .iter()
                    .any(|c| c == parts[1])
            );

            assert!(catalog.blood_types.contains(&patient.blood_type));
            if let Some(allergy) = &patient.allergies {
                assert!(catalog.allergies.values.contains(allergy));
            } else {
                saw_null_allergy = true;
            }
            assert!(patient.emergency_contact_name.split(' ').count() >= 2);
            assert!(patient.registration_date <= clock.now);
            assert!(patient.registration_date >= clock.now - Duration::days(2 * 365));
        }
        assert!(saw_null_allergy);
    }
}
