use chrono::NaiveDate;
use rand::{Rng, RngCore};

use medsynth_core::Gender;

use crate::catalog::Catalog;
use crate::errors::GenerationError;
use crate::national_id::encode_national_id;

use super::{date_between, pick};

/// Identity fields shared by doctors and patients.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonIdentity {
    pub gender: Gender,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub national_id: String,
}

impl PersonIdentity {
    /// Draws gender, names, birth date and national ID, in that order.
    pub fn draw(
        catalog: &Catalog,
        born_after: NaiveDate,
        born_before: NaiveDate,
        rng: &mut dyn RngCore,
    ) -> Result<Self, GenerationError> {
        let gender = draw_gender(rng);
        let first_name = first_name(catalog, gender, rng).to_string();
        let last_name = pick(&catalog.names.last, rng).to_string();
        let date_of_birth = date_between(born_after, born_before, rng);
        let national_id = encode_national_id(date_of_birth, gender, rng)?;
        Ok(Self {
            gender,
            first_name,
            last_name,
            date_of_birth,
            national_id,
        })
    }
}

pub(crate) fn draw_gender(rng: &mut dyn RngCore) -> Gender {
    if rng.random_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    }
}

pub(crate) fn first_name<'c>(catalog: &'c Catalog, gender: Gender, rng: &mut dyn RngCore) -> &'c str {
    match gender {
        Gender::Male => pick(&catalog.names.male_first, rng),
        Gender::Female => pick(&catalog.names.female_first, rng),
    }
}

/// "First Last" for a person of random gender.
pub(crate) fn full_name(catalog: &Catalog, rng: &mut dyn RngCore) -> String {
    let gender = draw_gender(rng);
    let first = first_name(catalog, gender, rng);
    let last = pick(&catalog.names.last, rng);
    format!("{first} {last}")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::national_id::decode_national_id;

    use super::*;

    #[test]
    fn identity_agrees_with_its_national_id() {
        let catalog = Catalog::default();
        let after = NaiveDate::from_ymd_opt(1950, 1, 1).expect("date");
        let before = NaiveDate::from_ymd_opt(2005, 12, 31).expect("date");
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..100 {
            let person = PersonIdentity::draw(&catalog, after, before, &mut rng).expect("draw");
            let decoded = decode_national_id(&person.national_id).expect("decode");
            assert_eq!(decoded.gender, person.gender);
            assert_eq!(decoded.birth_date, person.date_of_birth);
            let names = match person.gender {
                Gender::Male => &catalog.names.male_first,
                Gender::Female => &catalog.names.female_first,
            };
            assert!(names.contains(&person.first_name));
        }
    }
}
