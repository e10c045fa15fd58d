//! Codec for the 14-digit national identifier.
//!
//! Layout, by digit index:
//! - `0`: century marker, `2` for births before 2000 and `3` from 2000 on
//! - `1..=2`: year of century, `3..=4`: month, `5..=6`: day
//! - `7..=8`: governorate code in `01..=88`
//! - `9..=11`: sequence in `000..=999`
//! - `12`: gender parity, odd for male and even for female
//! - `13`: check digit (random, never verified)

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use rand::{Rng, RngCore};
use regex::Regex;
use serde::Serialize;

use medsynth_core::Gender;

use crate::errors::GenerationError;

pub const NATIONAL_ID_LEN: usize = 14;
pub const GOVERNORATE_MIN: u8 = 1;
pub const GOVERNORATE_MAX: u8 = 88;

const MALE_DIGITS: [u8; 5] = [1, 3, 5, 7, 9];
const FEMALE_DIGITS: [u8; 5] = [0, 2, 4, 6, 8];

/// Fields recovered from a national identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedNationalId {
    pub century: u8,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub birth_date: NaiveDate,
    pub governorate: u8,
    pub sequence: u16,
    pub gender_digit: u8,
    pub gender: Gender,
    pub check_digit: u8,
}

/// Encode a birth date and gender into a fresh national identifier.
///
/// Governorate, sequence, the gender digit within its parity class and the
/// check digit are drawn from `rng`, in that order.
pub fn encode_national_id(
    birth_date: NaiveDate,
    gender: Gender,
    rng: &mut dyn RngCore,
) -> Result<String, GenerationError> {
    let year = birth_date.year();
    if !(1900..=2099).contains(&year) {
        return Err(GenerationError::InvalidNationalId {
            value: birth_date.to_string(),
            reason: "birth year must be within 1900..=2099".to_string(),
        });
    }

    let century = if year < 2000 { 2 } else { 3 };
    let year_of_century = year % 100;
    let governorate = rng.random_range(GOVERNORATE_MIN..=GOVERNORATE_MAX);
    let sequence = rng.random_range(0..=999_u16);
    let parity = match gender {
        Gender::Male => &MALE_DIGITS,
        Gender::Female => &FEMALE_DIGITS,
    };
    let gender_digit = parity[rng.random_range(0..parity.len())];
    let check_digit = rng.random_range(0..=9_u8);

    Ok(format!(
        "{century}{year_of_century:02}{month:02}{day:02}{governorate:02}{sequence:03}{gender_digit}{check_digit}",
        month = birth_date.month(),
        day = birth_date.day(),
    ))
}

/// Split a national identifier back into its fields.
pub fn decode_national_id(value: &str) -> Result<DecodedNationalId, GenerationError> {
    let invalid = |reason: &str| GenerationError::InvalidNationalId {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let pattern = national_id_pattern().ok_or_else(|| invalid("pattern unavailable"))?;
    let captures = pattern
        .captures(value)
        .ok_or_else(|| invalid("expected 14 ASCII digits"))?;
    let digits = |idx: usize| -> Result<u32, GenerationError> {
        captures
            .get(idx)
            .and_then(|group| group.as_str().parse::<u32>().ok())
            .ok_or_else(|| invalid("malformed digit group"))
    };

    let century = digits(1)? as u8;
    let base_year = match century {
        2 => 1900,
        3 => 2000,
        _ => return Err(invalid("century marker must be 2 or 3")),
    };
    let year = base_year + digits(2)? as i32;
    let month = digits(3)?;
    let day = digits(4)?;
    let birth_date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| invalid("embedded birth date is not a calendar date"))?;

    let governorate = digits(5)? as u8;
    let sequence = digits(6)? as u16;
    let gender_digit = digits(7)? as u8;
    let gender = if gender_digit % 2 == 1 {
        Gender::Male
    } else {
        Gender::Female
    };

    Ok(DecodedNationalId {
        century,
        year,
        month,
        day,
        birth_date,
        governorate,
        sequence,
        gender_digit,
        gender,
        check_digit: digits(8)? as u8,
    })
}

fn national_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^(\d)(\d{2})(\d{2})(\d{2})(\d{2})(\d{3})(\d)(\d)$").ok()
        })
        .as_ref()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn encodes_twentieth_century_birth() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let id = encode_national_id(date(1987, 4, 9), Gender::Female, &mut rng).expect("encode");
        assert_eq!(id.len(), NATIONAL_ID_LEN);
        assert!(id.starts_with("2870409"));

        let decoded = decode_national_id(&id).expect("decode");
        assert_eq!(decoded.birth_date, date(1987, 4, 9));
        assert_eq!(decoded.gender, Gender::Female);
        assert!((GOVERNORATE_MIN..=GOVERNORATE_MAX).contains(&decoded.governorate));
        assert!(decoded.sequence <= 999);
    }

    #[test]
    fn encodes_post_2000_birth_with_marker_three() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let id = encode_national_id(date(2004, 12, 31), Gender::Male, &mut rng).expect("encode");
        assert!(id.starts_with("3041231"));
        let decoded = decode_national_id(&id).expect("decode");
        assert_eq!(decoded.century, 3);
        assert_eq!(decoded.gender_digit % 2, 1);
    }

    #[test]
    fn round_trips_gender_and_date_across_seeds() {
        for seed in 0..200_u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let gender = if seed % 2 == 0 {
                Gender::Male
            } else {
                Gender::Female
            };
            let birth = date(1950, 1, 1) + chrono::Duration::days((seed * 97) as i64);
            let id = encode_national_id(birth, gender, &mut rng).expect("encode");
            let decoded = decode_national_id(&id).expect("decode");
            assert_eq!(decoded.gender, gender);
            assert_eq!(decoded.birth_date, birth);
        }
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for value in [
            "",
            "2870409",
            "28704090112345",
            "287040901123a5",
            "48704090112345",
            "29902300112345",
        ] {
            let result = decode_national_id(value);
            if value == "28704090112345" {
                assert!(result.is_ok(), "{value} is well formed");
            } else {
                assert!(
                    matches!(result, Err(GenerationError::InvalidNationalId { .. })),
                    "{value} should be rejected"
                );
            }
        }
    }

    #[test]
    fn rejects_unrepresentable_birth_year() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = encode_national_id(date(1899, 12, 31), Gender::Male, &mut rng);
        assert!(matches!(
            result,
            Err(GenerationError::InvalidNationalId { .. })
        ));
    }
}
