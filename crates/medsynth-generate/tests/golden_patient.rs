//! The first patient of seed 123 is pinned in `tests/fixtures`.
//!
//! After an intentional change to the catalog or the draw order, re-record
//! it with `MEDSYNTH_RECORD_FIXTURES=1 cargo test -p medsynth-generate`.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use medsynth_core::{Entity, Gender};
use medsynth_generate::{
    GenerateOptions, GenerationEngine, InMemoryForeignContext, TableData, decode_national_id,
};

const RECORD_ENV: &str = "MEDSYNTH_RECORD_FIXTURES";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/patient_seed_123.json")
}

fn first_patient() -> serde_json::Value {
    let engine = GenerationEngine::new(GenerateOptions {
        seed: 123,
        reference_time: NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0)),
        ..GenerateOptions::default()
    });
    let table = engine
        .generate_table(Entity::Patients, 1, &InMemoryForeignContext::new())
        .expect("patient");
    let TableData::Patients(table) = table else {
        panic!("expected patients");
    };
    let patient = table.records.first().expect("one patient");

    let decoded = decode_national_id(&patient.national_id).expect("decode");
    assert_eq!(decoded.birth_date, patient.date_of_birth);
    assert_eq!(decoded.gender, patient.gender);
    assert!(matches!(patient.gender, Gender::Male | Gender::Female));

    serde_json::to_value(patient).expect("serialize patient")
}

#[test]
fn seed_123_patient_matches_fixture() {
    let actual = first_patient();
    let path = fixture_path();

    if std::env::var_os(RECORD_ENV).is_some() {
        let pretty = serde_json::to_string_pretty(&actual).expect("render fixture");
        fs::write(&path, format!("{pretty}\n")).expect("record fixture");
        return;
    }

    let contents = fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!(
            "read fixture {}: {err} (set {RECORD_ENV}=1 to record it)",
            path.display()
        )
    });
    let expected: serde_json::Value = serde_json::from_str(&contents).expect("parse fixture");
    assert_eq!(actual, expected, "patient drifted from {}", path.display());
}

#[test]
fn seed_123_patient_is_stable_across_engines() {
    assert_eq!(first_patient(), first_patient());
}
