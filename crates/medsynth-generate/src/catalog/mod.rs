//! Reference vocabularies sampled by the entity generators.
//!
//! The built-in catalog carries the Egyptian defaults. A TOML file can
//! override any subset of it; sections left out keep their defaults.

mod defaults;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rand::{Rng, RngCore};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use medsynth_core::Severity;

use crate::errors::GenerationError;

use defaults::strings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Catalog {
    pub phone_prefixes: Vec<String>,
    pub specializations: Vec<String>,
    /// Leading segment of every license number.
    pub license_prefix: String,
    /// Code used when a specialization has no alphabetic characters.
    pub license_fallback_code: String,
    pub blood_types: Vec<String>,
    pub names: NameCatalog,
    pub address: AddressCatalog,
    pub allergies: NullableVocabulary,
    pub chronic_diseases: NullableVocabulary,
    pub appointments: AppointmentCatalog,
    pub medications: MedicationCatalog,
    pub reading_notes: ReadingNotes,
    pub devices: Vec<DeviceSpec>,
    pub alerts: Vec<AlertTemplate>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            phone_prefixes: strings(defaults::PHONE_PREFIXES),
            specializations: strings(defaults::SPECIALIZATIONS),
            license_prefix: "MOH".to_string(),
            license_fallback_code: "GEN".to_string(),
            blood_types: strings(defaults::BLOOD_TYPES),
            names: NameCatalog::default(),
            address: AddressCatalog::default(),
            allergies: NullableVocabulary::new(defaults::ALLERGIES, defaults::ALLERGY_NULL_SLOTS),
            chronic_diseases: NullableVocabulary::new(
                defaults::CHRONIC_DISEASES,
                defaults::CHRONIC_DISEASE_NULL_SLOTS,
            ),
            appointments: AppointmentCatalog::default(),
            medications: MedicationCatalog::default(),
            reading_notes: ReadingNotes::default(),
            devices: defaults::devices(),
            alerts: defaults::alert_templates(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NameCatalog {
    pub male_first: Vec<String>,
    pub female_first: Vec<String>,
    pub last: Vec<String>,
}

impl Default for NameCatalog {
    fn default() -> Self {
        Self {
            male_first: strings(defaults::MALE_FIRST_NAMES),
            female_first: strings(defaults::FEMALE_FIRST_NAMES),
            last: strings(defaults::LAST_NAMES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AddressCatalog {
    pub governorates: Vec<String>,
    pub street_names: Vec<String>,
    pub street_types: Vec<String>,
    /// Cities drawn when the chosen governorate has no entry below.
    pub fallback_cities: Vec<String>,
    pub cities_by_governorate: BTreeMap<String, Vec<String>>,
}

impl Default for AddressCatalog {
    fn default() -> Self {
        Self {
            governorates: strings(defaults::GOVERNORATES),
            street_names: strings(defaults::STREET_NAMES),
            street_types: strings(defaults::STREET_TYPES),
            fallback_cities: defaults::fallback_cities(),
            cities_by_governorate: defaults::cities_by_governorate(),
        }
    }
}

impl AddressCatalog {
    pub fn cities_for(&self, governorate: &str) -> &[String] {
        match self.cities_by_governorate.get(governorate) {
            Some(cities) if !cities.is_empty() => cities,
            _ => &self.fallback_cities,
        }
    }
}

/// Vocabulary padded with slots that draw as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NullableVocabulary {
    pub values: Vec<String>,
    pub null_slots: u32,
}

impl Default for NullableVocabulary {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            null_slots: 1,
        }
    }
}

impl NullableVocabulary {
    pub fn new(values: &[&str], null_slots: u32) -> Self {
        Self {
            values: strings(values),
            null_slots,
        }
    }

    fn slots(&self) -> usize {
        self.values.len() + self.null_slots as usize
    }

    /// Uniform over values and null slots together.
    pub fn draw(&self, rng: &mut dyn RngCore) -> Option<String> {
        let slots = self.slots();
        if slots == 0 {
            return None;
        }
        let idx = rng.random_range(0..slots);
        self.values.get(idx).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppointmentCatalog {
    pub reasons: Vec<String>,
    pub diagnoses: Vec<String>,
    pub prescriptions: Vec<String>,
    pub notes: Vec<String>,
    pub in_progress_note: String,
}

impl Default for AppointmentCatalog {
    fn default() -> Self {
        Self {
            reasons: strings(defaults::VISIT_REASONS),
            diagnoses: strings(defaults::DIAGNOSES),
            prescriptions: strings(defaults::PRESCRIPTIONS),
            notes: strings(defaults::DOCTOR_NOTES),
            in_progress_note: defaults::IN_PROGRESS_NOTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MedicationCatalog {
    pub names: Vec<String>,
    pub dosages: Vec<String>,
    pub frequencies: Vec<String>,
    pub durations: Vec<String>,
    pub instructions: Vec<String>,
}

impl Default for MedicationCatalog {
    fn default() -> Self {
        Self {
            names: strings(defaults::MEDICATION_NAMES),
            dosages: strings(defaults::DOSAGES),
            frequencies: strings(defaults::FREQUENCIES),
            durations: strings(defaults::DURATIONS),
            instructions: strings(defaults::INSTRUCTIONS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReadingNotes {
    pub normal: NullableVocabulary,
    pub critical: Vec<String>,
}

impl Default for ReadingNotes {
    fn default() -> Self {
        Self {
            normal: NullableVocabulary::new(
                defaults::NORMAL_READING_NOTES,
                defaults::NORMAL_READING_NULL_SLOTS,
            ),
            critical: strings(defaults::CRITICAL_READING_NOTES),
        }
    }
}

/// Unit and ranges for one monitoring device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceSpec {
    pub device_type: String,
    pub unit: String,
    pub normal_min: f64,
    pub normal_max: f64,
    pub critical_low: f64,
    pub critical_high: f64,
    /// Physical maximum; critical-high draws are clamped to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<f64>,
}

impl DeviceSpec {
    /// Whether a critical-high draw can land above the normal range.
    pub fn has_high_tail(&self) -> bool {
        self.critical_high > self.normal_max
            && self.ceiling.is_none_or(|ceiling| ceiling > self.normal_max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertTargeting {
    PatientOnly,
    PatientAndDoctor,
    /// Doctor attached with even odds.
    PatientMaybeDoctor,
}

impl AlertTargeting {
    pub fn may_target_doctor(self) -> bool {
        !matches!(self, AlertTargeting::PatientOnly)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlertTemplate {
    pub alert_type: String,
    pub targeting: AlertTargeting,
    pub messages: Vec<String>,
    pub severity_weights: SeverityWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SeverityWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            low: 0.25,
            medium: 0.25,
            high: 0.25,
            critical: 0.25,
        }
    }
}

impl SeverityWeights {
    /// Weights aligned with `Severity::ALL`.
    pub fn as_array(&self) -> [f64; 4] {
        [self.low, self.medium, self.high, self.critical]
    }

    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }
}

impl Catalog {
    pub fn from_toml_str(input: &str) -> Result<Self, GenerationError> {
        let catalog: Catalog = toml::from_str(input)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    pub fn to_toml_string(&self) -> Result<String, GenerationError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Catalog)
    }

    pub fn alerts_need_doctors(&self) -> bool {
        self.alerts
            .iter()
            .any(|template| template.targeting.may_target_doctor())
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        let lists: &[(&str, &[String])] = &[
            ("phone_prefixes", self.phone_prefixes.as_slice()),
            ("specializations", self.specializations.as_slice()),
            ("blood_types", self.blood_types.as_slice()),
            ("names.male_first", self.names.male_first.as_slice()),
            ("names.female_first", self.names.female_first.as_slice()),
            ("names.last", self.names.last.as_slice()),
            ("address.governorates", self.address.governorates.as_slice()),
            ("address.street_names", self.address.street_names.as_slice()),
            ("address.street_types", self.address.street_types.as_slice()),
            ("address.fallback_cities", self.address.fallback_cities.as_slice()),
            ("appointments.reasons", self.appointments.reasons.as_slice()),
            ("appointments.diagnoses", self.appointments.diagnoses.as_slice()),
            ("appointments.prescriptions", self.appointments.prescriptions.as_slice()),
            ("appointments.notes", self.appointments.notes.as_slice()),
            ("medications.names", self.medications.names.as_slice()),
            ("medications.dosages", self.medications.dosages.as_slice()),
            ("medications.frequencies", self.medications.frequencies.as_slice()),
            ("medications.durations", self.medications.durations.as_slice()),
            ("medications.instructions", self.medications.instructions.as_slice()),
            ("reading_notes.critical", self.reading_notes.critical.as_slice()),
            ("license_prefix", std::slice::from_ref(&self.license_prefix)),
        ];
        for &(name, values) in lists {
            if values.is_empty() || values.iter().all(|value| value.trim().is_empty()) {
                return Err(invalid(format!("vocabulary '{name}' is empty")));
            }
        }

        for (name, vocabulary) in [
            ("allergies", &self.allergies),
            ("chronic_diseases", &self.chronic_diseases),
            ("reading_notes.normal", &self.reading_notes.normal),
        ] {
            if vocabulary.slots() == 0 {
                return Err(invalid(format!(
                    "vocabulary '{name}' has neither values nor null slots"
                )));
            }
        }

        let governorates: BTreeSet<&str> = self
            .address
            .governorates
            .iter()
            .map(String::as_str)
            .collect();
        for governorate in self.address.cities_by_governorate.keys() {
            if !governorates.contains(governorate.as_str()) {
                return Err(invalid(format!(
                    "cities listed for unknown governorate '{governorate}'"
                )));
            }
        }

        if self.devices.is_empty() {
            return Err(invalid("no devices configured".to_string()));
        }
        for device in &self.devices {
            validate_device(device)?;
        }

        if self.alerts.is_empty() {
            return Err(invalid("no alert templates configured".to_string()));
        }
        for template in &self.alerts {
            if template.messages.is_empty() {
                return Err(invalid(format!(
                    "alert type '{}' has no messages",
                    template.alert_type
                )));
            }
            let weights = template.severity_weights.as_array();
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(invalid(format!(
                    "alert type '{}' has a negative or non-finite severity weight",
                    template.alert_type
                )));
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(invalid(format!(
                    "alert type '{}' has all-zero severity weights",
                    template.alert_type
                )));
            }
        }

        Ok(())
    }
}

fn validate_device(device: &DeviceSpec) -> Result<(), GenerationError> {
    let name = &device.device_type;
    let bounds = [
        device.normal_min,
        device.normal_max,
        device.critical_low,
        device.critical_high,
    ];
    if bounds.iter().any(|value| !value.is_finite()) {
        return Err(invalid(format!("device '{name}' has a non-finite bound")));
    }
    if device.normal_min >= device.normal_max {
        return Err(invalid(format!(
            "device '{name}' normal range is empty or inverted"
        )));
    }
    if device.critical_low > device.normal_min || device.critical_high < device.normal_max {
        return Err(invalid(format!(
            "device '{name}' normal range must lie inside the critical bounds"
        )));
    }
    if device.critical_low >= device.normal_min && !device.has_high_tail() {
        return Err(invalid(format!(
            "device '{name}' has no critical range outside the normal range"
        )));
    }
    if let Some(ceiling) = device.ceiling {
        if !ceiling.is_finite() || ceiling < device.normal_max {
            return Err(invalid(format!(
                "device '{name}' ceiling is below the normal maximum"
            )));
        }
    }
    Ok(())
}

fn invalid(message: String) -> GenerationError {
    GenerationError::InvalidCatalog(message)
}
