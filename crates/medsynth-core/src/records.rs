use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::value::{FieldValue, Row};

/// A generated record that can be rendered as a row of its entity table.
pub trait Record {
    const ENTITY: Entity;

    fn primary_key(&self) -> i64;

    /// Values in the column order of `Self::ENTITY.schema()`.
    fn to_row(&self) -> Row;

    /// Foreign key columns carried by the record, by column name.
    fn references(&self) -> Vec<(&'static str, i64)> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Male" | "male" | "M" => Some(Gender::Male),
            "Female" | "female" | "F" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    #[serde(rename = "No-Show")]
    NoShow,
    #[serde(rename = "In-Progress")]
    InProgress,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
        AppointmentStatus::InProgress,
    ];

    /// Statuses a past appointment can settle into.
    pub const FINAL: [AppointmentStatus; 3] = [
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No-Show",
            AppointmentStatus::InProgress => "In-Progress",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doctor {
    pub doctor_id: i64,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Not a column of the doctors table; kept to check the national ID against.
    #[serde(skip)]
    pub gender: Gender,
    #[serde(skip)]
    pub date_of_birth: NaiveDate,
    pub specialization: String,
    pub license_number: String,
    pub phone: String,
    pub years_of_experience: i64,
    pub consultation_fee: f64,
    pub is_active: bool,
    pub registration_date: NaiveDateTime,
}

impl Record for Doctor {
    const ENTITY: Entity = Entity::Doctors;

    fn primary_key(&self) -> i64 {
        self.doctor_id
    }

    fn to_row(&self) -> Row {
        vec![
            FieldValue::Int(self.doctor_id),
            FieldValue::text(&self.national_id),
            FieldValue::text(&self.first_name),
            FieldValue::text(&self.last_name),
            FieldValue::text(&self.specialization),
            FieldValue::text(&self.license_number),
            FieldValue::text(&self.phone),
            FieldValue::Int(self.years_of_experience),
            FieldValue::Decimal(self.consultation_fee),
            FieldValue::Bool(self.is_active),
            FieldValue::Timestamp(self.registration_date),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    pub patient_id: i64,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub address: String,
    pub blood_type: String,
    pub allergies: Option<String>,
    pub chronic_diseases: Option<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub registration_date: NaiveDateTime,
    pub is_active: bool,
}

impl Record for Patient {
    const ENTITY: Entity = Entity::Patients;

    fn primary_key(&self) -> i64 {
        self.patient_id
    }

    fn to_row(&self) -> Row {
        vec![
            FieldValue::Int(self.patient_id),
            FieldValue::text(&self.national_id),
            FieldValue::text(&self.first_name),
            FieldValue::text(&self.last_name),
            FieldValue::Date(self.date_of_birth),
            FieldValue::text(self.gender.as_str()),
            FieldValue::text(&self.phone),
            FieldValue::text(&self.address),
            FieldValue::text(&self.blood_type),
            FieldValue::optional_text(self.allergies.as_deref()),
            FieldValue::optional_text(self.chronic_diseases.as_deref()),
            FieldValue::text(&self.emergency_contact_name),
            FieldValue::text(&self.emergency_contact_phone),
            FieldValue::Timestamp(self.registration_date),
            FieldValue::Bool(self.is_active),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appointment {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub notes: Option<String>,
    pub created_date: NaiveDateTime,
    pub updated_date: NaiveDateTime,
}

impl Appointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.appointment_date.and_time(self.appointment_time)
    }
}

impl Record for Appointment {
    const ENTITY: Entity = Entity::Appointments;

    fn primary_key(&self) -> i64 {
        self.appointment_id
    }

    fn to_row(&self) -> Row {
        vec![
            FieldValue::Int(self.appointment_id),
            FieldValue::Int(self.patient_id),
            FieldValue::Int(self.doctor_id),
            FieldValue::Date(self.appointment_date),
            FieldValue::Time(self.appointment_time),
            FieldValue::text(self.status.as_str()),
            FieldValue::text(&self.reason),
            FieldValue::optional_text(self.diagnosis.as_deref()),
            FieldValue::optional_text(self.prescription.as_deref()),
            FieldValue::optional_text(self.notes.as_deref()),
            FieldValue::Timestamp(self.created_date),
            FieldValue::Timestamp(self.updated_date),
        ]
    }

    fn references(&self) -> Vec<(&'static str, i64)> {
        vec![("patient_id", self.patient_id), ("doctor_id", self.doctor_id)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Medication {
    pub medication_id: i64,
    pub appointment_id: i64,
    pub patient_id: i64,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub instructions: String,
}

impl Record for Medication {
    const ENTITY: Entity = Entity::Medications;

    fn primary_key(&self) -> i64 {
        self.medication_id
    }

    fn to_row(&self) -> Row {
        vec![
            FieldValue::Int(self.medication_id),
            FieldValue::Int(self.appointment_id),
            FieldValue::Int(self.patient_id),
            FieldValue::text(&self.medication_name),
            FieldValue::text(&self.dosage),
            FieldValue::text(&self.frequency),
            FieldValue::text(&self.duration),
            FieldValue::Date(self.start_date),
            FieldValue::Date(self.end_date),
            FieldValue::text(&self.instructions),
        ]
    }

    fn references(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("appointment_id", self.appointment_id),
            ("patient_id", self.patient_id),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalReading {
    pub reading_id: i64,
    pub patient_id: i64,
    pub device_type: String,
    pub reading_value: f64,
    pub unit: String,
    pub reading_timestamp: NaiveDateTime,
    pub is_critical: bool,
    pub alert_sent: bool,
    pub notes: Option<String>,
}

impl Record for MedicalReading {
    const ENTITY: Entity = Entity::MedicalReadings;

    fn primary_key(&self) -> i64 {
        self.reading_id
    }

    fn to_row(&self) -> Row {
        vec![
            FieldValue::Int(self.reading_id),
            FieldValue::Int(self.patient_id),
            FieldValue::text(&self.device_type),
            FieldValue::Decimal(self.reading_value),
            FieldValue::text(&self.unit),
            FieldValue::Timestamp(self.reading_timestamp),
            FieldValue::Bool(self.is_critical),
            FieldValue::Bool(self.alert_sent),
            FieldValue::optional_text(self.notes.as_deref()),
        ]
    }

    fn references(&self) -> Vec<(&'static str, i64)> {
        vec![("patient_id", self.patient_id)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemAlert {
    pub alert_id: i64,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub alert_type: String,
    pub alert_message: String,
    pub severity: Severity,
    pub is_read: bool,
    pub created_date: NaiveDateTime,
}

impl Record for SystemAlert {
    const ENTITY: Entity = Entity::SystemAlerts;

    fn primary_key(&self) -> i64 {
        self.alert_id
    }

    fn to_row(&self) -> Row {
        vec![
            FieldValue::Int(self.alert_id),
            FieldValue::optional_int(self.patient_id),
            FieldValue::optional_int(self.doctor_id),
            FieldValue::text(&self.alert_type),
            FieldValue::text(&self.alert_message),
            FieldValue::text(self.severity.as_str()),
            FieldValue::Bool(self.is_read),
            FieldValue::Timestamp(self.created_date),
        ]
    }

    fn references(&self) -> Vec<(&'static str, i64)> {
        let mut refs = Vec::new();
        if let Some(patient_id) = self.patient_id {
            refs.push(("patient_id", patient_id));
        }
        if let Some(doctor_id) = self.doctor_id {
            refs.push(("doctor_id", doctor_id));
        }
        refs
    }
}
