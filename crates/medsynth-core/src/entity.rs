use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::schema::{
    APPOINTMENTS, DOCTORS, MEDICAL_READINGS, MEDICATIONS, PATIENTS, SYSTEM_ALERTS, TableSchema,
};

/// Generated entity tables, declared in dependency order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Doctors,
    Patients,
    Appointments,
    Medications,
    MedicalReadings,
    SystemAlerts,
}

impl Entity {
    /// Every entity, parents before children.
    pub const ALL: [Entity; 6] = [
        Entity::Doctors,
        Entity::Patients,
        Entity::Appointments,
        Entity::Medications,
        Entity::MedicalReadings,
        Entity::SystemAlerts,
    ];

    pub fn table_name(self) -> &'static str {
        self.schema().name
    }

    pub fn schema(self) -> &'static TableSchema {
        match self {
            Entity::Doctors => &DOCTORS,
            Entity::Patients => &PATIENTS,
            Entity::Appointments => &APPOINTMENTS,
            Entity::Medications => &MEDICATIONS,
            Entity::MedicalReadings => &MEDICAL_READINGS,
            Entity::SystemAlerts => &SYSTEM_ALERTS,
        }
    }

    /// Name of the primary key column.
    pub fn key_column(self) -> &'static str {
        self.schema().columns[0].name
    }

    /// Tables whose IDs this entity references.
    pub fn parents(self) -> &'static [Entity] {
        match self {
            Entity::Doctors | Entity::Patients => &[],
            Entity::Appointments => &[Entity::Patients, Entity::Doctors],
            Entity::Medications => &[Entity::Appointments, Entity::Patients],
            Entity::MedicalReadings => &[Entity::Patients],
            Entity::SystemAlerts => &[Entity::Patients, Entity::Doctors],
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for Entity {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "doctors" | "doctor" => Ok(Entity::Doctors),
            "patients" | "patient" => Ok(Entity::Patients),
            "appointments" | "appointment" => Ok(Entity::Appointments),
            "medications" | "medication" => Ok(Entity::Medications),
            "medical_readings" | "readings" | "reading" => Ok(Entity::MedicalReadings),
            "system_alerts" | "alerts" | "alert" => Ok(Entity::SystemAlerts),
            _ => Err(Error::UnknownEntity(value.to_string())),
        }
    }
}
