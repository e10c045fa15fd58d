use serde::Serialize;

/// Storage kind of a column, mirroring the relational target schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Int,
    Text,
    Date,
    Time,
    Timestamp,
    /// Fixed-point number rendered with `scale` fractional digits.
    Decimal { scale: u8 },
    /// SQL `bit` flag rendered as `0`/`1`.
    Bit,
}

/// Column metadata for a generated table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

impl ColumnDef {
    pub const fn required(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    pub const fn nullable(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }
}

/// Table layout: name plus columns in their canonical order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.name).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }
}

const MONEY: ColumnKind = ColumnKind::Decimal { scale: 2 };

pub const DOCTORS: TableSchema = TableSchema {
    name: "doctors",
    columns: &[
        ColumnDef::required("doctor_id", ColumnKind::Int),
        ColumnDef::required("national_id", ColumnKind::Text),
        ColumnDef::required("first_name", ColumnKind::Text),
        ColumnDef::required("last_name", ColumnKind::Text),
        ColumnDef::required("specialization", ColumnKind::Text),
        ColumnDef::required("license_number", ColumnKind::Text),
        ColumnDef::required("phone", ColumnKind::Text),
        ColumnDef::required("years_of_experience", ColumnKind::Int),
        ColumnDef::required("consultation_fee", MONEY),
        ColumnDef::required("is_active", ColumnKind::Bit),
        ColumnDef::required("registration_date", ColumnKind::Timestamp),
    ],
};

pub const PATIENTS: TableSchema = TableSchema {
    name: "patients",
    columns: &[
        ColumnDef::required("patient_id", ColumnKind::Int),
        ColumnDef::required("national_id", ColumnKind::Text),
        ColumnDef::required("first_name", ColumnKind::Text),
        ColumnDef::required("last_name", ColumnKind::Text),
        ColumnDef::required("date_of_birth", ColumnKind::Date),
        ColumnDef::required("gender", ColumnKind::Text),
        ColumnDef::required("phone", ColumnKind::Text),
        ColumnDef::nullable("address", ColumnKind::Text),
        ColumnDef::nullable("blood_type", ColumnKind::Text),
        ColumnDef::nullable("allergies", ColumnKind::Text),
        ColumnDef::nullable("chronic_diseases", ColumnKind::Text),
        ColumnDef::nullable("emergency_contact_name", ColumnKind::Text),
        ColumnDef::nullable("emergency_contact_phone", ColumnKind::Text),
        ColumnDef::required("registration_date", ColumnKind::Timestamp),
        ColumnDef::required("is_active", ColumnKind::Bit),
    ],
};

pub const APPOINTMENTS: TableSchema = TableSchema {
    name: "appointments",
    columns: &[
        ColumnDef::required("appointment_id", ColumnKind::Int),
        ColumnDef::required("patient_id", ColumnKind::Int),
        ColumnDef::required("doctor_id", ColumnKind::Int),
        ColumnDef::required("appointment_date", ColumnKind::Date),
        ColumnDef::required("appointment_time", ColumnKind::Time),
        ColumnDef::required("status", ColumnKind::Text),
        ColumnDef::nullable("reason", ColumnKind::Text),
        ColumnDef::nullable("diagnosis", ColumnKind::Text),
        ColumnDef::nullable("prescription", ColumnKind::Text),
        ColumnDef::nullable("notes", ColumnKind::Text),
        ColumnDef::required("created_date", ColumnKind::Timestamp),
        ColumnDef::required("updated_date", ColumnKind::Timestamp),
    ],
};

pub const MEDICATIONS: TableSchema = TableSchema {
    name: "medications",
    columns: &[
        ColumnDef::required("medication_id", ColumnKind::Int),
        ColumnDef::required("appointment_id", ColumnKind::Int),
        ColumnDef::required("patient_id", ColumnKind::Int),
        ColumnDef::required("medication_name", ColumnKind::Text),
        ColumnDef::required("dosage", ColumnKind::Text),
        ColumnDef::required("frequency", ColumnKind::Text),
        ColumnDef::nullable("duration", ColumnKind::Text),
        ColumnDef::required("start_date", ColumnKind::Date),
        ColumnDef::nullable("end_date", ColumnKind::Date),
        ColumnDef::nullable("instructions", ColumnKind::Text),
    ],
};

pub const MEDICAL_READINGS: TableSchema = TableSchema {
    name: "medical_readings",
    columns: &[
        ColumnDef::required("reading_id", ColumnKind::Int),
        ColumnDef::required("patient_id", ColumnKind::Int),
        ColumnDef::required("device_type", ColumnKind::Text),
        ColumnDef::required("reading_value", MONEY),
        ColumnDef::required("unit", ColumnKind::Text),
        ColumnDef::required("reading_timestamp", ColumnKind::Timestamp),
        ColumnDef::required("is_critical", ColumnKind::Bit),
        ColumnDef::required("alert_sent", ColumnKind::Bit),
        ColumnDef::nullable("notes", ColumnKind::Text),
    ],
};

pub const SYSTEM_ALERTS: TableSchema = TableSchema {
    name: "system_alerts",
    columns: &[
        ColumnDef::required("alert_id", ColumnKind::Int),
        ColumnDef::nullable("patient_id", ColumnKind::Int),
        ColumnDef::nullable("doctor_id", ColumnKind::Int),
        ColumnDef::required("alert_type", ColumnKind::Text),
        ColumnDef::required("alert_message", ColumnKind::Text),
        ColumnDef::required("severity", ColumnKind::Text),
        ColumnDef::required("is_read", ColumnKind::Bit),
        ColumnDef::required("created_date", ColumnKind::Timestamp),
    ],
};
