use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::schema::{ColumnDef, ColumnKind};

/// One rendered table row, aligned with its `TableSchema` columns.
pub type Row = Vec<FieldValue>;

/// Typed value for a single column of a generated row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map(FieldValue::text).unwrap_or(FieldValue::Null)
    }

    pub fn optional_int(value: Option<i64>) -> Self {
        value.map(FieldValue::Int).unwrap_or(FieldValue::Null)
    }

    pub fn to_csv(&self, column: &ColumnDef) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(value) => {
                if *value {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            }
            FieldValue::Int(value) => value.to_string(),
            FieldValue::Decimal(value) => match column.kind {
                ColumnKind::Decimal { scale } => {
                    let scale = scale as usize;
                    format!("{value:.scale$}")
                }
                _ => value.to_string(),
            },
            FieldValue::Text(value) => value.clone(),
            FieldValue::Date(value) => value.format("%Y-%m-%d").to_string(),
            FieldValue::Time(value) => value.format("%H:%M:%S").to_string(),
            FieldValue::Timestamp(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_csv_by_column_kind() {
        let fee = ColumnDef::required("consultation_fee", ColumnKind::Decimal { scale: 2 });
        let flag = ColumnDef::required("is_active", ColumnKind::Bit);
        let stamp = ColumnDef::required("registration_date", ColumnKind::Timestamp);
        let notes = ColumnDef::nullable("notes", ColumnKind::Text);

        assert_eq!(FieldValue::Decimal(250.5).to_csv(&fee), "250.50");
        assert_eq!(FieldValue::Bool(true).to_csv(&flag), "1");
        assert_eq!(FieldValue::Bool(false).to_csv(&flag), "0");
        assert_eq!(FieldValue::Null.to_csv(&notes), "");

        let when = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(7, 5, 0))
            .expect("valid timestamp");
        assert_eq!(FieldValue::Timestamp(when).to_csv(&stamp), "2024-03-09 07:05:00");
    }
}
