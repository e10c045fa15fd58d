use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use medsynth_core::{Entity, Row, TableSchema};

use crate::errors::GenerationError;

use super::TableSink;

/// Writes each table to `<dir>/<table>.csv`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn table_path(&self, entity: Entity) -> PathBuf {
        self.dir.join(format!("{}.csv", entity.table_name()))
    }
}

impl TableSink for CsvSink {
    fn write_table(&mut self, entity: Entity, rows: &[Row]) -> Result<u64, GenerationError> {
        std::fs::create_dir_all(&self.dir)?;
        let file = BufWriter::new(File::create(self.table_path(entity))?);
        Ok(write_table_csv(file, entity.schema(), rows)?)
    }
}

/// Write a header row plus `rows` in column order, returning bytes written.
pub fn write_table_csv<W: Write>(
    writer: W,
    schema: &TableSchema,
    rows: &[Row],
) -> Result<u64, csv::Error> {
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(schema.column_names())?;

    for row in rows {
        let record: Vec<String> = schema
            .columns
            .iter()
            .zip(row)
            .map(|(column, value)| value.to_csv(column))
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use medsynth_core::FieldValue;

    use super::*;

    #[test]
    fn writes_header_and_typed_cells() {
        let created = NaiveDate::from_ymd_opt(2024, 11, 5)
            .and_then(|date| date.and_hms_opt(14, 30, 0))
            .expect("timestamp");
        let rows = vec![vec![
            FieldValue::Int(1),
            FieldValue::Int(42),
            FieldValue::Null,
            FieldValue::text("Lab_Result"),
            FieldValue::text("Pathology report is ready."),
            FieldValue::text("Medium"),
            FieldValue::Bool(false),
            FieldValue::Timestamp(created),
        ]];

        let mut buffer = Vec::new();
        let bytes =
            write_table_csv(&mut buffer, Entity::SystemAlerts.schema(), &rows).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(bytes as usize, text.len());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "alert_id,patient_id,doctor_id,alert_type,alert_message,severity,is_read,created_date"
        );
        assert_eq!(
            lines[1],
            "1,42,,Lab_Result,Pathology report is ready.,Medium,0,2024-11-05 14:30:00"
        );
    }

    #[test]
    fn quotes_cells_with_separators() {
        let rows = vec![vec![
            FieldValue::Int(3),
            FieldValue::Int(7),
            FieldValue::text("Blood_Pressure"),
            FieldValue::Decimal(181.5),
            FieldValue::text("mmHg"),
            FieldValue::Timestamp(
                NaiveDate::from_ymd_opt(2024, 1, 2)
                    .and_then(|date| date.and_hms_opt(3, 4, 5))
                    .expect("timestamp"),
            ),
            FieldValue::Bool(true),
            FieldValue::Bool(true),
            FieldValue::text("High, recheck"),
        ]];
        let mut buffer = Vec::new();
        write_table_csv(&mut buffer, Entity::MedicalReadings.schema(), &rows).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(
            text.lines().last(),
            Some("3,7,Blood_Pressure,181.50,mmHg,2024-01-02 03:04:05,1,1,\"High, recheck\"")
        );
    }
}
