use tracing::info;

use medsynth_core::{Entity, Row};
use medsynth_generate::{GenerationError, TableSink};

/// Logs the first rows of each table before passing it on.
pub struct PreviewSink<S> {
    inner: S,
    rows: usize,
}

impl<S> PreviewSink<S> {
    pub fn new(inner: S, rows: usize) -> Self {
        Self { inner, rows }
    }
}

impl<S: TableSink> TableSink for PreviewSink<S> {
    fn write_table(&mut self, entity: Entity, rows: &[Row]) -> Result<u64, GenerationError> {
        let schema = entity.schema();
        for (idx, row) in rows.iter().take(self.rows).enumerate() {
            let cells: Vec<String> = schema
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| format!("{}={}", column.name, value.to_csv(column)))
                .collect();
            info!(table = %entity, row = idx + 1, values = %cells.join(" | "), "preview");
        }
        self.inner.write_table(entity, rows)
    }
}
