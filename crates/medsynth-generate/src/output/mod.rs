//! Destinations for assembled tables.

mod csv;

use std::collections::BTreeMap;

use medsynth_core::{Entity, Row};

use crate::errors::GenerationError;

pub use self::csv::{CsvSink, write_table_csv};

/// Receives each complete table once generation of it has finished.
pub trait TableSink {
    /// Persist `rows` of `entity`, returning the number of bytes written.
    fn write_table(&mut self, entity: Entity, rows: &[Row]) -> Result<u64, GenerationError>;
}

/// Keeps rows in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: BTreeMap<Entity, Vec<Row>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, entity: Entity) -> Option<&[Row]> {
        self.tables.get(&entity).map(Vec::as_slice)
    }
}

impl TableSink for MemorySink {
    fn write_table(&mut self, entity: Entity, rows: &[Row]) -> Result<u64, GenerationError> {
        self.tables.insert(entity, rows.to_vec());
        Ok(0)
    }
}

impl<S: TableSink + ?Sized> TableSink for &mut S {
    fn write_table(&mut self, entity: Entity, rows: &[Row]) -> Result<u64, GenerationError> {
        (**self).write_table(entity, rows)
    }
}
