use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use medsynth_core::{
    Appointment, Doctor, Entity, MedicalReading, Medication, Patient, Record, Row, SystemAlert,
};

use crate::catalog::Catalog;
use crate::errors::GenerationError;
use crate::foreign::{ForeignContext, ForeignPools, InMemoryForeignContext};
use crate::generators::{
    AlertGenerator, AppointmentGenerator, DoctorGenerator, EntityGenerator, GeneratorContext,
    MedicationGenerator, PatientGenerator, ReadingGenerator,
};
use crate::model::{Clock, GenerateOptions, GenerationReport, MedicationConsistency, TableReport};
use crate::output::TableSink;
use crate::uniqueness::UniquenessEnforcer;

/// Records of one table plus the retries it took to keep them unique.
#[derive(Debug, Clone)]
pub struct GeneratedTable<R> {
    pub records: Vec<R>,
    pub retries: u64,
}

impl<R: Record> GeneratedTable<R> {
    pub fn rows(&self) -> Vec<Row> {
        self.records.iter().map(Record::to_row).collect()
    }
}

/// A generated table of any entity.
#[derive(Debug, Clone)]
pub enum TableData {
    Doctors(GeneratedTable<Doctor>),
    Patients(GeneratedTable<Patient>),
    Appointments(GeneratedTable<Appointment>),
    Medications(GeneratedTable<Medication>),
    MedicalReadings(GeneratedTable<MedicalReading>),
    SystemAlerts(GeneratedTable<SystemAlert>),
}

macro_rules! each_table {
    ($data:expr, $table:ident => $body:expr) => {
        match $data {
            TableData::Doctors($table) => $body,
            TableData::Patients($table) => $body,
            TableData::Appointments($table) => $body,
            TableData::Medications($table) => $body,
            TableData::MedicalReadings($table) => $body,
            TableData::SystemAlerts($table) => $body,
        }
    };
}

impl TableData {
    pub fn entity(&self) -> Entity {
        match self {
            TableData::Doctors(_) => Entity::Doctors,
            TableData::Patients(_) => Entity::Patients,
            TableData::Appointments(_) => Entity::Appointments,
            TableData::Medications(_) => Entity::Medications,
            TableData::MedicalReadings(_) => Entity::MedicalReadings,
            TableData::SystemAlerts(_) => Entity::SystemAlerts,
        }
    }

    pub fn len(&self) -> usize {
        each_table!(self, table => table.records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn retries(&self) -> u64 {
        each_table!(self, table => table.retries)
    }

    pub fn rows(&self) -> Vec<Row> {
        each_table!(self, table => table.rows())
    }

    /// Expose this table to later tables of the same dataset run.
    ///
    /// With `keep_pool` the caller's explicit pool stays in charge and only
    /// the foreign keys of the records are remembered.
    pub fn ingest_into(&self, context: &mut InMemoryForeignContext, keep_pool: bool) {
        each_table!(self, table => {
            if keep_pool {
                context.ingest_references(&table.records);
            } else {
                context.ingest_table(&table.records);
            }
        })
    }
}

/// Row counts per entity for a dataset run; absent entities are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityCounts {
    pub doctors: Option<u64>,
    pub patients: Option<u64>,
    pub appointments: Option<u64>,
    pub medications: Option<u64>,
    pub medical_readings: Option<u64>,
    pub system_alerts: Option<u64>,
}

impl EntityCounts {
    pub fn get(&self, entity: Entity) -> Option<u64> {
        match entity {
            Entity::Doctors => self.doctors,
            Entity::Patients => self.patients,
            Entity::Appointments => self.appointments,
            Entity::Medications => self.medications,
            Entity::MedicalReadings => self.medical_readings,
            Entity::SystemAlerts => self.system_alerts,
        }
    }

    pub fn set(&mut self, entity: Entity, count: u64) {
        let slot = match entity {
            Entity::Doctors => &mut self.doctors,
            Entity::Patients => &mut self.patients,
            Entity::Appointments => &mut self.appointments,
            Entity::Medications => &mut self.medications,
            Entity::MedicalReadings => &mut self.medical_readings,
            Entity::SystemAlerts => &mut self.system_alerts,
        };
        *slot = Some(count);
    }
}

/// Tables to generate in one run and the pools that override generated ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPlan {
    pub counts: EntityCounts,
    pub pools: ForeignPools,
}

impl DatasetPlan {
    /// Entities with a count, parents first.
    pub fn tables(&self) -> Vec<(Entity, u64)> {
        Entity::ALL
            .into_iter()
            .filter_map(|entity| self.counts.get(entity).map(|count| (entity, count)))
            .collect()
    }
}

/// Entry point for generating healthcare tables.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
    catalog: Catalog,
    clock: Clock,
    run_id: String,
}

impl GenerationEngine {
    /// Engine over the built-in catalog. The clock is read here, once.
    pub fn new(options: GenerateOptions) -> Self {
        let clock = Clock::from_options(&options);
        Self {
            options,
            catalog: Catalog::default(),
            clock,
            run_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Result<Self, GenerationError> {
        catalog.validate()?;
        self.catalog = catalog;
        Ok(self)
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Assemble `count` records with IDs `1..=count` from `generator`.
    ///
    /// Each attempt at a row draws from its own stream seeded by the table,
    /// the row index and the attempt number, so output depends only on the
    /// seed, the inputs and the reference time. Rows whose unique keys are
    /// taken are redrawn up to `max_attempts_row` times.
    pub fn generate_records<G: EntityGenerator>(
        &self,
        generator: &G,
        count: u64,
        foreign: &dyn ForeignContext,
    ) -> Result<GeneratedTable<G::Record>, GenerationError> {
        let entity = G::Record::ENTITY;
        if count == 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "row count for {entity} must be positive"
            )));
        }
        if self.options.max_attempts_row == 0 {
            return Err(GenerationError::InvalidConfig(
                "max_attempts_row must be at least 1".to_string(),
            ));
        }

        let mut ctx = GeneratorContext {
            record_id: 0,
            catalog: &self.catalog,
            clock: &self.clock,
            foreign,
            medication_consistency: self.options.medication_consistency,
        };
        generator.check_inputs(&ctx)?;

        let table_seed = hash_seed(self.options.seed, entity.table_name());
        let mut enforcer = UniquenessEnforcer::new();
        let mut records = Vec::with_capacity(count.min(1 << 20) as usize);
        let mut retries = 0_u64;

        for row_index in 0..count {
            ctx.record_id = row_index as i64 + 1;
            let mut attempt = 0_u32;
            loop {
                attempt += 1;
                let mut rng =
                    ChaCha8Rng::seed_from_u64(hash_row_seed(table_seed, row_index, attempt));
                let record = generator.generate(&ctx, &mut rng)?;
                let keys = generator.unique_keys(&record);
                if enforcer.claim_all(&keys) {
                    records.push(record);
                    break;
                }

                let domain = enforcer
                    .first_conflict(&keys)
                    .or_else(|| keys.first().map(|(domain, _)| *domain))
                    .unwrap_or_default()
                    .to_string();
                if attempt >= self.options.max_attempts_row {
                    warn!(
                        table = %entity,
                        domain = %domain,
                        record_id = ctx.record_id,
                        attempts = attempt,
                        "uniqueness domain exhausted"
                    );
                    return Err(GenerationError::DomainExhausted {
                        table: entity,
                        domain,
                        attempts: attempt,
                    });
                }
                retries += 1;
            }
        }

        Ok(GeneratedTable { records, retries })
    }

    /// Generate one table of `entity` against `foreign`.
    pub fn generate_table(
        &self,
        entity: Entity,
        count: u64,
        foreign: &dyn ForeignContext,
    ) -> Result<TableData, GenerationError> {
        Ok(match entity {
            Entity::Doctors => {
                TableData::Doctors(self.generate_records(&DoctorGenerator, count, foreign)?)
            }
            Entity::Patients => {
                TableData::Patients(self.generate_records(&PatientGenerator, count, foreign)?)
            }
            Entity::Appointments => TableData::Appointments(self.generate_records(
                &AppointmentGenerator,
                count,
                foreign,
            )?),
            Entity::Medications => TableData::Medications(self.generate_records(
                &MedicationGenerator,
                count,
                foreign,
            )?),
            Entity::MedicalReadings => TableData::MedicalReadings(self.generate_records(
                &ReadingGenerator,
                count,
                foreign,
            )?),
            Entity::SystemAlerts => TableData::SystemAlerts(self.generate_records(
                &AlertGenerator,
                count,
                foreign,
            )?),
        })
    }

    /// Generate a single table from explicit pools and hand it to `sink`.
    pub fn generate_single(
        &self,
        entity: Entity,
        count: u64,
        pools: &ForeignPools,
        sink: &mut dyn TableSink,
    ) -> Result<GenerationReport, GenerationError> {
        let mut counts = EntityCounts::default();
        counts.set(entity, count);
        let plan = DatasetPlan {
            counts,
            pools: pools.clone(),
        };
        self.generate_dataset(&plan, sink)
    }

    /// Generate every table of `plan`, parents first, chaining each
    /// generated table into the pools of the tables after it.
    pub fn generate_dataset(
        &self,
        plan: &DatasetPlan,
        sink: &mut dyn TableSink,
    ) -> Result<GenerationReport, GenerationError> {
        let start = Instant::now();
        let tables = plan.tables();
        let mut report =
            GenerationReport::new(self.run_id.clone(), self.options.seed, self.clock.now);

        info!(
            run_id = %self.run_id,
            tables = tables.len(),
            seed = self.options.seed,
            reference_time = %self.clock.now,
            medication_consistency = ?self.options.medication_consistency,
            "generation started"
        );

        let outcome = self.generate_tables(plan, &tables, sink, &mut report);
        report.duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                info!(
                    run_id = %self.run_id,
                    tables = report.tables.len(),
                    retries = report.retries_total,
                    bytes_written = report.bytes_written,
                    duration_ms = report.duration_ms,
                    "generation completed"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(run_id = %self.run_id, error = %err, "generation failed");
                Err(err)
            }
        }
    }

    fn generate_tables(
        &self,
        plan: &DatasetPlan,
        tables: &[(Entity, u64)],
        sink: &mut dyn TableSink,
        report: &mut GenerationReport,
    ) -> Result<(), GenerationError> {
        for &(entity, _) in tables {
            for &parent in entity.parents() {
                let planned = tables.iter().any(|(table, _)| *table == parent);
                let pooled = plan.pools.get(parent).is_some_and(|pool| !pool.is_empty());
                let optional = entity == Entity::SystemAlerts
                    && parent == Entity::Doctors
                    && !self.catalog.alerts_need_doctors();
                let derived = entity == Entity::Medications
                    && parent == Entity::Patients
                    && self.options.medication_consistency == MedicationConsistency::Strict;
                if !planned && !pooled && !optional && !derived {
                    return Err(GenerationError::EmptyPool {
                        child: entity,
                        parent,
                    });
                }
            }
            if entity == Entity::Medications
                && self.options.medication_consistency == MedicationConsistency::Strict
            {
                if !tables.iter().any(|(table, _)| *table == Entity::Appointments) {
                    return Err(GenerationError::InvalidConfig(
                        "strict medication consistency needs appointments in the same run"
                            .to_string(),
                    ));
                }
                // An explicit pool would shadow the generated appointments and
                // hand out IDs with no patient to look up.
                if plan.pools.get(Entity::Appointments).is_some() {
                    return Err(GenerationError::InvalidConfig(
                        "strict medication consistency cannot use an explicit appointments pool"
                            .to_string(),
                    ));
                }
            }
        }

        let mut foreign = InMemoryForeignContext::from_pools(&plan.pools);
        for &(entity, count) in tables {
            let table_start = Instant::now();
            info!(table = %entity, rows = count, "generating table");

            let data = self.generate_table(entity, count, &foreign)?;
            let rows = data.rows();
            let bytes_written = sink.write_table(entity, &rows)?;
            data.ingest_into(&mut foreign, plan.pools.get(entity).is_some());

            let table = TableReport {
                table: entity,
                rows_requested: count,
                rows_generated: data.len() as u64,
                retries: data.retries(),
                bytes_written,
                duration_ms: table_start.elapsed().as_millis() as u64,
            };
            info!(
                table = %entity,
                rows_generated = table.rows_generated,
                retries = table.retries,
                bytes_written = table.bytes_written,
                duration_ms = table.duration_ms,
                "table generated"
            );
            report.record_table(table);
        }
        Ok(())
    }
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn hash_row_seed(table_seed: u64, row_index: u64, attempt: u32) -> u64 {
    let mut hash = table_seed ^ row_index.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= attempt as u64;
    hash = hash.wrapping_mul(0x100000001b3);
    hash
}
