use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use medsynth_core::{Entity, Record};

use crate::errors::GenerationError;

/// Source of foreign-key values for dependent tables.
pub trait ForeignContext {
    /// Draw one parent key for a row of `child`.
    fn pick_fk(
        &self,
        child: Entity,
        parent: Entity,
        rng: &mut dyn RngCore,
    ) -> Result<i64, GenerationError>;

    /// Value of a foreign-key column on the parent row with key `pk`.
    fn lookup_parent(&self, parent: Entity, pk: i64, column: &str) -> Option<i64>;

    fn has_pool(&self, parent: Entity) -> bool;

    /// Whether `lookup_parent` can answer for `column` of `parent`.
    fn tracks_column(&self, parent: Entity, column: &str) -> bool;
}

/// A set of candidate primary keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IdPool {
    /// Inclusive on both ends.
    Range { start: i64, end: i64 },
    List(Vec<i64>),
}

impl IdPool {
    pub fn range(start: i64, end: i64) -> Self {
        IdPool::Range { start, end }
    }

    pub fn len(&self) -> u64 {
        match self {
            IdPool::Range { start, end } if start <= end => (end - start) as u64 + 1,
            IdPool::Range { .. } => 0,
            IdPool::List(ids) => ids.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: i64) -> bool {
        match self {
            IdPool::Range { start, end } => (*start..=*end).contains(&id),
            IdPool::List(ids) => ids.contains(&id),
        }
    }

    pub fn pick(&self, rng: &mut dyn RngCore) -> Option<i64> {
        match self {
            IdPool::Range { start, end } if start <= end => Some(rng.random_range(*start..=*end)),
            IdPool::Range { .. } => None,
            IdPool::List(ids) if ids.is_empty() => None,
            IdPool::List(ids) => Some(ids[rng.random_range(0..ids.len())]),
        }
    }
}

impl fmt::Display for IdPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPool::Range { start, end } => write!(f, "{start}..={end}"),
            IdPool::List(ids) => {
                let parts: Vec<String> = ids.iter().map(i64::to_string).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

impl FromStr for IdPool {
    type Err = GenerationError;

    /// Accepts `1..=100`, `1-100`, a single id, or a comma-separated list.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let invalid = || GenerationError::InvalidConfig(format!("invalid id pool '{value}'"));
        let parse = |part: &str| part.trim().parse::<i64>().map_err(|_| invalid());

        if let Some((start, end)) = value.split_once("..=").or_else(|| value.split_once('-')) {
            let pool = IdPool::range(parse(start)?, parse(end)?);
            if pool.is_empty() {
                return Err(invalid());
            }
            return Ok(pool);
        }
        if value.contains(',') {
            let ids = value
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| parse(part))
                .collect::<Result<Vec<_>, _>>()?;
            if ids.is_empty() {
                return Err(invalid());
            }
            return Ok(IdPool::List(ids));
        }
        let id = parse(value)?;
        Ok(IdPool::range(id, id))
    }
}

impl TryFrom<String> for IdPool {
    type Error = GenerationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IdPool> for String {
    fn from(pool: IdPool) -> Self {
        pool.to_string()
    }
}

/// Caller-supplied key pools for the parent tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignPools {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patients: Option<IdPool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctors: Option<IdPool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointments: Option<IdPool>,
}

impl ForeignPools {
    pub fn get(&self, parent: Entity) -> Option<&IdPool> {
        match parent {
            Entity::Patients => self.patients.as_ref(),
            Entity::Doctors => self.doctors.as_ref(),
            Entity::Appointments => self.appointments.as_ref(),
            _ => None,
        }
    }

    /// Pools used when the standalone table commands get no explicit ranges.
    pub fn standalone_defaults() -> Self {
        Self {
            patients: Some(IdPool::range(1, 10_000)),
            doctors: Some(IdPool::range(1, 1_001)),
            appointments: Some(IdPool::range(1, 20_000)),
        }
    }

    /// Values from `self`, falling back to `other` per pool.
    pub fn or(&self, other: &ForeignPools) -> ForeignPools {
        ForeignPools {
            patients: self.patients.clone().or_else(|| other.patients.clone()),
            doctors: self.doctors.clone().or_else(|| other.doctors.clone()),
            appointments: self
                .appointments
                .clone()
                .or_else(|| other.appointments.clone()),
        }
    }
}

/// Pools plus the foreign keys of tables generated earlier in the run.
#[derive(Debug, Default)]
pub struct InMemoryForeignContext {
    pools: BTreeMap<Entity, IdPool>,
    rows_by_pk: BTreeMap<Entity, HashMap<i64, Vec<(&'static str, i64)>>>,
}

impl InMemoryForeignContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pools(pools: &ForeignPools) -> Self {
        let mut context = Self::new();
        for parent in [Entity::Patients, Entity::Doctors, Entity::Appointments] {
            if let Some(pool) = pools.get(parent) {
                context.pools.insert(parent, pool.clone());
            }
        }
        context
    }

    pub fn with_pool(mut self, parent: Entity, pool: IdPool) -> Self {
        self.pools.insert(parent, pool);
        self
    }

    /// Make a generated table available as a parent pool.
    pub fn ingest_table<R: Record>(&mut self, records: &[R]) {
        let ids = records.iter().map(Record::primary_key).collect();
        self.pools.insert(R::ENTITY, IdPool::List(ids));
        self.ingest_references(records);
    }

    /// Remember the foreign keys of `records` without touching the pool.
    pub fn ingest_references<R: Record>(&mut self, records: &[R]) {
        let rows = records
            .iter()
            .map(|record| (record.primary_key(), record.references()))
            .collect();
        self.rows_by_pk.insert(R::ENTITY, rows);
    }
}

impl ForeignContext for InMemoryForeignContext {
    fn pick_fk(
        &self,
        child: Entity,
        parent: Entity,
        rng: &mut dyn RngCore,
    ) -> Result<i64, GenerationError> {
        self.pools
            .get(&parent)
            .and_then(|pool| pool.pick(rng))
            .ok_or(GenerationError::EmptyPool { child, parent })
    }

    fn lookup_parent(&self, parent: Entity, pk: i64, column: &str) -> Option<i64> {
        self.rows_by_pk
            .get(&parent)?
            .get(&pk)?
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| *value)
    }

    fn has_pool(&self, parent: Entity) -> bool {
        self.pools.get(&parent).is_some_and(|pool| !pool.is_empty())
    }

    fn tracks_column(&self, parent: Entity, column: &str) -> bool {
        self.rows_by_pk.get(&parent).is_some_and(|rows| {
            rows.values()
                .next()
                .is_some_and(|refs| refs.iter().any(|(name, _)| *name == column))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use medsynth_core::{Appointment, AppointmentStatus};

    use super::*;

    #[test]
    fn parses_pool_notations() {
        assert_eq!("1..=10000".parse::<IdPool>().ok(), Some(IdPool::range(1, 10_000)));
        assert_eq!("5-9".parse::<IdPool>().ok(), Some(IdPool::range(5, 9)));
        assert_eq!("7".parse::<IdPool>().ok(), Some(IdPool::range(7, 7)));
        assert_eq!(
            "3, 1,2".parse::<IdPool>().ok(),
            Some(IdPool::List(vec![3, 1, 2]))
        );
        assert!("10..=1".parse::<IdPool>().is_err());
        assert!("abc".parse::<IdPool>().is_err());
        assert_eq!(IdPool::range(1, 10).len(), 10);
    }

    #[test]
    fn picks_stay_inside_pool() {
        let pool = IdPool::range(1, 100);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..500 {
            let id = pool.pick(&mut rng).expect("non-empty pool");
            assert!(pool.contains(id));
        }
        assert_eq!(IdPool::List(Vec::new()).pick(&mut rng), None);
    }

    #[test]
    fn missing_pool_reports_child_and_parent() {
        let context = InMemoryForeignContext::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = context
            .pick_fk(Entity::Appointments, Entity::Doctors, &mut rng)
            .expect_err("no pool");
        assert!(matches!(
            err,
            GenerationError::EmptyPool {
                child: Entity::Appointments,
                parent: Entity::Doctors
            }
        ));
        assert!(!context.has_pool(Entity::Doctors));
    }

    #[test]
    fn ingested_table_answers_parent_lookups() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
        let at = day.and_hms_opt(10, 0, 0).expect("time");
        let appointment = Appointment {
            appointment_id: 1,
            patient_id: 42,
            doctor_id: 9,
            appointment_date: day,
            appointment_time: at.time(),
            status: AppointmentStatus::Scheduled,
            reason: "Routine check-up".to_string(),
            diagnosis: None,
            prescription: None,
            notes: None,
            created_date: at,
            updated_date: at,
        };

        let mut context = InMemoryForeignContext::new();
        context.ingest_table(&[appointment]);
        assert!(context.has_pool(Entity::Appointments));
        assert!(context.tracks_column(Entity::Appointments, "patient_id"));
        assert_eq!(
            context.lookup_parent(Entity::Appointments, 1, "patient_id"),
            Some(42)
        );
        assert_eq!(context.lookup_parent(Entity::Appointments, 2, "patient_id"), None);
    }
}
