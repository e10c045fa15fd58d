mod config;
mod preview;
mod registry;

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use medsynth_core::{Entity, Error as CoreError, Gender, SCHEMA_VERSION};
use medsynth_generate::{
    Catalog, CsvSink, DatasetPlan, EntityCounts, ForeignPools, GenerateOptions, GenerationEngine,
    GenerationError, GenerationReport, IdPool, MedicationConsistency, decode_national_id,
};
use registry::{RunContext, init_logging, start_run, write_report};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use config::{RunFile, default_counts, entity_defaults, parse_reference_time};
use preview::PreviewSink;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{0} national id mismatches")]
    Verification(u64),
}

#[derive(Parser, Debug)]
#[command(name = "medsynth", version, about = "Synthetic healthcare data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one table from explicit or default key pools.
    Generate(GenerateArgs),
    /// Generate every table, feeding each one into the pools of the next.
    Dataset(DatasetArgs),
    /// National identifier tools.
    #[command(subcommand)]
    Nid(NidCommand),
    /// Inspect the vocabulary catalog.
    #[command(subcommand)]
    Catalog(CatalogCommand),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Output directory for runs.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Instant treated as "now", e.g. 2025-01-01T08:00:00.
    #[arg(long, value_parser = parse_reference_time)]
    reference_time: Option<NaiveDateTime>,
    /// Catalog TOML overriding the built-in vocabularies.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Take each medication's patient from its appointment.
    #[arg(long, default_value_t = false)]
    strict_medications: bool,
    /// Attempts per row before a uniqueness domain counts as exhausted.
    #[arg(long)]
    max_attempts_row: Option<u32>,
    /// Patient ID pool, e.g. 1..=10000.
    #[arg(long)]
    patients: Option<IdPool>,
    /// Doctor ID pool.
    #[arg(long)]
    doctors: Option<IdPool>,
    /// Appointment ID pool.
    #[arg(long)]
    appointments: Option<IdPool>,
    /// Log the first N rows of each table.
    #[arg(long, default_value_t = 0)]
    preview: usize,
}

impl RunArgs {
    fn pools(&self) -> ForeignPools {
        ForeignPools {
            patients: self.patients.clone(),
            doctors: self.doctors.clone(),
            appointments: self.appointments.clone(),
        }
    }

    fn apply(&self, options: &mut GenerateOptions) {
        if let Some(seed) = self.seed {
            options.seed = seed;
        }
        if let Some(out) = &self.out {
            options.out_dir = out.clone();
        }
        if self.reference_time.is_some() {
            options.reference_time = self.reference_time;
        }
        if self.strict_medications {
            options.medication_consistency = MedicationConsistency::Strict;
        }
        if let Some(max_attempts_row) = self.max_attempts_row {
            options.max_attempts_row = max_attempts_row;
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Table to generate.
    entity: Entity,
    /// Number of rows.
    #[arg(long)]
    count: Option<u64>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct DatasetArgs {
    /// Run file with [run], [counts] and [pools] sections.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum NidCommand {
    /// Print the fields encoded in a national identifier.
    Decode { id: String },
    /// Check national IDs in a patients CSV against gender and birth date.
    Verify {
        path: PathBuf,
        /// Stop after this many rows.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Print the JSON Schema of catalog override files.
    Schema,
    /// Print the built-in catalog as TOML.
    Dump,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Dataset(args) => run_dataset(args),
        Command::Nid(command) => {
            init_logging(None)?;
            match command {
                NidCommand::Decode { id } => run_nid_decode(&id),
                NidCommand::Verify { path, limit } => run_nid_verify(&path, limit),
            }
        }
        Command::Catalog(command) => run_catalog(command),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs { entity, count, run } = args;
    let (default_count, default_seed) = entity_defaults(entity);

    let mut options = GenerateOptions {
        seed: default_seed,
        ..GenerateOptions::default()
    };
    run.apply(&mut options);

    let mut counts = EntityCounts::default();
    counts.set(entity, count.unwrap_or(default_count));
    let plan = DatasetPlan {
        counts,
        pools: run.pools().or(&ForeignPools::standalone_defaults()),
    };

    let command = format!("generate {entity}");
    execute(&command, options, plan, run.catalog.clone(), run.preview)
}

fn run_dataset(args: DatasetArgs) -> Result<(), CliError> {
    let DatasetArgs { config, run } = args;
    let file = match &config {
        Some(path) => RunFile::load(path)?,
        None => RunFile {
            counts: default_counts(),
            ..RunFile::default()
        },
    };

    let mut options = file.run;
    run.apply(&mut options);

    let counts = if file.counts == EntityCounts::default() {
        default_counts()
    } else {
        file.counts
    };
    let plan = DatasetPlan {
        counts,
        pools: run.pools().or(&file.pools),
    };

    let catalog = run.catalog.clone().or(file.catalog);
    execute("dataset", options, plan, catalog, run.preview)
}

fn execute(
    command: &str,
    mut options: GenerateOptions,
    plan: DatasetPlan,
    catalog_path: Option<PathBuf>,
    preview: usize,
) -> Result<(), CliError> {
    let catalog = match &catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::default(),
    };

    let run_id = Uuid::new_v4().to_string();
    let engine = GenerationEngine::new(options.clone())
        .with_catalog(catalog)?
        .with_run_id(run_id.clone());
    // Record the instant the engine actually used.
    options.reference_time = Some(engine.clock().now);

    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        command: command.to_string(),
        options,
        tables: plan.tables(),
        catalog: catalog_path,
    };
    let run_paths = start_run(&run_ctx)?;
    init_logging(Some(&run_paths.logs_path))?;

    info!(
        event = "run_started",
        run_id = %run_id,
        command = %command,
        schema_version = SCHEMA_VERSION,
        run_dir = %run_paths.root.display()
    );
    let timer = Instant::now();

    let mut sink = PreviewSink::new(CsvSink::new(&run_paths.root), preview);
    let report = match engine.generate_dataset(&plan, &mut sink) {
        Ok(report) => report,
        Err(err) => {
            if engine.options().write_report {
                let mut failed = GenerationReport::new(
                    run_id.clone(),
                    engine.options().seed,
                    engine.clock().now,
                );
                failed.error = Some(err.to_string());
                write_report(&run_paths, &failed)?;
            }
            info!(
                event = "run_finished",
                status = "failed",
                duration_ms = timer.elapsed().as_millis() as u64
            );
            return Err(err.into());
        }
    };

    if engine.options().write_report {
        write_report(&run_paths, &report)?;
        info!(event = "report_written", path = %run_paths.report_path.display());
    }

    info!(
        event = "run_finished",
        status = "success",
        rows = report.tables.iter().map(|table| table.rows_generated).sum::<u64>(),
        duration_ms = timer.elapsed().as_millis() as u64
    );
    println!("{}", run_paths.root.display());
    Ok(())
}

fn run_nid_decode(id: &str) -> Result<(), CliError> {
    let decoded = decode_national_id(id.trim())?;
    println!("{}", serde_json::to_string_pretty(&decoded)?);
    Ok(())
}

fn run_nid_verify(path: &Path, limit: Option<usize>) -> Result<(), CliError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| {
                CliError::InvalidConfig(format!("{} has no {name} column", path.display()))
            })
    };
    let id_column = column("national_id")?;
    let gender_column = column("gender")?;
    let birth_column = column("date_of_birth")?;

    let mut checked = 0_u64;
    let mut mismatches = 0_u64;
    for (line, record) in reader.records().enumerate() {
        if limit.is_some_and(|limit| line >= limit) {
            break;
        }
        let record = record?;
        checked += 1;
        let national_id = record.get(id_column).unwrap_or_default();
        let gender = record.get(gender_column).and_then(Gender::parse);
        let birth_date = record.get(birth_column).unwrap_or_default();

        let problem = match decode_national_id(national_id) {
            Err(err) => Some(err.to_string()),
            Ok(decoded) if Some(decoded.gender) != gender => Some(format!(
                "gender digit {} does not match {}",
                decoded.gender_digit,
                record.get(gender_column).unwrap_or_default()
            )),
            Ok(decoded) if decoded.birth_date.to_string() != birth_date => Some(format!(
                "encoded birth date {} does not match {birth_date}",
                decoded.birth_date
            )),
            Ok(_) => None,
        };
        if let Some(problem) = problem {
            mismatches += 1;
            warn!(
                row = line + 1,
                national_id = %national_id,
                problem = %problem,
                "national id mismatch"
            );
        }
    }

    info!(checked, mismatches, path = %path.display(), "national ids verified");
    if mismatches > 0 {
        return Err(CliError::Verification(mismatches));
    }
    println!("{checked} national ids verified");
    Ok(())
}

fn run_catalog(command: CatalogCommand) -> Result<(), CliError> {
    match command {
        CatalogCommand::Schema => {
            println!("{}", serde_json::to_string_pretty(&Catalog::json_schema())?);
        }
        CatalogCommand::Dump => {
            print!("{}", Catalog::default().to_toml_string()?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "medsynth",
            "generate",
            "readings",
            "--count",
            "20",
            "--patients",
            "1..=50",
            "--reference-time",
            "2025-01-01",
            "--strict-medications",
        ])
        .expect("parse");
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.entity, Entity::MedicalReadings);
        assert_eq!(args.count, Some(20));
        assert_eq!(args.run.patients, Some(IdPool::range(1, 50)));

        let mut options = GenerateOptions::default();
        args.run.apply(&mut options);
        assert_eq!(options.medication_consistency, MedicationConsistency::Strict);
        assert_eq!(options.reference_time, parse_reference_time("2025-01-01").ok());
        assert_eq!(options.seed, 0, "seed untouched without --seed");
    }

    #[test]
    fn unknown_entity_is_rejected() {
        assert!(Cli::try_parse_from(["medsynth", "generate", "nurses"]).is_err());
    }

    #[test]
    fn flag_pools_override_defaults() {
        let run = RunArgs {
            doctors: Some(IdPool::range(1, 100)),
            ..RunArgs::default()
        };
        let pools = run.pools().or(&ForeignPools::standalone_defaults());
        assert_eq!(pools.doctors, Some(IdPool::range(1, 100)));
        assert_eq!(pools.patients, Some(IdPool::range(1, 10_000)));
    }

    #[test]
    fn failed_run_without_report_leaves_only_manifest() {
        let out_dir = std::env::temp_dir().join(format!("medsynth_cli_failed_{}", Uuid::new_v4()));
        let options = GenerateOptions {
            out_dir: out_dir.clone(),
            write_report: false,
            reference_time: parse_reference_time("2025-01-01").ok(),
            ..GenerateOptions::default()
        };
        let mut counts = EntityCounts::default();
        counts.set(Entity::Appointments, 5);
        let plan = DatasetPlan {
            counts,
            pools: ForeignPools::default(),
        };

        let err = execute("dataset", options, plan, None, 0).expect_err("patients missing");
        assert!(matches!(
            err,
            CliError::Generation(GenerationError::EmptyPool { .. })
        ));

        let run_dirs: Vec<PathBuf> = std::fs::read_dir(&out_dir)
            .expect("read out dir")
            .map(|entry| entry.expect("run dir").path())
            .collect();
        assert_eq!(run_dirs.len(), 1);
        assert!(run_dirs[0].join("config.json").exists());
        assert!(!run_dirs[0].join("generation_report.json").exists());
    }
}
