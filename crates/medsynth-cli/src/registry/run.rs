use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use medsynth_core::{Entity, SCHEMA_VERSION};
use medsynth_generate::{GenerateOptions, GenerationReport};

use super::RegistryResult;

const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "logs.ndjson";
const REPORT_FILE: &str = "generation_report.json";

/// What a CLI invocation asked for, resolved before any table is drawn.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub command: String,
    pub options: GenerateOptions,
    pub tables: Vec<(Entity, u64)>,
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunManifest<'a> {
    run_id: &'a str,
    started_at: String,
    command: &'a str,
    schema_version: &'static str,
    options: &'a GenerateOptions,
    tables: Vec<RequestedTable>,
    catalog: Option<&'a Path>,
    git_commit: Option<String>,
    git_dirty: Option<bool>,
}

#[derive(Debug, Serialize)]
struct RequestedTable {
    table: Entity,
    rows: u64,
}

#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub logs_path: PathBuf,
    pub report_path: PathBuf,
}

/// Create `<out_dir>/<timestamp>__run_<id>/`, write its manifest and touch
/// the event log so the subscriber can append to it.
pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let stamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ");
    let root = ctx
        .options
        .out_dir
        .join(format!("{stamp}__run_{}", ctx.run_id));
    fs::create_dir_all(&root)?;

    let manifest = RunManifest {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        command: &ctx.command,
        schema_version: SCHEMA_VERSION,
        options: &ctx.options,
        tables: ctx
            .tables
            .iter()
            .map(|&(table, rows)| RequestedTable { table, rows })
            .collect(),
        catalog: ctx.catalog.as_deref(),
        git_commit: git(&["rev-parse", "HEAD"]).filter(|commit| !commit.is_empty()),
        git_dirty: git(&["status", "--porcelain"]).map(|status| !status.is_empty()),
    };
    fs::write(
        root.join(CONFIG_FILE),
        serde_json::to_vec_pretty(&manifest)?,
    )?;

    let logs_path = root.join(LOG_FILE);
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        report_path: root.join(REPORT_FILE),
        logs_path,
        root,
    })
}

pub fn write_report(paths: &RunPaths, report: &GenerationReport) -> RegistryResult<()> {
    fs::write(&paths.report_path, serde_json::to_vec_pretty(report)?)?;
    Ok(())
}

/// Trimmed stdout of a successful git command, if git is available.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_directory_holds_manifest_and_log() {
        let out_dir = std::env::temp_dir().join(format!("medsynth_run_{}", uuid::Uuid::new_v4()));
        let ctx = RunContext {
            run_id: "abc".to_string(),
            started_at: Utc::now(),
            command: "generate doctors".to_string(),
            options: GenerateOptions {
                out_dir: out_dir.clone(),
                seed: 456,
                ..GenerateOptions::default()
            },
            tables: vec![(Entity::Doctors, 10)],
            catalog: None,
        };

        let paths = start_run(&ctx).expect("start run");
        assert!(paths.root.starts_with(&out_dir));
        assert!(
            paths
                .root
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with("__run_abc"))
        );
        assert!(paths.logs_path.exists());

        let manifest: serde_json::Value = serde_json::from_slice(
            &fs::read(paths.root.join(CONFIG_FILE)).expect("read manifest"),
        )
        .expect("manifest json");
        assert_eq!(manifest["options"]["seed"], 456);
        assert_eq!(manifest["tables"][0]["table"], "doctors");
        assert_eq!(manifest["schema_version"], SCHEMA_VERSION);

        let _ = fs::remove_dir_all(&out_dir);
    }
}
