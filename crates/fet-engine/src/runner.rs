// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Engine Runner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Spawn the transport engine as a blocking child process.
//!
//! The engine reads the XML decks from its working directory and writes
//! `statepoint.<batches>.h5` plus the text report `tallies.out` there.
//! Any failure is returned as [`FetError::Engine`]; nothing is retried.

use fet_model::settings::statepoint_name;
use fet_model::Model;
use fet_types::error::{FetError, FetResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executable searched on PATH when no explicit path is configured.
pub const ENGINE_NAME: &str = "openmc";

/// Environment variable pointing the engine at its cross-section library.
pub const CROSS_SECTIONS_ENV: &str = "OPENMC_CROSS_SECTIONS";

/// Text tally report written next to the statepoint.
pub const TALLY_REPORT: &str = "tallies.out";

/// Lines of engine output kept in error messages.
const ERROR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Engine executable; PATH lookup of [`ENGINE_NAME`] when `None`.
    pub executable: Option<PathBuf>,
    /// OpenMP threads (`-s N`).
    pub threads: Option<usize>,
    /// Cross-section library (`cross_sections.xml`).
    pub cross_sections: Option<PathBuf>,
    /// Extra command-line arguments, passed through verbatim.
    pub extra_args: Vec<String>,
}

/// Files produced by a finished run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub working_dir: PathBuf,
    pub tally_report: PathBuf,
    /// Final statepoint, if the engine wrote one.
    pub statepoint: Option<PathBuf>,
    pub stdout: String,
}

/// Find the engine binary in PATH.
pub fn find_engine() -> Option<PathBuf> {
    which::which(ENGINE_NAME).ok()
}

/// True when [`ENGINE_NAME`] resolves on PATH.
pub fn engine_available() -> bool {
    find_engine().is_some()
}

/// Export `model` into `dir` and run the engine there.
pub fn run_model(model: &Model, dir: &Path, config: &EngineConfig) -> FetResult<RunOutcome> {
    model.export_xml(dir)?;
    run(dir, model.settings.batches, config)
}

/// Run the engine on an already exported model directory.
pub fn run(model_dir: &Path, batches: u32, config: &EngineConfig) -> FetResult<RunOutcome> {
    if !model_dir.is_dir() {
        return Err(FetError::Engine(format!(
            "model directory not found: {}",
            model_dir.display()
        )));
    }

    let exe = config
        .executable
        .clone()
        .or_else(find_engine)
        .ok_or_else(|| {
            FetError::Engine(format!(
                "{ENGINE_NAME} not found in PATH. Install it or pass an explicit executable."
            ))
        })?;

    clear_outputs(model_dir)?;

    let mut cmd = Command::new(&exe);
    cmd.current_dir(model_dir);
    if let Some(threads) = config.threads {
        cmd.arg("-s").arg(threads.to_string());
    }
    cmd.args(&config.extra_args);
    if let Some(xs) = &config.cross_sections {
        cmd.env(CROSS_SECTIONS_ENV, xs);
    }

    log::info!("Running {} in {}", exe.display(), model_dir.display());
    log::debug!("engine command: {:?}", cmd);

    let output = cmd.output().map_err(|e| {
        FetError::Engine(format!("failed to execute {}: {e}", exe.display()))
    })?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = if stderr.trim().is_empty() {
            tail(&stdout, ERROR_TAIL_LINES)
        } else {
            tail(&stderr, ERROR_TAIL_LINES)
        };
        return Err(FetError::Engine(format!(
            "{} exited with {}: {}",
            exe.display(),
            output.status,
            detail
        )));
    }

    let tally_report = model_dir.join(TALLY_REPORT);
    if !tally_report.exists() {
        return Err(FetError::Engine(format!(
            "engine finished but wrote no {TALLY_REPORT} in {}",
            model_dir.display()
        )));
    }

    let statepoint = find_statepoint(model_dir, batches);
    match &statepoint {
        Some(sp) => log::info!("Statepoint: {}", sp.display()),
        None => log::warn!("No statepoint file found in {}", model_dir.display()),
    }

    Ok(RunOutcome {
        working_dir: model_dir.to_path_buf(),
        tally_report,
        statepoint,
        stdout,
    })
}

/// `statepoint.<batches>.h5`, or else the highest-numbered statepoint.
pub fn find_statepoint(dir: &Path, batches: u32) -> Option<PathBuf> {
    let expected = dir.join(statepoint_name(batches));
    if expected.exists() {
        return Some(expected);
    }
    let entries = std::fs::read_dir(dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| Some((statepoint_batch(&e.path())?, e.path())))
        .max_by_key(|(n, _)| *n)
        .map(|(_, p)| p)
}

fn statepoint_batch(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("statepoint.")?
        .strip_suffix(".h5")?
        .parse()
        .ok()
}

/// Remove the report and statepoints of an earlier run in `dir`.
fn clear_outputs(dir: &Path) -> FetResult<()> {
    let report = dir.join(TALLY_REPORT);
    if report.exists() {
        log::debug!("removing stale {}", report.display());
        std::fs::remove_file(&report)?;
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if statepoint_batch(&path).is_some() {
            log::debug!("removing stale {}", path.display());
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
