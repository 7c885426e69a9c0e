// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — FET Pipeline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pipeline stages behind the `fet` subcommands.
//!
//! export → run → reconstruct; `tutorial` chains all three.

use anyhow::{bail, Context, Result};
use fet_analysis::expansion::{
    check_integral, evaluate_profile, order_convergence, profile_integral, reconstruct,
};
use fet_analysis::{plot, report};
use fet_engine::results::{self, ResultTable, TOTAL_NUCLIDE};
use fet_engine::runner::{self, EngineConfig, RunOutcome};
use fet_model::{ExpansionWindow, Model};
use fet_types::config::TutorialConfig;
use fet_types::state::AxialGrid;
use std::path::Path;

/// Model snapshot written next to the engine decks.
pub const MODEL_JSON: &str = "model.json";

/// Files written by [`reconstruct_results`].
pub const MOMENTS_CSV: &str = "moments.csv";
pub const PROFILE_CSV: &str = "profile.csv";
pub const PROFILE_NPY: &str = "profile.npy";
pub const PROFILE_SVG: &str = "flux.svg";
pub const MOMENTS_SVG: &str = "moments.svg";
pub const CONVERGENCE_SVG: &str = "convergence.svg";
pub const SUMMARY_JSON: &str = "summary.json";

/// Build the slab model and write decks plus `model.json` into `out`.
pub fn export(cfg: &TutorialConfig, out: &Path) -> Result<Model> {
    let model = Model::tutorial(cfg).context("Failed to build the slab model")?;
    let written = model
        .export_xml(out)
        .with_context(|| format!("Failed to export engine input to {}", out.display()))?;
    model
        .save_json(out.join(MODEL_JSON))
        .context("Failed to save model snapshot")?;
    for path in &written {
        println!("  wrote {}", path.display());
    }
    Ok(model)
}

/// Export and run the engine in `out`. Engine failure is fatal.
pub fn run(cfg: &TutorialConfig, out: &Path, engine: &EngineConfig) -> Result<RunOutcome> {
    let model = export(cfg, out)?;
    let outcome = runner::run(out, model.settings.batches, engine)
        .context("Transport engine run failed")?;
    println!("  tallies: {}", outcome.tally_report.display());
    if let Some(sp) = &outcome.statepoint {
        println!("  statepoint: {}", sp.display());
    }
    Ok(outcome)
}

/// Load a result table from `tallies.out` or a `.csv` export.
pub fn load_results(path: &Path, tally_id: u32) -> Result<ResultTable> {
    if !path.exists() {
        bail!("Result file not found: {}", path.display());
    }
    let is_csv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    let table = if is_csv {
        results::read_csv(path, tally_id)
    } else {
        results::read_tally_output(path, tally_id)
    };
    table.with_context(|| format!("Failed to read tally {tally_id} from {}", path.display()))
}

/// Expansion window: from a saved model when given, else from the config.
pub fn expansion_window(
    cfg: &TutorialConfig,
    model_json: Option<&Path>,
    tally_id: u32,
) -> Result<ExpansionWindow> {
    let model = match model_json {
        Some(path) => Model::load_json(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?,
        None => Model::tutorial(cfg)?,
    };
    Ok(model.expansion_window(tally_id)?)
}

#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    pub tally_id: u32,
    pub score: String,
    pub nuclide: String,
    pub grid_points: usize,
    pub tolerance: f64,
    /// Fail when the integral check does not pass.
    pub strict: bool,
}

impl ReconstructOptions {
    pub fn from_config(cfg: &TutorialConfig, tally_id: u32) -> Self {
        ReconstructOptions {
            tally_id,
            score: cfg.expansion.score.clone(),
            nuclide: TOTAL_NUCLIDE.to_string(),
            grid_points: cfg.post.grid_points,
            tolerance: cfg.post.integral_tolerance,
            strict: false,
        }
    }
}

/// Rescale moments, rebuild φ(z), check ∫φ dz against m_0 and write
/// tables, figures and the summary into `out`.
pub fn reconstruct_results(
    table: &ResultTable,
    window: &ExpansionWindow,
    opts: &ReconstructOptions,
    out: &Path,
) -> Result<report::Summary> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    let moments = table.moments(&opts.score, &opts.nuclide)?;
    let std_devs = table.std_devs(&opts.score, &opts.nuclide)?;
    log::info!(
        "Tally {}: {} '{}' moments for '{}'",
        opts.tally_id,
        moments.len(),
        opts.score,
        opts.nuclide
    );

    let series = reconstruct(&moments, window)?;
    let grid = AxialGrid::new(opts.grid_points, window.minimum, window.maximum);
    let profile = evaluate_profile(&series, &grid);
    let integral = check_integral(&series, &moments, opts.tolerance)?;
    let grid_integral = profile_integral(&profile)?;

    results::write_csv(out.join(MOMENTS_CSV), table)?;
    report::write_profile_csv(out.join(PROFILE_CSV), &profile)?;
    report::write_profile_npy(out.join(PROFILE_NPY), &profile)?;
    let title = format!("Reconstructed {} (P0..P{})", opts.score, series.order());
    plot::plot_profile(&out.join(PROFILE_SVG), &profile, &title)?;
    let used = series.order() + 1;
    plot::plot_moments(&out.join(MOMENTS_SVG), &moments[..used], &std_devs[..used])?;
    let steps = order_convergence(&moments, window, &grid)?;
    plot::plot_convergence(&out.join(CONVERGENCE_SVG), &steps)?;

    let summary = report::Summary {
        tally_id: opts.tally_id,
        score: opts.score.clone(),
        nuclide: opts.nuclide.clone(),
        window: *window,
        moments,
        std_devs,
        coefficients: series.coefficients().to_vec(),
        integral,
        grid_integral,
        peak: profile.peak(),
    };
    summary.save_json(out.join(SUMMARY_JSON))?;

    print_summary(&summary);
    if opts.strict && !summary.integral.passed {
        bail!(
            "Integral check failed: ∫φ dz = {:.6}, m_0 = {:.6} (relative difference {:.3e} > {:.1e})",
            summary.integral.integral,
            summary.integral.zeroth_moment,
            summary.integral.relative_difference,
            summary.integral.tolerance
        );
    }
    Ok(summary)
}

fn print_summary(s: &report::Summary) {
    println!();
    println!(
        "  Expansion: P0..P{} along {} on [{}, {}]",
        s.coefficients.len() - 1,
        s.window.axis,
        s.window.minimum,
        s.window.maximum
    );
    println!("  {:>5} {:>14} {:>12} {:>14}", "n", "m_n", "std. dev.", "a_n / h");
    for (n, ((m, sd), c)) in s
        .moments
        .iter()
        .zip(s.std_devs.iter())
        .zip(s.coefficients.iter())
        .enumerate()
    {
        println!("  {:>5} {:>14.6} {:>12.6} {:>14.6}", format!("P{n}"), m, sd, c);
    }
    println!(
        "  ∫φ dz = {:.6} (Simpson), {:.6} (grid); m_0 = {:.6}; {}",
        s.integral.integral,
        s.grid_integral,
        s.integral.zeroth_moment,
        if s.integral.passed { "OK" } else { "MISMATCH" }
    );
    if let Some((z, phi)) = s.peak {
        println!("  peak φ = {phi:.6} at z = {z:.3}");
    }
}
