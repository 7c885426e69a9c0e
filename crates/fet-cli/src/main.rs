// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — fet CLI
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `fet`: Legendre functional-expansion tally workflow.
//!
//! ```text
//! fet export      --out run/              # engine XML decks + model.json
//! fet run         --out run/ --threads 8  # export, then run the engine
//! fet reconstruct --results run/tallies.out --out run/post
//! fet tutorial    --out run/              # all of the above
//! ```

mod pipeline;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use fet_engine::runner::{self, EngineConfig};
use fet_model::model::TUTORIAL_TALLY_ID;
use fet_types::config::{Axis, TutorialConfig};
use pipeline::ReconstructOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fet")]
#[command(version)]
#[command(about = "Monte Carlo Legendre expansion tally: setup, run, reconstruct", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the engine input decks for the slab problem
    Export(ExportArgs),

    /// Export the model and run the transport engine
    Run(RunArgs),

    /// Rebuild the flux profile from tally moments
    Reconstruct(ReconstructArgs),

    /// Export, run and reconstruct in one go
    Tutorial(TutorialArgs),

    /// Write the default configuration as JSON
    InitConfig {
        /// Destination file
        #[arg(long, short = 'o', default_value = "fet.json")]
        out: PathBuf,
    },

    /// Check that the transport engine can be found
    Check,
}

/// Problem configuration: a JSON file plus per-field overrides.
#[derive(Args, Debug, Clone)]
struct ModelArgs {
    /// JSON configuration file (defaults reproduce the reference slab)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Highest Legendre order of the expansion filter
    #[arg(long)]
    order: Option<usize>,

    /// Expansion axis (x, y or z)
    #[arg(long, value_parser = parse_axis)]
    axis: Option<Axis>,

    #[arg(long)]
    batches: Option<u32>,

    #[arg(long)]
    inactive: Option<u32>,

    /// Particles per batch
    #[arg(long)]
    particles: Option<u64>,

    /// Random number seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
struct EngineArgs {
    /// Engine executable (default: openmc on PATH)
    #[arg(long)]
    engine: Option<PathBuf>,

    /// OpenMP threads for the engine
    #[arg(long, short = 's')]
    threads: Option<usize>,

    /// cross_sections.xml of the nuclear data library
    #[arg(long)]
    cross_sections: Option<PathBuf>,

    /// Extra arguments passed to the engine verbatim
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    engine_args: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct PostArgs {
    /// Tally to reconstruct
    #[arg(long, default_value_t = TUTORIAL_TALLY_ID)]
    tally: u32,

    /// Score to reconstruct (default: the configured score)
    #[arg(long)]
    score: Option<String>,

    /// Nuclide bin
    #[arg(long, default_value = "total")]
    nuclide: String,

    /// Points of the reconstruction grid
    #[arg(long)]
    points: Option<usize>,

    /// Exit non-zero when ∫φ dz does not match m_0
    #[arg(long)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Output directory
    #[arg(long, short = 'o', required = true)]
    out: PathBuf,

    #[command(flatten)]
    model: ModelArgs,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Working directory for decks and engine output
    #[arg(long, short = 'o', required = true)]
    out: PathBuf,

    #[command(flatten)]
    model: ModelArgs,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Parser, Debug)]
struct ReconstructArgs {
    /// tallies.out report or CSV export of the tally
    #[arg(long, required = true)]
    results: PathBuf,

    /// Saved model.json giving the expansion window
    #[arg(long)]
    model_json: Option<PathBuf>,

    /// Output directory for tables, figures and summary
    #[arg(long, short = 'o', required = true)]
    out: PathBuf,

    #[command(flatten)]
    model: ModelArgs,

    #[command(flatten)]
    post: PostArgs,
}

#[derive(Parser, Debug)]
struct TutorialArgs {
    /// Working directory; reconstruction goes to <out>/post
    #[arg(long, short = 'o', required = true)]
    out: PathBuf,

    #[command(flatten)]
    model: ModelArgs,

    #[command(flatten)]
    engine: EngineArgs,

    #[command(flatten)]
    post: PostArgs,
}

fn parse_axis(s: &str) -> std::result::Result<Axis, String> {
    Axis::parse(s).map_err(|e| e.to_string())
}

impl ModelArgs {
    fn load(&self) -> Result<TutorialConfig> {
        let mut cfg = match &self.config {
            Some(path) => TutorialConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => TutorialConfig::default(),
        };
        if let Some(order) = self.order {
            cfg.expansion.order = order;
        }
        if let Some(axis) = self.axis {
            cfg.expansion.axis = axis;
        }
        if let Some(batches) = self.batches {
            cfg.settings.batches = batches;
        }
        if let Some(inactive) = self.inactive {
            cfg.settings.inactive = inactive;
        }
        if let Some(particles) = self.particles {
            cfg.settings.particles = particles;
        }
        if self.seed.is_some() {
            cfg.settings.seed = self.seed;
        }
        cfg.validate().context("Invalid configuration")?;
        Ok(cfg)
    }
}

impl EngineArgs {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            executable: self.engine.clone(),
            threads: self.threads,
            cross_sections: self.cross_sections.clone(),
            extra_args: self.engine_args.clone(),
        }
    }
}

impl PostArgs {
    fn options(&self, cfg: &TutorialConfig) -> ReconstructOptions {
        let mut opts = ReconstructOptions::from_config(cfg, self.tally);
        if let Some(score) = &self.score {
            opts.score = score.to_lowercase();
        }
        opts.nuclide = self.nuclide.clone();
        if let Some(points) = self.points {
            opts.grid_points = points;
        }
        opts.strict = self.strict;
        opts
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export(args) => cmd_export(args),
        Commands::Run(args) => cmd_run(args),
        Commands::Reconstruct(args) => cmd_reconstruct(args),
        Commands::Tutorial(args) => cmd_tutorial(args),
        Commands::InitConfig { out } => cmd_init_config(out),
        Commands::Check => cmd_check(),
    }
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let cfg = args.model.load()?;
    println!("Exporting '{}' to {}", cfg.name, args.out.display());
    pipeline::export(&cfg, &args.out)?;
    Ok(())
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let cfg = args.model.load()?;
    println!("Running '{}' in {}", cfg.name, args.out.display());
    pipeline::run(&cfg, &args.out, &args.engine.engine_config())?;
    Ok(())
}

fn cmd_reconstruct(args: ReconstructArgs) -> Result<()> {
    let cfg = args.model.load()?;
    let opts = args.post.options(&cfg);
    if opts.grid_points < 2 {
        bail!("--points must be at least 2, got {}", opts.grid_points);
    }
    let table = pipeline::load_results(&args.results, opts.tally_id)?;
    let window = pipeline::expansion_window(&cfg, args.model_json.as_deref(), opts.tally_id)?;
    pipeline::reconstruct_results(&table, &window, &opts, &args.out)?;
    println!("Results written to {}", args.out.display());
    Ok(())
}

fn cmd_tutorial(args: TutorialArgs) -> Result<()> {
    let cfg = args.model.load()?;
    let opts = args.post.options(&cfg);
    if opts.grid_points < 2 {
        bail!("--points must be at least 2, got {}", opts.grid_points);
    }

    println!("[1/3] Exporting and running '{}' in {}", cfg.name, args.out.display());
    let outcome = pipeline::run(&cfg, &args.out, &args.engine.engine_config())?;

    println!("[2/3] Reading tally {}", opts.tally_id);
    let table = pipeline::load_results(&outcome.tally_report, opts.tally_id)?;
    let model_json = args.out.join(pipeline::MODEL_JSON);
    let window = pipeline::expansion_window(&cfg, Some(&model_json), opts.tally_id)?;

    let post = args.out.join("post");
    println!("[3/3] Reconstructing into {}", post.display());
    pipeline::reconstruct_results(&table, &window, &opts, &post)?;
    Ok(())
}

fn cmd_init_config(out: PathBuf) -> Result<()> {
    TutorialConfig::default()
        .save(&out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote default configuration to {}", out.display());
    Ok(())
}

fn cmd_check() -> Result<()> {
    if !runner::engine_available() {
        bail!(
            "{} not found in PATH; install it or pass --engine",
            runner::ENGINE_NAME
        );
    }
    if let Some(path) = runner::find_engine() {
        println!("  {}: {}", runner::ENGINE_NAME, path.display());
    }
    match std::env::var_os(runner::CROSS_SECTIONS_ENV) {
        Some(xs) => println!("  {}: {}", runner::CROSS_SECTIONS_ENV, PathBuf::from(xs).display()),
        None => println!(
            "  {} not set; pass --cross-sections when running",
            runner::CROSS_SECTIONS_ENV
        ),
    }
    Ok(())
}
