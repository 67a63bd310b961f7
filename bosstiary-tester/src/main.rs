mod config;
mod reports;
mod simulation;

use anyhow::{Context, Result, bail};
use bosstiary_game::{BoostedBossService, BossRegistry, JsonFileStore, record::is_valid_day};
use chrono::{Datelike, Local};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use config::TesterConfig;
use simulation::run_simulation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Refresh the boosted boss stored on disk, as a server boot would
    Refresh,
    /// Simulate consecutive days against an in-memory store
    Simulate,
}

#[derive(Debug, Parser)]
#[command(name = "bosstiary-tester", version = "0.1.0")]
#[command(about = "Boosted boss rotation harness - live refreshes and multi-day simulations")]
struct Args {
    /// Run mode: refresh (persisted) or simulate (in memory)
    #[arg(long, value_enum, default_value_t = RunMode::Refresh)]
    mode: RunMode,

    /// JSON config file with store_path, content_path and rng_seed
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path of the persisted boosted boss record
    #[arg(long)]
    store: Option<PathBuf>,

    /// Monster content JSON (defaults to the bundled catalog)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Day of month to refresh for (defaults to today)
    #[arg(long)]
    day: Option<u8>,

    /// Number of consecutive days to simulate
    #[arg(long, default_value_t = 31)]
    days: usize,

    /// Fixed seed for the rotation draw
    #[arg(long)]
    seed: Option<u64>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = TesterConfig::load(args.config.as_deref())?.with_overrides(
        args.store.clone(),
        args.content.clone(),
        args.seed,
    );
    let catalog = config.load_catalog()?;

    let passed = match args.mode {
        RunMode::Refresh => run_refresh(&args, &config, catalog)?,
        RunMode::Simulate => run_simulate(&args, &config, &catalog)?,
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

fn resolve_day(args: &Args) -> Result<u8> {
    let day = match args.day {
        Some(day) => day,
        None => u8::try_from(Local::now().day()).context("day of month out of range")?,
    };
    if !is_valid_day(day) {
        bail!("--day must be between 1 and 31 (got {day})");
    }
    Ok(day)
}

fn run_refresh(
    args: &Args,
    config: &TesterConfig,
    catalog: bosstiary_game::MonsterCatalog,
) -> Result<bool> {
    let day = resolve_day(args)?;
    let registry = BossRegistry::from_catalog(&catalog);
    log::debug!(
        "{} bosses registered, store {}",
        registry.len(),
        config.store_path.display()
    );
    let service = BoostedBossService::new(
        registry,
        catalog,
        JsonFileStore::new(&config.store_path),
        &config.service_config(),
    );

    let outcome = service.refresh_for_day(day).map_err(|err| format!("{err}"));
    let published = service.boosted_boss_name();

    let mut output_target = OutputTarget::new(args.output.clone())?;
    if args.report == "json" {
        reports::write_refresh_json(&mut output_target, day, &outcome, &published)?;
    } else {
        reports::write_refresh_console(&mut output_target, day, &outcome, &published)?;
    }
    output_target.flush_inner()?;
    Ok(outcome.is_ok())
}

fn run_simulate(
    args: &Args,
    config: &TesterConfig,
    catalog: &bosstiary_game::MonsterCatalog,
) -> Result<bool> {
    if args.report != "json" {
        println!("{}", "🎲 Simulating boosted boss rotation".bright_yellow().bold());
        println!("{}", "-".repeat(36).yellow());
    }
    let start_time = Instant::now();
    let report = run_simulation(catalog, args.days, &config.service_config());

    let mut output_target = OutputTarget::new(args.output.clone())?;
    if args.report == "json" {
        reports::write_simulation_json(&mut output_target, &report)?;
    } else {
        reports::write_simulation_console(
            &mut output_target,
            &report,
            start_time.elapsed(),
            args.verbose,
        )?;
    }
    output_target.flush_inner()?;
    Ok(report.passed())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
