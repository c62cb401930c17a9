mod error;
mod runner;
mod settings;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::Level;

use crate::error::CliResult;
use crate::settings::{ModelKind, Settings};

#[derive(Parser)]
#[command(name = "fmx-cli")]
#[command(about = "fmx CLI - run the built-in models through the host drivers", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a model's configuration and variable table
    Describe {
        /// Model to describe
        #[arg(value_enum)]
        model: ModelKind,
    },
    /// Run a simulation described by a JSON settings file
    Run {
        /// Path to the settings JSON file
        settings_path: PathBuf,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Describe { model } => cmd_describe(model),
        Commands::Run { settings_path } => cmd_run(&settings_path),
    }
}

fn cmd_describe(kind: ModelKind) -> CliResult<()> {
    let config = match kind {
        ModelKind::Dummy => <fmx_model::Dummy as fmx_model::Model>::CONFIG,
        ModelKind::BouncingBall => <fmx_model::BouncingBall as fmx_model::Model>::CONFIG,
    };
    let caps = config.capabilities;

    println!("Model: {}", config.identifier);
    println!("  Token:            {}", config.instantiation_token);
    println!("  Fixed step:       {} s", config.fixed_solver_step);
    println!("  Default stop:     {} s", config.default_stop_time);
    println!("  States:           {}", config.nx);
    println!("  Event indicators: {}", config.nz);
    println!(
        "  Interfaces:       {}{}",
        if caps.model_exchange { "model-exchange " } else { "" },
        if caps.co_simulation { "co-simulation" } else { "" }
    );
    println!();
    println!("Variables:");
    for var in runner::variables_of(kind).iter() {
        let start = var
            .start
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{:>2}] {:<10} {:<12} {:<11} start={}",
            var.vr.get(),
            var.name,
            format!("{:?}", var.causality),
            format!("{:?}", var.variability),
            start
        );
        if !var.description.is_empty() {
            println!("       {}", var.description);
        }
    }
    Ok(())
}

fn cmd_run(settings_path: &Path) -> CliResult<()> {
    let settings = Settings::load(settings_path)?;
    let started = Instant::now();
    let report = runner::run(&settings)?;
    let elapsed = started.elapsed();

    match &settings.output_file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            let mut out = BufWriter::new(File::create(path)?);
            report.recorder.write_csv(&mut out)?;
            out.flush()?;
            eprintln!("Wrote {} samples to {}", report.recorder.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            report.recorder.write_csv(&mut out)?;
            out.flush()?;
        }
    }

    eprintln!(
        "{} steps, {} events, final time {} s{} ({:.1} ms)",
        report.outcome.steps,
        report.outcome.events,
        report.outcome.final_time,
        if report.outcome.terminated {
            ", terminated by model"
        } else {
            ""
        },
        elapsed.as_secs_f64() * 1e3
    );
    Ok(())
}
