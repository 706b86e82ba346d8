//! medeval - medical benchmark run driver and result table formatter
//!
//! Drives an external evaluation harness (`helm-run` / `helm-summarize`)
//! from an explicit run configuration, then ranks the LaTeX result table it
//! produces and prints it as an aligned terminal table.
//!
//! ## Usage
//!
//! ```bash
//! # Run a suite and print the ranked results
//! medeval run --suite my-medhelm-suite --models openai/gpt-4.1-2025-04-14 -n 10
//!
//! # Show the commands without running them
//! medeval run --dry-run
//!
//! # Rank an existing table
//! medeval summarize ./benchmark_output/runs/my-medhelm-suite/groups/latex/aci_bench_aci_bench_.tex
//!
//! # Inspect configuration
//! medeval config show
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

mod cli;
mod config;
mod evaluator;
mod output;
mod table;
mod utils;

use cli::Args;
use config::{ConfigFile, EnvConfig, RunConfig};
use evaluator::{run_pipeline, HelmCli};
use output::{OutputFormat, ResultTableFormatter};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(LogLevel::from_verbose(args.verbose));

    let config_path = args.config.as_deref();

    match args.command {
        cli::Command::Run(run_args) => {
            run_evaluation(run_args, config_path).await?;
        }
        cli::Command::Summarize(summarize_args) => {
            summarize(summarize_args, config_path)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, config_path)?;
        }
    }

    Ok(())
}

async fn run_evaluation(args: cli::RunArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = RunConfig::resolve(config_path)?;
    args.apply_to(&mut config);
    config.validate()?;

    let tool = HelmCli::from_config(&config);

    if args.dry_run {
        for line in tool.command_lines(&config) {
            println!("{line}");
        }
        return Ok(());
    }

    let report = run_pipeline(&tool, &config, args.skip_run)
        .await
        .with_context(|| format!("Evaluation of suite '{}' failed", config.suite))?;

    let report_path = config.run_report_path();
    match report.save(&report_path) {
        Ok(()) => info!("Run report written to {}", report_path.display()),
        Err(e) => warn!("Could not write run report: {e:#}"),
    }

    let formatter = formatter_for(&args.format, args.sort_column);
    println!("{}", formatter.format(&report.artifact)?);

    Ok(())
}

fn summarize(args: cli::SummarizeArgs, config_path: Option<&Path>) -> Result<()> {
    let path = args.artifact_path(|| RunConfig::resolve(config_path))?;

    let formatter = formatter_for(&args.format, args.sort_column);
    println!("{}", formatter.format(&path)?);

    Ok(())
}

fn manage_config(args: cli::ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.action {
        cli::ConfigAction::Show => {
            let source = config_path
                .map(Path::to_path_buf)
                .or_else(|| EnvConfig::load().config_file.map(PathBuf::from))
                .or_else(ConfigFile::find);
            match source {
                Some(path) => println!("# Config file: {}", path.display()),
                None => println!("# Config file: none (defaults)"),
            }
            if EnvConfig::load().has_any() {
                println!("# Environment overrides applied");
            }

            let config = RunConfig::resolve(config_path)?;
            print!(
                "{}",
                serde_yaml::to_string(&config).context("Failed to serialize config")?
            );
            println!("# Artifact: {}", config.artifact_path().display());
        }
        cli::ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            ConfigFile::example().save(&path)?;
            println!("Wrote example configuration to {}", path.display());
        }
        cli::ConfigAction::Env => {
            config::print_env_help();
            println!();
            EnvConfig::load().print_summary();
        }
    }

    Ok(())
}

fn formatter_for(format: &str, sort_column: usize) -> ResultTableFormatter {
    let format = OutputFormat::from_str(format).unwrap_or_else(|| {
        warn!("Unknown output format '{format}', using table");
        OutputFormat::Table
    });
    ResultTableFormatter::new(format).with_sort_column(sort_column)
}
