//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::table::DEFAULT_SORT_COLUMN;

/// Medical benchmark run driver and result table formatter
#[derive(Parser, Debug)]
#[command(name = "medeval")]
#[command(version)]
#[command(about = "Run medical benchmark suites and rank their results")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the benchmark, summarize it and print the ranked results
    Run(RunArgs),

    /// Print the ranked results of an existing LaTeX table
    Summarize(SummarizeArgs),

    /// Inspect or create configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Suite name
    #[arg(short, long)]
    pub suite: Option<String>,

    /// Models to run (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub models: Option<Vec<String>>,

    /// Maximum evaluation instances
    #[arg(short = 'n', long)]
    pub max_eval_instances: Option<u32>,

    /// Number of training trials
    #[arg(long)]
    pub num_train_trials: Option<u32>,

    /// Run entry priority
    #[arg(long)]
    pub priority: Option<u32>,

    /// Run entries configuration file
    #[arg(long)]
    pub conf_path: Option<PathBuf>,

    /// Schema file
    #[arg(long)]
    pub schema_path: Option<PathBuf>,

    /// Output root of the evaluation tool
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// Use the request cache
    #[arg(long)]
    pub enable_cache: bool,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Only summarize an earlier run
    #[arg(long)]
    pub skip_run: bool,

    /// Output format (table, csv, json, json-pretty)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Column to rank by (0-based)
    #[arg(long, default_value_t = DEFAULT_SORT_COLUMN)]
    pub sort_column: usize,
}

impl RunArgs {
    /// Apply flags on top of a resolved config
    pub fn apply_to(&self, config: &mut RunConfig) {
        if let Some(suite) = &self.suite {
            config.suite = suite.clone();
        }
        if let Some(models) = &self.models {
            config.models = models.iter().map(|m| m.trim().to_string()).collect();
        }
        if let Some(max) = self.max_eval_instances {
            config.max_eval_instances = max;
        }
        if let Some(trials) = self.num_train_trials {
            config.num_train_trials = trials;
        }
        if let Some(priority) = self.priority {
            config.priority = priority;
        }
        if let Some(path) = &self.conf_path {
            config.conf_path = path.clone();
        }
        if let Some(path) = &self.schema_path {
            config.schema_path = path.clone();
        }
        if let Some(path) = &self.output_path {
            config.output_path = path.clone();
        }
        if self.enable_cache {
            config.disable_cache = false;
        }
    }
}

/// Arguments for summarize command
#[derive(Parser, Debug)]
pub struct SummarizeArgs {
    /// LaTeX table to format; derived from the suite when omitted
    pub path: Option<PathBuf>,

    /// Suite name used to derive the path
    #[arg(short, long)]
    pub suite: Option<String>,

    /// Output root used to derive the path
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// Output format (table, csv, json, json-pretty)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Column to rank by (0-based)
    #[arg(long, default_value_t = DEFAULT_SORT_COLUMN)]
    pub sort_column: usize,
}

impl SummarizeArgs {
    /// Explicit path, or the artifact path of the config produced by `resolve`.
    ///
    /// `resolve` is only called when no path was given.
    pub fn artifact_path<F>(&self, resolve: F) -> Result<PathBuf>
    where
        F: FnOnce() -> Result<RunConfig>,
    {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let mut config = resolve()?;
        if let Some(suite) = &self.suite {
            config.suite = suite.clone();
        }
        if let Some(path) = &self.output_path {
            config.output_path = path.clone();
        }
        Ok(config.artifact_path())
    }
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved configuration
    Show,

    /// Write an example configuration file
    Init {
        /// Destination file
        #[arg(default_value = "medeval.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List environment variables
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_args() {
        let args = Args::parse_from(["medeval", "summarize", "results.tex", "--format", "csv"]);
        match args.command {
            Command::Summarize(summarize) => {
                assert_eq!(summarize.path, Some(PathBuf::from("results.tex")));
                assert_eq!(summarize.format, "csv");
                assert_eq!(summarize.sort_column, 1);
                let path = summarize
                    .artifact_path(|| panic!("config resolved despite an explicit path"))
                    .unwrap();
                assert_eq!(path, PathBuf::from("results.tex"));
            }
            _ => panic!("Expected Summarize command"),
        }
    }

    #[test]
    fn test_summarize_derives_path() {
        let args = Args::parse_from(["medeval", "summarize", "--suite", "nightly"]);
        match args.command {
            Command::Summarize(summarize) => {
                assert_eq!(
                    summarize.artifact_path(|| Ok(RunConfig::default())).unwrap(),
                    PathBuf::from(
                        "./benchmark_output/runs/nightly/groups/latex/aci_bench_aci_bench_.tex"
                    )
                );
            }
            _ => panic!("Expected Summarize command"),
        }
    }

    #[test]
    fn test_summarize_propagates_config_error() {
        let args = Args::parse_from(["medeval", "summarize"]);
        match args.command {
            Command::Summarize(summarize) => {
                let err = summarize
                    .artifact_path(|| anyhow::bail!("bad config"))
                    .unwrap_err();
                assert_eq!(err.to_string(), "bad config");
            }
            _ => panic!("Expected Summarize command"),
        }
    }

    #[test]
    fn test_run_args_override_config() {
        let args = Args::parse_from([
            "medeval",
            "-v",
            "run",
            "--suite",
            "nightly",
            "--models",
            "a/one,b/two",
            "-n",
            "5",
            "--enable-cache",
        ]);
        assert!(args.verbose);

        match args.command {
            Command::Run(run) => {
                let mut config = RunConfig::default();
                run.apply_to(&mut config);
                assert_eq!(config.suite, "nightly");
                assert_eq!(config.models, vec!["a/one", "b/two"]);
                assert_eq!(config.max_eval_instances, 5);
                assert!(!config.disable_cache);
                assert_eq!(config.priority, RunConfig::default().priority);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_config_init_default_path() {
        let args = Args::parse_from(["medeval", "config", "init"]);
        match args.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert_eq!(path, PathBuf::from("medeval.yaml"));
                assert!(!force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }
}
