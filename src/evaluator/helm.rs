//! `helm-run` / `helm-summarize` driver
//!
//! Builds argument vectors from a [`RunConfig`] and runs the executables with
//! inherited stdio so their progress output stays visible.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use super::{EvalError, EvaluationTool};
use crate::config::RunConfig;

/// Evaluation tool backed by the installed HELM executables
#[derive(Clone, Debug)]
pub struct HelmCli {
    run_bin: String,
    summarize_bin: String,
}

impl HelmCli {
    pub fn new(run_bin: impl Into<String>, summarize_bin: impl Into<String>) -> Self {
        Self {
            run_bin: run_bin.into(),
            summarize_bin: summarize_bin.into(),
        }
    }

    /// Use the executables named in the config
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(&config.helm_run_bin, &config.helm_summarize_bin)
    }

    /// Arguments for the benchmark run
    pub fn run_args(config: &RunConfig) -> Vec<String> {
        let mut args = vec![
            "--conf-paths".to_string(),
            config.conf_path.display().to_string(),
            "--schema-path".to_string(),
            config.schema_path.display().to_string(),
            "--num-train-trials".to_string(),
            config.num_train_trials.to_string(),
            "--max-eval-instances".to_string(),
            config.max_eval_instances.to_string(),
            "--priority".to_string(),
            config.priority.to_string(),
            "--suite".to_string(),
            config.suite.clone(),
            "--output-path".to_string(),
            config.output_path.display().to_string(),
            "--models-to-run".to_string(),
        ];
        args.extend(config.models.iter().filter(|m| !m.is_empty()).cloned());

        if config.disable_cache {
            args.push("--disable-cache".to_string());
        }

        args
    }

    /// Arguments for the summarize step
    pub fn summarize_args(config: &RunConfig) -> Vec<String> {
        vec![
            "--schema-path".to_string(),
            config.schema_path.display().to_string(),
            "--suite".to_string(),
            config.suite.clone(),
            "--output-path".to_string(),
            config.output_path.display().to_string(),
        ]
    }

    /// Both command lines, for display
    pub fn command_lines(&self, config: &RunConfig) -> Vec<String> {
        vec![
            shell_line(&self.run_bin, &Self::run_args(config)),
            shell_line(&self.summarize_bin, &Self::summarize_args(config)),
        ]
    }

    async fn execute(&self, program: &str, args: &[String]) -> Result<(), EvalError> {
        debug!("Executing {}", shell_line(program, args));

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| EvalError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(EvalError::Failed {
                program: program.to_string(),
                code,
            }),
            None => Err(EvalError::Terminated {
                program: program.to_string(),
            }),
        }
    }
}

#[async_trait]
impl EvaluationTool for HelmCli {
    async fn run(&self, config: &RunConfig) -> Result<(), EvalError> {
        info!(
            "Running suite '{}' on {} model(s), max {} instances",
            config.suite,
            config.models.len(),
            config.max_eval_instances
        );
        self.execute(&self.run_bin, &Self::run_args(config)).await
    }

    async fn summarize(&self, config: &RunConfig) -> Result<PathBuf, EvalError> {
        info!("Summarizing suite '{}'", config.suite);
        self.execute(&self.summarize_bin, &Self::summarize_args(config))
            .await?;
        Ok(config.artifact_path())
    }
}

/// Render a command for humans, quoting arguments with spaces
fn shell_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push_str(&format!("'{arg}'"));
        } else {
            line.push_str(arg);
        }
    }
    line
}
