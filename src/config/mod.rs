//! Configuration module
//!
//! A [`RunConfig`] is resolved once from defaults, a config file, environment
//! variables and CLI flags, then passed explicitly to the evaluation tool and
//! the formatter.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::ConfigFile;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parameters of one evaluation run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Suite name; namespaces the output directory
    pub suite: String,

    /// Run entries configuration file
    pub conf_path: PathBuf,

    /// Schema describing metrics and groups
    pub schema_path: PathBuf,

    /// Number of in-context training trials
    pub num_train_trials: u32,

    /// Maximum evaluation instances per run entry
    pub max_eval_instances: u32,

    /// Lowest run entry priority to include
    pub priority: u32,

    /// Model identifiers to evaluate
    pub models: Vec<String>,

    /// Bypass the request cache
    pub disable_cache: bool,

    /// Root of the evaluation tool's output tree
    pub output_path: PathBuf,

    /// File stem of the LaTeX group table to format
    pub latex_group: String,

    /// Executable that runs the benchmark
    pub helm_run_bin: String,

    /// Executable that aggregates results into tables
    pub helm_summarize_bin: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            suite: "my-medhelm-suite".to_string(),
            conf_path: PathBuf::from("run_entries_medhelm_aci_bench.conf"),
            schema_path: PathBuf::from("schema_medhelm.yaml"),
            num_train_trials: 1,
            max_eval_instances: 10,
            priority: 1,
            models: vec![
                "openai/gpt-4.1-2025-04-14".to_string(),
                "meta/llama-3.2-1b-instruct".to_string(),
                "meta/llama-3.1-8b-instruct".to_string(),
            ],
            disable_cache: true,
            output_path: PathBuf::from("./benchmark_output"),
            latex_group: "aci_bench_aci_bench_".to_string(),
            helm_run_bin: "helm-run".to_string(),
            helm_summarize_bin: "helm-summarize".to_string(),
        }
    }
}

impl RunConfig {
    /// Resolve defaults, config file and environment into one config.
    ///
    /// The config file is `explicit` if given, else `MEDEVAL_CONFIG`, else
    /// the first file found in the standard locations.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvConfig::load();

        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.clone().map(PathBuf::from))
            .or_else(ConfigFile::find);

        let mut config = match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                ConfigFile::load(&path)?.run
            }
            None => Self::default(),
        };

        env.apply_to(&mut config);
        Ok(config)
    }

    /// `<output_path>/runs/<suite>`
    pub fn suite_dir(&self) -> PathBuf {
        self.output_path.join("runs").join(&self.suite)
    }

    /// LaTeX table written by the summarize step
    pub fn artifact_path(&self) -> PathBuf {
        self.suite_dir()
            .join("groups")
            .join("latex")
            .join(format!("{}.tex", self.latex_group))
    }

    /// Where the run report is stored
    pub fn run_report_path(&self) -> PathBuf {
        self.suite_dir().join("medeval_run.json")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.suite.trim().is_empty() {
            anyhow::bail!("Suite name must not be empty");
        }
        if self.suite.contains(['/', '\\']) || matches!(self.suite.as_str(), "." | "..") {
            anyhow::bail!("Suite name must not contain path separators: {}", self.suite);
        }
        if self.models.iter().all(|m| m.trim().is_empty()) {
            anyhow::bail!("At least one model must be configured");
        }
        if self.max_eval_instances == 0 {
            anyhow::bail!("max_eval_instances must be greater than 0");
        }
        if self.latex_group.trim().is_empty() {
            anyhow::bail!("latex_group must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.suite, "my-medhelm-suite");
        assert_eq!(config.max_eval_instances, 10);
        assert!(config.disable_cache);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_artifact_path() {
        let config = RunConfig {
            suite: "nightly".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.artifact_path(),
            PathBuf::from("./benchmark_output/runs/nightly/groups/latex/aci_bench_aci_bench_.tex")
        );
        assert_eq!(
            config.run_report_path(),
            PathBuf::from("./benchmark_output/runs/nightly/medeval_run.json")
        );
    }

    #[test]
    fn test_validate() {
        let mut config = RunConfig {
            suite: "a/b".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.suite = ".".to_string();
        assert!(config.validate().is_err());

        config.suite = "..".to_string();
        assert!(config.validate().is_err());

        config.suite = "ok".to_string();
        config.models.clear();
        assert!(config.validate().is_err());

        config.models.push("openai/gpt-4.1-2025-04-14".to_string());
        config.max_eval_instances = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: RunConfig = serde_yaml::from_str("suite: partial\npriority: 3\n").unwrap();
        assert_eq!(config.suite, "partial");
        assert_eq!(config.priority, 3);
        assert_eq!(config.helm_run_bin, "helm-run");
    }
}
