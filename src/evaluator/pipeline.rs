//! Run → summarize sequence

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{EvalError, EvaluationTool};
use crate::config::RunConfig;
use crate::utils::Timer;

/// Record of one completed pipeline
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub suite: String,
    pub models: Vec<String>,
    pub max_eval_instances: u32,

    /// False when only the summarize step ran
    pub ran_benchmark: bool,

    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// LaTeX table reported by the summarize step
    pub artifact: PathBuf,
}

impl RunReport {
    /// Write the report as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write run report: {}", path.display()))?;
        Ok(())
    }
}

/// Run the benchmark (unless `skip_run`) and then summarize it
pub async fn run_pipeline(
    tool: &dyn EvaluationTool,
    config: &RunConfig,
    skip_run: bool,
) -> Result<RunReport, EvalError> {
    let started_at = Utc::now();

    if skip_run {
        info!("Skipping benchmark run for suite '{}'", config.suite);
    } else {
        let timer = Timer::start("Benchmark run");
        tool.run(config).await?;
        timer.stop();
    }

    let timer = Timer::start("Summarize");
    let artifact = tool.summarize(config).await?;
    timer.stop();

    Ok(RunReport {
        suite: config.suite.clone(),
        models: config.models.clone(),
        max_eval_instances: config.max_eval_instances,
        ran_benchmark: !skip_run,
        started_at,
        completed_at: Utc::now(),
        artifact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Records calls and optionally fails the run step
    #[derive(Default)]
    struct MockTool {
        calls: Mutex<Vec<&'static str>>,
        fail_run: bool,
    }

    #[async_trait]
    impl EvaluationTool for MockTool {
        async fn run(&self, _config: &RunConfig) -> Result<(), EvalError> {
            self.calls.lock().unwrap().push("run");
            if self.fail_run {
                return Err(EvalError::Failed {
                    program: "mock-run".to_string(),
                    code: 3,
                });
            }
            Ok(())
        }

        async fn summarize(&self, config: &RunConfig) -> Result<PathBuf, EvalError> {
            self.calls.lock().unwrap().push("summarize");
            Ok(config.artifact_path())
        }
    }

    #[tokio::test]
    async fn test_pipeline_runs_then_summarizes() {
        let tool = MockTool::default();
        let config = RunConfig::default();

        let report = run_pipeline(&tool, &config, false).await.unwrap();

        assert_eq!(*tool.calls.lock().unwrap(), vec!["run", "summarize"]);
        assert!(report.ran_benchmark);
        assert_eq!(report.artifact, config.artifact_path());
        assert!(report.completed_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_pipeline_skip_run() {
        let tool = MockTool::default();
        let report = run_pipeline(&tool, &RunConfig::default(), true)
            .await
            .unwrap();

        assert_eq!(*tool.calls.lock().unwrap(), vec!["summarize"]);
        assert!(!report.ran_benchmark);
    }

    #[tokio::test]
    async fn test_pipeline_stops_on_run_failure() {
        let tool = MockTool {
            fail_run: true,
            ..Default::default()
        };

        let err = run_pipeline(&tool, &RunConfig::default(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, EvalError::Failed { code: 3, .. }));
        assert_eq!(*tool.calls.lock().unwrap(), vec!["run"]);
    }

    #[tokio::test]
    async fn test_report_save() {
        let dir = tempdir().unwrap();
        let config = RunConfig {
            output_path: dir.path().to_path_buf(),
            ..Default::default()
        };

        let report = run_pipeline(&MockTool::default(), &config, true)
            .await
            .unwrap();
        report.save(config.run_report_path()).unwrap();

        let saved: RunReport =
            serde_json::from_str(&std::fs::read_to_string(config.run_report_path()).unwrap())
                .unwrap();
        assert_eq!(saved.suite, config.suite);
        assert_eq!(saved.artifact, config.artifact_path());
    }
}
