//! Evaluation tool integration
//!
//! The benchmark itself is run by an external tool. [`EvaluationTool`] is the
//! seam between this crate and that tool; [`HelmCli`] drives the installed
//! `helm-run` / `helm-summarize` executables.

mod helm;
mod pipeline;

pub use helm::HelmCli;
pub use pipeline::{run_pipeline, RunReport};

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::RunConfig;

/// Evaluation tool errors
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code}")]
    Failed { program: String, code: i32 },

    #[error("{program} was terminated by a signal")]
    Terminated { program: String },
}

/// External benchmark harness
#[async_trait]
pub trait EvaluationTool: Send + Sync {
    /// Run every configured model on the configured run entries
    async fn run(&self, config: &RunConfig) -> Result<(), EvalError>;

    /// Aggregate the suite's results and return the LaTeX artifact path.
    ///
    /// The path is returned even if the tool did not write the file.
    async fn summarize(&self, config: &RunConfig) -> Result<PathBuf, EvalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let failed = EvalError::Failed {
            program: "helm-run".to_string(),
            code: 2,
        };
        assert_eq!(failed.to_string(), "helm-run exited with status 2");

        let killed = EvalError::Terminated {
            program: "helm-summarize".to_string(),
        };
        assert!(killed.to_string().contains("signal"));
    }
}
