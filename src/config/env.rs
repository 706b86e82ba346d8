//! Environment variable configuration
//!
//! Provides environment variable overrides for [`RunConfig`].

use std::env;
use std::path::PathBuf;
use tracing::warn;

use super::RunConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "MEDEVAL";

/// Configuration read from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Suite from MEDEVAL_SUITE
    pub suite: Option<String>,
    /// Run entries file from MEDEVAL_CONF_PATH
    pub conf_path: Option<String>,
    /// Schema from MEDEVAL_SCHEMA_PATH
    pub schema_path: Option<String>,
    /// Train trials from MEDEVAL_NUM_TRAIN_TRIALS
    pub num_train_trials: Option<u32>,
    /// Instance cap from MEDEVAL_MAX_EVAL_INSTANCES
    pub max_eval_instances: Option<u32>,
    /// Priority from MEDEVAL_PRIORITY
    pub priority: Option<u32>,
    /// Comma-separated models from MEDEVAL_MODELS
    pub models: Option<Vec<String>>,
    /// Cache flag from MEDEVAL_DISABLE_CACHE
    pub disable_cache: Option<bool>,
    /// Output root from MEDEVAL_OUTPUT_PATH
    pub output_path: Option<String>,
    /// Config file from MEDEVAL_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            suite: get_env("SUITE"),
            conf_path: get_env("CONF_PATH"),
            schema_path: get_env("SCHEMA_PATH"),
            num_train_trials: get_env_parse("NUM_TRAIN_TRIALS"),
            max_eval_instances: get_env_parse("MAX_EVAL_INSTANCES"),
            priority: get_env_parse("PRIORITY"),
            models: get_env("MODELS").map(|v| split_list(&v)),
            disable_cache: get_env_bool("DISABLE_CACHE"),
            output_path: get_env("OUTPUT_PATH"),
            config_file: get_env("CONFIG"),
        }
    }

    /// Check if any run override is set
    pub fn has_any(&self) -> bool {
        self.suite.is_some()
            || self.conf_path.is_some()
            || self.schema_path.is_some()
            || self.num_train_trials.is_some()
            || self.max_eval_instances.is_some()
            || self.priority.is_some()
            || self.models.is_some()
            || self.disable_cache.is_some()
            || self.output_path.is_some()
    }

    /// Overlay the variables that are set onto `config`
    pub fn apply_to(&self, config: &mut RunConfig) {
        if let Some(suite) = &self.suite {
            config.suite = suite.clone();
        }
        if let Some(path) = &self.conf_path {
            config.conf_path = PathBuf::from(path);
        }
        if let Some(path) = &self.schema_path {
            config.schema_path = PathBuf::from(path);
        }
        if let Some(trials) = self.num_train_trials {
            config.num_train_trials = trials;
        }
        if let Some(max) = self.max_eval_instances {
            config.max_eval_instances = max;
        }
        if let Some(priority) = self.priority {
            config.priority = priority;
        }
        if let Some(models) = &self.models {
            config.models = models.clone();
        }
        if let Some(disable) = self.disable_cache {
            config.disable_cache = disable;
        }
        if let Some(path) = &self.output_path {
            config.output_path = PathBuf::from(path);
        }
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_SUITE:              {:?}", ENV_PREFIX, self.suite);
        println!("  {}_CONF_PATH:          {:?}", ENV_PREFIX, self.conf_path);
        println!("  {}_SCHEMA_PATH:        {:?}", ENV_PREFIX, self.schema_path);
        println!("  {}_NUM_TRAIN_TRIALS:   {:?}", ENV_PREFIX, self.num_train_trials);
        println!("  {}_MAX_EVAL_INSTANCES: {:?}", ENV_PREFIX, self.max_eval_instances);
        println!("  {}_PRIORITY:           {:?}", ENV_PREFIX, self.priority);
        println!("  {}_MODELS:             {:?}", ENV_PREFIX, self.models);
        println!("  {}_DISABLE_CACHE:      {:?}", ENV_PREFIX, self.disable_cache);
        println!("  {}_OUTPUT_PATH:        {:?}", ENV_PREFIX, self.output_path);
        println!("  {}_CONFIG:             {:?}", ENV_PREFIX, self.config_file);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| parse_value(&format!("{ENV_PREFIX}_{name}"), &v))
}

/// Parse a variable's value, warning and ignoring it when malformed
fn parse_value<T: std::str::FromStr>(var: &str, value: &str) -> Option<T> {
    let parsed: Option<T> = value.trim().parse().ok();
    if parsed.is_none() {
        warn!("Ignoring {var}={value:?}: not a valid number");
    }
    parsed
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| parse_bool(&v))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

/// Split a comma or whitespace separated list
fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Print all MEDEVAL environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_SUITE               Suite name (output namespace)");
    println!("  {ENV_PREFIX}_CONF_PATH           Run entries configuration file");
    println!("  {ENV_PREFIX}_SCHEMA_PATH         Schema file");
    println!("  {ENV_PREFIX}_NUM_TRAIN_TRIALS    Number of training trials");
    println!("  {ENV_PREFIX}_MAX_EVAL_INSTANCES  Maximum evaluation instances");
    println!("  {ENV_PREFIX}_PRIORITY            Run entry priority");
    println!("  {ENV_PREFIX}_MODELS              Models to run (comma-separated)");
    println!("  {ENV_PREFIX}_DISABLE_CACHE       Disable the request cache (true/false)");
    println!("  {ENV_PREFIX}_OUTPUT_PATH         Output root (default ./benchmark_output)");
    println!("  {ENV_PREFIX}_CONFIG              Path to configuration file");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_SUITE=my-medhelm-suite");
    println!("  export {ENV_PREFIX}_MODELS=openai/gpt-4.1-2025-04-14,meta/llama-3.1-8b-instruct");
    println!("  medeval run");
}
