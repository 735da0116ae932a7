use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Input truncation limit for the summarizer tokenizer.
const DEFAULT_MAX_INPUT_TOKENS: usize = 512;
/// Generation cap for summary output.
const DEFAULT_MAX_SUMMARY_TOKENS: usize = 150;
/// Sampling temperature for summary generation.
const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, Deserialize)]
pub struct RecordsConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub search: SearchConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the Elasticsearch cluster.
    pub url: String,
    /// Index holding patient records.
    pub index: String,
    /// Optional JSON file of records indexed at startup.
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    /// Hub model id for the seq2seq model (e.g., t5-small).
    pub model_id: String,
    /// Hub revision to pin.
    pub revision: String,
    /// Instruction prepended to every summarization input.
    pub task_prefix: String,
    pub max_input_tokens: usize,
    pub max_summary_tokens: usize,
    pub temperature: f64,
}

impl RecordsConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(RecordsConfig {
            common: common_config,
            search: SearchConfig {
                url: get_env("ELASTICSEARCH_URL", Some("http://localhost:9200"), is_prod)?,
                index: get_env("ELASTICSEARCH_INDEX", Some("patients"), is_prod)?,
                seed_file: env::var("RECORDS_SEED_FILE").ok(),
            },
            summarizer: SummarizerConfig {
                model_id: get_env("SUMMARIZER_MODEL", Some("t5-small"), is_prod)?,
                revision: get_env("SUMMARIZER_REVISION", Some("main"), is_prod)?,
                task_prefix: get_env("SUMMARIZER_TASK_PREFIX", Some("summarize: "), is_prod)?,
                max_input_tokens: get_env(
                    "SUMMARIZER_MAX_INPUT_TOKENS",
                    Some(&DEFAULT_MAX_INPUT_TOKENS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_MAX_INPUT_TOKENS),
                max_summary_tokens: get_env(
                    "SUMMARIZER_MAX_SUMMARY_TOKENS",
                    Some(&DEFAULT_MAX_SUMMARY_TOKENS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_MAX_SUMMARY_TOKENS),
                temperature: get_env(
                    "SUMMARIZER_TEMPERATURE",
                    Some(&DEFAULT_TEMPERATURE.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_TEMPERATURE),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
