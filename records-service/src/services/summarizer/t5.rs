//! Local T5 summarizer.
//!
//! Loads a pretrained seq2seq model and tokenizer by name from the Hugging
//! Face hub once at startup, then serves generation requests in-process.
//! Inference is CPU-bound and runs on the blocking thread pool; the decoder
//! KV cache is interior state behind a mutex.

use super::{Summarizer, SummarizerError};
use crate::config::SummarizerConfig;
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5;
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};

/// Fixed sampling seed so generation is reproducible across requests.
const SAMPLING_SEED: u64 = 299792458;

/// Summarizer backed by a local T5 conditional-generation model.
pub struct T5Summarizer {
    inner: Arc<Inner>,
}

struct Inner {
    params: SummarizerConfig,
    device: Device,
    model_config: t5::Config,
    model: Mutex<t5::T5ForConditionalGeneration>,
    tokenizer: Tokenizer,
}

impl T5Summarizer {
    /// Fetch model artifacts from the hub and load them onto the CPU.
    ///
    /// Blocking: call from a blocking context (e.g. `spawn_blocking`).
    pub fn load(params: &SummarizerConfig) -> Result<Self, SummarizerError> {
        tracing::info!(
            model = %params.model_id,
            revision = %params.revision,
            "Loading summarizer model"
        );

        let api = Api::new().map_err(|e| SummarizerError::Hub(e.to_string()))?;
        let repo = api.repo(Repo::with_revision(
            params.model_id.clone(),
            RepoType::Model,
            params.revision.clone(),
        ));

        let config_path = repo
            .get("config.json")
            .map_err(|e| SummarizerError::Hub(format!("Failed to fetch config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| SummarizerError::Hub(format!("Failed to fetch tokenizer.json: {}", e)))?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            SummarizerError::Hub(format!("Failed to fetch model.safetensors: {}", e))
        })?;

        let config_json = std::fs::read_to_string(config_path)
            .map_err(|e| SummarizerError::ModelLoad(e.to_string()))?;
        let model_config: t5::Config = serde_json::from_str(&config_json)
            .map_err(|e| SummarizerError::ModelLoad(format!("Invalid model config: {}", e)))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| SummarizerError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: params.max_input_tokens,
                ..Default::default()
            }))
            .map_err(|e| SummarizerError::Tokenizer(e.to_string()))?;

        let device = Device::Cpu;
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)?
        };
        let model = t5::T5ForConditionalGeneration::load(vb, &model_config)?;

        tracing::info!(
            model = %params.model_id,
            vocab_size = tokenizer.get_vocab_size(true),
            "Summarizer model and tokenizer loaded"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                params: params.clone(),
                device,
                model_config,
                model: Mutex::new(model),
                tokenizer,
            }),
        })
    }
}

impl Inner {
    fn run(&self, content: &str) -> Result<String, SummarizerError> {
        let prompt = format!("{}{}", self.params.task_prefix, content);

        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| SummarizerError::Tokenizer(e.to_string()))?;
        let input_ids = encoding.get_ids().to_vec();
        if input_ids.is_empty() {
            return Err(SummarizerError::Inference("Empty input".to_string()));
        }

        let input = Tensor::new(input_ids.as_slice(), &self.device)?.unsqueeze(0)?;

        let mut model = self
            .model
            .lock()
            .map_err(|_| SummarizerError::Inference("model lock poisoned".to_string()))?;
        model.clear_kv_cache();

        let encoder_output = model.encode(&input)?;

        let start_token = self
            .model_config
            .decoder_start_token_id
            .unwrap_or(self.model_config.pad_token_id) as u32;
        let eos_token = self.model_config.eos_token_id as u32;

        let mut output_ids = vec![start_token];
        let mut logits_processor =
            LogitsProcessor::new(SAMPLING_SEED, Some(self.params.temperature), None);

        for index in 0..self.params.max_summary_tokens {
            let decoder_ids = if index == 0 || !self.model_config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = output_ids[output_ids.len() - 1];
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };

            let logits = model.decode(&decoder_ids, &encoder_output)?.squeeze(0)?;
            let next_token = logits_processor.sample(&logits)?;

            if next_token == eos_token {
                break;
            }
            output_ids.push(next_token);
        }

        let summary = self
            .tokenizer
            .decode(&output_ids[1..], true)
            .map_err(|e| SummarizerError::Tokenizer(e.to_string()))?;

        tracing::debug!(
            input_tokens = input_ids.len(),
            output_tokens = output_ids.len() - 1,
            "Generated summary"
        );

        Ok(summary.trim().to_string())
    }
}

#[async_trait]
impl Summarizer for T5Summarizer {
    async fn summarize(&self, content: &str) -> Result<String, SummarizerError> {
        let inner = self.inner.clone();
        let content = content.to_string();

        tokio::task::spawn_blocking(move || inner.run(&content))
            .await
            .map_err(|e| SummarizerError::Inference(format!("Inference task failed: {}", e)))?
    }

    async fn health_check(&self) -> Result<(), SummarizerError> {
        Ok(())
    }
}
