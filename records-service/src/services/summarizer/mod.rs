//! Summarization abstractions and implementations.
//!
//! The summarizer is a trait-based seam: production runs a local seq2seq
//! model (candle), tests run a mock.

pub mod mock;
pub mod t5;

pub use mock::MockSummarizer;
pub use t5::T5Summarizer;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for summarizer operations.
#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("Model loading error: {0}")]
    ModelLoad(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Hub error: {0}")]
    Hub(String),

    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),
}

/// Text summarization backend.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the given content, respecting the configured generation cap.
    async fn summarize(&self, content: &str) -> Result<String, SummarizerError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), SummarizerError>;
}
