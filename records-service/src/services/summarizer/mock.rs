//! Mock summarizer implementation for testing.

use super::{Summarizer, SummarizerError};
use async_trait::async_trait;

/// Mock summarizer for testing.
///
/// Echoes the leading words of the content, never exceeding the configured
/// generation cap.
pub struct MockSummarizer {
    max_summary_tokens: usize,
    enabled: bool,
}

impl MockSummarizer {
    pub fn new(max_summary_tokens: usize) -> Self {
        Self {
            max_summary_tokens,
            enabled: true,
        }
    }

    /// A mock that fails every request, for error-path tests.
    pub fn failing() -> Self {
        Self {
            max_summary_tokens: 0,
            enabled: false,
        }
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, content: &str) -> Result<String, SummarizerError> {
        if !self.enabled {
            return Err(SummarizerError::Inference(
                "Mock summarizer not enabled".to_string(),
            ));
        }

        let words: Vec<&str> = content
            .split_whitespace()
            .take(self.max_summary_tokens)
            .collect();

        Ok(words.join(" "))
    }

    async fn health_check(&self) -> Result<(), SummarizerError> {
        if self.enabled {
            Ok(())
        } else {
            Err(SummarizerError::Inference(
                "Mock summarizer not enabled".to_string(),
            ))
        }
    }
}
