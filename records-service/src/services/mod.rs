pub mod metrics;
pub mod search;
pub mod summarizer;

pub use metrics::{get_metrics, init_metrics};
pub use search::{ElasticsearchStore, InMemoryStore, SearchStore};
pub use summarizer::{MockSummarizer, Summarizer, T5Summarizer};
