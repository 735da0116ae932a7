use records_service::config::RecordsConfig;
use records_service::services::{InMemoryStore, MockSummarizer, SearchStore, Summarizer};
use records_service::startup::Application;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut config = RecordsConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing

        let store = Arc::new(InMemoryStore::new(&config.search.index));
        let search: Arc<dyn SearchStore> = store.clone();
        let summarizer: Arc<dyn Summarizer> =
            Arc::new(MockSummarizer::new(config.summarizer.max_summary_tokens));

        Self::spawn_with(config, store, search, summarizer).await
    }

    /// Spawn with a search store that fails every request.
    pub async fn spawn_with_failing_search() -> Self {
        let mut config = RecordsConfig::load().expect("Failed to load configuration");
        config.common.port = 0;

        let store = Arc::new(InMemoryStore::failing());
        let search: Arc<dyn SearchStore> = store.clone();
        let summarizer: Arc<dyn Summarizer> =
            Arc::new(MockSummarizer::new(config.summarizer.max_summary_tokens));

        Self::spawn_with(config, store, search, summarizer).await
    }

    /// Spawn with a summarizer that fails every request.
    pub async fn spawn_with_failing_summarizer() -> Self {
        let mut config = RecordsConfig::load().expect("Failed to load configuration");
        config.common.port = 0;

        let store = Arc::new(InMemoryStore::new(&config.search.index));
        let search: Arc<dyn SearchStore> = store.clone();
        let summarizer: Arc<dyn Summarizer> = Arc::new(MockSummarizer::failing());

        Self::spawn_with(config, store, search, summarizer).await
    }

    async fn spawn_with(
        config: RecordsConfig,
        store: Arc<InMemoryStore>,
        search: Arc<dyn SearchStore>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        let app = Application::build_with(config, search, summarizer)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
        }
    }

    /// Index a record and make it searchable.
    pub async fn seed_record(&self, record: serde_json::Value) {
        self.store
            .index(record)
            .await
            .expect("Failed to index record");
        self.store.refresh().await.expect("Failed to refresh index");
    }
}
