//! Dependency initialization and wiring for the log indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::IndexerConfig;
use crate::IndexingError;
use log_indexer_pipeline::{orchestrator::Orchestrator, source::CloudWatchLogSource};
use log_indexer_repository::{DashboardsClient, OpenSearchClient, SearchIndexClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Build every client from `config` and wire them into an orchestrator.
    ///
    /// Fails if the search engine cannot be reached or reports an unhealthy
    /// cluster.
    pub async fn new(config: IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            dashboards_url = %config.dashboards_url,
            aws_region = %config.aws_region,
            source_count = config.sources.len(),
            "Initializing dependencies"
        );

        let provider = OpenSearchClient::new(&config.opensearch_url, config.opensearch_auth)
            .await
            .map_err(|e| IndexingError::config(format!("Failed to create OpenSearch client: {}", e)))?;
        let search_client = SearchIndexClient::with_config(Box::new(provider), config.search);

        let healthy = search_client
            .health_check()
            .await
            .map_err(|e| IndexingError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        let registrar = DashboardsClient::new(&config.dashboards_url)
            .map_err(|e| IndexingError::config(format!("Invalid DASHBOARDS_URL: {}", e)))?;

        let log_source =
            CloudWatchLogSource::new(&config.aws_region, config.aws_profile.as_deref()).await;

        info!("CloudWatch Logs client created");

        let orchestrator = Orchestrator::with_config(
            Arc::new(log_source),
            Arc::new(search_client),
            Arc::new(registrar),
            config.sources,
            config.orchestrator,
        );

        Ok(Self { orchestrator })
    }
}
