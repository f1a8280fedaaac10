use std::sync::Arc;

use thiserror::Error;
use toolfinder_agent::{ProviderError, Recommender};
use toolfinder_core::config::{AppConfig, ConfigError};
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub recommender: Arc<Recommender>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("provider client setup failed: {0}")]
    Provider(#[from] ProviderError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let recommender = Recommender::from_config(&config)?;
    info!(
        event_name = "system.bootstrap.sources_ready",
        correlation_id = "bootstrap",
        providers = ?recommender.provider_labels(),
        gateway_models = ?recommender.gateway_labels(),
        catalog_categories = recommender.catalog().len(),
        "candidate sources configured"
    );

    Ok(Application { config, recommender: Arc::new(recommender) })
}
