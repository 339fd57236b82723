//! Augur - short-horizon price prediction from indicators, news sentiment and AI synthesis

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;
use tracing::info;

use config::Config;
use services::{NewsImpactClassifier, NewsQuery, PredictionPipeline, PredictionSynthesizer};
use sources::{
    CompletionClient, NewsApiClient, NewsSource, OpenAiClient, PriceSource, SqlitePriceStore,
    StaticMacroSource,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<PredictionPipeline>,
}

impl AppState {
    /// Build the pipeline from configuration, opening the price database.
    pub fn from_config(config: Config) -> error::Result<Self> {
        let store = Arc::new(SqlitePriceStore::new(&config.database_path)?);
        Ok(Self::with_price_source(config, store))
    }

    /// Build the pipeline around an existing price source.
    pub fn with_price_source(config: Config, prices: Arc<dyn PriceSource>) -> Self {
        let completion: Option<Arc<dyn CompletionClient>> =
            config.ai.api_key.as_ref().map(|api_key| {
                info!("Completion API key found, enabling AI analysis ({})", config.ai.model);
                Arc::new(OpenAiClient::new(
                    api_key.clone(),
                    config.ai.model.clone(),
                    config.ai.base_url.clone(),
                    config.ai.timeout(),
                )) as Arc<dyn CompletionClient>
            });
        if completion.is_none() {
            info!("No completion API key, predictions use the momentum fallback");
        }

        let news: Option<Arc<dyn NewsSource>> = config.news.api_key.as_ref().map(|api_key| {
            info!("News API key found, enabling news sentiment");
            Arc::new(NewsApiClient::new(
                api_key.clone(),
                std::time::Duration::from_secs(config.news.timeout_secs),
            )) as Arc<dyn NewsSource>
        });

        let pipeline = PredictionPipeline::new(
            prices,
            Arc::new(StaticMacroSource::new(config.macro_snapshot.clone())),
            news,
            NewsQuery {
                query: config.news.query.clone(),
                page_size: config.news.page_size,
            },
            config.history_days,
            NewsImpactClassifier::new(completion.clone(), config.asset_name.clone()),
            PredictionSynthesizer::new(completion, config.asset_name.clone()),
        );

        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::*;
