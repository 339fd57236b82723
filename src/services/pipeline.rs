//! End-to-end orchestration behind the prediction and news-impact endpoints.
//!
//! This is the only layer that surfaces errors; everything below it
//! degrades to fallbacks.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::classifier::NewsImpactClassifier;
use super::indicators::calculate_indicators;
use super::sentiment::aggregate_sentiment;
use super::synthesizer::PredictionSynthesizer;
use crate::error::{AppError, Result};
use crate::sources::{MacroSource, NewsSource, PriceSource};
use crate::types::{Article, ArticleImpact, NewsSentiment, PredictionResponse};

/// News search settings used by the pipeline.
#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub query: String,
    pub page_size: u32,
}

/// Wires the data sources to the prediction core.
#[derive(Clone)]
pub struct PredictionPipeline {
    prices: Arc<dyn PriceSource>,
    macro_source: Arc<dyn MacroSource>,
    news: Option<Arc<dyn NewsSource>>,
    news_query: NewsQuery,
    history_days: usize,
    classifier: NewsImpactClassifier,
    synthesizer: PredictionSynthesizer,
}

impl PredictionPipeline {
    pub fn new(
        prices: Arc<dyn PriceSource>,
        macro_source: Arc<dyn MacroSource>,
        news: Option<Arc<dyn NewsSource>>,
        news_query: NewsQuery,
        history_days: usize,
        classifier: NewsImpactClassifier,
        synthesizer: PredictionSynthesizer,
    ) -> Self {
        Self {
            prices,
            macro_source,
            news,
            news_query,
            history_days,
            classifier,
            synthesizer,
        }
    }

    /// Run the full prediction flow.
    ///
    /// Fails only when there is no price history or a data source errors.
    pub async fn predict(&self) -> Result<PredictionResponse> {
        let prices = self
            .prices
            .fetch_recent_price_series(self.history_days)
            .await?;
        if prices.is_empty() {
            return Err(AppError::NotFound("No price history available".to_string()));
        }

        let indicators = calculate_indicators(&prices);
        let macro_snapshot = self.macro_source.snapshot().await?;
        let sentiment = self.news_sentiment().await;

        debug!(
            "Synthesizing from {} points, news {} ({:.0}%)",
            prices.len(),
            sentiment.overall,
            sentiment.confidence
        );

        let prediction = self
            .synthesizer
            .synthesize(&prices, &indicators, &macro_snapshot, &sentiment)
            .await;
        info!(
            "Prediction: {} to {:.2} ({:.0}% confidence)",
            prediction.direction, prediction.price, prediction.confidence
        );
        Ok(prediction)
    }

    /// Fetch and classify recent articles.
    pub async fn news_impact(&self) -> Result<Vec<ArticleImpact>> {
        let news = self
            .news
            .as_ref()
            .ok_or_else(|| AppError::Internal("News API key not configured".to_string()))?;

        let articles = news
            .fetch_articles(&self.news_query.query, self.news_query.page_size)
            .await?;
        if articles.is_empty() {
            return Err(AppError::NotFound("No news articles found".to_string()));
        }

        let analyses = self.classifier.classify_all(&articles).await;
        Ok(articles
            .into_iter()
            .zip(analyses)
            .map(|(article, analysis)| ArticleImpact { article, analysis })
            .collect())
    }

    /// Aggregated sentiment of recent news; any news problem counts as no news.
    async fn news_sentiment(&self) -> NewsSentiment {
        let articles = self.fetch_articles_lenient().await;
        let analyses = self.classifier.classify_all(&articles).await;
        aggregate_sentiment(&analyses)
    }

    async fn fetch_articles_lenient(&self) -> Vec<Article> {
        let Some(news) = self.news.as_ref() else {
            debug!("News source not configured, predicting without news");
            return Vec::new();
        };

        match news
            .fetch_articles(&self.news_query.query, self.news_query.page_size)
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                warn!("News fetch failed, predicting without news: {}", e);
                Vec::new()
            }
        }
    }
}
