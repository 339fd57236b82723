//! NewsAPI client for recent articles about the traded asset.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::Article;

const NEWSAPI_URL: &str = "https://newsapi.org/v2";

/// Placeholder title NewsAPI uses for withdrawn articles.
const REMOVED_MARKER: &str = "[Removed]";

/// Errors from the news-search collaborator.
#[derive(Error, Debug)]
pub enum NewsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("news API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

impl NewsApiArticle {
    /// Convert to an [`Article`], dropping withdrawn or untitled entries.
    fn into_article(self) -> Option<Article> {
        let title = self.title.filter(|t| !t.trim().is_empty() && t != REMOVED_MARKER)?;
        Some(Article {
            title,
            description: self.description,
            url: self.url.unwrap_or_default(),
            content: self.content,
            source: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            author: self.author,
            published_at: self.published_at.unwrap_or_default(),
        })
    }
}

/// Source of recent news articles.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch the most recent articles matching `query`, newest first.
    async fn fetch_articles(&self, query: &str, page_size: u32) -> Result<Vec<Article>, NewsError>;
}

/// NewsAPI "everything" search client.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    /// Create a new NewsAPI client.
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = super::http_client(timeout);

        Self {
            client,
            api_key,
            base_url: NEWSAPI_URL.to_string(),
        }
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    /// English articles sorted by publication time.
    async fn fetch_articles(&self, query: &str, page_size: u32) -> Result<Vec<Article>, NewsError> {
        let url = format!("{}/everything", self.base_url);
        let page_size = page_size.to_string();

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<NewsApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.to_string());
            warn!("News API returned {}: {}", status, message);
            return Err(NewsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: NewsApiResponse = response.json().await?;
        let articles = parse_articles(body);
        debug!("Fetched {} articles for '{}'", articles.len(), query);
        Ok(articles)
    }
}

fn parse_articles(body: NewsApiResponse) -> Vec<Article> {
    body.articles
        .into_iter()
        .filter_map(NewsApiArticle::into_article)
        .collect()
}
