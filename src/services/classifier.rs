//! Per-article news impact classification.
//!
//! `classify` always yields an [`ArticleAnalysis`]. Failures become a
//! neutral result with confidence 0; an unconfigured AI service yields a
//! neutral result with confidence 50.

use futures_util::future::join_all;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::extract::{excerpt, extract_json};
use crate::sources::{CompletionClient, CompletionRequest};
use crate::types::{Article, ArticleAnalysis, Impact};

/// Characters of the raw response kept in a parse-error reason.
const PARSE_EXCERPT_CHARS: usize = 100;

pub const UNCONFIGURED_REASON: &str = "AI analysis unavailable - completion API key not configured";

const SYSTEM_PROMPT: &str =
    "You are a financial news analyst. You respond with a single JSON object and nothing else.";

/// Shape the completion is asked to return.
#[derive(Debug, Deserialize)]
struct ImpactReply {
    impact: Impact,
    confidence: f64,
    reason: String,
}

/// Classifies news articles by expected price impact on an asset.
#[derive(Clone)]
pub struct NewsImpactClassifier {
    client: Option<Arc<dyn CompletionClient>>,
    asset: String,
}

impl NewsImpactClassifier {
    /// Create a classifier. A `None` client means the AI service is unconfigured.
    pub fn new(client: Option<Arc<dyn CompletionClient>>, asset: impl Into<String>) -> Self {
        Self {
            client,
            asset: asset.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Classify a single article.
    pub async fn classify(&self, article: &Article) -> ArticleAnalysis {
        let Some(client) = self.client.as_ref() else {
            return ArticleAnalysis::neutral(50.0, UNCONFIGURED_REASON);
        };

        let request = CompletionRequest::new(SYSTEM_PROMPT, build_prompt(&self.asset, article))
            .with_temperature(0.0)
            .with_max_tokens(300);

        let raw = match client.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("News impact classification failed for '{}': {}", article.title, e);
                return ArticleAnalysis::neutral(0.0, format!("Analysis error: {}", e));
            }
        };

        match decode_analysis(&raw) {
            Ok(analysis) => {
                debug!(
                    "Classified '{}' as {} ({:.0}%)",
                    article.title, analysis.impact, analysis.confidence
                );
                analysis
            }
            Err(e) => {
                let snippet = excerpt(&raw, PARSE_EXCERPT_CHARS);
                warn!("Could not decode impact reply ({}): {}", e, snippet);
                ArticleAnalysis::neutral(
                    0.0,
                    format!("Parse error: could not decode AI response: {}", snippet),
                )
            }
        }
    }

    /// Classify a batch concurrently. Results line up with `articles`.
    pub async fn classify_all(&self, articles: &[Article]) -> Vec<ArticleAnalysis> {
        join_all(articles.iter().map(|article| self.classify(article))).await
    }
}

/// Decode a completion into an analysis, clamping confidence to 0-100.
fn decode_analysis(raw: &str) -> Result<ArticleAnalysis, serde_json::Error> {
    let reply: ImpactReply = serde_json::from_str(extract_json(raw))?;
    let confidence = if reply.confidence.is_finite() {
        reply.confidence.clamp(0.0, 100.0)
    } else {
        0.0
    };

    Ok(ArticleAnalysis {
        impact: reply.impact,
        confidence,
        reason: reply.reason,
    })
}

/// Deterministic classification prompt for one article.
pub fn build_prompt(asset: &str, article: &Article) -> String {
    format!(
        "Analyze how the following news article is likely to affect the price of {asset} \
over the next trading day.

Title: {title}
Description: {description}
Content: {content}
Source: {source}
Author: {author}
Published: {published}
URL: {url}

Respond with ONLY a JSON object in exactly this format:
{{
  \"impact\": \"UP\" | \"DOWN\" | \"NEUTRAL\",
  \"confidence\": <number from 0 to 100>,
  \"reason\": \"<one or two sentences explaining the expected impact>\"
}}",
        asset = asset,
        title = article.title,
        description = article.description.as_deref().unwrap_or("N/A"),
        content = article.content.as_deref().unwrap_or("N/A"),
        source = article.source,
        author = article.author.as_deref().unwrap_or("Unknown"),
        published = article.published_at,
        url = article.url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::completion::testing::ScriptedCompletion;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: Some("Central bank signals cuts".to_string()),
            url: "https://example.com/news".to_string(),
            content: None,
            source: "Reuters".to_string(),
            author: Some("Jane Doe".to_string()),
            published_at: "2024-05-01T10:00:00Z".to_string(),
        }
    }

    fn classifier(reply: ScriptedCompletion) -> (NewsImpactClassifier, Arc<ScriptedCompletion>) {
        let client = Arc::new(reply);
        (
            NewsImpactClassifier::new(Some(client.clone()), "gold"),
            client,
        )
    }

    #[tokio::test]
    async fn test_unconfigured_returns_neutral_50() {
        let classifier = NewsImpactClassifier::new(None, "gold");
        assert!(!classifier.is_configured());
        let analysis = classifier.classify(&article("Fed holds")).await;
        assert_eq!(analysis.impact, Impact::Neutral);
        assert_eq!(analysis.confidence, 50.0);
        assert!(analysis.reason.starts_with("AI analysis unavailable"));
    }

    #[tokio::test]
    async fn test_decodes_fenced_reply() {
        let (classifier, client) = classifier(ScriptedCompletion::replying(
            "Sure!\n```json\n{\"impact\":\"UP\",\"confidence\":82,\"reason\":\"Rate cuts weaken the dollar\"}\n```",
        ));
        let analysis = classifier.classify(&article("Fed signals cuts")).await;
        assert_eq!(analysis.impact, Impact::Up);
        assert_eq!(analysis.confidence, 82.0);
        assert_eq!(analysis.reason, "Rate cuts weaken the dollar");

        let request = client.last_request().unwrap();
        assert_eq!(request.temperature, 0.0);
        assert!(request.prompt.contains("Fed signals cuts"));
    }

    #[tokio::test]
    async fn test_confidence_clamped() {
        let (classifier, _) = classifier(ScriptedCompletion::replying(
            "{\"impact\":\"DOWN\",\"confidence\":140,\"reason\":\"x\"}",
        ));
        let analysis = classifier.classify(&article("a")).await;
        assert_eq!(analysis.impact, Impact::Down);
        assert_eq!(analysis.confidence, 100.0);
    }

    #[tokio::test]
    async fn test_parse_error_is_neutral_zero_with_excerpt() {
        let long = format!("I think prices will rise {}", "a".repeat(300));
        let (classifier, _) = classifier(ScriptedCompletion::replying(&long));
        let analysis = classifier.classify(&article("a")).await;
        assert_eq!(analysis.impact, Impact::Neutral);
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.reason.starts_with("Parse error"));
        assert!(analysis.reason.contains("I think prices will rise"));
        assert!(!analysis.reason.contains(&"a".repeat(100)));
    }

    #[tokio::test]
    async fn test_schema_violation_is_parse_error() {
        let (classifier, _) = classifier(ScriptedCompletion::replying(
            "{\"impact\":\"SIDEWAYS\",\"confidence\":50,\"reason\":\"x\"}",
        ));
        let analysis = classifier.classify(&article("a")).await;
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.reason.starts_with("Parse error"));
    }

    #[tokio::test]
    async fn test_invocation_error_is_neutral_zero() {
        let (classifier, _) = classifier(ScriptedCompletion::failing(503, "overloaded"));
        let analysis = classifier.classify(&article("a")).await;
        assert_eq!(analysis.impact, Impact::Neutral);
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.reason, "Analysis error: API error (503): overloaded");
    }

    /// Echoes the article title back as the reason, finishing later titles first.
    struct TitleEcho;

    #[async_trait::async_trait]
    impl CompletionClient for TitleEcho {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<String, crate::sources::CompletionError> {
            let title = request
                .prompt
                .lines()
                .find_map(|line| line.strip_prefix("Title: "))
                .unwrap_or_default()
                .to_string();
            let delay = match title.as_str() {
                "one" => 30,
                "two" => 15,
                _ => 0,
            };
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            Ok(format!(
                "{{\"impact\":\"UP\",\"confidence\":70,\"reason\":\"{}\"}}",
                title
            ))
        }
    }

    #[tokio::test]
    async fn test_classify_all_preserves_order() {
        let classifier = NewsImpactClassifier::new(Some(Arc::new(TitleEcho)), "gold");
        let articles = vec![article("one"), article("two"), article("three")];
        let analyses = classifier.classify_all(&articles).await;
        let reasons: Vec<&str> = analyses.iter().map(|a| a.reason.as_str()).collect();
        assert_eq!(reasons, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_classify_all_calls_once_per_article() {
        let (classifier, client) = classifier(ScriptedCompletion::replying(
            "{\"impact\":\"UP\",\"confidence\":70,\"reason\":\"r\"}",
        ));
        let articles = vec![article("one"), article("two"), article("three")];
        assert_eq!(classifier.classify_all(&articles).await.len(), 3);
        assert_eq!(client.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_classify_all_empty() {
        let classifier = NewsImpactClassifier::new(None, "gold");
        assert!(classifier.classify_all(&[]).await.is_empty());
    }

    #[test]
    fn test_prompt_is_deterministic_and_complete() {
        let a = article("Gold rallies");
        let first = build_prompt("gold", &a);
        assert_eq!(first, build_prompt("gold", &a));
        assert!(first.contains("Title: Gold rallies"));
        assert!(first.contains("Description: Central bank signals cuts"));
        assert!(first.contains("Content: N/A"));
        assert!(first.contains("Source: Reuters"));
        assert!(first.contains("Author: Jane Doe"));
        assert!(first.contains("Published: 2024-05-01T10:00:00Z"));
        assert!(first.contains("URL: https://example.com/news"));
        assert!(first.contains("\"impact\": \"UP\" | \"DOWN\" | \"NEUTRAL\""));
    }
}
