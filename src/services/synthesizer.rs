//! AI-backed prediction synthesis with a deterministic momentum fallback.
//!
//! The AI reply is never trusted verbatim: it is decoded into a JSON object
//! and every field is validated and repaired before use. Any failure to
//! invoke or decode falls back to half-momentum extrapolation of the last move.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::extract::{excerpt, extract_json};
use crate::sources::{CompletionClient, CompletionRequest};
use crate::types::{
    last_move_direction, latest_close, Direction, MacroSnapshot, NewsSentiment, PredictionResponse,
    PricePoint, TechnicalIndicators,
};

/// Sampling temperature for quasi-deterministic synthesis.
const SYNTHESIS_TEMPERATURE: f32 = 0.1;

/// Characters of an undecodable reply kept for diagnosis.
const DECODE_EXCERPT_CHARS: usize = 100;

const DEFAULT_CONFIDENCE: f64 = 50.0;
pub const DEFAULT_SUPPORTING_FACTOR: &str = "Based on technical indicators and market conditions";

/// Fixed confidence of the momentum fallback.
pub const FALLBACK_CONFIDENCE: f64 = 55.0;
/// Share of the last move extrapolated by the fallback.
const MOMENTUM_FACTOR: f64 = 0.5;

const SYSTEM_PROMPT: &str = "You are a quantitative market analyst producing short-horizon \
price predictions. You respond with a single JSON object and nothing else.";

/// Reasons a decoded AI reply cannot be used at all.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("reply is JSON but not an object (got {0})")]
    NotAnObject(&'static str),
}

/// Synthesizes a price prediction from history, indicators, macro data and news.
#[derive(Clone)]
pub struct PredictionSynthesizer {
    client: Option<Arc<dyn CompletionClient>>,
    asset: String,
}

impl PredictionSynthesizer {
    /// Create a synthesizer. A `None` client means the AI service is unconfigured.
    pub fn new(client: Option<Arc<dyn CompletionClient>>, asset: impl Into<String>) -> Self {
        Self {
            client,
            asset: asset.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Produce a prediction. Never fails; falls back to momentum on any AI problem.
    pub async fn synthesize(
        &self,
        prices: &[PricePoint],
        indicators: &TechnicalIndicators,
        macro_snapshot: &MacroSnapshot,
        sentiment: &NewsSentiment,
    ) -> PredictionResponse {
        let Some(client) = self.client.as_ref() else {
            debug!("Completion service not configured, using momentum fallback");
            return fallback_prediction(prices, "AI prediction unavailable");
        };

        let prompt = build_prompt(&self.asset, prices, indicators, macro_snapshot, sentiment);
        let request = CompletionRequest::new(SYSTEM_PROMPT, prompt)
            .with_temperature(SYNTHESIS_TEMPERATURE)
            .with_max_tokens(500);

        let raw = match client.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Prediction synthesis failed: {}", e);
                return fallback_prediction(prices, &format!("AI prediction failed: {}", e));
            }
        };

        match decode_prediction(&raw, prices) {
            Ok(prediction) => {
                info!(
                    "AI prediction: {} to {:.2} ({:.0}% confidence)",
                    prediction.direction, prediction.price, prediction.confidence
                );
                prediction
            }
            Err(e) => {
                let snippet = excerpt(&raw, DECODE_EXCERPT_CHARS);
                warn!("Could not decode prediction reply ({}): {}", e, snippet);
                fallback_prediction(
                    prices,
                    &format!("AI response could not be decoded: {}", snippet),
                )
            }
        }
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode and validate an AI reply against the latest prices.
pub fn decode_prediction(raw: &str, prices: &[PricePoint]) -> Result<PredictionResponse, SchemaError> {
    let value: Value = serde_json::from_str(extract_json(raw))?;
    match value {
        Value::Object(fields) => Ok(repair_prediction(&fields, prices)),
        other => Err(SchemaError::NotAnObject(json_kind(&other))),
    }
}

/// Apply the field-by-field repair rules to a decoded object.
fn repair_prediction(fields: &Map<String, Value>, prices: &[PricePoint]) -> PredictionResponse {
    let number = |key: &str| fields.get(key).and_then(Value::as_f64).filter(|v| v.is_finite());

    let direction = fields
        .get("direction")
        .and_then(Value::as_str)
        .and_then(Direction::parse)
        .unwrap_or_else(|| last_move_direction(prices));

    let supporting_factor = fields
        .get("supportingFactor")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUPPORTING_FACTOR)
        .to_string();

    PredictionResponse {
        direction,
        confidence: number("confidence")
            .map(|c| c.clamp(0.0, 100.0))
            .unwrap_or(DEFAULT_CONFIDENCE),
        price: number("price").unwrap_or_else(|| latest_close(prices)),
        price_change: number("priceChange").unwrap_or(0.0).abs(),
        price_change_percent: number("priceChangePercent").unwrap_or(0.0),
        timestamp: now_iso(),
        supporting_factor,
    }
}

/// Deterministic half-momentum prediction.
///
/// `reason` says why the fallback was taken and is carried in the
/// supporting factor.
pub fn fallback_prediction(prices: &[PricePoint], reason: &str) -> PredictionResponse {
    let [.., previous, latest] = prices else {
        return PredictionResponse {
            direction: Direction::Up,
            confidence: 51.0,
            price: 2000.0,
            price_change: 5.0,
            price_change_percent: 0.25,
            timestamp: now_iso(),
            supporting_factor: format!(
                "Insufficient price history, low-confidence default prediction ({})",
                reason
            ),
        };
    };

    let delta = latest.close - previous.close;
    let direction = Direction::from_delta(delta);
    let raw_change = delta.abs();
    let raw_percent = if previous.close != 0.0 {
        raw_change / previous.close * 100.0
    } else {
        0.0
    };
    let price_change = raw_change * MOMENTUM_FACTOR;

    PredictionResponse {
        direction,
        confidence: FALLBACK_CONFIDENCE,
        price: latest.close + direction.sign() * price_change,
        price_change,
        price_change_percent: raw_percent * MOMENTUM_FACTOR,
        timestamp: now_iso(),
        supporting_factor: format!(
            "Momentum extrapolation: price moved {} {:.2}% in the last session ({})",
            direction, raw_percent, reason
        ),
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Build the synthesis prompt.
pub fn build_prompt(
    asset: &str,
    prices: &[PricePoint],
    indicators: &TechnicalIndicators,
    macro_snapshot: &MacroSnapshot,
    sentiment: &NewsSentiment,
) -> String {
    let mut history = String::new();
    for point in prices {
        let _ = write!(
            history,
            "{}: open {:.2}, high {:.2}, low {:.2}, close {:.2}",
            point.date, point.open, point.high, point.low, point.close
        );
        if let Some(change) = point.change_percent {
            let _ = write!(history, ", change {:+.2}%", change);
        }
        history.push('\n');
    }

    let factors: Vec<String> = sentiment
        .top_factors
        .iter()
        .take(3)
        .map(|f| format!("- {}", f))
        .collect();

    format!(
        "Predict the {asset} price for the next trading day.

Current price: {current:.2}

Price history (oldest first):
{history}
Technical indicators:
- RSI(14): {rsi}
- MACD: {macd}
- 50-day MA: {ma50}
- 200-day MA: {ma200}
- Bollinger upper: {upper}
- Bollinger middle: {middle}
- Bollinger lower: {lower}

Macroeconomic conditions:
- USD index: {usd:.2}
- Interest rates: {rates:.2}%
- Inflation: {inflation:.2}%
- Market sentiment: {market}

News sentiment: {overall} ({confidence:.0}% confidence)
Top factors:
{factors}

Respond with ONLY a JSON object in exactly this format:
{{
  \"direction\": \"up\" | \"down\",
  \"confidence\": <number from 0 to 100>,
  \"price\": <predicted price>,
  \"priceChange\": <absolute predicted change>,
  \"priceChangePercent\": <predicted change in percent>,
  \"supportingFactor\": \"<the single most important reason>\"
}}",
        asset = asset,
        current = latest_close(prices),
        history = history,
        rsi = fmt_opt(indicators.rsi),
        macd = fmt_opt(indicators.macd),
        ma50 = fmt_opt(indicators.ma50),
        ma200 = fmt_opt(indicators.ma200),
        upper = fmt_opt(indicators.bollinger.upper),
        middle = fmt_opt(indicators.bollinger.middle),
        lower = fmt_opt(indicators.bollinger.lower),
        usd = macro_snapshot.usd_index,
        rates = macro_snapshot.interest_rates,
        inflation = macro_snapshot.inflation,
        market = macro_snapshot.market_sentiment,
        overall = sentiment.overall,
        confidence = sentiment.confidence,
        factors = factors.join("\n"),
    )
}
