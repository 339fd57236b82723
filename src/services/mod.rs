//! The prediction synthesis core and its orchestration.

pub mod classifier;
pub mod extract;
pub mod indicators;
pub mod pipeline;
pub mod sentiment;
pub mod synthesizer;

pub use classifier::NewsImpactClassifier;
pub use extract::extract_json;
pub use indicators::calculate_indicators;
pub use pipeline::{NewsQuery, PredictionPipeline};
pub use sentiment::aggregate_sentiment;
pub use synthesizer::{fallback_prediction, PredictionSynthesizer, SchemaError};
