//! External collaborators: AI completion, news search, price history and macro data.

pub mod completion;
pub mod macro_data;
pub mod newsapi;
pub mod price_store;

pub use completion::{CompletionClient, CompletionError, CompletionRequest, OpenAiClient};
pub use macro_data::{MacroSource, StaticMacroSource};
pub use newsapi::{NewsApiClient, NewsError, NewsSource};
pub use price_store::{PriceSource, SqlitePriceStore};

use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// HTTP client shared by the outbound collaborators, with a per-request timeout.
///
/// Falls back to reqwest's default client if the builder fails, in which
/// case requests run without the configured timeout.
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent("Augur/1.0")
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(
                "Could not build HTTP client with {:?} timeout, using defaults without timeout: {}",
                timeout, e
            );
            Client::new()
        })
}
