//! Macroeconomic snapshot provider.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::MacroSnapshot;

/// Source of the current macroeconomic snapshot.
#[async_trait]
pub trait MacroSource: Send + Sync {
    async fn snapshot(&self) -> Result<MacroSnapshot>;
}

/// Serves a fixed snapshot, typically loaded from configuration.
pub struct StaticMacroSource {
    snapshot: MacroSnapshot,
}

impl StaticMacroSource {
    pub fn new(snapshot: MacroSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl MacroSource for StaticMacroSource {
    async fn snapshot(&self) -> Result<MacroSnapshot> {
        Ok(self.snapshot.clone())
    }
}
