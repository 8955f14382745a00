//! Provider interfaces for the host runtime.
//!
//! A provider supplies a named block of data during state composition.
//! Templates read it back as `providers.<NAME>.<field>`.

pub mod trends;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::SettingsSource;

// Re-export the trends provider
pub use trends::{trends_url, TrendsError, TrendsProvider, PROVIDER_NAME, TRENDS_PATH};

/// Trait for state providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name the state block is registered under
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Produce this provider's state block. Must not fail.
    async fn state(&self, runtime: &dyn SettingsSource) -> Value;
}

/// Compose `{"providers": {NAME: state, ...}}` from the given providers.
///
/// Providers run one after another in registration order.
pub async fn compose_state(
    providers: &[Box<dyn Provider>],
    runtime: &dyn SettingsSource,
) -> Value {
    let mut blocks = Map::new();

    for provider in providers {
        tracing::debug!(provider = provider.name(), "Composing provider state");
        blocks.insert(provider.name().to_string(), provider.state(runtime).await);
    }

    let mut state = Map::new();
    state.insert("providers".to_string(), Value::Object(blocks));
    Value::Object(state)
}

/// Providers shipped with this crate
pub fn default_providers() -> Vec<Box<dyn Provider>> {
    vec![Box::new(TrendsProvider::new())]
}
