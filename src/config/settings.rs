//! Setting lookup sources.
//!
//! A provider never reads process state directly. It is handed a
//! [`SettingsSource`] by the host (runtime settings) and is constructed with
//! a second one for the environment-style fallback, so both layers can be
//! swapped out in tests.

use std::collections::HashMap;
use std::sync::Arc;

/// Key-value lookup for string settings.
pub trait SettingsSource: Send + Sync {
    /// Look up a setting. `None` means the key is not set.
    fn get_setting(&self, key: &str) -> Option<String>;
}

impl<T: SettingsSource + ?Sized> SettingsSource for Arc<T> {
    fn get_setting(&self, key: &str) -> Option<String> {
        (**self).get_setting(key)
    }
}

impl<T: SettingsSource + ?Sized> SettingsSource for Box<T> {
    fn get_setting(&self, key: &str) -> Option<String> {
        (**self).get_setting(key)
    }
}

/// Returns the value only if it is present and not blank.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// In-memory settings (runtime-provided settings, config file values, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    values: HashMap<String, String>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, String>> for StaticSettings {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl SettingsSource for StaticSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Process environment, read at lookup time
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Ordered stack of sources. The first source with a non-empty value wins.
#[derive(Default)]
pub struct LayeredSettings {
    layers: Vec<(String, Box<dyn SettingsSource>)>,
}

impl LayeredSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower priority than all existing layers
    pub fn layer(
        mut self,
        label: impl Into<String>,
        source: impl SettingsSource + 'static,
    ) -> Self {
        self.layers.push((label.into(), Box::new(source)));
        self
    }

    /// Resolve a key and report which layer supplied it
    pub fn resolve(&self, key: &str) -> Option<(&str, String)> {
        self.layers.iter().find_map(|(label, source)| {
            non_empty(source.get_setting(key)).map(|value| (label.as_str(), value))
        })
    }
}

impl SettingsSource for LayeredSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.resolve(key).map(|(_, value)| value)
    }
}
