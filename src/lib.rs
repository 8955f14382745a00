//! custom-trends - Trends provider for agent post generation
//!
//! Supplies today's trends to an agent runtime's prompt templates and ships
//! the post-creation template that consumes them.
//!
//! # Architecture
//!
//! The runtime calls registered providers while composing state:
//! - `CUSTOM_TRENDS` GETs `<BACKEND_API_URL>/twitter/trends`
//! - The list is exposed at `providers.CUSTOM_TRENDS.trends`
//! - Any failure yields an empty list, never an error
//!
//! # Modules
//!
//! - `providers`: Provider trait, state composition, the trends provider
//! - `domain`: Trend payload decoding and the provider result
//! - `template`: Embedded post-creation template and renderer
//! - `config`: Settings sources and config file loading
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Fetch trends once
//! BACKEND_API_URL=http://localhost:3000 custom-trends fetch
//!
//! # Preview the post prompt with live trends
//! custom-trends render --agent-name Eliza --user-name eliza_ai --topic rust
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod providers;
pub mod template;

// Re-export main types at crate root for convenience
pub use config::{EnvSettings, LayeredSettings, SettingsSource, StaticSettings};
pub use domain::{TrendsPayload, TrendsResult};
pub use providers::{compose_state, Provider, TrendsProvider};
pub use template::{render_post_prompt, PostTemplate, TemplateVars, POST_CREATION_TEMPLATE};
