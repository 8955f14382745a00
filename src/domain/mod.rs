//! Domain types for custom-trends.
//!
//! - Trends: decoded backend payloads and the result exposed to templates

pub mod trends;

// Re-export commonly used types
pub use trends::{PayloadShape, TrendsPayload, TrendsResult};
