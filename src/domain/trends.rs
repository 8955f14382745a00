//! Trend payloads and the result exposed to templates.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Shape of a decoded backend payload.
///
/// Backends either wrap the list in an envelope (`{"trends": [...]}`) or
/// return the list directly. An object with a non-null `trends` field is an
/// envelope; anything else is taken as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum TrendsPayload {
    Envelope { trends: Value },
    Bare(Value),
}

impl From<Value> for TrendsPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut map) => match map.remove("trends") {
                Some(trends) if !trends.is_null() => Self::Envelope { trends },
                Some(null) => {
                    map.insert("trends".to_string(), null);
                    Self::Bare(Value::Object(map))
                }
                None => Self::Bare(Value::Object(map)),
            },
            other => Self::Bare(other),
        }
    }
}

/// Why a payload could not be turned into a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Object,
    String,
    Number,
    Bool,
    Null,
}

impl std::fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Object => "object",
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

impl TrendsPayload {
    /// The value that should hold the trend list
    pub fn into_value(self) -> Value {
        match self {
            Self::Envelope { trends } => trends,
            Self::Bare(value) => value,
        }
    }

    /// Normalize to a list of trend items.
    ///
    /// Returns the shape that was found instead when it is not a list.
    pub fn into_trends(self) -> Result<Vec<Value>, PayloadShape> {
        match self.into_value() {
            Value::Array(items) => Ok(items),
            Value::Object(_) => Err(PayloadShape::Object),
            Value::String(_) => Err(PayloadShape::String),
            Value::Number(_) => Err(PayloadShape::Number),
            Value::Bool(_) => Err(PayloadShape::Bool),
            Value::Null => Err(PayloadShape::Null),
        }
    }
}

/// Trends gathered by one provider invocation.
///
/// Serializes to the state block templates read: the list is exposed as
/// `trends`, `data.trends`, `text` and `values.trends`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendsResult {
    trends: Vec<Value>,
}

impl TrendsResult {
    pub fn new(trends: Vec<Value>) -> Self {
        Self { trends }
    }

    /// The `{ trends: [] }` fallback.
    ///
    /// Like any result its state also carries `data.trends`, `text` and
    /// `values.trends`, so it serializes to
    /// `{"data":{"trends":[]},"text":[],"trends":[],"values":{"trends":[]}}`
    /// rather than the bare `{"trends":[]}`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn trends(&self) -> &[Value] {
        &self.trends
    }

    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }

    pub fn len(&self) -> usize {
        self.trends.len()
    }

    pub fn into_trends(self) -> Vec<Value> {
        self.trends
    }

    /// Resolve one of the dotted access paths templates use
    pub fn lookup(&self, path: &str) -> Option<&[Value]> {
        match path {
            "trends" | "text" | "data.trends" | "values.trends" => Some(&self.trends),
            _ => None,
        }
    }

    /// State block handed to the host's template renderer
    pub fn to_state(&self) -> Value {
        json!({
            "trends": self.trends,
            "data": { "trends": self.trends },
            "text": self.trends,
            "values": { "trends": self.trends },
        })
    }
}

impl Serialize for TrendsResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_state().serialize(serializer)
    }
}
