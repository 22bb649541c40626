//! Upstream Envelope Module
//!
//! The upstream wraps its real payload in varying envelope shapes depending
//! on the endpoint: `{data: ...}`, `{results: [...]}`, or the bare payload.
//! This models the known shapes as a tagged union with a bare fallback
//! instead of chained optional-field probing.

use serde::Deserialize;
use serde_json::Value;

// == Envelope ==
/// Known upstream envelope shapes. Variant order matters for untagged
/// deserialization: the specific shapes are tried before the bare fallback.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    /// `{ "data": ... }`
    Data { data: Value },
    /// `{ "results": [...] }`
    Results { results: Value },
    /// Anything else is treated as the payload itself
    Bare(Value),
}

impl Envelope {
    /// Extracts the inner payload from whichever envelope the upstream used.
    pub fn into_inner(self) -> Value {
        match self {
            Envelope::Data { data } => data,
            Envelope::Results { results } => results,
            Envelope::Bare(value) => value,
        }
    }

    /// Unwraps a raw upstream value, falling back to null only if the value
    /// is not representable (the bare variant makes that unreachable in
    /// practice).
    pub fn unwrap_value(value: Value) -> Value {
        match serde_json::from_value::<Envelope>(value) {
            Ok(envelope) => envelope.into_inner(),
            Err(_) => Value::Null,
        }
    }
}
