//! Versioned layout of the persisted sample list.
//!
//! Two historical shapes are in the wild: a bare JSON array of samples, and
//! an object wrapping the array under `samples`. Both decode; the wrapped
//! shape (with a `version` field) is what gets written.

use serde::Serialize;
use serde_json::Value;

use crate::sample::Sample;

/// Schema version stamped into the wrapped shape on write.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Outcome of decoding the persisted text.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredSchema {
    /// `[ {...}, ... ]`
    LegacyArray(Vec<Sample>),
    /// `{ "samples": [ {...}, ... ] }`, with or without `version`.
    Wrapped(Vec<Sample>),
    /// Not JSON, or neither of the supported shapes.
    Invalid { reason: String },
}

impl StoredSchema {
    pub fn decode(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                return Self::Invalid {
                    reason: format!("not valid JSON: {e}"),
                };
            }
        };

        match value {
            Value::Array(entries) => Self::LegacyArray(decode_entries(entries)),
            Value::Object(mut map) => match map.remove("samples") {
                Some(Value::Array(entries)) => Self::Wrapped(decode_entries(entries)),
                Some(_) => Self::Invalid {
                    reason: "`samples` is not an array".into(),
                },
                None => Self::Invalid {
                    reason: "object has no `samples` key".into(),
                },
            },
            other => Self::Invalid {
                reason: format!("unexpected top-level {}", json_kind(&other)),
            },
        }
    }

    /// The decoded samples, or `None` for [`StoredSchema::Invalid`].
    pub fn into_samples(self) -> Option<Vec<Sample>> {
        match self {
            Self::LegacyArray(samples) | Self::Wrapped(samples) => Some(samples),
            Self::Invalid { .. } => None,
        }
    }
}

#[derive(Serialize)]
struct WrappedRef<'a> {
    version: u32,
    samples: &'a [Sample],
}

/// Serialize `samples` in the current wrapped shape.
pub fn encode(samples: &[Sample]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WrappedRef {
        version: CURRENT_SCHEMA_VERSION,
        samples,
    })
}

/// Entries that are not usable samples are dropped; the rest survive.
fn decode_entries(entries: Vec<Value>) -> Vec<Sample> {
    let total = entries.len();
    let samples: Vec<Sample> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Sample>(entry) {
            Ok(sample) if !sample.id.trim().is_empty() => Some(sample),
            Ok(_) => {
                tracing::warn!(index, "skipping stored sample with empty id");
                None
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping undecodable stored sample");
                None
            }
        })
        .collect();
    if samples.len() < total {
        tracing::debug!(kept = samples.len(), total, "stored entries partially decoded");
    }
    samples
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
