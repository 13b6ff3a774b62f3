//! Reply envelopes from the simulator bridge
//!
//! The bridge answers every script with `{"status": ..., "output"?: ..., "error"?: ...}`.
//! [`decode`] turns the raw reply text into a [`Decoded`] value. Empty replies and
//! replies that are not JSON are normal outcomes here, not errors.

use serde_json::{Value, json};

/// Message used when the reply carried no bytes at all
pub const NO_OUTPUT_MESSAGE: &str = "Operation completed (no output)";

/// Message used when the reply was ok but had no `output`
pub const COMPLETED_MESSAGE: &str = "Operation completed successfully";

/// Placeholder when a failed reply has no `error` text
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Status value the bridge uses for a successful run
const STATUS_OK: &str = "ok";

/// Why a reply needed a synthesized envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// Reply was empty or whitespace only
    Empty,
    /// Reply was not valid JSON
    NotJson,
}

/// Outcome of decoding one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// `status == "ok"` with non-empty output, returned verbatim
    ///
    /// Output that is not a string is returned as its JSON text.
    Success(String),
    /// Locally built success envelope
    SynthesizedSuccess {
        text: String,
        anomaly: Option<Anomaly>,
    },
    /// Non-ok status with the peer's error text
    ProtocolFailure(String),
}

impl Decoded {
    /// Text handed to the caller for successful outcomes
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success(text) | Self::SynthesizedSuccess { text, .. } => Some(text),
            Self::ProtocolFailure(_) => None,
        }
    }
}

/// Build a `{"status": "success", "message": ...}` envelope
pub fn success_envelope(message: &str) -> String {
    json!({ "status": "success", "message": message }).to_string()
}

/// Decode a raw reply according to the normalization policy
pub fn decode(raw: &str) -> Decoded {
    if raw.trim().is_empty() {
        return Decoded::SynthesizedSuccess {
            text: success_envelope(NO_OUTPUT_MESSAGE),
            anomaly: Some(Anomaly::Empty),
        };
    }

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => {
            return Decoded::SynthesizedSuccess {
                text: success_envelope(raw),
                anomaly: Some(Anomaly::NotJson),
            };
        }
    };

    // An ok status wins whatever the other fields hold
    if value.get("status").and_then(Value::as_str) != Some(STATUS_OK) {
        let error = match value.get("error") {
            Some(Value::String(e)) if !e.is_empty() => e.clone(),
            None | Some(Value::Null | Value::String(_)) => UNKNOWN_ERROR.to_string(),
            Some(other) => other.to_string(),
        };
        return Decoded::ProtocolFailure(error);
    }

    match value.get("output") {
        Some(Value::String(output)) if !output.is_empty() => Decoded::Success(output.clone()),
        None | Some(Value::Null | Value::String(_)) => completed(),
        Some(other) => Decoded::Success(other.to_string()),
    }
}

fn completed() -> Decoded {
    Decoded::SynthesizedSuccess {
        text: success_envelope(COMPLETED_MESSAGE),
        anomaly: None,
    }
}

/// Ensure the payload ends in exactly one newline
pub fn normalize_payload(payload: &str) -> String {
    let mut normalized = payload.trim_end_matches('\n').to_string();
    normalized.push('\n');
    normalized
}
