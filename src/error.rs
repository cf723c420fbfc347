//! Error kinds surfaced to callers as `ErrorPayload` values.
//!
//! The engine never aborts the host process: every failure is converted to a
//! well-formed `{"error": "..."}` JSON object at the module boundary and
//! returned as data. Callers check for the `error` key before consuming any
//! other field.

use serde_json::json;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Engine not loaded or explicitly disabled; every operation degrades.
    Unavailable,
    /// Invalid encoding, oversized input, or malformed schema.
    Validation,
    /// Non-numeric tokens in strict mode, malformed JSON envelope.
    Parse,
    /// Integrity check failure on decrypt, malformed ciphertext encoding.
    Crypto,
    /// Operation exceeded its budget (enforced by the host gateway).
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Validation => "validation",
            ErrorKind::Parse => "parse",
            ErrorKind::Crypto => "crypto",
            ErrorKind::Timeout => "timeout",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EngineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn unavailable() -> Self {
        Self::new(ErrorKind::Unavailable, "engine unavailable")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn crypto(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Crypto, message)
    }

    pub fn timeout(budget_ms: u64) -> Self {
        Self::new(ErrorKind::Timeout, format!("operation exceeded {}ms budget", budget_ms))
    }

    /// Serialize as the `ErrorPayload` wire shape.
    pub fn to_payload(&self) -> String {
        json!({ "error": format!("{}: {}", self.kind.as_str(), self.message) }).to_string()
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let err = EngineError::validation("input is not valid UTF-8");
        let v: serde_json::Value = serde_json::from_str(&err.to_payload()).unwrap();
        let msg = v["error"].as_str().unwrap();
        assert!(msg.starts_with("validation:"));
        assert!(msg.contains("UTF-8"));
    }

    #[test]
    fn test_kind_tags_are_stable() {
        assert_eq!(ErrorKind::Crypto.as_str(), "crypto");
        assert_eq!(ErrorKind::Timeout.as_str(), "timeout");
        assert_eq!(ErrorKind::Unavailable.as_str(), "unavailable");
    }
}
