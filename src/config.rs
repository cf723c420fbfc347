//! Engine configuration, read once from the environment at initialization and
//! immutable for the process lifetime.

use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Key used when the caller supplies none. Deployments override this via
    /// DEFAULT_KEY; the built-in value exists so the engine works out of the
    /// box and is not a secret.
    pub default_key: String,
    /// Hard cap on any input buffer, in bytes. Oversize input is rejected with
    /// a validation error, never truncated.
    pub max_input_bytes: usize,
    /// Event content above this length scores "degraded".
    pub soft_content_limit: usize,
    /// Event content above this length fails envelope validation.
    pub hard_content_limit: usize,
    /// Per-operation budget enforced by the host gateway.
    pub timeout_ms: u64,
    /// Strict numeric parsing: a bad series token is a parse error instead of
    /// a skipped-and-flagged anomaly.
    pub strict_numeric: bool,
    /// Forces every operation to report unavailable. Models the missing-library
    /// fallback for in-process callers.
    pub disabled: bool,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            default_key: std::env::var("DEFAULT_KEY").unwrap_or_else(|_| "default_key".to_string()),
            max_input_bytes: std::env::var("MAX_INPUT_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(65536),
            soft_content_limit: std::env::var("SOFT_CONTENT_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(2048),
            hard_content_limit: std::env::var("HARD_CONTENT_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(16384),
            timeout_ms: std::env::var("TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(30_000),
            strict_numeric: std::env::var("STRICT_NUMERIC")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            disabled: std::env::var("ENGINE_DISABLED")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_key: "default_key".to_string(),
            max_input_bytes: 65536,
            soft_content_limit: 2048,
            hard_content_limit: 16384,
            timeout_ms: 30_000,
            strict_numeric: false,
            disabled: false,
        }
    }
}

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Process-wide config for the FFI surface. First access wins; later env
/// mutations are ignored.
pub fn global() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::from_env)
}
