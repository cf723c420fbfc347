//! Host-facing engine handle for Rust callers.
//!
//! The FFI surface in the crate root serves foreign hosts; Rust hosts hold an
//! explicit [`Engine`] created once at startup instead of reaching for
//! ambient global state. Every method returns an owned `String` (the simplest
//! form of the buffer contract) and runs the CPU-bound work on the blocking
//! pool under the configured timeout budget, so a cooperative scheduler
//! driving many conversations is never blocked by a slow call.
//!
//! A handle can be constructed unavailable. In that mode every operation
//! degrades to an `ErrorPayload` instead of raising, mirroring how a foreign
//! host behaves when the native library cannot be loaded.

use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};

use crate::codec;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::logging::{json_log, log, obj, v_num, v_str, Domain, Level};
use crate::{crypto, data, realtime, text};

pub struct Engine {
    cfg: Arc<EngineConfig>,
    available: bool,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        let available = !cfg.disabled;
        json_log(
            Domain::System,
            "engine_init",
            obj(&[
                ("available", v_str(if available { "true" } else { "false" })),
                ("timeout_ms", v_num(cfg.timeout_ms as f64)),
                ("max_input_bytes", v_num(cfg.max_input_bytes as f64)),
            ]),
        );
        Self { cfg: Arc::new(cfg), available }
    }

    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }

    /// A handle whose every call degrades to an error payload.
    pub fn unavailable() -> Self {
        let mut cfg = EngineConfig::default();
        cfg.disabled = true;
        Self::new(cfg)
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Run one operation on the blocking pool under the timeout budget. An
    /// elapsed budget surfaces as a timeout payload; the abandoned worker's
    /// buffer is dropped when the task finishes, nothing leaks into later
    /// calls.
    async fn run<F>(&self, op: &'static str, body: F) -> String
    where
        F: FnOnce() -> Result<String, EngineError> + Send + 'static,
    {
        if !self.available {
            let err = EngineError::unavailable();
            log(Level::Warn, Domain::Gateway, "call", obj(&[("op", v_str(op)), ("status", v_str(err.kind.as_str()))]));
            return err.to_payload();
        }

        let budget = Duration::from_millis(self.cfg.timeout_ms);
        let started = Instant::now();
        let result = match timeout(budget, tokio::task::spawn_blocking(body)).await {
            Err(_) => Err(EngineError::timeout(self.cfg.timeout_ms)),
            Ok(Err(_)) => Err(EngineError::validation("internal error: worker panicked")),
            Ok(Ok(r)) => r,
        };
        let elapsed_ms = started.elapsed().as_millis() as f64;

        match result {
            Ok(payload) => {
                json_log(
                    Domain::Gateway,
                    "call",
                    obj(&[("op", v_str(op)), ("status", v_str("ok")), ("ms", v_num(elapsed_ms))]),
                );
                payload
            }
            Err(err) => {
                log(
                    Level::Warn,
                    Domain::Gateway,
                    "call",
                    obj(&[
                        ("op", v_str(op)),
                        ("status", v_str(err.kind.as_str())),
                        ("ms", v_num(elapsed_ms)),
                    ]),
                );
                err.to_payload()
            }
        }
    }

    pub async fn analyze_text(&self, input: String) -> String {
        let cfg = self.cfg.clone();
        self.run("analyze_text", move || {
            codec::check_input_len(&input, &cfg)?;
            codec::json_out(&text::analyze_text(&input))
        })
        .await
    }

    pub async fn encrypt_message(&self, message: String, key: Option<String>) -> String {
        let cfg = self.cfg.clone();
        self.run("encrypt_message", move || {
            codec::check_input_len(&message, &cfg)?;
            let key = key.unwrap_or_else(|| cfg.default_key.clone());
            crypto::encrypt(&message, &key)
        })
        .await
    }

    pub async fn decrypt_message(&self, ciphertext: String, key: Option<String>) -> String {
        let cfg = self.cfg.clone();
        self.run("decrypt_message", move || {
            codec::check_input_len(&ciphertext, &cfg)?;
            let key = key.unwrap_or_else(|| cfg.default_key.clone());
            crypto::decrypt(&ciphertext, &key)
        })
        .await
    }

    pub async fn process_event(&self, event_json: String) -> String {
        let cfg = self.cfg.clone();
        self.run("process_event", move || {
            codec::check_input_len(&event_json, &cfg)?;
            codec::json_out(&realtime::process_event(&event_json, &cfg)?)
        })
        .await
    }

    pub async fn analyze_data(&self, series: String) -> String {
        let cfg = self.cfg.clone();
        self.run("analyze_data", move || {
            codec::check_input_len(&series, &cfg)?;
            codec::json_out(&data::analyze_data(&series, &cfg)?)
        })
        .await
    }
}
