//! chatproc — native processing engine for a chat front-end.
//!
//! Five synchronous, stateless, string-in/string-out operations are exposed
//! over a C ABI: text analysis, encrypt, decrypt, event scoring, and series
//! analysis. Rust hosts embed the engine directly through [`gateway::Engine`].
//!
//! Calling convention:
//! - Inputs are NUL-terminated UTF-8 buffers. Invalid UTF-8, oversize input,
//!   or a null required pointer yields an `{"error": "..."}` payload, never
//!   undefined behavior.
//! - Every call returns a freshly allocated buffer owned by the engine until
//!   the caller releases it with [`free_string`]. Buffers are never shared or
//!   reused across calls, so concurrent callers are safe.
//! - Failures are returned as data. No operation panics across the boundary
//!   or aborts the host process.
//!
//! The engine holds no state between invocations beyond the immutable
//! configuration read from the environment at first use.

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

mod codec;
pub mod config;
pub mod crypto;
pub mod data;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod realtime;
pub mod text;

use error::EngineError;
use logging::{json_log, log, obj, v_num, v_str, Domain, Level};

/// Common wrapper for every entry point: degraded-mode check, panic
/// containment, outcome logging, and error-payload conversion.
fn run_op(op: &'static str, body: impl FnOnce() -> Result<String, EngineError>) -> *mut c_char {
    let started = Instant::now();
    let result = if config::global().disabled {
        Err(EngineError::unavailable())
    } else {
        catch_unwind(AssertUnwindSafe(body))
            .unwrap_or_else(|_| Err(EngineError::validation("internal error: engine panicked")))
    };
    let elapsed_ms = started.elapsed().as_millis() as f64;

    match result {
        Ok(payload) => match codec::str_out(payload) {
            Ok(ptr) => {
                json_log(
                    Domain::Gateway,
                    "call",
                    obj(&[("op", v_str(op)), ("status", v_str("ok")), ("ms", v_num(elapsed_ms))]),
                );
                ptr
            }
            Err(err) => fail_op(op, &err, elapsed_ms),
        },
        Err(err) => fail_op(op, &err, elapsed_ms),
    }
}

fn fail_op(op: &'static str, err: &EngineError, elapsed_ms: f64) -> *mut c_char {
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
    codec::error_out(err)
}

/// `analyze_text(text) -> json(TextStats)`
#[no_mangle]
pub extern "C" fn analyze_text(text: *const c_char) -> *mut c_char {
    run_op("analyze_text", || {
        let cfg = config::global();
        let input = unsafe { codec::str_in(text, cfg) }?;
        codec::json_out(&text::analyze_text(input))
    })
}

/// `encrypt_message(text, key?) -> ciphertext string`. A null key selects the
/// configured default key.
#[no_mangle]
pub extern "C" fn encrypt_message(message: *const c_char, key: *const c_char) -> *mut c_char {
    run_op("encrypt_message", || {
        let cfg = config::global();
        let input = unsafe { codec::str_in(message, cfg) }?;
        let key = unsafe { codec::opt_str_in(key, cfg) }?.unwrap_or(cfg.default_key.as_str());
        crypto::encrypt(input, key)
    })
}

/// `decrypt_message(ciphertext, key?) -> plaintext string | error payload`.
#[no_mangle]
pub extern "C" fn decrypt_message(ciphertext: *const c_char, key: *const c_char) -> *mut c_char {
    run_op("decrypt_message", || {
        let cfg = config::global();
        let input = unsafe { codec::str_in(ciphertext, cfg) }?;
        let key = unsafe { codec::opt_str_in(key, cfg) }?.unwrap_or(cfg.default_key.as_str());
        crypto::decrypt(input, key)
    })
}

/// `process_event(event_json) -> json(RealtimeScore)`
#[no_mangle]
pub extern "C" fn process_event(event_json: *const c_char) -> *mut c_char {
    run_op("process_event", || {
        let cfg = config::global();
        let input = unsafe { codec::str_in(event_json, cfg) }?;
        codec::json_out(&realtime::process_event(input, cfg)?)
    })
}

/// `analyze_data(series_text) -> json(DataStats)`
#[no_mangle]
pub extern "C" fn analyze_data(series: *const c_char) -> *mut c_char {
    run_op("analyze_data", || {
        let cfg = config::global();
        let input = unsafe { codec::str_in(series, cfg) }?;
        codec::json_out(&data::analyze_data(input, cfg)?)
    })
}

/// Release a buffer previously returned by any engine operation. Every
/// producing call pairs with exactly one `free_string`; a null pointer is a
/// no-op.
#[no_mangle]
pub extern "C" fn free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}
