//! Buffer/codec layer for the FFI boundary.
//!
//! Owns the conversion rules between caller byte buffers and the engine's
//! UTF-8 strings: NUL termination, encoding validation, the input length cap,
//! and JSON payload serialization. Nothing past this layer ever sees a raw
//! pointer or invalid UTF-8.

use serde::Serialize;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Reject input over the configured cap. Oversize input is an error, never a
/// silent truncation.
pub fn check_input_len(input: &str, cfg: &EngineConfig) -> Result<(), EngineError> {
    if input.len() > cfg.max_input_bytes {
        return Err(EngineError::validation(format!(
            "input of {} bytes exceeds the {}-byte limit",
            input.len(),
            cfg.max_input_bytes
        )));
    }
    Ok(())
}

/// Borrow a caller buffer as validated UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated buffer that outlives the
/// returned borrow.
pub unsafe fn str_in<'a>(ptr: *const c_char, cfg: &EngineConfig) -> Result<&'a str, EngineError> {
    if ptr.is_null() {
        return Err(EngineError::validation("null input pointer"));
    }
    let bytes = CStr::from_ptr(ptr).to_bytes();
    let input = std::str::from_utf8(bytes)
        .map_err(|_| EngineError::validation("input is not valid UTF-8"))?;
    check_input_len(input, cfg)?;
    Ok(input)
}

/// Optional second buffer. Null is "not supplied", anything else follows the
/// same rules as `str_in`.
///
/// # Safety
/// Same contract as `str_in`.
pub unsafe fn opt_str_in<'a>(
    ptr: *const c_char,
    cfg: &EngineConfig,
) -> Result<Option<&'a str>, EngineError> {
    if ptr.is_null() {
        return Ok(None);
    }
    str_in(ptr, cfg).map(Some)
}

/// Hand a fresh engine-owned buffer to the caller. The caller releases it via
/// `free_string`; the engine never reuses or shares returned buffers.
pub fn str_out(payload: String) -> Result<*mut c_char, EngineError> {
    CString::new(payload)
        .map(CString::into_raw)
        .map_err(|_| EngineError::validation("output contains an interior NUL byte"))
}

/// Error payloads transport through the same owned-buffer convention.
/// serde_json escapes control characters, so the encoded payload itself can
/// never contain an interior NUL.
pub fn error_out(err: &EngineError) -> *mut c_char {
    match CString::new(err.to_payload()) {
        Ok(s) => s.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

pub fn json_out<T: Serialize>(value: &T) -> Result<String, EngineError> {
    serde_json::to_string(value)
        .map_err(|e| EngineError::validation(format!("serialization failed: {}", e)))
}
