//! End-to-end exercise of the C ABI surface: same entry points a foreign host
//! binds, called in-process.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use chatproc::{analyze_data, analyze_text, decrypt_message, encrypt_message, free_string, process_event};
use serde_json::Value;

/// Copy the engine's buffer out and release it, the way a foreign caller must.
fn take(ptr: *mut c_char) -> String {
    assert!(!ptr.is_null(), "engine returned a null buffer");
    let out = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
    free_string(ptr);
    out
}

fn c(s: &str) -> CString {
    CString::new(s).unwrap()
}

#[test]
fn analyze_text_empty_input_boundary() {
    let input = c("");
    let out = take(analyze_text(input.as_ptr()));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["char_count"], 0);
    assert_eq!(v["word_count"], 0);
    assert_eq!(v["sentence_count"], 0);
    assert_eq!(v["sentiment"], "neutral");
    assert_eq!(v["keywords"], Value::Array(vec![]));
    assert!(v["processing_time"].as_u64().unwrap() < 10_000);
}

#[test]
fn analyze_text_all_fields_present() {
    let input = c("Great news everyone. The engine works!");
    let out = take(analyze_text(input.as_ptr()));
    let v: Value = serde_json::from_str(&out).unwrap();
    for field in ["char_count", "word_count", "sentence_count", "language", "sentiment", "keywords", "processing_time"] {
        assert!(v.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(v["language"], "latin");
}

#[test]
fn crypto_round_trip_default_and_explicit_key() {
    let message = c("round trip me");

    // Null key selects the configured default on both sides.
    let ct = take(encrypt_message(message.as_ptr(), std::ptr::null()));
    let ct_buf = c(&ct);
    let pt = take(decrypt_message(ct_buf.as_ptr(), std::ptr::null()));
    assert_eq!(pt, "round trip me");

    let key = c("explicit key");
    let ct = take(encrypt_message(message.as_ptr(), key.as_ptr()));
    let ct_buf = c(&ct);
    let pt = take(decrypt_message(ct_buf.as_ptr(), key.as_ptr()));
    assert_eq!(pt, "round trip me");
}

#[test]
fn tampered_ciphertext_yields_crypto_error() {
    let message = c("integrity matters");
    let ct = take(encrypt_message(message.as_ptr(), std::ptr::null()));

    // Flip one character of the encoded form.
    let mut chars: Vec<char> = ct.chars().collect();
    chars[10] = if chars[10] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();

    let buf = c(&tampered);
    let out = take(decrypt_message(buf.as_ptr(), std::ptr::null()));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert!(v["error"].as_str().unwrap().contains("crypto"));
}

#[test]
fn process_event_rejects_malformed_input() {
    let input = c("not json");
    let out = take(process_event(input.as_ptr()));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert!(v["error"].as_str().unwrap().contains("parse"));
}

#[test]
fn process_event_scores_valid_envelope() {
    let input = c(r#"{"timestamp": 1700000000.5, "user_id": 99, "data_type": "text", "content": "short message"}"#);
    let out = take(process_event(input.as_ptr()));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["status"], "ok");
    assert!(v["processing_speed"].as_f64().unwrap() > 0.0);
    let quality = v["quality"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&quality));
}

#[test]
fn analyze_data_literal_case() {
    let input = c("1,2,3,4,5");
    let out = take(analyze_data(input.as_ptr()));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["record_count"], 5);
    assert_eq!(v["mean"], 3.0);
    assert_eq!(v["min"], 1.0);
    assert_eq!(v["max"], 5.0);
    assert!((v["std_dev"].as_f64().unwrap() - 1.5811).abs() < 1e-3);
}

#[test]
fn analyze_data_empty_series_is_null_not_crash() {
    let input = c("");
    let out = take(analyze_data(input.as_ptr()));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["record_count"], 0);
    assert!(v["mean"].is_null());
    assert!(v["std_dev"].is_null());
    assert!(v["prediction"].is_null());
}

#[test]
fn invalid_utf8_input_is_rejected_as_data() {
    let bytes = CString::new(vec![0xf0, 0x28, 0x8c, 0x28]).unwrap();
    let out = take(analyze_text(bytes.as_ptr()));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert!(v["error"].as_str().unwrap().contains("UTF-8"));
}

#[test]
fn null_required_pointer_is_rejected_as_data() {
    let out = take(analyze_text(std::ptr::null()));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert!(v["error"].as_str().unwrap().contains("validation"));
}

#[test]
fn oversize_input_is_rejected_not_truncated() {
    let big = "x".repeat(70_000); // default cap is 65536 bytes
    let input = c(&big);
    let out = take(analyze_text(input.as_ptr()));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert!(v["error"].as_str().unwrap().contains("validation"));
}

#[test]
fn repeated_calls_do_not_share_buffers() {
    let a_in = c("first call");
    let b_in = c("second call with more words");
    let a_ptr = analyze_text(a_in.as_ptr());
    let b_ptr = analyze_text(b_in.as_ptr());
    assert_ne!(a_ptr, b_ptr);
    let a = take(a_ptr);
    let b = take(b_ptr);
    assert_ne!(a, b);
}
