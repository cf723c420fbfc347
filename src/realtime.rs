//! Event scoring: validate a structured event envelope and derive synthetic
//! throughput/latency/quality figures from it.
//!
//! Scoring is a pure function of the envelope. No wall clock, no cross-call
//! counters, no stream state; the same event always scores the same. Callers
//! wanting genuine streaming semantics need a different system.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::error::EngineError;

#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeEvent {
    pub timestamp: f64,
    pub user_id: u64,
    pub data_type: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct RealtimeScore {
    pub status: String,
    /// Synthetic throughput, ops/sec. Positive for ok/degraded scores.
    pub processing_speed: f64,
    /// Synthetic latency in ms, derived from envelope size.
    pub latency: f64,
    /// Clamped to [0.0, 1.0].
    pub quality: f64,
}

pub fn process_event(event_json: &str, cfg: &EngineConfig) -> Result<RealtimeScore, EngineError> {
    let event: RealtimeEvent = serde_json::from_str(event_json)
        .map_err(|e| EngineError::parse(format!("malformed event envelope: {}", e)))?;
    Ok(score_event(&event, cfg))
}

pub fn score_event(event: &RealtimeEvent, cfg: &EngineConfig) -> RealtimeScore {
    let content_len = event.content.chars().count();

    // Envelope validation beyond schema shape: a non-finite timestamp or
    // over-bound content is an error score, not a crash.
    if !event.timestamp.is_finite() || content_len > cfg.hard_content_limit {
        return RealtimeScore {
            status: "error".to_string(),
            processing_speed: 0.0,
            latency: 0.0,
            quality: 0.0,
        };
    }

    let diversity = char_diversity(&event.content);
    let type_weight = match event.data_type.as_str() {
        "text" | "telegram_message" => 1.0,
        "numeric" | "numeric_data" => 1.2,
        _ => 0.9,
    };

    let latency = 1.0 + content_len as f64 / 256.0;
    let processing_speed = (1000.0 / latency) * (0.5 + 0.5 * diversity) * type_weight;
    let quality = (0.3 + 0.7 * diversity).clamp(0.0, 1.0);
    let status = if content_len > cfg.soft_content_limit { "degraded" } else { "ok" };

    RealtimeScore {
        status: status.to_string(),
        processing_speed,
        latency,
        quality,
    }
}

/// Distinct scalars over total scalars; 0.0 for empty content.
fn char_diversity(content: &str) -> f64 {
    let total = content.chars().count();
    if total == 0 {
        return 0.0;
    }
    let distinct = content.chars().collect::<HashSet<char>>().len();
    distinct as f64 / total as f64
}
