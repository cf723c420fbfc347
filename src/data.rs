//! Descriptive statistics, rule-based pattern flags, z-score anomaly
//! detection, and a naive one-step forecast over a delimited numeric series.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Values whose |z| exceeds this are flagged as outliers.
pub const Z_THRESHOLD: f64 = 2.0;
/// Trailing window for the linear extrapolation.
const PREDICTION_WINDOW: usize = 16;

#[derive(Debug, Serialize)]
pub struct Anomaly {
    /// Position in the token stream, in input order.
    pub index: usize,
    /// Parsed value for outliers; null for tokens that failed conversion.
    pub value: Option<f64>,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct DataStats {
    pub record_count: usize,
    pub mean: Option<f64>,
    /// Sample (n-1) standard deviation; null when fewer than two records.
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub patterns: Vec<String>,
    pub anomalies: Vec<Anomaly>,
    pub prediction: Option<f64>,
}

impl DataStats {
    fn empty(anomalies: Vec<Anomaly>) -> Self {
        Self {
            record_count: 0,
            mean: None,
            std_dev: None,
            min: None,
            max: None,
            patterns: Vec::new(),
            anomalies,
            prediction: None,
        }
    }
}

/// Tokens split on commas and whitespace. Permissive mode (default) skips
/// unparseable tokens and flags each one; strict mode fails the call on the
/// first bad token.
pub fn analyze_data(series: &str, cfg: &EngineConfig) -> Result<DataStats, EngineError> {
    let mut values: Vec<(usize, f64)> = Vec::new();
    let mut anomalies: Vec<Anomaly> = Vec::new();

    let tokens = series
        .split([',', ' ', '\n', '\t', '\r'])
        .filter(|t| !t.is_empty());
    for (index, token) in tokens.enumerate() {
        match token.parse::<f64>() {
            Ok(v) if v.is_finite() => values.push((index, v)),
            _ if cfg.strict_numeric => {
                return Err(EngineError::parse(format!(
                    "token {} is not numeric: {:?}",
                    index, token
                )));
            }
            _ => anomalies.push(Anomaly {
                index,
                value: None,
                kind: "invalid_token".to_string(),
            }),
        }
    }

    if values.is_empty() {
        return Ok(DataStats::empty(anomalies));
    }

    let record_count = values.len();
    let series: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
    let n = record_count as f64;
    let mean = series.iter().sum::<f64>() / n;
    let std_dev = if record_count >= 2 {
        let m2 = series.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        Some((m2 / (n - 1.0)).sqrt())
    } else {
        None
    };
    let min = series.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = series.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if let Some(sd) = std_dev {
        if sd > 0.0 {
            for (index, v) in &values {
                if ((v - mean) / sd).abs() > Z_THRESHOLD {
                    anomalies.push(Anomaly {
                        index: *index,
                        value: Some(*v),
                        kind: "outlier".to_string(),
                    });
                }
            }
        }
    }
    anomalies.sort_by_key(|a| a.index);

    Ok(DataStats {
        record_count,
        mean: Some(mean),
        std_dev,
        min: Some(min),
        max: Some(max),
        patterns: detect_patterns(&series),
        anomalies,
        prediction: predict_next(&series),
    })
}

/// Rule-based flags from a closed tag set. Not a classifier: each rule is a
/// direct structural check on the series.
fn detect_patterns(series: &[f64]) -> Vec<String> {
    let mut patterns = Vec::new();
    if series.len() < 2 {
        return patterns;
    }

    let pairs = series.len() - 1;
    let increasing = series.windows(2).filter(|w| w[1] > w[0]).count();
    let decreasing = series.windows(2).filter(|w| w[1] < w[0]).count();

    if increasing == 0 && decreasing == 0 {
        patterns.push("constant".to_string());
        return patterns;
    }

    if increasing == pairs {
        patterns.push("monotonic_increasing".to_string());
    } else if decreasing == pairs {
        patterns.push("monotonic_decreasing".to_string());
    } else if increasing * 4 > pairs * 3 {
        patterns.push("trending_up".to_string());
    } else if decreasing * 4 > pairs * 3 {
        patterns.push("trending_down".to_string());
    }

    if detect_period(series).is_some() {
        patterns.push("periodic".to_string());
    }

    let mean_step = series.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f64>() / pairs as f64;
    let mean_abs = series.iter().map(|x| x.abs()).sum::<f64>() / series.len() as f64;
    if mean_step > mean_abs {
        patterns.push("high_volatility".to_string());
    }

    patterns
}

/// Smallest period p in 2..=8 for which the series repeats exactly (within a
/// relative tolerance) across its whole length.
fn detect_period(series: &[f64]) -> Option<usize> {
    if series.len() < 4 {
        return None;
    }
    for p in 2..=8.min(series.len() / 2) {
        let repeats = (0..series.len() - p).all(|i| {
            let scale = series[i].abs().max(series[i + p].abs()).max(1.0);
            (series[i] - series[i + p]).abs() <= 1e-9 * scale
        });
        if repeats {
            return Some(p);
        }
    }
    None
}

/// Least-squares linear fit over the trailing window, extrapolated one step.
fn predict_next(series: &[f64]) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let window = &series[series.len().saturating_sub(PREDICTION_WINDOW)..];
    let n = window.len() as f64;
    let sum_x: f64 = (0..window.len()).map(|i| i as f64).sum();
    let sum_y: f64 = window.iter().sum();
    let sum_xy: f64 = window.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_x2: f64 = (0..window.len()).map(|i| (i as f64).powi(2)).sum();

    let denom = n * sum_x2 - sum_x * sum_x;
    if denom == 0.0 {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(intercept + slope * n)
}
