//! Transcript classification results and the incident log.
//!
//! The classification call itself is an external service. This module is the
//! boundary: whatever comes back (a JSON object, a half-filled object, or an
//! error) is turned into a well-formed [`Classification`] and never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use tracing::warn;

use crate::services::llm::ServiceError;

pub const ADJUSTMENT_MIN: i32 = -20;
pub const ADJUSTMENT_MAX: i32 = 50;

pub const FAILED_REASON: &str = "Analysis failed.";
pub const MISSING_REASON: &str = "No specific reason provided.";

/// Seconds the threat banner stays up before reverting to monitoring.
pub const THREAT_DISPLAY_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub is_aggressive: bool,
    /// 0.0 - 1.0
    pub severity: f64,
    pub reason: String,
    /// Burnout delta, -20 ..= 50.
    pub stress_adjustment: i32,
}

impl Classification {
    /// The no-op result substituted whenever the service call fails.
    pub fn failed() -> Self {
        Self {
            is_aggressive: false,
            severity: 0.0,
            reason: FAILED_REASON.to_string(),
            stress_adjustment: 0,
        }
    }

    /// Reads a service response field by field; anything missing or of the
    /// wrong type falls back to its own default without spoiling the rest.
    pub fn from_json(value: &Value) -> Self {
        let is_aggressive = value
            .get("isAggressive")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let severity = value
            .get("severity")
            .and_then(Value::as_f64)
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(0.0, 1.0))
            .unwrap_or(0.0);

        let reason = value
            .get("reason")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(MISSING_REASON)
            .to_string();

        let stress_adjustment = value
            .get("stressAdjustment")
            .and_then(|v| {
                v.as_i64()
                    .or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
            })
            .map(|a| a.clamp(i64::from(ADJUSTMENT_MIN), i64::from(ADJUSTMENT_MAX)) as i32)
            .unwrap_or(0);

        Self {
            is_aggressive,
            severity,
            reason,
            stress_adjustment,
        }
    }

    /// Gateway conversion. Never propagates the failure.
    pub fn from_service(outcome: Result<Value, ServiceError>) -> Self {
        match outcome {
            Ok(value) if value.is_object() => Self::from_json(&value),
            Ok(other) => {
                warn!("Classification response was not an object: {}", other);
                Self::failed()
            }
            Err(e) => {
                warn!("Classification failed: {}", e);
                Self::failed()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WitnessStatus {
    #[default]
    Monitoring,
    ThreatDetected,
}

impl WitnessStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WitnessStatus::Monitoring => "MONITORING",
            WitnessStatus::ThreatDetected => "THREAT DETECTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    pub quote: String,
    pub reason: String,
}

/// Append-only, newest first.
#[derive(Debug, Clone, Default)]
pub struct IncidentLog {
    entries: VecDeque<Incident>,
}

impl IncidentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, incident: Incident) {
        self.entries.push_front(incident);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Incident> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Incident> {
        self.entries.iter()
    }
}
