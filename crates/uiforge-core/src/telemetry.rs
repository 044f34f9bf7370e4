//! Per-component telemetry
//!
//! Nothing is persisted: a record is logged with `tracing::info!` and handed
//! back to the caller, who decides where it goes.

use crate::oracle::SynthesisRequest;
use crate::types::{now, ContentHash, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the IR that reached the renderer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrOrigin {
    /// Synthesis output validated as-is
    Synthesized,
    /// Validated after the single IR repair round-trip
    Repaired,
    /// Minimal skeleton after synthesis and repair both failed
    Fallback,
}

impl fmt::Display for IrOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IrOrigin::Synthesized => "synthesized",
            IrOrigin::Repaired => "repaired",
            IrOrigin::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub component_name: String,
    /// Blake3 hex digest of the request (name, text, requirements)
    pub request_hash: String,
    /// Blake3 hex digest of the final source
    pub output_hash: String,
    pub ir_score: f64,
    /// Compile attempts spent by the repair loop
    pub attempts_used: u32,
    pub ir_origin: IrOrigin,
    pub recorded_at: Timestamp,
}

impl TelemetryRecord {
    pub fn new(
        request: &SynthesisRequest,
        component_name: impl Into<String>,
        final_source: &str,
        ir_score: f64,
        attempts_used: u32,
        ir_origin: IrOrigin,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            request_hash: request_hash(request),
            output_hash: ContentHash::of(final_source).to_hex(),
            ir_score,
            attempts_used,
            ir_origin,
            recorded_at: now(),
        }
    }

    /// Log the record at info level.
    pub fn emit(&self) {
        tracing::info!(
            component = %self.component_name,
            request_hash = %self.request_hash,
            output_hash = %self.output_hash,
            ir_score = self.ir_score,
            attempts_used = self.attempts_used,
            ir_origin = %self.ir_origin,
            "Component generated"
        );
    }
}

/// Stable digest of a synthesis request
pub fn request_hash(request: &SynthesisRequest) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(request.component_name.as_bytes());
    hasher.update(&[0]);
    hasher.update(request.user_request.as_bytes());
    for requirement in &request.requirements {
        hasher.update(&[0]);
        hasher.update(requirement.as_bytes());
    }
    ContentHash::from(hasher.finalize()).to_hex()
}
