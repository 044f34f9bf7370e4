//! Compile-Validate-Repair loop
//!
//! A rendered component is written to a scratch file and handed to the
//! compiler. On failure the code repair oracle gets the full source plus the
//! diagnostic and answers with a full replacement, which is compiled again.
//! The number of repair rounds is bounded by [`RepairLoopConfig::repair_budget`],
//! so a component is compiled at most `repair_budget + 1` times.
//!
//! ```text
//! Rendered -> Compiling -> Valid
//!                       -> Invalid -> Repairing -> Rendered -> Compiling ...
//!                                  -> Failed (budget exhausted)
//! ```

mod loop_impl;

pub use loop_impl::CompileRepairLoop;

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Repair rounds allowed after the first compile
pub const DEFAULT_REPAIR_BUDGET: u32 = 2;

/// Per-attempt compile timeout
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sub-directory of the scratch directory used for candidates
pub const DEFAULT_SCRATCH_NAMESPACE: &str = "uiforge";

/// Compiler feedback for one failed attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileDiagnostic {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_excerpt: Option<String>,
}

impl CompileDiagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source_excerpt: None,
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.source_excerpt = Some(excerpt.into());
        self
    }
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Verdict of one compiler invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompileOutcome {
    Valid,
    Invalid(CompileDiagnostic),
}

impl CompileOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, CompileOutcome::Valid)
    }
}

/// Loop parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairLoopConfig {
    pub scratch_dir: PathBuf,
    pub scratch_namespace: String,
    pub repair_budget: u32,
    #[serde(with = "duration_secs")]
    pub attempt_timeout: Duration,
}

impl Default for RepairLoopConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            scratch_namespace: DEFAULT_SCRATCH_NAMESPACE.to_string(),
            repair_budget: DEFAULT_REPAIR_BUDGET,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl RepairLoopConfig {
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn with_scratch_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.scratch_namespace = namespace.into();
        self
    }

    pub fn with_repair_budget(mut self, budget: u32) -> Self {
        self.repair_budget = budget;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Directory that receives scratch candidates
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_dir.join(&self.scratch_namespace)
    }

    pub fn max_compile_attempts(&self) -> u32 {
        self.repair_budget.saturating_add(1)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

/// Loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    Rendered,
    Compiling,
    Valid,
    Invalid,
    Repairing,
    Failed,
}

impl LoopState {
    pub fn can_transition_to(self, next: LoopState) -> bool {
        use LoopState::*;
        matches!(
            (self, next),
            (Rendered, Compiling)
                | (Compiling, Valid)
                | (Compiling, Invalid)
                | (Invalid, Repairing)
                | (Invalid, Failed)
                | (Repairing, Rendered)
                | (Repairing, Repairing)
                | (Repairing, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LoopState::Valid | LoopState::Failed)
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One compile attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based
    pub attempt: u32,
    pub started_at: Timestamp,
    pub duration_ms: u64,
    /// Blake3 hex digest of the compiled candidate
    pub source_hash: String,
    /// `None` when the attempt compiled cleanly
    pub diagnostic: Option<CompileDiagnostic>,
}

impl AttemptRecord {
    pub fn is_valid(&self) -> bool {
        self.diagnostic.is_none()
    }
}

/// Successful loop result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairOutcome {
    /// Source that passed the compiler
    pub source: String,
    pub compile_attempts: u32,
    pub repairs_used: u32,
    pub history: Vec<AttemptRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        assert!(LoopState::Rendered.can_transition_to(LoopState::Compiling));
        assert!(LoopState::Compiling.can_transition_to(LoopState::Invalid));
        assert!(LoopState::Invalid.can_transition_to(LoopState::Repairing));
        assert!(LoopState::Repairing.can_transition_to(LoopState::Rendered));
        assert!(!LoopState::Rendered.can_transition_to(LoopState::Valid));
        assert!(!LoopState::Valid.can_transition_to(LoopState::Compiling));
        assert!(!LoopState::Failed.can_transition_to(LoopState::Repairing));
        assert!(LoopState::Failed.is_terminal());
    }

    #[test]
    fn test_config_defaults() {
        let config = RepairLoopConfig::default();
        assert_eq!(config.repair_budget, 2);
        assert_eq!(config.max_compile_attempts(), 3);
        assert_eq!(config.attempt_timeout, Duration::from_secs(60));
        assert!(config.scratch_root().ends_with("uiforge"));
    }

    #[test]
    fn test_config_serde_uses_seconds() {
        let config = RepairLoopConfig::default()
            .with_scratch_dir("/tmp/scratch")
            .with_repair_budget(4)
            .with_attempt_timeout(Duration::from_secs(5));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["attempt_timeout"], 5);

        let back: RepairLoopConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = CompileDiagnostic::new("Unexpected token").with_excerpt("line 3");
        assert_eq!(diag.to_string(), "Unexpected token");
        assert_eq!(diag.source_excerpt.as_deref(), Some("line 3"));
    }
}
