//! External collaborators of the core
//!
//! The core never talks to a model or a compiler directly. Generative steps
//! (IR synthesis, IR repair, code repair) and the type-checker are reached
//! through these traits so they can be swapped for test doubles.

use crate::error::OracleError;
use crate::repair::{CompileDiagnostic, CompileOutcome};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input of the IR Synthesis Oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub component_name: String,
    pub user_request: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

impl SynthesisRequest {
    pub fn new(component_name: impl Into<String>, user_request: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            user_request: user_request.into(),
            requirements: Vec::new(),
        }
    }

    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirements.push(requirement.into());
        self
    }
}

/// Produces IR JSON text from a request. The output is untrusted.
#[async_trait]
pub trait IrSynthesisOracle: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, OracleError>;
}

/// Repairs IR JSON given the ordered validation errors. Called at most once per IR.
#[async_trait]
pub trait IrRepairOracle: Send + Sync {
    async fn repair_ir(&self, raw_json: &str, errors: &[String]) -> Result<String, OracleError>;
}

/// Returns a full replacement for source that failed to compile.
#[async_trait]
pub trait CodeRepairOracle: Send + Sync {
    async fn repair_code(
        &self,
        source: &str,
        diagnostic: &CompileDiagnostic,
    ) -> Result<String, OracleError>;
}

/// Type-checks a component written to `scratch_path`.
///
/// `Err` means the checker itself could not run; the loop treats that as a
/// failed attempt.
#[async_trait]
pub trait CompilerInvoker: Send + Sync {
    async fn check(&self, scratch_path: &Path) -> Result<CompileOutcome, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_request_builder() {
        let request = SynthesisRequest::new("PricingTable", "three tiers")
            .with_requirement("monthly toggle")
            .with_requirement("highlight middle tier");

        assert_eq!(request.component_name, "PricingTable");
        assert_eq!(request.requirements.len(), 2);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["user_request"], "three tiers");
    }
}
