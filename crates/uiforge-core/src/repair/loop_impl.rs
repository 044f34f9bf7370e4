//! Bounded compile -> diagnose -> repair state machine

use super::{
    AttemptRecord, CompileDiagnostic, CompileOutcome, LoopState, RepairLoopConfig, RepairOutcome,
};
use crate::error::LoopError;
use crate::ir::ComponentName;
use crate::oracle::{CodeRepairOracle, CompilerInvoker};
use crate::text::strip_code_fences;
use crate::types::{now, ContentHash};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Drives one component through compile and repair rounds.
///
/// Attempts are strictly sequential; separate components may run separate
/// loops concurrently since scratch files never collide.
#[derive(Clone)]
pub struct CompileRepairLoop {
    compiler: Arc<dyn CompilerInvoker>,
    repairer: Arc<dyn CodeRepairOracle>,
    config: RepairLoopConfig,
}

impl CompileRepairLoop {
    pub fn new(compiler: Arc<dyn CompilerInvoker>, repairer: Arc<dyn CodeRepairOracle>) -> Self {
        Self {
            compiler,
            repairer,
            config: RepairLoopConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RepairLoopConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RepairLoopConfig {
        &self.config
    }

    /// Compile `source`, repairing it until it passes or the budget runs out.
    ///
    /// A repair round that yields no usable source (oracle error, empty
    /// answer) is still spent; the oracle is never retried outside the budget.
    ///
    /// # Errors
    ///
    /// - [`LoopError::RepairBudgetExhausted`] with the last diagnostic when no
    ///   candidate compiled
    /// - [`LoopError::Scratch`] when the candidate cannot be written to disk
    pub async fn validate_and_fix(
        &self,
        component_name: &str,
        source: &str,
    ) -> Result<RepairOutcome, LoopError> {
        let budget = self.config.repair_budget;
        let mut current = source.to_string();
        let mut history: Vec<AttemptRecord> = Vec::new();
        let mut repairs_used: u32 = 0;
        let mut state = LoopState::Rendered;

        loop {
            state = advance(component_name, state, LoopState::Compiling);
            let attempt = history.len() as u32 + 1;
            let started_at = now();
            let clock = Instant::now();

            let outcome = self.compile_once(component_name, &current).await?;
            let diagnostic = match outcome {
                CompileOutcome::Valid => None,
                CompileOutcome::Invalid(diagnostic) => Some(diagnostic),
            };
            history.push(AttemptRecord {
                attempt,
                started_at,
                duration_ms: clock.elapsed().as_millis() as u64,
                source_hash: ContentHash::of(&current).to_hex(),
                diagnostic: diagnostic.clone(),
            });

            let Some(diagnostic) = diagnostic else {
                advance(component_name, state, LoopState::Valid);
                tracing::info!(
                    "{} compiled after {} attempt(s), {} repair(s)",
                    component_name,
                    attempt,
                    repairs_used
                );
                return Ok(RepairOutcome {
                    source: current,
                    compile_attempts: attempt,
                    repairs_used,
                    history,
                });
            };
            state = advance(component_name, state, LoopState::Invalid);

            loop {
                if repairs_used >= budget {
                    advance(component_name, state, LoopState::Failed);
                    tracing::warn!(
                        "Repair budget exhausted for {} after {} compile attempt(s): {}",
                        component_name,
                        attempt,
                        diagnostic
                    );
                    return Err(LoopError::RepairBudgetExhausted {
                        last_diagnostic: diagnostic,
                        attempts: attempt,
                    });
                }

                state = advance(component_name, state, LoopState::Repairing);
                repairs_used += 1;
                if let Some(candidate) = self.request_repair(component_name, &current, &diagnostic).await {
                    current = candidate;
                    state = advance(component_name, state, LoopState::Rendered);
                    break;
                }
            }
        }
    }

    /// One repair round. `None` means the round was spent without a candidate.
    async fn request_repair(
        &self,
        component_name: &str,
        source: &str,
        diagnostic: &CompileDiagnostic,
    ) -> Option<String> {
        match self.repairer.repair_code(source, diagnostic).await {
            Ok(text) => {
                let candidate = strip_code_fences(&text);
                if candidate.trim().is_empty() {
                    tracing::warn!("Code repair for {} returned no source", component_name);
                    None
                } else {
                    Some(candidate)
                }
            }
            Err(err) => {
                tracing::warn!("Code repair for {} failed: {}", component_name, err);
                None
            }
        }
    }

    /// Write the candidate, run the compiler under the timeout, clean up.
    async fn compile_once(
        &self,
        component_name: &str,
        source: &str,
    ) -> Result<CompileOutcome, LoopError> {
        let path = self.scratch_path(component_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| LoopError::Scratch {
                    path: parent.display().to_string(),
                    source,
                })?;
        }
        tokio::fs::write(&path, source)
            .await
            .map_err(|source| LoopError::Scratch {
                path: path.display().to_string(),
                source,
            })?;

        let timeout = self.config.attempt_timeout;
        let outcome = match tokio::time::timeout(timeout, self.compiler.check(&path)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => CompileOutcome::Invalid(CompileDiagnostic::new(format!(
                "compiler invocation failed: {}",
                err
            ))),
            Err(_) => CompileOutcome::Invalid(CompileDiagnostic::new(format!(
                "compile attempt timed out after {}s",
                timeout.as_secs_f64()
            ))),
        };

        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Failed to remove scratch file {}: {}", path.display(), err);
        }
        Ok(outcome)
    }

    fn scratch_path(&self, component_name: &str) -> PathBuf {
        let name = ComponentName::normalize(component_name);
        self.config
            .scratch_root()
            .join(format!("{}-{}.astro", name, Uuid::new_v4()))
    }
}

impl std::fmt::Debug for CompileRepairLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileRepairLoop")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn advance(component_name: &str, from: LoopState, to: LoopState) -> LoopState {
    debug_assert!(from.can_transition_to(to), "illegal transition {} -> {}", from, to);
    tracing::debug!("{}: {} -> {}", component_name, from, to);
    to
}
