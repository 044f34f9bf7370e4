//! Test doubles for the oracle traits

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uiforge_core::oracle::{CodeRepairOracle, CompilerInvoker, IrRepairOracle, IrSynthesisOracle};
use uiforge_core::{CompileDiagnostic, CompileOutcome, OracleError, SynthesisRequest};

pub const TEST_COMPONENT_IR: &str = r#"{
    "version": "1.0",
    "componentName": "TestComponent",
    "semanticTag": "section",
    "content": {"headings": ["Test Heading"], "paragraphs": ["Test paragraph content"]},
    "lucideIcons": ["Star", "Heart"],
    "layout": "container",
    "theme": "default"
}"#;

/// Returns scripted outcomes in order, then `Valid` forever
#[derive(Default)]
pub struct ScriptedCompiler {
    outcomes: Mutex<VecDeque<CompileOutcome>>,
    pub calls: AtomicU32,
    pub sources: Mutex<Vec<String>>,
}

impl ScriptedCompiler {
    pub fn new(outcomes: Vec<CompileOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompilerInvoker for ScriptedCompiler {
    async fn check(&self, scratch_path: &Path) -> Result<CompileOutcome, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let source = tokio::fs::read_to_string(scratch_path)
            .await
            .map_err(|e| OracleError::Invocation(e.to_string()))?;
        self.sources.lock().unwrap().push(source);
        Ok(self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(CompileOutcome::Valid))
    }
}

/// Rejects every source containing `marker`
pub struct MarkerCompiler {
    pub marker: &'static str,
    pub calls: AtomicU32,
}

impl MarkerCompiler {
    pub fn new(marker: &'static str) -> Self {
        Self {
            marker,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompilerInvoker for MarkerCompiler {
    async fn check(&self, scratch_path: &Path) -> Result<CompileOutcome, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let source = tokio::fs::read_to_string(scratch_path)
            .await
            .map_err(|e| OracleError::Invocation(e.to_string()))?;
        if source.contains(self.marker) {
            Ok(CompileOutcome::Invalid(
                CompileDiagnostic::new(format!("found {}", self.marker)).with_excerpt(source),
            ))
        } else {
            Ok(CompileOutcome::Valid)
        }
    }
}

/// Never answers within any reasonable timeout
pub struct HangingCompiler;

#[async_trait]
impl CompilerInvoker for HangingCompiler {
    async fn check(&self, _scratch_path: &Path) -> Result<CompileOutcome, OracleError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(CompileOutcome::Valid)
    }
}

/// Pops scripted answers; an empty script answers with an empty string
#[derive(Default)]
pub struct ScriptedCodeRepair {
    answers: Mutex<VecDeque<Result<String, OracleError>>>,
    pub calls: AtomicU32,
    pub diagnostics: Mutex<Vec<CompileDiagnostic>>,
}

impl ScriptedCodeRepair {
    pub fn new(answers: Vec<Result<String, OracleError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Default::default()
        }
    }

    pub fn always(answer: &str, times: usize) -> Self {
        Self::new(vec![Ok(answer.to_string()); times])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeRepairOracle for ScriptedCodeRepair {
    async fn repair_code(
        &self,
        _source: &str,
        diagnostic: &CompileDiagnostic,
    ) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.diagnostics.lock().unwrap().push(diagnostic.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Answers per component name
#[derive(Default)]
pub struct MapSynthesis {
    answers: HashMap<String, Result<String, OracleError>>,
    pub calls: AtomicU32,
}

impl MapSynthesis {
    pub fn with(mut self, component: &str, answer: Result<String, OracleError>) -> Self {
        self.answers.insert(component.to_string(), answer);
        self
    }
}

#[async_trait]
impl IrSynthesisOracle for MapSynthesis {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(&request.component_name)
            .cloned()
            .unwrap_or(Err(OracleError::EmptyResponse))
    }
}

/// Returns a fixed answer and remembers the errors it was shown
pub struct FixedIrRepair {
    answer: Result<String, OracleError>,
    pub calls: AtomicU32,
    pub seen_errors: Mutex<Vec<Vec<String>>>,
}

impl FixedIrRepair {
    pub fn new(answer: Result<String, OracleError>) -> Self {
        Self {
            answer,
            calls: AtomicU32::new(0),
            seen_errors: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IrRepairOracle for FixedIrRepair {
    async fn repair_ir(&self, _raw_json: &str, errors: &[String]) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_errors.lock().unwrap().push(errors.to_vec());
        self.answer.clone()
    }
}
