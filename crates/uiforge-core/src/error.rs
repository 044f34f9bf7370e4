//! Error types for UIForge Core
//!
//! This module defines all error types used by the IR compiler.
//! We use `thiserror` for ergonomic error definitions with automatic Display/Error implementations.

use thiserror::Error;

use crate::repair::CompileDiagnostic;

/// Result type alias for UIForge operations
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Main error type for UIForge operations
#[derive(Error, Debug)]
pub enum ForgeError {
    /// IR parsing or validation errors
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// Renderer errors (validation bypassed upstream)
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Compile-validate-repair loop errors
    #[error("Repair loop error: {0}")]
    Loop(#[from] LoopError),

    /// External oracle errors
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        source: Box<ForgeError>,
    },
}

/// Errors produced while turning untrusted JSON into a strict IR
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("IR is not valid JSON: {0}")]
    Parse(String),

    #[error("IR failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl IrError {
    /// Human-readable error lines, in the order they are shown to the repair oracle.
    pub fn messages(&self) -> Vec<String> {
        match self {
            IrError::Parse(msg) => vec![format!("json: {}", msg)],
            IrError::Validation(errors) => errors.clone(),
        }
    }
}

/// Errors raised by the renderer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Item {index} of {component} has no beforeImage/afterImage but beforeAfterHover is enabled")]
    MissingHoverImages { component: String, index: usize },
}

/// Errors raised by the compile-validate-repair loop
#[derive(Error, Debug)]
pub enum LoopError {
    #[error("Repair budget exhausted after {attempts} compile attempts: {last_diagnostic}")]
    RepairBudgetExhausted {
        last_diagnostic: CompileDiagnostic,
        attempts: u32,
    },

    #[error("Failed to materialize scratch file {path}: {source}")]
    Scratch {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading a style adapter; never fatal
#[derive(Error, Debug)]
pub enum AdapterLoadError {
    #[error("Unknown style system: {0}")]
    Unknown(String),

    #[error("Invalid style system identifier: {0:?}")]
    InvalidId(String),

    #[error("Failed to read adapter {id}: {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse adapter {id}: {message}")]
    Parse { id: String, message: String },
}

/// Errors returned by external oracles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Oracle returned an empty response")]
    EmptyResponse,

    #[error("Compiler invocation failed: {0}")]
    Invocation(String),
}

/// Errors related to configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl ForgeError {
    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True when this error is the loop's terminal budget exhaustion.
    pub fn is_budget_exhausted(&self) -> bool {
        match self {
            ForgeError::Loop(LoopError::RepairBudgetExhausted { .. }) => true,
            ForgeError::WithContext { source, .. } => source.is_budget_exhausted(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.context(f()))
    }
}
