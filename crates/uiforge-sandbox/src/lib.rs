//! UIForge Sandbox - out-of-process compiler
//!
//! Runs a checker command (by default `npx astro check`) against a scratch
//! file and turns exit status and output into a [`CompileOutcome`].
//!
//! Any output at all counts as a failure, even with a zero exit status.
//! Checkers that print progress on success should be wrapped or silenced.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use uiforge_core::oracle::CompilerInvoker;
use uiforge_core::{CompileDiagnostic, CompileOutcome, OracleError};

/// Output lines kept in a diagnostic excerpt
pub const MAX_EXCERPT_LINES: usize = 40;

/// Raw result of one checker run
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    /// stdout then stderr, trimmed, empty streams skipped
    pub fn combined_output(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_outcome(self) -> CompileOutcome {
        let output = self.combined_output();
        if self.success && output.is_empty() {
            return CompileOutcome::Valid;
        }

        let message = if output.is_empty() {
            format!("checker exited with status {}", self.exit_code)
        } else {
            first_error_line(&output)
        };
        let mut diagnostic = CompileDiagnostic::new(message);
        if !output.is_empty() {
            let excerpt: Vec<&str> = output.lines().take(MAX_EXCERPT_LINES).collect();
            diagnostic = diagnostic.with_excerpt(excerpt.join("\n"));
        }
        CompileOutcome::Invalid(diagnostic)
    }
}

/// Compiler oracle backed by an external command
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl CommandCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
        }
    }

    /// Build from a shell-like command line such as `npx astro check`.
    ///
    /// Words are split with POSIX shell quoting rules (quotes and backslash
    /// escapes); nothing is expanded and no shell is involved.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let Some(words) = shlex::split(line) else {
            bail!("Unbalanced quote or trailing escape in checker command: {}", line);
        };
        let mut words = words.into_iter();
        let program = match words.next() {
            Some(program) => program,
            None => bail!("Empty checker command"),
        };
        Ok(Self {
            args: words.collect(),
            ..Self::new(program)
        })
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the checker with `scratch_path` appended as the last argument.
    pub async fn run(&self, scratch_path: &Path) -> Result<ExecutionResult> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(scratch_path).kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }

        tracing::debug!("Running {} on {}", self.program, scratch_path.display());
        let output = command
            .output()
            .await
            .with_context(|| format!("Failed to spawn checker '{}'", self.program))?;

        Ok(ExecutionResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

#[async_trait]
impl CompilerInvoker for CommandCompiler {
    async fn check(&self, scratch_path: &Path) -> std::result::Result<CompileOutcome, OracleError> {
        let result = self
            .run(scratch_path)
            .await
            .map_err(|e| OracleError::Invocation(format!("{:#}", e)))?;
        let outcome = result.into_outcome();
        if let CompileOutcome::Invalid(diagnostic) = &outcome {
            tracing::debug!("{} rejected: {}", scratch_path.display(), diagnostic);
        }
        Ok(outcome)
    }
}

fn first_error_line(output: &str) -> String {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.clone().next().unwrap_or_default();
    lines
        .find(|l| l.to_lowercase().contains("error"))
        .unwrap_or(first)
        .to_string()
}
