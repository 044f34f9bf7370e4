//! Forge configuration
//!
//! Loaded from TOML; every field has a default so partial files are fine.
//! `UIFORGE_*` environment variables override file values:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `UIFORGE_REPAIR_BUDGET` | `repair.budget` |
//! | `UIFORGE_ATTEMPT_TIMEOUT_SECS` | `repair.attempt_timeout_secs` |
//! | `UIFORGE_SCRATCH_DIR` | `repair.scratch_dir` |
//! | `UIFORGE_SCRATCH_NAMESPACE` | `repair.scratch_namespace` |
//! | `UIFORGE_STYLE_SYSTEM` | `style.default_style_system` |
//! | `UIFORGE_ADAPTERS_DIR` | `style.adapters_dir` |
//! | `UIFORGE_COMPILER_COMMAND` | `compiler.command` |
//! | `UIFORGE_LLM_BASE_URL` | `llm.base_url` |
//! | `UIFORGE_LLM_MODEL` | `llm.model` |

use crate::error::ConfigError;
use crate::repair::{
    RepairLoopConfig, DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_REPAIR_BUDGET, DEFAULT_SCRATCH_NAMESPACE,
};
use crate::style::StyleAdapterLoader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Compile-validate-repair loop
    pub repair: RepairSettings,

    /// Style adapter resolution
    pub style: StyleSettings,

    /// Out-of-process type-checker
    pub compiler: CompilerSettings,

    /// Chat model behind the generative oracles
    pub llm: LlmSettings,
}

impl ForgeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repair_budget(mut self, budget: u32) -> Self {
        self.repair.budget = budget;
        self
    }

    pub fn with_attempt_timeout_secs(mut self, secs: u64) -> Self {
        self.repair.attempt_timeout_secs = secs;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<String>) -> Self {
        self.repair.scratch_dir = Some(dir.into());
        self
    }

    pub fn with_default_style_system(mut self, id: impl Into<String>) -> Self {
        self.style.default_style_system = Some(id.into());
        self
    }

    pub fn with_adapters_dir(mut self, dir: impl Into<String>) -> Self {
        self.style.adapters_dir = Some(dir.into());
        self
    }

    pub fn with_compiler_command(mut self, command: impl Into<String>) -> Self {
        self.compiler.command = command.into();
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `UIFORGE_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment, a map in tests).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("UIFORGE_REPAIR_BUDGET") {
            self.repair.budget = parse_number("UIFORGE_REPAIR_BUDGET", &value)?;
        }
        if let Some(value) = lookup("UIFORGE_ATTEMPT_TIMEOUT_SECS") {
            self.repair.attempt_timeout_secs = parse_number("UIFORGE_ATTEMPT_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("UIFORGE_SCRATCH_DIR") {
            self.repair.scratch_dir = Some(value);
        }
        if let Some(value) = lookup("UIFORGE_SCRATCH_NAMESPACE") {
            self.repair.scratch_namespace = value;
        }
        if let Some(value) = lookup("UIFORGE_STYLE_SYSTEM") {
            self.style.default_style_system = Some(value);
        }
        if let Some(value) = lookup("UIFORGE_ADAPTERS_DIR") {
            self.style.adapters_dir = Some(value);
        }
        if let Some(value) = lookup("UIFORGE_COMPILER_COMMAND") {
            self.compiler.command = value;
        }
        if let Some(value) = lookup("UIFORGE_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = lookup("UIFORGE_LLM_MODEL") {
            self.llm.model = value;
        }
        Ok(())
    }

    /// Loop parameters derived from `[repair]`
    pub fn repair_loop_config(&self) -> RepairLoopConfig {
        let mut config = RepairLoopConfig::default()
            .with_scratch_namespace(self.repair.scratch_namespace.clone())
            .with_repair_budget(self.repair.budget)
            .with_attempt_timeout(Duration::from_secs(self.repair.attempt_timeout_secs));
        if let Some(dir) = &self.repair.scratch_dir {
            config = config.with_scratch_dir(PathBuf::from(dir));
        }
        config
    }

    /// Adapter loader derived from `[style]`
    pub fn style_loader(&self) -> StyleAdapterLoader {
        let loader = StyleAdapterLoader::new();
        match &self.style.adapters_dir {
            Some(dir) => loader.with_adapters_dir(dir),
            None => loader,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Repair loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairSettings {
    /// Repair rounds after the first compile
    pub budget: u32,

    /// Per-attempt compile timeout in seconds
    pub attempt_timeout_secs: u64,

    /// Scratch directory (system temp dir when unset)
    pub scratch_dir: Option<String>,

    pub scratch_namespace: String,
}

impl Default for RepairSettings {
    fn default() -> Self {
        Self {
            budget: DEFAULT_REPAIR_BUDGET,
            attempt_timeout_secs: DEFAULT_ATTEMPT_TIMEOUT.as_secs(),
            scratch_dir: None,
            scratch_namespace: DEFAULT_SCRATCH_NAMESPACE.to_string(),
        }
    }
}

/// Style adapter settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    /// Used when the IR names no `styleSystem`
    pub default_style_system: Option<String>,

    /// Directory holding `<id>.toml` adapter tables
    pub adapters_dir: Option<String>,
}

/// Compiler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Checker command line; the scratch path is appended as last argument
    pub command: String,

    /// Directory the checker runs in (usually the host project)
    pub working_dir: Option<String>,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            command: "npx astro check".to_string(),
            working_dir: None,
        }
    }
}

/// LLM settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenAI-compatible API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    pub model: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    pub temperature: f32,

    pub max_tokens: u32,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "UIFORGE_LLM_API_KEY".to_string(),
            temperature: 0.2,
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}
