//! Subcommand implementations for `uiforge`
//!
//! Each command takes the resolved [`ForgeConfig`] and an options struct and
//! returns its result; printing is left to `main`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use uiforge_agent::{LlmOracles, OpenAiCompatibleClient};
use uiforge_core::ir::{parse_raw_ir, validate_ir, ComponentIr};
use uiforge_core::oracle::{CodeRepairOracle, SynthesisRequest};
use uiforge_core::{
    render_from_ir, CompileDiagnostic, CompileRepairLoop, ComponentArtifact, ComponentPipeline,
    ForgeConfig, OracleError, RenderedArtifact, RepairOutcome, ValidationReport,
};
use uiforge_sandbox::CommandCompiler;

pub struct RenderOptions {
    pub input: PathBuf,
    /// Used when the IR names no style system
    pub style_system: Option<String>,
    pub out: Option<PathBuf>,
}

pub struct CheckOptions {
    pub source: PathBuf,
    pub name: String,
    /// Ask the LLM for repairs instead of failing on the first diagnostic
    pub repair: bool,
    pub out: Option<PathBuf>,
}

pub struct GenerateOptions {
    pub name: String,
    pub request: String,
    pub requirements: Vec<String>,
    pub out_dir: PathBuf,
}

/// Parse and validate an IR file without rendering it.
pub fn validate(path: &Path) -> Result<ValidationReport> {
    let text = read(path)?;
    let raw = parse_raw_ir(&text).with_context(|| format!("{} does not hold IR JSON", path.display()))?;
    Ok(validate_ir(&raw))
}

pub fn render(config: &ForgeConfig, opts: &RenderOptions) -> Result<RenderedArtifact> {
    let text = read(&opts.input)?;
    let ir = ComponentIr::from_json(&text).with_context(|| format!("Invalid IR in {}", opts.input.display()))?;

    let default_style = opts
        .style_system
        .as_deref()
        .or(config.style.default_style_system.as_deref());
    let adapter = config.style_loader().load(ir.style_system.as_deref(), default_style);

    let artifact = render_from_ir(&ir, Some(adapter.as_ref()))
        .with_context(|| format!("Rendering {} failed", ir.component_name))?;
    write_output(opts.out.as_deref(), &artifact.source)?;
    Ok(artifact)
}

/// Compile an existing source file, optionally with LLM repairs.
pub async fn check(config: &ForgeConfig, opts: &CheckOptions) -> Result<RepairOutcome> {
    let source = read(&opts.source)?;

    let mut loop_config = config.repair_loop_config();
    let repairer: Arc<dyn CodeRepairOracle> = if opts.repair {
        Arc::new(llm_oracles(config)?)
    } else {
        loop_config = loop_config.with_repair_budget(0);
        Arc::new(NoRepair)
    };

    let repair_loop = CompileRepairLoop::new(Arc::new(compiler(config)?), repairer).with_config(loop_config);
    let outcome = repair_loop
        .validate_and_fix(&opts.name, &source)
        .await
        .with_context(|| format!("{} does not compile", opts.source.display()))?;

    if let Some(out) = &opts.out {
        write_output(Some(out), &outcome.source)?;
    }
    Ok(outcome)
}

/// Full pipeline for one component; the result is written to `<out_dir>/<Name>.astro`.
pub async fn generate(config: &ForgeConfig, opts: &GenerateOptions) -> Result<(PathBuf, ComponentArtifact)> {
    let oracles = Arc::new(llm_oracles(config)?);
    let repair_loop = CompileRepairLoop::new(Arc::new(compiler(config)?), oracles.clone())
        .with_config(config.repair_loop_config());
    let pipeline = ComponentPipeline::new(oracles.clone(), oracles, repair_loop)
        .with_styles(config.style_loader())
        .with_default_style_system(config.style.default_style_system.clone());

    let request = opts
        .requirements
        .iter()
        .fold(SynthesisRequest::new(&opts.name, &opts.request), |request, r| {
            request.with_requirement(r.clone())
        });

    let artifact = pipeline.generate(&request).await?;
    let path = opts.out_dir.join(format!("{}.astro", artifact.component_name));
    write_output(Some(&path), &artifact.source)?;
    Ok((path, artifact))
}

fn compiler(config: &ForgeConfig) -> Result<CommandCompiler> {
    let compiler = CommandCompiler::from_command_line(&config.compiler.command)
        .context("Invalid compiler.command")?;
    Ok(match &config.compiler.working_dir {
        Some(dir) => compiler.with_working_dir(dir),
        None => compiler,
    })
}

fn llm_oracles(config: &ForgeConfig) -> Result<LlmOracles<OpenAiCompatibleClient>> {
    OpenAiCompatibleClient::from_settings(&config.llm).map(LlmOracles::new)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_output(out: Option<&Path>, source: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, source).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            print!("{}", source);
            Ok(())
        }
    }
}

/// Repair oracle for plain `check`; the budget is zero so it is never asked.
#[derive(Debug)]
struct NoRepair;

#[async_trait]
impl CodeRepairOracle for NoRepair {
    async fn repair_code(&self, _source: &str, _diagnostic: &CompileDiagnostic) -> Result<String, OracleError> {
        Err(OracleError::EmptyResponse)
    }
}
