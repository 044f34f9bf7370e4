//! Component pipeline - request to compiled source
//!
//! Per component, strictly in order:
//!
//! 1. synthesize IR JSON
//! 2. validate; on failure one IR repair round-trip, then the fallback skeleton
//! 3. resolve the style adapter and render
//! 4. score the IR (telemetry only)
//! 5. compile-validate-repair loop
//!
//! Batches run components concurrently with no shared mutable state. One
//! component failing never affects its siblings.

use crate::critic::{critique, CriticReport};
use crate::error::{ForgeError, Result};
use crate::ir::ComponentIr;
use crate::oracle::{IrRepairOracle, IrSynthesisOracle, SynthesisRequest};
use crate::render::{render_from_ir, PlaceholderToken};
use crate::repair::{CompileRepairLoop, RepairOutcome};
use crate::style::StyleAdapterLoader;
use crate::telemetry::{IrOrigin, TelemetryRecord};
use crate::types::ContentHash;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;

/// Final result for one component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentArtifact {
    pub component_name: String,
    pub ir: ComponentIr,
    pub ir_origin: IrOrigin,
    /// Compiled source
    pub source: String,
    /// Blake3 hex digest of `source`
    pub content_hash: String,
    /// Placeholders still present in `source`
    pub placeholders: Vec<PlaceholderToken>,
    pub critic: CriticReport,
    pub repair: RepairOutcome,
    pub telemetry: TelemetryRecord,
}

pub struct ComponentPipeline {
    synthesizer: Arc<dyn IrSynthesisOracle>,
    ir_repairer: Arc<dyn IrRepairOracle>,
    repair_loop: CompileRepairLoop,
    styles: StyleAdapterLoader,
    default_style_system: Option<String>,
}

impl ComponentPipeline {
    pub fn new(
        synthesizer: Arc<dyn IrSynthesisOracle>,
        ir_repairer: Arc<dyn IrRepairOracle>,
        repair_loop: CompileRepairLoop,
    ) -> Self {
        Self {
            synthesizer,
            ir_repairer,
            repair_loop,
            styles: StyleAdapterLoader::new(),
            default_style_system: None,
        }
    }

    pub fn with_styles(mut self, styles: StyleAdapterLoader) -> Self {
        self.styles = styles;
        self
    }

    /// Adapter used when the IR names no `styleSystem`.
    pub fn with_default_style_system(mut self, id: Option<String>) -> Self {
        self.default_style_system = id;
        self
    }

    /// Run one component through the whole pipeline.
    ///
    /// # Errors
    ///
    /// - [`ForgeError::Oracle`] when synthesis itself fails
    /// - [`ForgeError::Render`] when rendering rejects the IR
    /// - [`ForgeError::Loop`] when no candidate compiled within the budget
    pub async fn generate(&self, request: &SynthesisRequest) -> Result<ComponentArtifact> {
        tracing::info!("Generating component {}", request.component_name);

        let raw = self.synthesizer.synthesize(request).await.map_err(|e| {
            ForgeError::from(e).context(format!("IR synthesis failed for {}", request.component_name))
        })?;
        let (ir, ir_origin) = self.resolve_ir(request, &raw).await;

        let adapter = self
            .styles
            .load(ir.style_system.as_deref(), self.default_style_system.as_deref());
        let rendered = render_from_ir(&ir, Some(adapter.as_ref()))
            .map_err(|e| ForgeError::from(e).context(format!("Rendering {} failed", ir.component_name)))?;

        let critic = critique(&ir, &request.user_request);
        tracing::debug!("{} IR score {:.2}", ir.component_name, critic.score);

        let repair = self
            .repair_loop
            .validate_and_fix(ir.component_name.as_str(), &rendered.source)
            .await
            .map_err(|e| ForgeError::from(e).context(format!("Compiling {} failed", ir.component_name)))?;

        let telemetry = TelemetryRecord::new(
            request,
            ir.component_name.as_str(),
            &repair.source,
            critic.score,
            repair.compile_attempts,
            ir_origin,
        );
        telemetry.emit();

        Ok(ComponentArtifact {
            component_name: ir.component_name.to_string(),
            ir_origin,
            source: repair.source.clone(),
            content_hash: ContentHash::of(&repair.source).to_hex(),
            placeholders: PlaceholderToken::scan(&repair.source),
            critic,
            repair,
            telemetry,
            ir,
        })
    }

    /// Run several components concurrently; one result per request, in order.
    pub async fn generate_batch(&self, requests: &[SynthesisRequest]) -> Vec<Result<ComponentArtifact>> {
        let results = join_all(requests.iter().map(|request| self.generate(request))).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::warn!("{} of {} components failed", failed, requests.len());
        }
        results
    }

    /// Validate synthesis output, allowing exactly one IR repair round-trip.
    async fn resolve_ir(&self, request: &SynthesisRequest, raw: &str) -> (ComponentIr, IrOrigin) {
        let errors = match ComponentIr::from_json(raw) {
            Ok(ir) => return (ir, IrOrigin::Synthesized),
            Err(err) => err.messages(),
        };
        tracing::warn!(
            "IR for {} rejected ({} error(s)), requesting repair",
            request.component_name,
            errors.len()
        );

        match self.ir_repairer.repair_ir(raw, &errors).await {
            Ok(repaired) => match ComponentIr::from_json(&repaired) {
                Ok(ir) => return (ir, IrOrigin::Repaired),
                Err(err) => tracing::warn!(
                    "Repaired IR for {} still invalid: {}",
                    request.component_name,
                    err
                ),
            },
            Err(err) => tracing::warn!("IR repair for {} failed: {}", request.component_name, err),
        }

        tracing::warn!("Using fallback skeleton for {}", request.component_name);
        (ComponentIr::fallback(&request.component_name), IrOrigin::Fallback)
    }
}

impl std::fmt::Debug for ComponentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentPipeline")
            .field("repair_loop", &self.repair_loop)
            .field("styles", &self.styles)
            .field("default_style_system", &self.default_style_system)
            .finish_non_exhaustive()
    }
}
