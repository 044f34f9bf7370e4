//! UIForge Core - IR compiler for UI components
//!
//! UIForge turns a structured, versioned description of a UI component (the
//! IR) into Astro component source, deterministically, and then drives that
//! source through a bounded compile -> diagnose -> repair loop until it
//! type-checks or the repair budget runs out.
//!
//! # Architecture
//!
//! 1. **IR** (`ir`): raw and strict component descriptions, validator
//! 2. **Style** (`style`): abstract style tokens resolved by pluggable adapters
//! 3. **Render** (`render`): pure IR -> source function with placeholder tokens
//! 4. **Critic** (`critic`): heuristic request/IR fit score
//! 5. **Repair** (`repair`): compile-validate-repair state machine
//! 6. **Pipeline** (`pipeline`): synthesis -> validation -> render -> repair
//!
//! Generative steps and the compiler are reached only through the traits in
//! [`oracle`].
//!
//! # Quick Start
//!
//! ```
//! use uiforge_core::ir::ComponentIr;
//! use uiforge_core::render::render_from_ir;
//!
//! let ir = ComponentIr::from_json(r#"{
//!     "version": "1.0",
//!     "componentName": "TestComponent",
//!     "semanticTag": "section",
//!     "content": {"headings": ["Test Heading"], "paragraphs": ["Test paragraph content"]},
//!     "lucideIcons": ["Star", "Heart"],
//!     "layout": "container",
//!     "theme": "default"
//! }"#).unwrap();
//!
//! let artifact = render_from_ir(&ir, None).unwrap();
//! assert!(artifact.source.contains("import { Star, Heart } from 'lucide-astro';"));
//! assert!(artifact.source.contains("<section"));
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod config;
pub mod critic;
pub mod error;
pub mod ir;
pub mod oracle;
pub mod pipeline;
pub mod render;
pub mod repair;
pub mod style;
pub mod telemetry;
pub mod text;
pub mod types;

// Re-export commonly used types for convenience
pub use config::ForgeConfig;
pub use critic::{critique, score_ir, CriticReport};
pub use error::{
    AdapterLoadError, ConfigError, ForgeError, IrError, LoopError, OracleError, RenderError,
    Result, ResultExt,
};
pub use ir::{validate_ir, ComponentIr, RawComponentIr, ValidationReport};
pub use oracle::{CodeRepairOracle, CompilerInvoker, IrRepairOracle, IrSynthesisOracle, SynthesisRequest};
pub use pipeline::{ComponentArtifact, ComponentPipeline};
pub use render::{render_from_ir, PlaceholderToken, RenderedArtifact};
pub use repair::{
    CompileDiagnostic, CompileOutcome, CompileRepairLoop, RepairLoopConfig, RepairOutcome,
    DEFAULT_REPAIR_BUDGET,
};
pub use style::{StyleAdapter, StyleAdapterLoader};
pub use telemetry::{IrOrigin, TelemetryRecord};
pub use types::{ContentHash, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
