//! Deterministic renderer - strict IR to Astro component source
//!
//! Rendering is a pure function of the IR and the style adapter: no clock,
//! no randomness, no global state. Identical inputs produce byte-identical
//! source, which makes the artifact hash usable as a cache key.
//!
//! Output shape:
//!
//! ```text
//! ---
//! import { Star } from 'lucide-astro';
//!
//! const headings = ["Test Heading"];
//! ---
//!
//! <section class="..." data-theme="default">
//!   <h2 class="...">{headings[0]}</h2>
//!   ...
//! </section>
//! ```
//!
//! Content strings live only in the frontmatter constants; the template
//! references them. Assets that were not resolved upstream are emitted as
//! [`PlaceholderToken`]s and left for a later substitution step.

mod frontmatter;
mod template;
mod writer;

use crate::error::RenderError;
use crate::ir::ComponentIr;
use crate::style::{DefaultAdapter, StyleAdapter};
use crate::types::ContentHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use template::TemplatePass;
use writer::IconImports;

/// Classes on the "before" image of a hover pair
pub const HOVER_BEFORE_CLASSES: &str = "opacity-100 group-hover:opacity-0";

/// Classes on the "after" image of a hover pair
pub const HOVER_AFTER_CLASSES: &str = "opacity-0 group-hover:opacity-100";

/// Marker for an asset the renderer could not resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaceholderToken {
    MockupImage,
    AvatarImage,
    VideoUrl,
}

impl PlaceholderToken {
    /// Fixed reporting order
    pub const ALL: [PlaceholderToken; 3] = [
        PlaceholderToken::MockupImage,
        PlaceholderToken::AvatarImage,
        PlaceholderToken::VideoUrl,
    ];

    /// Tokens present in `source`, in reporting order
    pub fn scan(source: &str) -> Vec<PlaceholderToken> {
        Self::ALL
            .into_iter()
            .filter(|token| source.contains(token.as_str()))
            .collect()
    }

    /// Literal text emitted into the source
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceholderToken::MockupImage => "{{MOCKUP_IMAGE}}",
            PlaceholderToken::AvatarImage => "{{AVATAR_IMAGE}}",
            PlaceholderToken::VideoUrl => "{{VIDEO_URL}}",
        }
    }
}

impl fmt::Display for PlaceholderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedArtifact {
    pub source: String,
    /// Blake3 hex digest of `source`
    pub content_hash: String,
    /// Unresolved asset markers present in `source`, in [`PlaceholderToken::ALL`] order
    pub placeholders: Vec<PlaceholderToken>,
}

impl RenderedArtifact {
    fn new(source: String) -> Self {
        let content_hash = ContentHash::of(&source).to_hex();
        let placeholders = PlaceholderToken::scan(&source);
        Self {
            source,
            content_hash,
            placeholders,
        }
    }

    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }
}

/// Render a validated IR to component source.
///
/// Without an adapter the built-in [`DefaultAdapter`] resolves style tokens.
///
/// # Errors
///
/// [`RenderError::MissingHoverImages`] when `beforeAfterHover` is enabled and
/// an item lacks its image pair. Validation rejects such IRs, so this only
/// fires when a strict IR was assembled by hand.
pub fn render_from_ir(
    ir: &ComponentIr,
    adapter: Option<&dyn StyleAdapter>,
) -> Result<RenderedArtifact, RenderError> {
    if ir.interactions.before_after_hover {
        if let Some(index) = ir.content.items.iter().position(|item| !item.has_hover_pair()) {
            return Err(RenderError::MissingHoverImages {
                component: ir.component_name.to_string(),
                index,
            });
        }
    }

    let adapter = adapter.unwrap_or(&DefaultAdapter);
    let mut icons = IconImports::new();
    let body = TemplatePass::new(ir, adapter, &mut icons).emit();

    let source = match frontmatter::emit(ir, &icons) {
        Some(front) => format!("{}\n{}", front, body),
        None => body,
    };

    tracing::debug!(
        "Rendered {} ({} bytes, adapter {})",
        ir.component_name,
        source.len(),
        adapter.id()
    );
    Ok(RenderedArtifact::new(source))
}
