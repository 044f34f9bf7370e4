//! Adapter contract and the two concrete adapters

use super::tokens;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Identifier of the built-in adapter
pub const DEFAULT_STYLE_SYSTEM: &str = "default";

/// Maps an abstract style token to a class string.
///
/// Implementations must be pure: the renderer's determinism depends on it.
pub trait StyleAdapter: Send + Sync + std::fmt::Debug {
    /// Identifier this adapter was registered or loaded under
    fn id(&self) -> &str;

    /// Class string for `token`
    fn resolve(&self, token: &str) -> String;
}

const DEFAULT_TABLE: [(&str, &str); 25] = [
    (tokens::ROOT, "relative mx-auto w-full max-w-6xl px-4 py-16"),
    (tokens::HEADING_PRIMARY, "text-3xl font-bold tracking-tight"),
    (tokens::HEADING_SECONDARY, "mt-2 text-xl font-semibold"),
    (tokens::PARAGRAPH, "mt-4 text-base leading-relaxed"),
    (tokens::ICON_ROW, "mt-6 flex flex-wrap gap-3"),
    (tokens::ICON, "h-6 w-6"),
    (tokens::LAYOUT_CONTAINER, "mt-10 space-y-6"),
    (tokens::LAYOUT_GRID, "mt-10 grid gap-6 sm:grid-cols-2 lg:grid-cols-3"),
    (tokens::LAYOUT_FLEX, "mt-10 flex flex-wrap gap-6"),
    (tokens::LAYOUT_STACK, "mt-10 flex flex-col gap-6"),
    (tokens::ITEM_CARD, "rounded-xl border p-6 shadow-sm"),
    (tokens::ITEM_IMAGE, "w-full rounded-lg object-cover"),
    (tokens::ITEM_ICON, "h-5 w-5"),
    (tokens::ITEM_TITLE, "mt-4 text-lg font-semibold"),
    (tokens::ITEM_DESCRIPTION, "mt-2 text-sm"),
    (tokens::HOVER_FRAME, "relative overflow-hidden rounded-lg"),
    (tokens::HOVER_IMAGE, "w-full object-cover transition-opacity duration-300"),
    (tokens::CAROUSEL_ROOT, "relative mt-10"),
    (tokens::CAROUSEL_TRACK, "flex snap-x snap-mandatory gap-6 overflow-x-auto scroll-smooth"),
    (tokens::CAROUSEL_SLIDE, "w-80 shrink-0 snap-start"),
    (tokens::CAROUSEL_PREV, "absolute left-2 top-1/2 -translate-y-1/2 rounded-full p-2 shadow"),
    (tokens::CAROUSEL_NEXT, "absolute right-2 top-1/2 -translate-y-1/2 rounded-full p-2 shadow"),
    (tokens::MENU_TOGGLE, "p-2 md:hidden"),
    (tokens::MENU_PANEL, "hidden md:block"),
    (tokens::VIDEO, "absolute inset-0 -z-10 h-full w-full object-cover"),
];

/// Built-in adapter: fixed table, unknown tokens pass through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAdapter;

impl StyleAdapter for DefaultAdapter {
    fn id(&self) -> &str {
        DEFAULT_STYLE_SYSTEM
    }

    fn resolve(&self, token: &str) -> String {
        DEFAULT_TABLE
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, classes)| classes.to_string())
            .unwrap_or_else(|| token.to_string())
    }
}

/// On-disk adapter definition (`<adapters_dir>/<id>.toml`)
#[derive(Debug, Clone, Deserialize)]
struct TableFile {
    /// `"default"` to inherit the built-in table, `"none"` for pure passthrough
    #[serde(default = "default_extends")]
    extends: String,
    #[serde(default)]
    classes: BTreeMap<String, String>,
}

fn default_extends() -> String {
    DEFAULT_STYLE_SYSTEM.to_string()
}

/// Table-driven adapter, usually loaded from TOML
#[derive(Debug, Clone)]
pub struct TableAdapter {
    id: String,
    classes: BTreeMap<String, String>,
    inherit_default: bool,
}

impl TableAdapter {
    pub fn new(id: impl Into<String>, classes: BTreeMap<String, String>) -> Self {
        Self {
            id: id.into(),
            classes,
            inherit_default: true,
        }
    }

    /// Resolve unknown tokens as themselves instead of through the built-in table.
    pub fn without_default(mut self) -> Self {
        self.inherit_default = false;
        self
    }

    /// Parse a TOML adapter definition.
    pub fn from_toml(id: impl Into<String>, text: &str) -> Result<Self, String> {
        let file: TableFile = toml::from_str(text).map_err(|e| e.to_string())?;
        let inherit_default = match file.extends.as_str() {
            DEFAULT_STYLE_SYSTEM => true,
            "none" => false,
            other => return Err(format!("unsupported extends value {:?}", other)),
        };
        Ok(Self {
            id: id.into(),
            classes: file.classes,
            inherit_default,
        })
    }
}

impl StyleAdapter for TableAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn resolve(&self, token: &str) -> String {
        if let Some(classes) = self.classes.get(token) {
            return classes.clone();
        }
        if self.inherit_default {
            DefaultAdapter.resolve(token)
        } else {
            token.to_string()
        }
    }
}
