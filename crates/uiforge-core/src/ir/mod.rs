//! Component IR - structured, versioned description of a UI component
//!
//! The IR crosses a trust boundary: generative oracles produce it as arbitrary
//! JSON. It is therefore modelled in two shapes:
//!
//! - [`RawComponentIr`]: provisional, every field an untyped JSON value, exactly
//!   what the oracle sent (unknown interaction keys included)
//! - [`ComponentIr`]: strict, only reachable through [`ComponentIr::from_raw`]
//!   (which runs [`validate_ir`]) or the [`ComponentIr::fallback`] skeleton.
//!   Deserializing a `ComponentIr` goes through the same validation.
//!
//! Only the strict shape is accepted by the renderer.
//!
//! # Examples
//!
//! ```
//! use uiforge_core::ir::{ComponentIr, SemanticTag};
//!
//! let ir = ComponentIr::from_json(r#"{
//!     "version": "1.0",
//!     "componentName": "TestComponent",
//!     "semanticTag": "section",
//!     "content": {"headings": ["Test Heading"]},
//!     "lucideIcons": ["Star"],
//!     "layout": "container",
//!     "theme": "default"
//! }"#)?;
//!
//! assert_eq!(ir.semantic_tag, SemanticTag::Section);
//! # Ok::<(), uiforge_core::IrError>(())
//! ```

pub mod raw;
pub mod validate;

pub use raw::{parse_raw_ir, RawComponentIr};
pub use validate::{expected_tag_for_name, validate_ir, ValidationReport};

use crate::error::IrError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The only IR schema version currently accepted
pub const IR_SCHEMA_VERSION: &str = "1.0";

/// Interaction keys the schema recognizes
pub const INTERACTION_KEYS: [&str; 3] = ["beforeAfterHover", "carousel", "mobileMenu"];

/// PascalCase component identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ComponentName(String);

impl ComponentName {
    /// Accept a name only if it matches the component-name grammar.
    pub fn parse(name: &str) -> Option<Self> {
        if validate::is_pascal_identifier(name) {
            Some(Self(name.to_string()))
        } else {
            None
        }
    }

    /// Coerce arbitrary text into a grammar-valid name.
    ///
    /// `"pricing table"` becomes `PricingTable`, `"3d-hero"` becomes `Component3dHero`.
    pub fn normalize(name: &str) -> Self {
        if let Some(valid) = Self::parse(name) {
            return valid;
        }

        let mut out = String::new();
        for word in name.split(|c: char| !c.is_ascii_alphanumeric()) {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.extend(chars);
            }
        }

        if out.is_empty() || !out.starts_with(|c: char| c.is_ascii_uppercase()) {
            out.insert_str(0, "Component");
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the PascalCase name into its words (`HeroSection` -> `["Hero", "Section"]`).
    pub fn words(&self) -> Vec<&str> {
        split_pascal_words(&self.0)
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn split_pascal_words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    for (idx, ch) in name.char_indices().skip(1) {
        if ch.is_ascii_uppercase() {
            words.push(&name[start..idx]);
            start = idx;
        }
    }
    if start < name.len() {
        words.push(&name[start..]);
    }
    words
}

/// Root element of the rendered component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticTag {
    Section,
    Header,
    Nav,
    Footer,
    Main,
    Aside,
    Article,
}

impl SemanticTag {
    pub const ALL: [SemanticTag; 7] = [
        SemanticTag::Section,
        SemanticTag::Header,
        SemanticTag::Nav,
        SemanticTag::Footer,
        SemanticTag::Main,
        SemanticTag::Aside,
        SemanticTag::Article,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticTag::Section => "section",
            SemanticTag::Header => "header",
            SemanticTag::Nav => "nav",
            SemanticTag::Footer => "footer",
            SemanticTag::Main => "main",
            SemanticTag::Aside => "aside",
            SemanticTag::Article => "article",
        }
    }
}

impl FromStr for SemanticTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arrangement of the component's repeated items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Container,
    Grid,
    Flex,
    Stack,
}

impl Layout {
    pub const ALL: [Layout; 4] = [Layout::Container, Layout::Grid, Layout::Flex, Layout::Stack];

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Container => "container",
            Layout::Grid => "grid",
            Layout::Flex => "flex",
            Layout::Stack => "stack",
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lucide icon component name (`Star`, `ArrowRight`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IconName(String);

impl IconName {
    pub fn parse(name: &str) -> Option<Self> {
        if validate::is_icon_identifier(name) {
            Some(Self(name.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One repeated entry (card, slide, testimonial, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_image: Option<String>,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_before_after(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.before_image = Some(before.into());
        self.after_image = Some(after.into());
        self
    }

    pub(crate) fn has_hover_pair(&self) -> bool {
        is_present(&self.before_image) && is_present(&self.after_image)
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Textual and repeated content of a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    /// Background video; an empty string requests a video that is not resolved yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

impl Content {
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty() && self.paragraphs.is_empty() && self.items.is_empty()
    }
}

/// Optional behaviours, all off by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interactions {
    pub before_after_hover: bool,
    pub carousel: bool,
    pub mobile_menu: bool,
}

impl Interactions {
    pub fn any(&self) -> bool {
        self.before_after_hover || self.carousel || self.mobile_menu
    }
}

/// Strict, validated component IR. Immutable input of the renderer.
///
/// Deserialization reads a [`RawComponentIr`] and upgrades it with
/// [`ComponentIr::from_raw`], so malformed JSON cannot produce a strict IR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawComponentIr")]
pub struct ComponentIr {
    pub version: String,
    pub component_name: ComponentName,
    pub semantic_tag: SemanticTag,
    pub content: Content,
    /// Deduplicated, first-use order preserved
    pub lucide_icons: Vec<IconName>,
    pub layout: Layout,
    pub theme: String,
    pub interactions: Interactions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_system: Option<String>,
}

impl ComponentIr {
    /// Validate a provisional IR and upgrade it to the strict shape.
    pub fn from_raw(raw: RawComponentIr) -> Result<Self, IrError> {
        let report = validate_ir(&raw);
        if !report.valid {
            return Err(IrError::Validation(report.errors));
        }
        upgrade(&raw).ok_or_else(|| {
            IrError::Validation(vec!["ir: validated IR could not be upgraded".to_string()])
        })
    }

    /// Parse untrusted JSON text and upgrade it in one step.
    pub fn from_json(text: &str) -> Result<Self, IrError> {
        Self::from_raw(parse_raw_ir(text)?)
    }

    /// Minimal skeleton used when synthesis and its single repair both fail.
    pub fn fallback(component_name: &str) -> Self {
        Self {
            version: IR_SCHEMA_VERSION.to_string(),
            component_name: ComponentName::normalize(component_name),
            semantic_tag: SemanticTag::Section,
            content: Content::default(),
            lucide_icons: Vec::new(),
            layout: Layout::Container,
            theme: "default".to_string(),
            interactions: Interactions::default(),
            style_system: None,
        }
    }
}

impl TryFrom<RawComponentIr> for ComponentIr {
    type Error = IrError;

    fn try_from(raw: RawComponentIr) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn texts(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Build the strict shape from an IR that already passed validation.
fn upgrade(raw: &RawComponentIr) -> Option<ComponentIr> {
    let content = raw.content.as_ref()?.as_object()?;
    let items = content
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .map(|item| {
            Some(Item {
                title: text(item.get("title"))?,
                image: text(item.get("image")),
                description: text(item.get("description")),
                before_image: text(item.get("beforeImage")),
                after_image: text(item.get("afterImage")),
            })
        })
        .collect::<Option<Vec<_>>>()?;

    let mut lucide_icons: Vec<IconName> = Vec::new();
    for icon in texts(raw.lucide_icons.as_ref()) {
        let icon = IconName::parse(&icon)?;
        if !lucide_icons.contains(&icon) {
            lucide_icons.push(icon);
        }
    }

    let flag = |key: &str| {
        raw.interactions
            .as_ref()
            .and_then(|map| map.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    };
    let interactions = Interactions {
        before_after_hover: flag("beforeAfterHover"),
        carousel: flag("carousel"),
        mobile_menu: flag("mobileMenu"),
    };

    Some(ComponentIr {
        version: text(raw.version.as_ref())?,
        component_name: ComponentName::parse(&text(raw.component_name.as_ref())?)?,
        semantic_tag: text(raw.semantic_tag.as_ref())?.parse().ok()?,
        content: Content {
            headings: texts(content.get("headings")),
            paragraphs: texts(content.get("paragraphs")),
            items,
            video: text(content.get("video")),
        },
        lucide_icons,
        layout: text(raw.layout.as_ref())?.parse().ok()?,
        theme: text(raw.theme.as_ref())?,
        interactions,
        style_system: text(raw.style_system.as_ref()),
    })
}
