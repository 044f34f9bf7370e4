//! Style adapters - abstract style tokens to concrete utility classes
//!
//! The renderer never hardcodes presentation classes: every class-bearing
//! element asks the adapter to resolve a token such as `heading.primary`.
//! Adapters are resolved by identifier through [`StyleAdapterLoader`], which
//! never fails: an adapter that cannot be loaded is logged and replaced by the
//! built-in [`DefaultAdapter`].

mod adapter;
mod loader;

pub use adapter::{DefaultAdapter, StyleAdapter, TableAdapter, DEFAULT_STYLE_SYSTEM};
pub use loader::StyleAdapterLoader;

/// Style tokens emitted by the renderer
pub mod tokens {
    pub const ROOT: &str = "root";
    pub const HEADING_PRIMARY: &str = "heading.primary";
    pub const HEADING_SECONDARY: &str = "heading.secondary";
    pub const PARAGRAPH: &str = "paragraph";
    pub const ICON_ROW: &str = "icon.row";
    pub const ICON: &str = "icon";
    pub const LAYOUT_CONTAINER: &str = "layout.container";
    pub const LAYOUT_GRID: &str = "layout.grid";
    pub const LAYOUT_FLEX: &str = "layout.flex";
    pub const LAYOUT_STACK: &str = "layout.stack";
    pub const ITEM_CARD: &str = "item.card";
    pub const ITEM_IMAGE: &str = "item.image";
    pub const ITEM_ICON: &str = "item.icon";
    pub const ITEM_TITLE: &str = "item.title";
    pub const ITEM_DESCRIPTION: &str = "item.description";
    pub const HOVER_FRAME: &str = "hover.frame";
    pub const HOVER_IMAGE: &str = "hover.image";
    pub const CAROUSEL_ROOT: &str = "carousel.root";
    pub const CAROUSEL_TRACK: &str = "carousel.track";
    pub const CAROUSEL_SLIDE: &str = "carousel.slide";
    pub const CAROUSEL_PREV: &str = "carousel.prev";
    pub const CAROUSEL_NEXT: &str = "carousel.next";
    pub const MENU_TOGGLE: &str = "menu.toggle";
    pub const MENU_PANEL: &str = "menu.panel";
    pub const VIDEO: &str = "video";
}
