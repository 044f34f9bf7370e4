//! Template pass: root element, content references and interaction markup

use super::writer::{class_attr, class_attr_with, escape_attr, IconImports, SourceWriter};
use super::{HOVER_AFTER_CLASSES, HOVER_BEFORE_CLASSES};
use crate::ir::{ComponentIr, Layout};
use crate::style::{tokens, StyleAdapter};

const CAROUSEL_SCRIPT: [&str; 6] = [
    "document.querySelectorAll('[data-carousel]').forEach((carousel) => {",
    "  const track = carousel.querySelector('[data-carousel-track]');",
    "  const step = () => (track ? track.clientWidth : 0);",
    "  carousel.querySelector('[data-carousel-prev]')?.addEventListener('click', () => track?.scrollBy({ left: -step(), behavior: 'smooth' }));",
    "  carousel.querySelector('[data-carousel-next]')?.addEventListener('click', () => track?.scrollBy({ left: step(), behavior: 'smooth' }));",
    "});",
];

const MENU_SCRIPT: [&str; 7] = [
    "document.querySelectorAll('[data-menu-toggle]').forEach((toggle) => {",
    "  toggle.addEventListener('click', () => {",
    "    const panel = toggle.closest('[data-menu]')?.querySelector('[data-menu-panel]');",
    "    panel?.classList.toggle('hidden');",
    "    toggle.setAttribute('aria-expanded', String(!panel?.classList.contains('hidden')));",
    "  });",
    "});",
];

fn layout_token(layout: Layout) -> &'static str {
    match layout {
        Layout::Container => tokens::LAYOUT_CONTAINER,
        Layout::Grid => tokens::LAYOUT_GRID,
        Layout::Flex => tokens::LAYOUT_FLEX,
        Layout::Stack => tokens::LAYOUT_STACK,
    }
}

/// Emits the component body. Icons are registered in the order they appear.
pub(crate) struct TemplatePass<'a> {
    ir: &'a ComponentIr,
    adapter: &'a dyn StyleAdapter,
    icons: &'a mut IconImports,
    w: SourceWriter,
}

impl<'a> TemplatePass<'a> {
    pub fn new(ir: &'a ComponentIr, adapter: &'a dyn StyleAdapter, icons: &'a mut IconImports) -> Self {
        Self {
            ir,
            adapter,
            icons,
            w: SourceWriter::new(),
        }
    }

    pub fn emit(mut self) -> String {
        let tag = self.ir.semantic_tag.as_str();
        let menu = self.ir.interactions.mobile_menu;

        let mut root = format!(
            "<{} class=\"{}\" data-theme=\"{}\"",
            tag,
            class_attr(self.adapter, tokens::ROOT),
            escape_attr(&self.ir.theme)
        );
        if menu {
            root.push_str(" data-menu");
        }
        root.push('>');

        self.w.open(&root);
        if self.ir.content.video.is_some() {
            self.w.line(&format!(
                "<video class=\"{}\" src={{videoSrc}} autoplay muted loop playsinline aria-hidden=\"true\"></video>",
                class_attr(self.adapter, tokens::VIDEO)
            ));
        }
        if menu {
            self.menu_toggle();
            self.w.open(&format!(
                "<div class=\"{}\" data-menu-panel>",
                class_attr(self.adapter, tokens::MENU_PANEL)
            ));
            self.children();
            self.w.close("</div>");
        } else {
            self.children();
        }
        self.w.close(&format!("</{}>", tag));

        if self.ir.interactions.carousel && !self.ir.content.items.is_empty() {
            self.script(&CAROUSEL_SCRIPT);
        }
        if menu {
            self.script(&MENU_SCRIPT);
        }
        self.w.finish()
    }

    fn menu_toggle(&mut self) {
        let icon = self.icons.use_icon("Menu");
        self.w.open(&format!(
            "<button type=\"button\" class=\"{}\" data-menu-toggle aria-label=\"Toggle menu\" aria-expanded=\"false\">",
            class_attr(self.adapter, tokens::MENU_TOGGLE)
        ));
        self.w.line(&format!(
            "<{} class=\"{}\" aria-hidden=\"true\" />",
            icon,
            class_attr(self.adapter, tokens::ICON)
        ));
        self.w.close("</button>");
    }

    fn children(&mut self) {
        let ir = self.ir;
        let content = &ir.content;

        for index in 0..content.headings.len() {
            if index == 0 {
                self.w.line(&format!(
                    "<h2 class=\"{}\">{{headings[0]}}</h2>",
                    class_attr(self.adapter, tokens::HEADING_PRIMARY)
                ));
            } else {
                self.w.line(&format!(
                    "<h3 class=\"{}\">{{headings[{}]}}</h3>",
                    class_attr(self.adapter, tokens::HEADING_SECONDARY),
                    index
                ));
            }
        }

        self.icon_row();

        for index in 0..content.paragraphs.len() {
            self.w.line(&format!(
                "<p class=\"{}\">{{paragraphs[{}]}}</p>",
                class_attr(self.adapter, tokens::PARAGRAPH),
                index
            ));
        }

        if !content.items.is_empty() {
            if ir.interactions.carousel {
                self.carousel();
            } else {
                self.w.open(&format!(
                    "<div class=\"{}\">",
                    class_attr(self.adapter, layout_token(ir.layout))
                ));
                self.items_map(&class_attr(self.adapter, tokens::ITEM_CARD));
                self.w.close("</div>");
            }
        }
    }

    fn icon_row(&mut self) {
        if self.ir.lucide_icons.is_empty() {
            return;
        }
        let ir = self.ir;
        let icon_class = class_attr(self.adapter, tokens::ICON);
        self.w.open(&format!(
            "<div class=\"{}\" aria-hidden=\"true\">",
            class_attr(self.adapter, tokens::ICON_ROW)
        ));
        for icon in &ir.lucide_icons {
            let name = self.icons.use_icon(icon.as_str());
            self.w.line(&format!("<{} class=\"{}\" />", name, icon_class));
        }
        self.w.close("</div>");
    }

    fn carousel(&mut self) {
        let icon_class = class_attr(self.adapter, tokens::ICON);
        self.w.open(&format!(
            "<div class=\"{}\" data-carousel>",
            class_attr(self.adapter, tokens::CAROUSEL_ROOT)
        ));

        let prev = self.icons.use_icon("ChevronLeft");
        self.w.open(&format!(
            "<button type=\"button\" class=\"{}\" data-carousel-prev aria-label=\"Previous slide\">",
            class_attr(self.adapter, tokens::CAROUSEL_PREV)
        ));
        self.w.line(&format!("<{} class=\"{}\" aria-hidden=\"true\" />", prev, icon_class));
        self.w.close("</button>");

        self.w.open(&format!(
            "<div class=\"{}\" data-carousel-track>",
            class_attr(self.adapter, tokens::CAROUSEL_TRACK)
        ));
        let slide = class_attr_with(
            self.adapter,
            tokens::CAROUSEL_SLIDE,
            &self.adapter.resolve(tokens::ITEM_CARD),
        );
        self.items_map(&slide);
        self.w.close("</div>");

        let next = self.icons.use_icon("ChevronRight");
        self.w.open(&format!(
            "<button type=\"button\" class=\"{}\" data-carousel-next aria-label=\"Next slide\">",
            class_attr(self.adapter, tokens::CAROUSEL_NEXT)
        ));
        self.w.line(&format!("<{} class=\"{}\" aria-hidden=\"true\" />", next, icon_class));
        self.w.close("</button>");

        self.w.close("</div>");
    }

    fn items_map(&mut self, card_class: &str) {
        let ir = self.ir;
        let with_description = ir.content.items.iter().any(|item| item.description.is_some());

        self.w.open("{items.map((item) => (");
        self.w.open(&format!("<article class=\"{}\">", card_class));

        if self.ir.interactions.before_after_hover {
            let image_class = class_attr(self.adapter, tokens::HOVER_IMAGE);
            self.w.open(&format!(
                "<div class=\"{} group\">",
                class_attr(self.adapter, tokens::HOVER_FRAME)
            ));
            self.w.line(&format!(
                "<img src={{item.beforeImage}} alt={{item.title + ' (before)'}} class=\"{} {}\" loading=\"lazy\" />",
                image_class, HOVER_BEFORE_CLASSES
            ));
            self.w.line(&format!(
                "<img src={{item.afterImage}} alt={{item.title + ' (after)'}} class=\"{} absolute inset-0 {}\" loading=\"lazy\" />",
                image_class, HOVER_AFTER_CLASSES
            ));
            self.w.close("</div>");
        } else {
            self.w.line(&format!(
                "<img src={{item.image}} alt={{item.title}} class=\"{}\" loading=\"lazy\" />",
                class_attr(self.adapter, tokens::ITEM_IMAGE)
            ));
        }

        if !self.ir.lucide_icons.is_empty() {
            self.w.line(&format!(
                "<item.Icon class=\"{}\" aria-hidden=\"true\" />",
                class_attr(self.adapter, tokens::ITEM_ICON)
            ));
        }
        self.w.line(&format!(
            "<h3 class=\"{}\">{{item.title}}</h3>",
            class_attr(self.adapter, tokens::ITEM_TITLE)
        ));
        if with_description {
            self.w.line(&format!(
                "{{item.description && <p class=\"{}\">{{item.description}}</p>}}",
                class_attr(self.adapter, tokens::ITEM_DESCRIPTION)
            ));
        }

        self.w.close("</article>");
        self.w.close("))}");
    }

    fn script(&mut self, lines: &[&str]) {
        self.w.line("");
        self.w.open("<script>");
        for line in lines {
            self.w.line(line);
        }
        self.w.close("</script>");
    }
}
