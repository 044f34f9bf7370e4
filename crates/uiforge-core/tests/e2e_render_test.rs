//! E2E Test: IR -> validation -> rendering
//!
//! Covers determinism, icon handling, interaction markup and placeholder
//! preservation on the public API only.

mod common;

use common::TEST_COMPONENT_IR;
use proptest::prelude::*;
use uiforge_core::ir::{parse_raw_ir, validate_ir, ComponentIr, Item, Layout, SemanticTag};
use uiforge_core::render::{render_from_ir, PlaceholderToken, HOVER_AFTER_CLASSES, HOVER_BEFORE_CLASSES};
use uiforge_core::style::StyleAdapterLoader;

fn ir_with(patch: impl FnOnce(&mut ComponentIr)) -> ComponentIr {
    let mut ir = ComponentIr::from_json(TEST_COMPONENT_IR).unwrap();
    patch(&mut ir);
    ir
}

/// E2E test: the reference TestComponent
///
/// Validates:
/// 1. The IR passes validation unchanged
/// 2. One import line, icons in first-use order
/// 3. Content appears once, as frontmatter constants
/// 4. A single <section> root
#[test]
fn e2e_test_component_scenario() {
    let raw = parse_raw_ir(TEST_COMPONENT_IR).unwrap();
    let report = validate_ir(&raw);
    assert!(report.valid, "unexpected errors: {:?}", report.errors);
    assert!(report.errors.is_empty());

    let ir = ComponentIr::from_raw(raw).unwrap();
    let artifact = render_from_ir(&ir, None).unwrap();
    let src = &artifact.source;

    assert_eq!(src.matches("from 'lucide-astro'").count(), 1);
    assert!(src.contains("import { Star, Heart } from 'lucide-astro';"));
    assert_eq!(src.matches("Test Heading").count(), 1);
    assert_eq!(src.matches("Test paragraph content").count(), 1);
    assert!(src.contains("const headings = [\"Test Heading\"];"));
    assert_eq!(src.matches("<section").count(), 1);
    assert_eq!(src.matches("</section>").count(), 1);
    assert!(artifact.placeholders.is_empty());
}

#[test]
fn e2e_duplicate_icons_are_imported_once() {
    let json = TEST_COMPONENT_IR.replace(r#"["Star", "Heart"]"#, r#"["Star", "Heart", "Star"]"#);
    let ir = ComponentIr::from_json(&json).unwrap();
    assert_eq!(ir.lucide_icons.len(), 2);

    let src = render_from_ir(&ir, None).unwrap().source;
    assert!(src.contains("import { Star, Heart } from 'lucide-astro';"));
    assert_eq!(src.matches("<Star class=").count(), 1);
}

#[test]
fn e2e_no_icons_no_import() {
    let ir = ir_with(|ir| ir.lucide_icons.clear());
    let src = render_from_ir(&ir, None).unwrap().source;
    assert!(!src.contains("lucide-astro"));
    assert!(!src.contains("item.Icon"));
}

#[test]
fn e2e_import_order_follows_first_use() {
    let ir = ir_with(|ir| {
        ir.interactions.mobile_menu = true;
        ir.interactions.carousel = true;
        ir.content.items = vec![Item::new("One"), Item::new("Two")];
    });
    let src = render_from_ir(&ir, None).unwrap().source;
    assert!(src.contains(
        "import { Menu, Star, Heart, ChevronLeft, ChevronRight } from 'lucide-astro';"
    ));
}

#[test]
fn e2e_before_after_hover_markup() {
    let ir = ir_with(|ir| {
        ir.interactions.before_after_hover = true;
        ir.content.items = vec![
            Item::new("Kitchen").with_before_after("https://img/k0.jpg", "https://img/k1.jpg"),
            Item::new("Bath").with_before_after("https://img/b0.jpg", "https://img/b1.jpg"),
        ];
    });
    let src = render_from_ir(&ir, None).unwrap().source;

    assert!(src.contains(" group\">"));
    assert!(src.contains("src={item.beforeImage}"));
    assert!(src.contains("src={item.afterImage}"));
    assert!(src.contains(HOVER_BEFORE_CLASSES));
    assert!(src.contains(HOVER_AFTER_CLASSES));
    assert!(src.contains(r#"beforeImage: "https://img/k0.jpg", afterImage: "https://img/k1.jpg""#));

    let before = src.find(HOVER_BEFORE_CLASSES).unwrap();
    let after = src.find(HOVER_AFTER_CLASSES).unwrap();
    assert!(before < after);
}

#[test]
fn e2e_hover_without_images_fails_validation() {
    let json = TEST_COMPONENT_IR.replace(
        r#""layout": "container""#,
        r#""layout": "grid", "interactions": {"beforeAfterHover": true}"#,
    );
    let json = json.replace(
        r#""paragraphs": ["Test paragraph content"]"#,
        r#""items": [{"title": "Kitchen"}]"#,
    );
    let report = validate_ir(&parse_raw_ir(&json).unwrap());
    assert!(!report.valid);
    assert!(report
        .errors
        .iter()
        .any(|e| e.starts_with("interactions.beforeAfterHover:")));
}

#[test]
fn e2e_carousel_markup() {
    let ir = ir_with(|ir| {
        ir.interactions.carousel = true;
        ir.content.items = (1..=5).map(|i| Item::new(format!("Slide {}", i))).collect();
    });
    let src = render_from_ir(&ir, None).unwrap().source;

    assert!(src.contains("data-carousel-track"));
    assert!(src.contains("snap-x snap-mandatory"));
    assert!(src.contains("<ChevronLeft class="));
    assert!(src.contains("<ChevronRight class="));
    assert!(src.contains("scrollBy"));
    assert_eq!(src.matches("<script>").count(), 1);
    assert_eq!(src.matches("{items.map((item) => (").count(), 1);
}

#[test]
fn e2e_mobile_menu_markup() {
    let ir = ir_with(|ir| {
        ir.semantic_tag = SemanticTag::Nav;
        ir.interactions.mobile_menu = true;
    });
    let src = render_from_ir(&ir, None).unwrap().source;

    assert!(src.contains("<nav class="));
    assert!(src.contains("data-menu>"));
    assert!(src.contains("data-menu-toggle"));
    assert!(src.contains("data-menu-panel"));
    assert!(src.contains("<Menu class="));
    assert!(src.contains("classList.toggle('hidden')"));
}

#[test]
fn e2e_placeholders_preserved() {
    let ir = ir_with(|ir| {
        ir.content.items = vec![Item::new("No image"), Item::new("Has image").with_image("https://cdn/x.png")];
        ir.content.video = Some(String::new());
    });
    let artifact = render_from_ir(&ir, None).unwrap();

    assert!(artifact.source.contains("{{MOCKUP_IMAGE}}"));
    assert!(artifact.source.contains("{{VIDEO_URL}}"));
    assert!(artifact.source.contains("https://cdn/x.png"));
    assert_eq!(
        artifact.placeholders,
        vec![PlaceholderToken::MockupImage, PlaceholderToken::VideoUrl]
    );
}

#[test]
fn e2e_avatar_placeholder_for_testimonials() {
    let json = TEST_COMPONENT_IR
        .replace("TestComponent", "TestimonialsGrid")
        .replace(
            r#""paragraphs": ["Test paragraph content"]"#,
            r#""items": [{"title": "Ada", "description": "Great service"}]"#,
        );
    let artifact = render_from_ir(&ComponentIr::from_json(&json).unwrap(), None).unwrap();

    assert_eq!(artifact.placeholders, vec![PlaceholderToken::AvatarImage]);
    assert!(artifact.source.contains("{item.description && "));
}

#[test]
fn e2e_adapter_from_directory_changes_classes_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("brutalist.toml"),
        "[classes]\n\"heading.primary\" = \"text-6xl font-black uppercase\"\n",
    )
    .unwrap();
    let loader = StyleAdapterLoader::new().with_adapters_dir(dir.path());

    let ir = ir_with(|_| {});
    let plain = render_from_ir(&ir, None).unwrap();
    let adapter = loader.load(Some("brutalist"), None);
    let styled = render_from_ir(&ir, Some(adapter.as_ref())).unwrap();

    assert!(styled.source.contains("text-6xl font-black uppercase"));
    assert_ne!(plain.content_hash, styled.content_hash);
    assert_eq!(
        plain.source.replace("text-3xl font-bold tracking-tight", "text-6xl font-black uppercase"),
        styled.source
    );
}

#[test]
fn e2e_content_is_escaped() {
    let ir = ir_with(|ir| {
        ir.content.headings = vec!["Say \"hi\" </script>".to_string()];
        ir.theme = "dark\" onload=\"x".to_string();
    });
    let src = render_from_ir(&ir, None).unwrap().source;
    assert!(src.contains(r#"const headings = ["Say \"hi\" <\/script>"];"#));
    assert!(src.contains("data-theme=\"dark&quot; onload=&quot;x\""));
}

fn arb_ir() -> impl Strategy<Value = ComponentIr> {
    (
        prop::collection::vec("[ -~]{0,24}", 0..4),
        prop::collection::vec("[ -~]{0,40}", 0..3),
        prop::collection::vec("[A-Z][a-z]{0,8}", 0..4),
        prop::collection::vec(("[a-zA-Z ]{1,16}", proptest::option::of("[a-z]{1,10}")), 0..6),
        any::<(bool, bool)>(),
        0usize..4,
    )
        .prop_map(|(headings, paragraphs, icons, items, (carousel, menu), layout)| {
            let mut ir = ComponentIr::from_json(TEST_COMPONENT_IR).unwrap();
            ir.content.headings = headings;
            ir.content.paragraphs = paragraphs;
            ir.content.items = items
                .into_iter()
                .map(|(title, description)| {
                    let item = Item::new(title);
                    match description {
                        Some(d) => item.with_description(d),
                        None => item,
                    }
                })
                .collect();
            ir.lucide_icons = icons
                .iter()
                .filter(|name| name.as_str() != "Menu")
                .filter_map(|name| uiforge_core::ir::IconName::parse(name))
                .fold(Vec::new(), |mut acc, icon| {
                    if !acc.contains(&icon) {
                        acc.push(icon);
                    }
                    acc
                });
            ir.interactions.carousel = carousel;
            ir.interactions.mobile_menu = menu;
            ir.layout = Layout::ALL[layout];
            ir
        })
}

proptest! {
    #[test]
    fn prop_render_is_deterministic(ir in arb_ir()) {
        let first = render_from_ir(&ir, None).unwrap();
        let second = render_from_ir(&ir.clone(), None).unwrap();
        prop_assert_eq!(&first.source, &second.source);
        prop_assert_eq!(&first.content_hash, &second.content_hash);
    }

    #[test]
    fn prop_single_import_line(ir in arb_ir()) {
        let src = render_from_ir(&ir, None).unwrap().source;
        prop_assert!(src.matches("from 'lucide-astro'").count() <= 1);
        for icon in &ir.lucide_icons {
            let tag = format!("<{} class=", icon.as_str());
            prop_assert_eq!(src.matches(tag.as_str()).count(), 1);
        }
    }
}
