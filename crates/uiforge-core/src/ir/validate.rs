//! IR validator
//!
//! One pass over the top-level fields in declaration order, collecting every
//! violated invariant. The error order is part of the text shown to the IR
//! repair oracle, so it must stay stable.

use super::{split_pascal_words, Layout, RawComponentIr, SemanticTag, INTERACTION_KEYS, IR_SCHEMA_VERSION};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

lazy_static! {
    static ref PASCAL_IDENTIFIER: Regex = Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap();
    static ref ICON_IDENTIFIER: Regex = Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap();
    static ref STYLE_SYSTEM_ID: Regex = Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap();
}

/// Name fragments that pin the semantic tag, checked in order
const NAME_TAG_RULES: [(&str, SemanticTag); 5] = [
    ("footer", SemanticTag::Footer),
    ("header", SemanticTag::Header),
    ("navbar", SemanticTag::Nav),
    ("navigation", SemanticTag::Nav),
    ("sidebar", SemanticTag::Aside),
];

/// Outcome of [`validate_ir`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

pub(crate) fn is_pascal_identifier(name: &str) -> bool {
    PASCAL_IDENTIFIER.is_match(name)
}

pub(crate) fn is_icon_identifier(name: &str) -> bool {
    ICON_IDENTIFIER.is_match(name)
}

pub(crate) fn is_style_system_id(id: &str) -> bool {
    STYLE_SYSTEM_ID.is_match(id)
}

/// Semantic tag a component name commits to, if any.
///
/// `SiteFooter` must be a `footer`, `MainNav` a `nav`; `HeroBanner` is free.
pub fn expected_tag_for_name(name: &str) -> Option<SemanticTag> {
    let lower = name.to_ascii_lowercase();
    for (fragment, tag) in NAME_TAG_RULES {
        if lower.contains(fragment) {
            return Some(tag);
        }
    }
    if split_pascal_words(name).contains(&"Nav") {
        return Some(SemanticTag::Nav);
    }
    None
}

/// Check every invariant of a provisional IR. Never mutates its input.
///
/// A field of the wrong JSON type is reported in place (`"version: expected a
/// string"`) and the remaining fields are still checked.
pub fn validate_ir(ir: &RawComponentIr) -> ValidationReport {
    let mut errors = Vec::new();

    check_version(ir, &mut errors);
    check_component_name(ir, &mut errors);
    check_semantic_tag(ir, &mut errors);
    check_content(ir.content.as_ref(), &mut errors);
    check_icons(ir, &mut errors);
    check_layout(ir, &mut errors);
    check_theme(ir, &mut errors);
    check_interactions(ir, &mut errors);
    check_style_system(ir, &mut errors);

    ValidationReport::from_errors(errors)
}

fn missing(field: &str) -> String {
    format!("{}: missing required field", field)
}

fn expect_str<'a>(field: &str, value: &'a Value, errors: &mut Vec<String>) -> Option<&'a str> {
    let text = value.as_str();
    if text.is_none() {
        errors.push(format!("{}: expected a string", field));
    }
    text
}

fn required_str<'a>(field: &str, value: Option<&'a Value>, errors: &mut Vec<String>) -> Option<&'a str> {
    match value {
        None => {
            errors.push(missing(field));
            None
        }
        Some(value) => expect_str(field, value, errors),
    }
}

fn optional_str<'a>(field: &str, value: Option<&'a Value>, errors: &mut Vec<String>) -> Option<&'a str> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => expect_str(field, value, errors),
    }
}

/// String entries of an optional array, with their original indices.
fn string_list<'a>(field: &str, value: Option<&'a Value>, errors: &mut Vec<String>) -> Vec<(usize, &'a str)> {
    let values = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(values)) => values,
        Some(_) => {
            errors.push(format!("{}: expected an array of strings", field));
            return Vec::new();
        }
    };

    let mut strings = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if let Some(text) = expect_str(&format!("{}[{}]", field, idx), value, errors) {
            strings.push((idx, text));
        }
    }
    strings
}

fn object_list<'a>(
    field: &str,
    value: Option<&'a Value>,
    errors: &mut Vec<String>,
) -> Vec<(usize, &'a Map<String, Value>)> {
    let values = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(values)) => values,
        Some(_) => {
            errors.push(format!("{}: expected an array of objects", field));
            return Vec::new();
        }
    };

    let mut objects = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        match value.as_object() {
            Some(object) => objects.push((idx, object)),
            None => errors.push(format!("{}[{}]: expected an object", field, idx)),
        }
    }
    objects
}

fn check_version(ir: &RawComponentIr, errors: &mut Vec<String>) {
    if let Some(version) = required_str("version", ir.version.as_ref(), errors) {
        if version != IR_SCHEMA_VERSION {
            errors.push(format!(
                "version: unsupported schema version {:?} (supported: {:?})",
                version, IR_SCHEMA_VERSION
            ));
        }
    }
}

fn check_component_name(ir: &RawComponentIr, errors: &mut Vec<String>) {
    match required_str("componentName", ir.component_name.as_ref(), errors) {
        Some(name) if name.trim().is_empty() => {
            errors.push("componentName: must not be empty".to_string())
        }
        Some(name) if !is_pascal_identifier(name) => errors.push(format!(
            "componentName: {:?} is not a PascalCase identifier",
            name
        )),
        _ => {}
    }
}

fn check_semantic_tag(ir: &RawComponentIr, errors: &mut Vec<String>) {
    let Some(raw_tag) = required_str("semanticTag", ir.semantic_tag.as_ref(), errors) else {
        return;
    };

    let tag: SemanticTag = match raw_tag.parse() {
        Ok(tag) => tag,
        Err(_) => {
            let known: Vec<&str> = SemanticTag::ALL.iter().map(|t| t.as_str()).collect();
            errors.push(format!(
                "semanticTag: unknown tag {:?} (expected one of {})",
                raw_tag,
                known.join(", ")
            ));
            return;
        }
    };

    let Some(name) = ir.component_name.as_ref().and_then(Value::as_str) else {
        return;
    };
    if let Some(expected) = expected_tag_for_name(name) {
        if expected != tag {
            errors.push(format!(
                "semanticTag: component {:?} must use {:?}, found {:?}",
                name,
                expected.as_str(),
                tag.as_str()
            ));
        }
    }
}

fn check_content(content: Option<&Value>, errors: &mut Vec<String>) {
    let Some(content) = content else {
        errors.push(missing("content"));
        return;
    };
    let Some(content) = content.as_object() else {
        errors.push("content: expected an object".to_string());
        return;
    };

    let mut details = Vec::new();
    let mut has_text = false;
    for field in ["headings", "paragraphs"] {
        let path = format!("content.{}", field);
        for (idx, value) in string_list(&path, content.get(field), &mut details) {
            if value.trim().is_empty() {
                details.push(format!("{}[{}]: must not be empty", path, idx));
            } else {
                has_text = true;
            }
        }
    }

    let items = object_list("content.items", content.get("items"), &mut details);
    for (idx, item) in &items {
        let path = format!("content.items[{}]", idx);
        let title = format!("{}.title", path);
        if let Some(value) = required_str(&title, item.get("title"), &mut details) {
            if value.trim().is_empty() {
                details.push(format!("{}: must not be empty", title));
            }
        }
        for key in ["image", "description", "beforeImage", "afterImage"] {
            optional_str(&format!("{}.{}", path, key), item.get(key), &mut details);
        }
    }
    optional_str("content.video", content.get("video"), &mut details);

    if !has_text && items.is_empty() {
        errors.push(
            "content: must contain at least one non-empty field (headings, paragraphs, items)"
                .to_string(),
        );
    }
    errors.append(&mut details);
}

fn check_icons(ir: &RawComponentIr, errors: &mut Vec<String>) {
    for (idx, icon) in string_list("lucideIcons", ir.lucide_icons.as_ref(), errors) {
        if !is_icon_identifier(icon) {
            errors.push(format!(
                "lucideIcons[{}]: {:?} is not a valid icon identifier",
                idx, icon
            ));
        }
    }
}

fn check_layout(ir: &RawComponentIr, errors: &mut Vec<String>) {
    if let Some(layout) = required_str("layout", ir.layout.as_ref(), errors) {
        if layout.parse::<Layout>().is_err() {
            let known: Vec<&str> = Layout::ALL.iter().map(|l| l.as_str()).collect();
            errors.push(format!(
                "layout: unknown layout {:?} (expected one of {})",
                layout,
                known.join(", ")
            ));
        }
    }
}

fn check_theme(ir: &RawComponentIr, errors: &mut Vec<String>) {
    if let Some(theme) = required_str("theme", ir.theme.as_ref(), errors) {
        if theme.trim().is_empty() {
            errors.push("theme: must not be empty".to_string());
        }
    }
}

fn check_interactions(ir: &RawComponentIr, errors: &mut Vec<String>) {
    let interactions = match ir.interactions.as_ref() {
        None => return,
        Some(Value::Object(interactions)) => interactions,
        Some(_) => {
            errors.push("interactions: expected an object".to_string());
            return;
        }
    };

    for (key, value) in interactions {
        if !INTERACTION_KEYS.contains(&key.as_str()) {
            errors.push(format!("interactions: unrecognized key {:?}", key));
        } else if !value.is_boolean() {
            errors.push(format!("interactions.{}: expected a boolean", key));
        }
    }

    let hover = interactions
        .get("beforeAfterHover")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !hover {
        return;
    }

    let items = ir
        .content
        .as_ref()
        .and_then(|content| content.get("items"))
        .and_then(Value::as_array);
    for (idx, item) in items.into_iter().flatten().enumerate() {
        let present = |key: &str| {
            item.get(key)
                .and_then(Value::as_str)
                .map(|s| !s.trim().is_empty())
                .unwrap_or(false)
        };
        if !present("beforeImage") || !present("afterImage") {
            errors.push(format!(
                "interactions.beforeAfterHover: content.items[{}] needs beforeImage and afterImage",
                idx
            ));
        }
    }
}

fn check_style_system(ir: &RawComponentIr, errors: &mut Vec<String>) {
    if let Some(id) = optional_str("styleSystem", ir.style_system.as_ref(), errors) {
        if !is_style_system_id(id) {
            errors.push(format!("styleSystem: {:?} is not a valid adapter identifier", id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::parse_raw_ir;
    use serde_json::json;

    fn conformant() -> RawComponentIr {
        parse_raw_ir(
            r#"{
                "version": "1.0",
                "componentName": "TestComponent",
                "semanticTag": "section",
                "content": {"headings": ["Test Heading"], "paragraphs": ["Test paragraph content"]},
                "lucideIcons": ["Star"],
                "layout": "container",
                "theme": "default"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_conformant_ir_is_valid() {
        let report = validate_ir(&conformant());
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_each_missing_required_field_is_named() {
        let fields = ["version", "componentName", "semanticTag", "content", "layout", "theme"];
        for field in fields {
            let mut ir = conformant();
            match field {
                "version" => ir.version = None,
                "componentName" => ir.component_name = None,
                "semanticTag" => ir.semantic_tag = None,
                "content" => ir.content = None,
                "layout" => ir.layout = None,
                "theme" => ir.theme = None,
                _ => unreachable!(),
            }
            let report = validate_ir(&ir);
            assert!(!report.valid, "{} removal should fail", field);
            assert!(
                report.errors.iter().any(|e| e.starts_with(field)),
                "no error names {}: {:?}",
                field,
                report.errors
            );
        }
    }

    #[test]
    fn test_errors_collected_in_declaration_order() {
        let raw = RawComponentIr {
            version: Some(json!("2.0")),
            component_name: Some(json!("hero_banner")),
            semantic_tag: Some(json!("div")),
            content: None,
            lucide_icons: Some(json!(["star"])),
            layout: Some(json!("masonry")),
            theme: None,
            interactions: None,
            style_system: Some(json!("Tailwind!")),
        };

        let report = validate_ir(&raw);
        let prefixes: Vec<&str> = report
            .errors
            .iter()
            .map(|e| e.split(':').next().unwrap())
            .collect();
        assert_eq!(
            prefixes,
            vec![
                "version",
                "componentName",
                "semanticTag",
                "content",
                "lucideIcons[0]",
                "layout",
                "theme",
                "styleSystem"
            ]
        );
    }

    #[test]
    fn test_wrong_type_reported_with_other_errors() {
        let raw = parse_raw_ir(
            r#"{
                "version": 1.0,
                "componentName": "site_footer",
                "semanticTag": "div",
                "content": {"headings": "oops"},
                "lucideIcons": ["Star", 7],
                "layout": "masonry",
                "theme": ["dark"]
            }"#,
        )
        .unwrap();

        let report = validate_ir(&raw);
        assert_eq!(
            report.errors,
            vec![
                "version: expected a string".to_string(),
                "componentName: \"site_footer\" is not a PascalCase identifier".to_string(),
                "semanticTag: unknown tag \"div\" (expected one of section, header, nav, footer, main, aside, article)"
                    .to_string(),
                "content: must contain at least one non-empty field (headings, paragraphs, items)"
                    .to_string(),
                "content.headings: expected an array of strings".to_string(),
                "lucideIcons[1]: expected a string".to_string(),
                "layout: unknown layout \"masonry\" (expected one of container, grid, flex, stack)"
                    .to_string(),
                "theme: expected a string".to_string(),
            ]
        );
    }

    #[test]
    fn test_non_object_sections_rejected() {
        let mut ir = conformant();
        ir.content = Some(json!(["Test Heading"]));
        ir.interactions = Some(json!(true));
        ir.style_system = Some(json!(3));

        let report = validate_ir(&ir);
        assert_eq!(
            report.errors,
            vec![
                "content: expected an object".to_string(),
                "interactions: expected an object".to_string(),
                "styleSystem: expected a string".to_string(),
            ]
        );
    }

    #[test]
    fn test_footer_name_requires_footer_tag() {
        for tag in ["section", "header", "nav", "main", "aside", "article"] {
            let mut ir = conformant();
            ir.component_name = Some(json!("SiteFooter"));
            ir.semantic_tag = Some(json!(tag));
            let report = validate_ir(&ir);
            assert!(!report.valid);
            assert!(report.errors[0].contains("must use \"footer\""));
        }

        let mut ir = conformant();
        ir.component_name = Some(json!("SiteFooter"));
        ir.semantic_tag = Some(json!("footer"));
        assert!(validate_ir(&ir).valid);
    }

    #[test]
    fn test_name_tag_table() {
        assert_eq!(expected_tag_for_name("PageFOOTER"), Some(SemanticTag::Footer));
        assert_eq!(expected_tag_for_name("StickyHeader"), Some(SemanticTag::Header));
        assert_eq!(expected_tag_for_name("MainNav"), Some(SemanticTag::Nav));
        assert_eq!(expected_tag_for_name("TopNavbar"), Some(SemanticTag::Nav));
        assert_eq!(expected_tag_for_name("DocsSidebar"), Some(SemanticTag::Aside));
        assert_eq!(expected_tag_for_name("UnavailableNotice"), None);
        assert_eq!(expected_tag_for_name("HeroBanner"), None);
    }

    #[test]
    fn test_empty_content_rejected() {
        let mut ir = conformant();
        ir.content = Some(json!({"headings": ["   "], "paragraphs": [], "items": []}));
        let report = validate_ir(&ir);
        assert!(!report.valid);
        assert!(report.errors[0].starts_with("content: must contain"));
        assert_eq!(report.errors[1], "content.headings[0]: must not be empty");
    }

    #[test]
    fn test_interaction_whitelist_and_types() {
        let mut ir = conformant();
        ir.interactions = Some(json!({"carousel": "yes", "parallax": true}));
        let report = validate_ir(&ir);
        assert_eq!(
            report.errors,
            vec![
                "interactions.carousel: expected a boolean".to_string(),
                "interactions: unrecognized key \"parallax\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_before_after_hover_requires_images() {
        let mut ir = conformant();
        ir.content = Some(json!({
            "items": [
                {"title": "Kitchen", "beforeImage": "/k-before.jpg", "afterImage": "/k-after.jpg"},
                {"title": "Bath", "beforeImage": "/b-before.jpg"}
            ]
        }));
        ir.interactions = Some(json!({"beforeAfterHover": true}));

        let report = validate_ir(&ir);
        assert_eq!(
            report.errors,
            vec!["interactions.beforeAfterHover: content.items[1] needs beforeImage and afterImage"
                .to_string()]
        );
    }

    #[test]
    fn test_item_fields_checked() {
        let mut ir = conformant();
        ir.content = Some(json!({"items": [{}, "Card", {"title": "Fast", "image": false}]}));
        let report = validate_ir(&ir);
        assert_eq!(
            report.errors,
            vec![
                "content.items[1]: expected an object".to_string(),
                "content.items[0].title: missing required field".to_string(),
                "content.items[2].image: expected a string".to_string(),
            ]
        );
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let ir = conformant();
        let before = ir.clone();
        let _ = validate_ir(&ir);
        assert_eq!(ir, before);
    }
}
