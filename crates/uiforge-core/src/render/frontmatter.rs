//! Frontmatter pass: icon import and content constants

use super::writer::{js_string, IconImports};
use super::PlaceholderToken;
use crate::ir::{ComponentIr, Item};

/// Words in a component name that make missing item images avatars
const AVATAR_WORDS: [&str; 4] = ["testimonial", "team", "review", "author"];

/// Placeholder used for item images that were not resolved upstream.
pub(crate) fn image_placeholder(ir: &ComponentIr) -> PlaceholderToken {
    let is_people = ir.component_name.words().iter().any(|word| {
        let word = word.to_ascii_lowercase();
        let singular = word.strip_suffix('s').unwrap_or(&word);
        AVATAR_WORDS.contains(&singular)
    });
    if is_people {
        PlaceholderToken::AvatarImage
    } else {
        PlaceholderToken::MockupImage
    }
}

/// Build the frontmatter block, or `None` when there is nothing to declare.
pub(crate) fn emit(ir: &ComponentIr, icons: &IconImports) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    if let Some(import) = icons.import_line() {
        lines.push(import);
    }

    let mut constants: Vec<String> = Vec::new();
    let content = &ir.content;
    if !content.headings.is_empty() {
        constants.push(format!("const headings = {};", string_array(&content.headings)));
    }
    if !content.paragraphs.is_empty() {
        constants.push(format!("const paragraphs = {};", string_array(&content.paragraphs)));
    }
    if !content.items.is_empty() {
        let mut block = String::from("const items = [\n");
        for (index, item) in content.items.iter().enumerate() {
            block.push_str("  ");
            block.push_str(&item_literal(ir, index, item));
            block.push_str(",\n");
        }
        block.push_str("];");
        constants.push(block);
    }
    if let Some(video) = &content.video {
        let src = if video.trim().is_empty() {
            PlaceholderToken::VideoUrl.as_str()
        } else {
            video.as_str()
        };
        constants.push(format!("const videoSrc = {};", js_string(src)));
    }

    if !lines.is_empty() && !constants.is_empty() {
        lines.push(String::new());
    }
    lines.extend(constants);

    if lines.is_empty() {
        return None;
    }
    Some(format!("---\n{}\n---\n", lines.join("\n")))
}

fn string_array(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| js_string(v)).collect();
    format!("[{}]", quoted.join(", "))
}

fn item_literal(ir: &ComponentIr, index: usize, item: &Item) -> String {
    let mut fields = vec![format!("title: {}", js_string(&item.title))];
    if let Some(description) = &item.description {
        fields.push(format!("description: {}", js_string(description)));
    }

    if ir.interactions.before_after_hover {
        // Presence is checked before rendering starts
        let before = item.before_image.as_deref().unwrap_or_default();
        let after = item.after_image.as_deref().unwrap_or_default();
        fields.push(format!("beforeImage: {}", js_string(before)));
        fields.push(format!("afterImage: {}", js_string(after)));
    } else {
        let image = match item.image.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => image_placeholder(ir).as_str().to_string(),
        };
        fields.push(format!("image: {}", js_string(&image)));
    }

    if !ir.lucide_icons.is_empty() {
        let icon = &ir.lucide_icons[index % ir.lucide_icons.len()];
        fields.push(format!("Icon: {}", icon.as_str()));
    }

    format!("{{ {} }}", fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ComponentIr;

    fn ir_named(name: &str) -> ComponentIr {
        let mut ir = ComponentIr::fallback(name);
        ir.content.items.push(Item::new("One"));
        ir
    }

    #[test]
    fn test_avatar_placeholder_for_people_components() {
        assert_eq!(image_placeholder(&ir_named("TestimonialsGrid")), PlaceholderToken::AvatarImage);
        assert_eq!(image_placeholder(&ir_named("OurTeam")), PlaceholderToken::AvatarImage);
        assert_eq!(image_placeholder(&ir_named("AuthorBio")), PlaceholderToken::AvatarImage);
        assert_eq!(image_placeholder(&ir_named("SteamDeals")), PlaceholderToken::MockupImage);
        assert_eq!(image_placeholder(&ir_named("FeatureGrid")), PlaceholderToken::MockupImage);
    }

    #[test]
    fn test_empty_ir_has_no_frontmatter() {
        let ir = ComponentIr::fallback("Empty");
        assert!(emit(&ir, &IconImports::new()).is_none());
    }

    #[test]
    fn test_item_icons_round_robin() {
        let mut ir = ComponentIr::from_json(
            r#"{"version":"1.0","componentName":"Features","semanticTag":"section",
                "content":{"items":[{"title":"A"},{"title":"B"},{"title":"C"}]},
                "lucideIcons":["Star","Heart"],"layout":"grid","theme":"default"}"#,
        )
        .unwrap();
        ir.content.items[1].image = Some("https://cdn.example.com/b.png".to_string());

        let block = emit(&ir, &IconImports::new()).unwrap();
        assert!(block.contains(r#"{ title: "A", image: "{{MOCKUP_IMAGE}}", Icon: Star },"#));
        assert!(block.contains(r#"{ title: "B", image: "https://cdn.example.com/b.png", Icon: Heart },"#));
        assert!(block.contains(r#"{ title: "C", image: "{{MOCKUP_IMAGE}}", Icon: Star },"#));
    }

    #[test]
    fn test_empty_video_becomes_placeholder() {
        let mut ir = ComponentIr::fallback("HeroVideo");
        ir.content.headings.push("Watch".to_string());
        ir.content.video = Some(String::new());

        let block = emit(&ir, &IconImports::new()).unwrap();
        assert!(block.contains(r#"const videoSrc = "{{VIDEO_URL}}";"#));
        assert!(block.starts_with("---\nconst headings = [\"Watch\"];\n"));
    }
}
