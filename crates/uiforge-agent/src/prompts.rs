//! Prompt builders for the three generative oracles

use uiforge_core::ir::{Layout, SemanticTag, INTERACTION_KEYS, IR_SCHEMA_VERSION};
use uiforge_core::oracle::SynthesisRequest;
use uiforge_core::CompileDiagnostic;

pub const IR_SYSTEM_PROMPT: &str = "You design UI components as structured data. \
    Answer with a single JSON object and nothing else: no prose, no markdown fences.";

pub const CODE_SYSTEM_PROMPT: &str = "You fix Astro components. \
    Answer with the complete corrected file and nothing else. \
    Keep every {{PLACEHOLDER}} token exactly as written.";

/// Schema summary shared by the synthesis and repair prompts.
pub fn ir_schema_description() -> String {
    let tags: Vec<&str> = SemanticTag::ALL.iter().map(|t| t.as_str()).collect();
    let layouts: Vec<&str> = Layout::ALL.iter().map(|l| l.as_str()).collect();

    let mut schema = String::from("IR schema:\n");
    schema.push_str(&format!("- version: \"{}\"\n", IR_SCHEMA_VERSION));
    schema.push_str("- componentName: PascalCase identifier\n");
    schema.push_str(&format!("- semanticTag: one of {}\n", tags.join(", ")));
    schema.push_str(
        "- content: {headings: [string], paragraphs: [string], \
         items: [{title, image?, description?, beforeImage?, afterImage?}], video?: string}\n",
    );
    schema.push_str("- lucideIcons: [PascalCase lucide icon names]\n");
    schema.push_str(&format!("- layout: one of {}\n", layouts.join(", ")));
    schema.push_str("- theme: non-empty string\n");
    schema.push_str(&format!(
        "- interactions (optional): booleans {}\n",
        INTERACTION_KEYS.join(", ")
    ));
    schema.push_str("- styleSystem (optional): lowercase adapter id\n");
    schema.push_str(
        "Rules: names containing Footer, Header, Navbar, Navigation or Sidebar must use \
         the matching tag; beforeAfterHover needs beforeImage and afterImage on every item.\n",
    );
    schema
}

pub fn ir_synthesis_prompt(request: &SynthesisRequest) -> String {
    let mut prompt = ir_schema_description();
    prompt.push_str(&format!("\nComponent name: {}\n", request.component_name));
    prompt.push_str(&format!("Request: {}\n", request.user_request));
    if !request.requirements.is_empty() {
        prompt.push_str("Requirements:\n");
        for requirement in &request.requirements {
            prompt.push_str(&format!("- {}\n", requirement));
        }
    }
    prompt.push_str("\nReturn the IR JSON.");
    prompt
}

pub fn ir_repair_prompt(raw_json: &str, errors: &[String]) -> String {
    let mut prompt = ir_schema_description();
    prompt.push_str("\nThis IR failed validation:\n");
    prompt.push_str(raw_json.trim());
    prompt.push_str("\n\nErrors:\n");
    for (i, error) in errors.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, error));
    }
    prompt.push_str("\nReturn the corrected IR JSON. Change only what the errors require.");
    prompt
}

pub fn code_repair_prompt(source: &str, diagnostic: &CompileDiagnostic) -> String {
    let mut prompt = String::from("This Astro component does not compile.\n\nSource:\n");
    prompt.push_str(source);
    prompt.push_str("\n\nCompiler error:\n");
    prompt.push_str(&diagnostic.message);
    if let Some(excerpt) = &diagnostic.source_excerpt {
        prompt.push_str("\n\nCompiler output:\n");
        prompt.push_str(excerpt);
    }
    prompt.push_str("\n\nReturn the complete fixed file.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_every_tag_and_layout() {
        let schema = ir_schema_description();
        for tag in SemanticTag::ALL {
            assert!(schema.contains(tag.as_str()));
        }
        assert!(schema.contains("container, grid, flex, stack"));
        assert!(schema.contains("beforeAfterHover, carousel, mobileMenu"));
    }

    #[test]
    fn test_synthesis_prompt() {
        let request = SynthesisRequest::new("PricingTable", "three tiers").with_requirement("annual toggle");
        let prompt = ir_synthesis_prompt(&request);
        assert!(prompt.contains("Component name: PricingTable"));
        assert!(prompt.contains("Request: three tiers"));
        assert!(prompt.contains("- annual toggle"));
    }

    #[test]
    fn test_repair_prompt_numbers_errors_in_order() {
        let errors = vec!["version: missing required field".to_string(), "theme: empty".to_string()];
        let prompt = ir_repair_prompt("{\"componentName\":\"X\"}", &errors);
        let first = prompt.find("1. version").unwrap();
        let second = prompt.find("2. theme").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_code_repair_prompt() {
        let diagnostic = CompileDiagnostic::new("Unexpected token").with_excerpt("3 | <div");
        let prompt = code_repair_prompt("<section><div</section>", &diagnostic);
        assert!(prompt.contains("<section><div</section>"));
        assert!(prompt.contains("Compiler error:\nUnexpected token"));
        assert!(prompt.contains("3 | <div"));
    }
}
