//! IR Critic - heuristic fit score between a request and its IR
//!
//! Three weighted dimensions, combined like a rubric:
//!
//! | Dimension   | Weight | Signal |
//! |-------------|--------|--------|
//! | Lexical     | 0.5    | request keywords found in the IR text |
//! | Structural  | 0.3    | heading present, body content present |
//! | Interaction | 0.2    | interactions expected for the tag and shape |
//!
//! The score never gates the pipeline; it only feeds telemetry.

use crate::ir::{split_pascal_words, ComponentIr, Layout, SemanticTag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum keyword length
const MIN_KEYWORD_LEN: usize = 4;

const STOP_WORDS: [&str; 24] = [
    "about", "also", "been", "could", "each", "from", "have", "into", "just", "like", "make",
    "more", "need", "only", "should", "some", "that", "their", "them", "then", "this", "want",
    "with", "would",
];

/// One scored aspect of the IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriticDimension {
    Lexical,
    Structural,
    Interaction,
}

impl CriticDimension {
    pub const ALL: [CriticDimension; 3] = [
        CriticDimension::Lexical,
        CriticDimension::Structural,
        CriticDimension::Interaction,
    ];

    pub fn weight(self) -> f64 {
        match self {
            CriticDimension::Lexical => 0.5,
            CriticDimension::Structural => 0.3,
            CriticDimension::Interaction => 0.2,
        }
    }
}

/// Full critic breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticReport {
    pub lexical: f64,
    pub structural: f64,
    pub interaction: f64,
    /// Weighted total in `[0, 1]`
    pub score: f64,
    /// Request keywords absent from the IR, sorted
    pub missing_keywords: Vec<String>,
}

impl CriticReport {
    pub fn dimension(&self, dimension: CriticDimension) -> f64 {
        match dimension {
            CriticDimension::Lexical => self.lexical,
            CriticDimension::Structural => self.structural,
            CriticDimension::Interaction => self.interaction,
        }
    }
}

/// Weighted fit score in `[0, 1]`.
pub fn score_ir(ir: &ComponentIr, original_request: &str) -> f64 {
    critique(ir, original_request).score
}

/// Score every dimension of `ir` against the request that produced it.
pub fn critique(ir: &ComponentIr, original_request: &str) -> CriticReport {
    let keywords = extract_keywords(original_request);
    let corpus = ir_corpus(ir);
    let missing_keywords: Vec<String> = keywords
        .iter()
        .filter(|kw| !corpus.contains(kw.as_str()))
        .cloned()
        .collect();

    let lexical = if keywords.is_empty() {
        1.0
    } else {
        (keywords.len() - missing_keywords.len()) as f64 / keywords.len() as f64
    };
    let structural = structural_score(ir);
    let interaction = interaction_score(ir);

    let mut report = CriticReport {
        lexical,
        structural,
        interaction,
        score: 0.0,
        missing_keywords,
    };
    let total: f64 = CriticDimension::ALL
        .iter()
        .map(|d| d.weight() * report.dimension(*d))
        .sum();
    report.score = total.clamp(0.0, 1.0);
    report
}

/// Lowercased alphabetic words of at least four letters, minus stop words.
pub fn extract_keywords(request: &str) -> BTreeSet<String> {
    request
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| word.chars().count() >= MIN_KEYWORD_LEN)
        .map(|word| word.to_lowercase())
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// Lowercased word set of everything textual in the IR.
fn ir_corpus(ir: &ComponentIr) -> BTreeSet<String> {
    let mut text: Vec<String> = split_pascal_words(ir.component_name.as_str())
        .into_iter()
        .map(str::to_string)
        .collect();
    text.extend(ir.content.headings.iter().cloned());
    text.extend(ir.content.paragraphs.iter().cloned());
    for item in &ir.content.items {
        text.push(item.title.clone());
        if let Some(description) = &item.description {
            text.push(description.clone());
        }
    }

    text.iter()
        .flat_map(|chunk| chunk.split(|c: char| !c.is_alphabetic()))
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect()
}

fn structural_score(ir: &ComponentIr) -> f64 {
    let content = &ir.content;
    let mut score = 0.0;
    if content.headings.iter().any(|h| !h.trim().is_empty()) {
        score += 0.5;
    }
    if !content.paragraphs.is_empty() || !content.items.is_empty() {
        score += 0.5;
    }
    score
}

fn interaction_score(ir: &ComponentIr) -> f64 {
    let mut expectations = vec![!ir.lucide_icons.is_empty()];
    if ir.semantic_tag == SemanticTag::Nav {
        expectations.push(ir.interactions.mobile_menu);
    }
    if ir.content.items.len() > 3 {
        expectations.push(ir.interactions.carousel || ir.layout == Layout::Grid);
    }

    let met = expectations.iter().filter(|met| **met).count();
    met as f64 / expectations.len() as f64
}
