/// Prompt analyzer
///
/// Scores a free-text prompt on clarity, specificity and structure using fixed
/// keyword vocabularies. Pure and deterministic: the same text always yields
/// the same analysis.

use crate::workflow::Complexity;
use serde::{Deserialize, Serialize};

const TECHNICAL_TERMS: &[&str] = &[
    "component",
    "function",
    "api",
    "database",
    "authentication",
    "responsive",
    "typescript",
    "react",
    "nextjs",
    "tailwind",
    "hooks",
    "state",
    "props",
    "interface",
    "async",
    "await",
];

/// Intent vocabulary
const CLARITY_INDICATORS: &[&str] = &[
    "create", "build", "make", "add", "implement", "design", "with", "that", "should", "must",
];

/// Detail vocabulary
const SPECIFICITY_INDICATORS: &[&str] = &[
    "color", "size", "style", "layout", "button", "form", "page", "component", "feature",
];

const STRUCTURE_MARKERS: &[&str] = &["1.", "-", "•", "Requirements:", "Features:"];

pub const MISSING_STYLING: &str = "Styling preferences";
pub const MISSING_RESPONSIVE: &str = "Responsive design requirements";
pub const MISSING_DETAIL: &str = "Detailed requirements";
pub const MISSING_OUTPUT_TYPE: &str = "Clear output type specification";

pub const STRENGTH_DETAILED: &str = "Detailed description";
pub const STRENGTH_TECHNICAL: &str = "Technical specificity";
pub const STRENGTH_INTENT: &str = "Clear intent";
pub const STRENGTH_REQUIREMENTS: &str = "Specific requirements";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAnalysis {
    pub word_count: usize,
    pub complexity: Complexity,
    /// 0..=100
    pub clarity: u32,
    /// 0..=100
    pub specificity: u32,
    /// 0..=80
    pub structure: u32,
    pub missing_elements: Vec<String>,
    pub strengths: Vec<String>,
}

impl PromptAnalysis {
    pub fn is_missing(&self, element: &str) -> bool {
        self.missing_elements.iter().any(|e| e == element)
    }

    pub fn has_strength(&self, strength: &str) -> bool {
        self.strengths.iter().any(|s| s == strength)
    }
}

/// Count tokens containing any vocabulary entry (case-insensitive)
fn count_hits(tokens: &[String], vocabulary: &[&str]) -> usize {
    tokens
        .iter()
        .filter(|token| vocabulary.iter().any(|term| token.contains(term)))
        .count()
}

/// Hit ratio scaled by `weight`, capped at 100; zero for empty input
fn ratio_score(hits: usize, word_count: usize, weight: f64) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    (hits as f64 / word_count as f64 * weight).min(100.0)
}

pub fn analyze(prompt: &str) -> PromptAnalysis {
    let tokens: Vec<String> = prompt.split_whitespace().map(str::to_lowercase).collect();
    let word_count = tokens.len();
    let technical_hits = count_hits(&tokens, TECHNICAL_TERMS);

    let complexity = if word_count > 50 && technical_hits > 3 {
        Complexity::Advanced
    } else if word_count > 20 && technical_hits > 1 {
        Complexity::Intermediate
    } else {
        Complexity::Basic
    };

    let clarity = ratio_score(count_hits(&tokens, CLARITY_INDICATORS), word_count, 200.0);
    let specificity = ratio_score(count_hits(&tokens, SPECIFICITY_INDICATORS), word_count, 150.0);
    let structure = if STRUCTURE_MARKERS.iter().any(|marker| prompt.contains(marker)) {
        80.0
    } else {
        (word_count as f64 * 2.0).min(80.0)
    };

    let lower = prompt.to_lowercase();
    let mut missing_elements = Vec::new();
    if !lower.contains("style") && !lower.contains("design") {
        missing_elements.push(MISSING_STYLING.to_string());
    }
    if !lower.contains("responsive") && !lower.contains("mobile") {
        missing_elements.push(MISSING_RESPONSIVE.to_string());
    }
    if word_count < 10 {
        missing_elements.push(MISSING_DETAIL.to_string());
    }
    // Output type is matched on the raw text
    if !["component", "page", "app"].iter().any(|kind| prompt.contains(kind)) {
        missing_elements.push(MISSING_OUTPUT_TYPE.to_string());
    }

    let mut strengths = Vec::new();
    if word_count > 30 {
        strengths.push(STRENGTH_DETAILED.to_string());
    }
    if technical_hits > 2 {
        strengths.push(STRENGTH_TECHNICAL.to_string());
    }
    if clarity > 60.0 {
        strengths.push(STRENGTH_INTENT.to_string());
    }
    if specificity > 50.0 {
        strengths.push(STRENGTH_REQUIREMENTS.to_string());
    }

    PromptAnalysis {
        word_count,
        complexity,
        clarity: clarity.round() as u32,
        specificity: specificity.round() as u32,
        structure: structure.round() as u32,
        missing_elements,
        strengths,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn login_form_scores() {
        let analysis = analyze("build a login form");
        assert_eq!(analysis.word_count, 4);
        assert_eq!(analysis.complexity, Complexity::Basic);
        assert_eq!(analysis.clarity, 50);
        assert_eq!(analysis.specificity, 38);
        assert_eq!(analysis.structure, 8);
        assert_eq!(
            analysis.missing_elements,
            vec![MISSING_STYLING, MISSING_RESPONSIVE, MISSING_DETAIL, MISSING_OUTPUT_TYPE]
        );
        assert!(analysis.strengths.is_empty());
    }

    #[test]
    fn analysis_is_deterministic() {
        let text = "Create a responsive React component with a form, button and layout";
        assert_eq!(analyze(text), analyze(text));
    }

    #[test]
    fn empty_input_scores_zero() {
        let analysis = analyze("   ");
        assert_eq!(analysis.word_count, 0);
        assert_eq!(analysis.clarity, 0);
        assert_eq!(analysis.specificity, 0);
        assert_eq!(analysis.structure, 0);
        assert!(analysis.is_missing(MISSING_DETAIL));
    }

    #[test]
    fn structure_markers_and_advanced_complexity() {
        let mut text = String::from("Requirements: build a react component using typescript hooks and state with api calls.");
        for _ in 0..40 {
            text.push_str(" word");
        }
        let analysis = analyze(&text);
        assert_eq!(analysis.structure, 80);
        assert_eq!(analysis.complexity, Complexity::Advanced);
        assert!(analysis.has_strength(STRENGTH_DETAILED));
        assert!(analysis.has_strength(STRENGTH_TECHNICAL));
        assert!(!analysis.is_missing(MISSING_OUTPUT_TYPE));
    }

    #[test]
    fn scores_cap_at_one_hundred() {
        let analysis = analyze("create build make");
        assert_eq!(analysis.clarity, 100);
        assert!(analysis.has_strength(STRENGTH_INTENT));
    }
}
