/// Prompt optimizer
///
/// Rewrites a prompt for a target AI tool using the analyzer's findings,
/// expert system prompts from the catalog and per-tool profiles.

use crate::catalog::{PromptCatalog, SystemPrompt};
use crate::lab::analyzer::{
    analyze, PromptAnalysis, MISSING_RESPONSIVE, MISSING_STYLING, STRENGTH_TECHNICAL,
};
use crate::workflow::Complexity;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_TOOL: &str = "v0";
const MAX_EXPERTS: usize = 3;
const MAX_KEY_PRACTICES: usize = 3;
const MAX_SUGGESTIONS: usize = 4;

/// Per-tool optimization data
#[derive(Debug, Clone, Copy)]
pub struct ToolProfile {
    pub id: &'static str,
    pub practices: [&'static str; 2],
    /// Block appended to every optimized prompt for this tool
    pub enhancement: &'static str,
    pub suggestion: &'static str,
}

pub const TOOL_PROFILES: &[ToolProfile] = &[
    ToolProfile {
        id: "v0",
        practices: ["Create reusable React components", "Follow modern design principles"],
        enhancement: "\n\nRequirements:\n- Use TypeScript with proper interfaces\n- Implement responsive design with Tailwind CSS\n- Include accessibility features\n- Follow React best practices",
        suggestion: "Mention component props, state requirements, or interaction patterns",
    },
    ToolProfile {
        id: "cursor",
        practices: ["Provide clear context", "Use incremental improvements"],
        enhancement: "\n\nContext:\n- Working in an existing codebase\n- Need incremental improvements\n- Maintain code consistency",
        suggestion: "Provide context about existing code structure or conventions",
    },
    ToolProfile {
        id: "devin",
        practices: ["Include architecture considerations", "Plan for scalability"],
        enhancement: "\n\nProject Requirements:\n- Full-stack implementation\n- Scalable architecture\n- Production-ready code\n- Include testing strategy",
        suggestion: "Include deployment, testing, or scalability requirements",
    },
    ToolProfile {
        id: "claude",
        practices: ["Request detailed explanations", "Ask for alternative approaches"],
        enhancement: "\n\nPlease provide:\n- Step-by-step explanation\n- Alternative approaches\n- Pros and cons of each solution",
        suggestion: "Ask for explanations, alternatives, or step-by-step breakdowns",
    },
];

/// Content markers and the practice each one implies
const PRACTICE_MARKERS: &[(&str, &str)] = &[
    ("typescript", "Use TypeScript for type safety"),
    ("responsive", "Implement responsive design"),
    ("accessibility", "Include accessibility features"),
    ("error handling", "Add proper error handling"),
    ("performance", "Optimize for performance"),
    ("semantic html", "Use semantic HTML elements"),
    ("tailwind", "Use Tailwind CSS for styling"),
    ("hooks", "Use modern React patterns and hooks"),
];

pub fn tool_profile(tool: &str) -> Option<&'static ToolProfile> {
    TOOL_PROFILES
        .iter()
        .find(|profile| profile.id.eq_ignore_ascii_case(tool))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub improvements: Vec<String>,
    pub expert_prompts: Vec<SystemPrompt>,
    /// 30..=95
    pub confidence: u32,
    pub optimization_reason: String,
    pub suggestions: Vec<String>,
    pub analysis: PromptAnalysis,
}

/// Up to three catalog prompts relevant to the text or the tool
fn select_experts(catalog: &PromptCatalog, prompt: &str, target_tool: &str) -> Vec<SystemPrompt> {
    let lower_prompt = prompt.to_lowercase();
    let lower_tool = target_tool.to_lowercase();
    catalog
        .list()
        .into_iter()
        .filter(|expert| {
            expert.tool.to_lowercase() == lower_tool
                || expert.tags.iter().any(|tag| lower_prompt.contains(tag.as_str()))
                || (!lower_tool.is_empty() && expert.category.to_lowercase().contains(&lower_tool))
        })
        .take(MAX_EXPERTS)
        .collect()
}

fn best_practices(experts: &[SystemPrompt], profile: Option<&ToolProfile>) -> Vec<String> {
    let mut practices: Vec<String> = Vec::new();
    let mut push = |practice: &str| {
        if !practices.iter().any(|p| p == practice) {
            practices.push(practice.to_string());
        }
    };

    for expert in experts {
        let content = expert.content.to_lowercase();
        for &(marker, practice) in PRACTICE_MARKERS {
            if content.contains(marker) {
                push(practice);
            }
        }
    }
    if let Some(profile) = profile {
        for practice in profile.practices {
            push(practice);
        }
    }
    practices
}

fn optimized_text(
    prompt: &str,
    analysis: &PromptAnalysis,
    practices: &[String],
    profile: Option<&ToolProfile>,
) -> String {
    let lower = prompt.to_lowercase();
    let mut optimized = if analysis.word_count < 20 {
        let subject = if lower.contains("component") {
            "React component"
        } else {
            "solution"
        };
        format!("Create a {} that {}.", subject, lower)
    } else {
        prompt.to_string()
    };

    if analysis.is_missing(MISSING_STYLING) {
        optimized.push_str("\n- Use modern, clean design with appropriate colors and spacing");
    }
    if analysis.is_missing(MISSING_RESPONSIVE) {
        optimized.push_str("\n- Ensure mobile-first responsive design");
    }
    if let Some(profile) = profile {
        optimized.push_str(profile.enhancement);
    }
    if !practices.is_empty() {
        let bullets: Vec<String> = practices
            .iter()
            .take(MAX_KEY_PRACTICES)
            .map(|practice| format!("- {}", practice))
            .collect();
        optimized.push_str("\n\nKey Practices:\n");
        optimized.push_str(&bullets.join("\n"));
    }
    optimized
}

fn confidence(analysis: &PromptAnalysis, expert_count: usize) -> u32 {
    let mut score = 50.0;
    score += (analysis.clarity as f64 / 5.0).min(20.0);
    score += (analysis.specificity as f64 / 7.0).min(15.0);
    score += (analysis.structure as f64 / 10.0).min(10.0);
    score += (expert_count as f64 * 5.0).min(15.0);

    if analysis.word_count < 5 {
        score -= 20.0;
    }
    if analysis.complexity == Complexity::Basic && analysis.word_count < 15 {
        score -= 10.0;
    }
    (score.round() as i64).clamp(30, 95) as u32
}

fn improvements(analysis: &PromptAnalysis, practices: &[String]) -> Vec<String> {
    let mut improvements = Vec::new();
    if analysis.clarity < 70 {
        improvements.push("Enhanced clarity and intent");
    }
    if analysis.specificity < 60 {
        improvements.push("Added specific requirements and constraints");
    }
    if analysis.structure < 60 {
        improvements.push("Improved prompt structure and organization");
    }
    if !analysis.missing_elements.is_empty() {
        improvements.push("Included missing essential elements");
    }
    if !practices.is_empty() {
        improvements.push("Incorporated expert best practices");
    }
    improvements.push("Aligned with target tool capabilities");
    improvements.push("Added context for better understanding");
    improvements.into_iter().map(String::from).collect()
}

fn reason(analysis: &PromptAnalysis, target_tool: &str, expert_count: usize) -> String {
    let mut reasons = Vec::new();
    if analysis.word_count < 15 {
        reasons.push("expanded brief prompt with essential details".to_string());
    }
    if analysis.clarity < 70 {
        reasons.push("clarified intent and requirements".to_string());
    }
    if analysis.specificity < 60 {
        reasons.push("added specific technical requirements".to_string());
    }
    if expert_count > 0 {
        reasons.push(format!("incorporated {} expert prompt patterns", expert_count));
    }
    reasons.push(format!(
        "optimized for {}'s capabilities and output format",
        target_tool
    ));
    format!("Optimized by {}.", reasons.join(", "))
}

fn suggestions(analysis: &PromptAnalysis, profile: Option<&ToolProfile>) -> Vec<String> {
    let mut suggestions = Vec::new();
    if analysis.word_count < 30 {
        suggestions.push("Consider adding more specific details about desired functionality");
    }
    if !analysis.has_strength(STRENGTH_TECHNICAL) {
        suggestions.push("Include technical requirements like frameworks, libraries, or patterns");
    }
    if analysis.is_missing(MISSING_STYLING) {
        suggestions.push("Specify design preferences, color schemes, or UI library choices");
    }
    if let Some(profile) = profile {
        suggestions.push(profile.suggestion);
    }
    suggestions
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(String::from)
        .collect()
}

/// Optimize `prompt` for `target_tool`; unknown tools get no tool block
pub fn optimize(catalog: &PromptCatalog, prompt: &str, target_tool: &str) -> OptimizationResult {
    let analysis = analyze(prompt);
    let profile = tool_profile(target_tool);
    if profile.is_none() && !target_tool.trim().is_empty() {
        tracing::warn!("⚠️ No optimization profile for tool '{}'", target_tool);
    }

    let expert_prompts = select_experts(catalog, prompt, target_tool);
    let practices = best_practices(&expert_prompts, profile);

    OptimizationResult {
        original_prompt: prompt.to_string(),
        optimized_prompt: optimized_text(prompt, &analysis, &practices, profile),
        improvements: improvements(&analysis, &practices),
        confidence: confidence(&analysis, expert_prompts.len()),
        optimization_reason: reason(&analysis, target_tool, expert_prompts.len()),
        suggestions: suggestions(&analysis, profile),
        expert_prompts,
        analysis,
    }
}
