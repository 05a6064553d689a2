/// Model simulator
///
/// Predicts how each of the four reference AI tools would interpret a prompt.
/// Model behaviour is table-driven: every profile carries its own confidence
/// bonuses, phrasing and tips, so adding a model is a data change.
/// Processing time is randomized; callers inject the RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

const BASE_CONFIDENCE: u32 = 70;
const SPECIALTY_BONUS: u32 = 15;
const MAX_CONFIDENCE: u32 = 95;
const EXCERPT_CHARS: usize = 50;
/// Prompts longer than this many bytes count as complex requests
const COMPLEX_PROMPT_LEN: usize = 100;

const CODE_WORDS: &[&str] = &["create", "build", "make", "component", "function", "app", "website"];
const UI_WORDS: &[&str] = &["form", "button", "page", "layout", "design", "style"];
const COMPLEX_WORDS: &[&str] = &["database", "api", "authentication", "integration", "workflow"];

/// Prompt signal a phrasing can depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Always,
    Code,
    Ui,
    Complex,
}

/// Text chosen by a signal; `{excerpt}` expands to the prompt excerpt
#[derive(Debug, Clone, Copy)]
pub struct Phrasing {
    pub when: Signal,
    pub matched: &'static str,
    pub otherwise: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ModelBehavior {
    pub code_bonus: u32,
    pub ui_bonus: u32,
    pub complex_bonus: u32,
    pub interpretation: Phrasing,
    pub expected_output: Phrasing,
    pub tips: [&'static str; 3],
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub specialties: &'static [&'static str],
    pub prompt_style: &'static str,
    pub output_format: &'static str,
    pub strengths: &'static [&'static str],
    pub limitations: &'static [&'static str],
    #[serde(skip)]
    pub behavior: ModelBehavior,
}

pub const MODEL_PROFILES: &[ModelProfile] = &[
    ModelProfile {
        id: "v0",
        name: "v0",
        description: "React component generation",
        specialties: &["React", "TypeScript", "UI Components", "Tailwind CSS"],
        prompt_style: "Direct, component-focused instructions",
        output_format: "React/TypeScript code with styling",
        strengths: &["Modern React patterns", "Responsive design", "Clean code structure"],
        limitations: &["Limited to frontend components", "No backend logic"],
        behavior: ModelBehavior {
            code_bonus: 10,
            ui_bonus: 15,
            complex_bonus: 0,
            interpretation: Phrasing {
                when: Signal::Ui,
                matched: "v0 would create a React component for \"{excerpt}...\" with modern styling and TypeScript",
                otherwise: "v0 would interpret this as a UI component request and generate React code with appropriate styling",
            },
            expected_output: Phrasing {
                when: Signal::Ui,
                matched: "React/TypeScript component with Tailwind CSS styling, proper props interface, and responsive design",
                otherwise: "Modern React component with clean code structure and appropriate styling",
            },
            tips: [
                "Specify component props and styling preferences",
                "Include responsive design requirements",
                "Mention any specific UI libraries or patterns",
            ],
        },
    },
    ModelProfile {
        id: "cursor",
        name: "Cursor",
        description: "Code completion and editing",
        specialties: &["Code completion", "Refactoring", "Bug fixes", "Multi-language support"],
        prompt_style: "Context-aware, incremental changes",
        output_format: "Code suggestions and completions",
        strengths: &["Context understanding", "Real-time assistance", "Multi-file awareness"],
        limitations: &["Requires existing codebase", "Limited creative generation"],
        behavior: ModelBehavior {
            code_bonus: 10,
            ui_bonus: 0,
            complex_bonus: 0,
            interpretation: Phrasing {
                when: Signal::Always,
                matched: "Cursor would provide contextual code suggestions and completions for \"{excerpt}...\" based on your existing codebase",
                otherwise: "",
            },
            expected_output: Phrasing {
                when: Signal::Always,
                matched: "Contextual code suggestions, auto-completions, and refactoring recommendations based on your codebase",
                otherwise: "",
            },
            tips: [
                "Provide context about existing code structure",
                "Specify the programming language and framework",
                "Include any coding standards or conventions",
            ],
        },
    },
    ModelProfile {
        id: "devin",
        name: "Devin",
        description: "Full-stack development",
        specialties: &["Full-stack apps", "Database design", "API development", "DevOps"],
        prompt_style: "High-level project requirements",
        output_format: "Complete applications with architecture",
        strengths: &["End-to-end development", "Complex problem solving", "Architecture planning"],
        limitations: &["May over-engineer simple tasks", "Longer processing time"],
        behavior: ModelBehavior {
            code_bonus: 10,
            ui_bonus: 0,
            complex_bonus: 10,
            interpretation: Phrasing {
                when: Signal::Complex,
                matched: "Devin would plan a full-stack solution for \"{excerpt}...\" including architecture, database design, and deployment",
                otherwise: "Devin would create a comprehensive implementation with proper project structure and best practices",
            },
            expected_output: Phrasing {
                when: Signal::Code,
                matched: "Complete application with proper architecture, database schema, API endpoints, and deployment configuration",
                otherwise: "Comprehensive solution with detailed implementation plan and best practices",
            },
            tips: [
                "Define project scope and technical requirements",
                "Specify database and deployment preferences",
                "Include performance and scalability needs",
            ],
        },
    },
    ModelProfile {
        id: "claude",
        name: "Claude",
        description: "General AI assistance",
        specialties: &["Analysis", "Writing", "Problem solving", "Code review"],
        prompt_style: "Conversational, detailed explanations",
        output_format: "Detailed responses with reasoning",
        strengths: &["Thorough analysis", "Clear explanations", "Versatile capabilities"],
        limitations: &["Less specialized for coding", "Verbose responses"],
        behavior: ModelBehavior {
            code_bonus: 0,
            ui_bonus: 0,
            complex_bonus: 0,
            interpretation: Phrasing {
                when: Signal::Always,
                matched: "Claude would provide a detailed analysis and step-by-step approach for \"{excerpt}...\" with explanations and alternatives",
                otherwise: "",
            },
            expected_output: Phrasing {
                when: Signal::Always,
                matched: "Detailed explanation with step-by-step approach, code examples, and alternative solutions with pros/cons",
                otherwise: "",
            },
            tips: [
                "Ask for step-by-step explanations if needed",
                "Request alternative approaches or trade-offs",
                "Specify the level of technical detail required",
            ],
        },
    },
];

pub fn models() -> &'static [ModelProfile] {
    MODEL_PROFILES
}

/// Profile for `model_id`, falling back to the first profile
pub fn profile_or_default(model_id: &str) -> &'static ModelProfile {
    match MODEL_PROFILES.iter().find(|profile| profile.id == model_id) {
        Some(profile) => profile,
        None => {
            tracing::warn!(
                "⚠️ Unknown model '{}', simulating {} instead",
                model_id,
                MODEL_PROFILES[0].id
            );
            &MODEL_PROFILES[0]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSimulation {
    /// Display name of the simulated model
    pub model: String,
    pub interpretation: String,
    pub confidence: u32,
    pub suggestions: Vec<String>,
    pub expected_output: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Milliseconds
    pub processing_time: u64,
}

#[derive(Debug, Clone, Copy)]
struct Signals {
    code: bool,
    ui: bool,
    complex: bool,
}

impl Signals {
    fn detect(prompt: &str, words: &[String]) -> Self {
        let has_any = |vocabulary: &[&str]| words.iter().any(|word| vocabulary.contains(&word.as_str()));
        Self {
            code: has_any(CODE_WORDS),
            ui: has_any(UI_WORDS),
            complex: prompt.len() > COMPLEX_PROMPT_LEN || has_any(COMPLEX_WORDS),
        }
    }

    fn holds(&self, signal: Signal) -> bool {
        match signal {
            Signal::Always => true,
            Signal::Code => self.code,
            Signal::Ui => self.ui,
            Signal::Complex => self.complex,
        }
    }
}

fn phrase(phrasing: &Phrasing, signals: &Signals, excerpt: &str) -> String {
    let template = if signals.holds(phrasing.when) {
        phrasing.matched
    } else {
        phrasing.otherwise
    };
    template.replace("{excerpt}", excerpt)
}

pub fn simulate(prompt: &str, model_id: &str, rng: &mut impl Rng) -> ModelSimulation {
    let profile = profile_or_default(model_id);
    let behavior = &profile.behavior;
    let words: Vec<String> = prompt.to_lowercase().split_whitespace().map(String::from).collect();
    let signals = Signals::detect(prompt, &words);

    let mut confidence = BASE_CONFIDENCE;
    let specialty_match = profile.specialties.iter().any(|specialty| {
        let specialty = specialty.to_lowercase();
        words.iter().any(|word| specialty.contains(word.as_str()))
    });
    if specialty_match {
        confidence += SPECIALTY_BONUS;
    }
    if signals.code {
        confidence += behavior.code_bonus;
    }
    if signals.ui {
        confidence += behavior.ui_bonus;
    }
    if signals.complex {
        confidence += behavior.complex_bonus;
    }

    let excerpt: String = prompt.chars().take(EXCERPT_CHARS).collect();
    let mut suggestions = vec![
        format!("Align with {}'s {}", profile.name, profile.prompt_style.to_lowercase()),
        format!("Consider {} requirements", profile.output_format.to_lowercase()),
        "Be specific about desired functionality".to_string(),
    ];
    suggestions.extend(behavior.tips.iter().map(|tip| tip.to_string()));

    let mut processing_time = rng.gen_range(0..5000u64) + 1000;
    if signals.complex {
        processing_time += 3000;
    }

    ModelSimulation {
        model: profile.name.to_string(),
        interpretation: phrase(&behavior.interpretation, &signals, &excerpt),
        confidence: confidence.min(MAX_CONFIDENCE),
        suggestions,
        expected_output: phrase(&behavior.expected_output, &signals, &excerpt),
        strengths: profile.strengths.iter().map(|s| s.to_string()).collect(),
        weaknesses: profile.limitations.iter().map(|s| s.to_string()).collect(),
        processing_time,
    }
}

/// Simulate every profile for the side-by-side view
pub fn simulate_all(prompt: &str, rng: &mut impl Rng) -> Vec<ModelSimulation> {
    MODEL_PROFILES
        .iter()
        .map(|profile| simulate(prompt, profile.id, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn v0_ui_request_scores_high() {
        let mut rng = StdRng::seed_from_u64(7);
        let sim = simulate("build a login form", "v0", &mut rng);
        assert_eq!(sim.model, "v0");
        // 70 + code 10 + ui 15, capped
        assert_eq!(sim.confidence, 95);
        assert_eq!(
            sim.interpretation,
            "v0 would create a React component for \"build a login form...\" with modern styling and TypeScript"
        );
        assert!(sim.expected_output.starts_with("React/TypeScript component"));
        assert_eq!(sim.suggestions.len(), 6);
        assert_eq!(sim.suggestions[0], "Align with v0's direct, component-focused instructions");
        assert!((1000..6000).contains(&sim.processing_time));
    }

    #[test]
    fn devin_complex_request_adds_time_and_bonus() {
        let mut rng = StdRng::seed_from_u64(1);
        let sim = simulate("design the database schema", "devin", &mut rng);
        // "design" hits the Database design specialty
        assert_eq!(sim.confidence, 95);
        assert!(sim.interpretation.starts_with("Devin would plan a full-stack solution"));
        assert_eq!(
            sim.expected_output,
            "Comprehensive solution with detailed implementation plan and best practices"
        );
        assert!((4000..9000).contains(&sim.processing_time));
    }

    #[test]
    fn claude_has_no_code_bonus() {
        let mut rng = StdRng::seed_from_u64(3);
        let sim = simulate("build now", "claude", &mut rng);
        assert_eq!(sim.confidence, 70);
        assert_eq!(sim.weaknesses, vec!["Less specialized for coding", "Verbose responses"]);
    }

    #[test]
    fn unknown_model_falls_back_to_first_profile() {
        let mut rng = StdRng::seed_from_u64(5);
        let sim = simulate("build a login form", "gpt-x", &mut rng);
        assert_eq!(sim.model, "v0");
        assert_eq!(sim.confidence, 95);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let first = simulate_all("create an api", &mut StdRng::seed_from_u64(42));
        let second = simulate_all("create an api", &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        let names: Vec<_> = first.iter().map(|s| s.model.as_str()).collect();
        assert_eq!(names, vec!["v0", "Cursor", "Devin", "Claude"]);
    }

    #[test]
    fn confidence_never_exceeds_cap() {
        let mut rng = StdRng::seed_from_u64(9);
        for model in ["v0", "cursor", "devin", "claude", ""] {
            for prompt in ["", "react form button database api", "x"] {
                assert!(simulate(prompt, model, &mut rng).confidence <= MAX_CONFIDENCE);
            }
        }
    }
}
