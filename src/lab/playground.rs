/// Prompt playground engine
///
/// Experiments hold a base prompt and styled variations of it. Results are
/// simulated with metrics biased by each variation's style, tone and
/// complexity. Experiment values are never mutated in place.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_VARIATION_COUNT: usize = 3;

/// A reusable prompt skeleton with `{VARIABLE}` slots
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_prompt: &'static str,
    pub variables: &'static [&'static str],
    pub examples: &'static [&'static str],
    pub category: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledPrompt {
    pub prompt: String,
    /// Declared variables without a value; their slots are left in place
    pub unfilled: Vec<String>,
}

impl PromptTemplate {
    pub fn fill(&self, values: &HashMap<String, String>) -> FilledPrompt {
        let mut prompt = self.base_prompt.to_string();
        let mut unfilled = Vec::new();
        for variable in self.variables {
            match values.get(*variable).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(value) => prompt = prompt.replace(&format!("{{{}}}", variable), value),
                None => unfilled.push(variable.to_string()),
            }
        }
        FilledPrompt { prompt, unfilled }
    }
}

pub const PROMPT_TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        id: "component-creation",
        name: "Component Creation",
        description: "Create React components with specific requirements",
        base_prompt: "Create a React component for {COMPONENT_TYPE} that {FUNCTIONALITY}",
        variables: &["COMPONENT_TYPE", "FUNCTIONALITY"],
        examples: &[
            "Create a React component for a login form that includes email validation and password strength checking",
            "Create a React component for a data table that supports sorting, filtering, and pagination",
        ],
        category: "Code Generation",
    },
    PromptTemplate {
        id: "api-integration",
        name: "API Integration",
        description: "Generate API integration code and workflows",
        base_prompt: "Create an API integration that {ACTION} from {SOURCE} to {DESTINATION}",
        variables: &["ACTION", "SOURCE", "DESTINATION"],
        examples: &[
            "Create an API integration that syncs user data from Stripe to our CRM system",
            "Create an API integration that fetches weather data from OpenWeather API and displays it",
        ],
        category: "Integration",
    },
    PromptTemplate {
        id: "workflow-automation",
        name: "Workflow Automation",
        description: "Design automation workflows for various tasks",
        base_prompt: "Design a workflow that automatically {TASK} when {TRIGGER} occurs",
        variables: &["TASK", "TRIGGER"],
        examples: &[
            "Design a workflow that automatically sends welcome emails when new users sign up",
            "Design a workflow that automatically backs up database when disk usage exceeds 80%",
        ],
        category: "Automation",
    },
    PromptTemplate {
        id: "data-processing",
        name: "Data Processing",
        description: "Create data transformation and processing solutions",
        base_prompt: "Process {DATA_TYPE} data to {TRANSFORMATION} and output {FORMAT}",
        variables: &["DATA_TYPE", "TRANSFORMATION", "FORMAT"],
        examples: &[
            "Process CSV sales data to calculate monthly totals and output JSON reports",
            "Process user activity logs to identify patterns and output visualization charts",
        ],
        category: "Data",
    },
];

pub fn prompt_template(id: &str) -> Option<&'static PromptTemplate> {
    PROMPT_TEMPLATES.iter().find(|template| template.id == id)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
}

impl VariationParameters {
    fn style(&self) -> &str {
        self.style.as_deref().unwrap_or_default()
    }

    fn tone(&self) -> &str {
        self.tone.as_deref().unwrap_or_default()
    }

    fn complexity(&self) -> &str {
        self.complexity.as_deref().unwrap_or_default()
    }
}

struct VariationPreset {
    name: &'static str,
    style: &'static str,
    complexity: &'static str,
    tone: &'static str,
    color: &'static str,
}

impl VariationPreset {
    fn parameters(&self) -> VariationParameters {
        VariationParameters {
            style: Some(self.style.to_string()),
            complexity: Some(self.complexity.to_string()),
            tone: Some(self.tone.to_string()),
            ..VariationParameters::default()
        }
    }
}

static PRESETS: [VariationPreset; 4] = [
    VariationPreset { name: "Detailed", style: "detailed", complexity: "advanced", tone: "technical", color: "blue" },
    VariationPreset { name: "Concise", style: "concise", complexity: "basic", tone: "simple", color: "green" },
    VariationPreset { name: "Creative", style: "creative", complexity: "intermediate", tone: "innovative", color: "purple" },
    VariationPreset { name: "Professional", style: "professional", complexity: "advanced", tone: "formal", color: "gray" },
];

const STYLE_SUFFIXES: &[(&str, &str)] = &[
    ("detailed", "\n\nPlease provide detailed explanations, include code comments, and explain the reasoning behind design decisions."),
    ("concise", "\n\nKeep the response concise and focus on the essential implementation details only."),
    ("creative", "\n\nFeel free to suggest innovative approaches and creative solutions that go beyond basic requirements."),
    ("professional", "\n\nEnsure the solution follows industry best practices, includes proper error handling, and is production-ready."),
];

const TONE_SUFFIXES: &[(&str, &str)] = &[
    ("technical", " Use technical terminology and assume advanced knowledge."),
    ("simple", " Explain in simple terms suitable for beginners."),
    ("innovative", " Focus on cutting-edge techniques and modern approaches."),
    ("formal", " Maintain a professional and formal tone throughout."),
];

const COMPLEXITY_SUFFIXES: &[(&str, &str)] = &[
    ("basic", " Keep the implementation simple and straightforward."),
    ("intermediate", " Include moderate complexity with some advanced features."),
    ("advanced", " Implement advanced features, optimizations, and comprehensive error handling."),
];

const DETAILED_OUTPUT: &str = r#"Here's a comprehensive implementation with detailed explanations:

```typescript
// Detailed component implementation with full TypeScript support
interface LoginFormProps {
  onSubmit: (credentials: LoginCredentials) => Promise<void>
  isLoading?: boolean
}

const LoginForm: React.FC<LoginFormProps> = ({ onSubmit, isLoading = false }) => {
  // Implementation details with extensive comments...
}
```

This implementation includes proper TypeScript interfaces, comprehensive error handling, and follows React best practices..."#;

const CONCISE_OUTPUT: &str = r#"```typescript
const LoginForm = ({ onSubmit }) => {
  const [email, setEmail] = useState('')
  const [password, setPassword] = useState('')

  return (
    <form onSubmit={handleSubmit}>
      <input type="email" value={email} onChange={e => setEmail(e.target.value)} />
      <input type="password" value={password} onChange={e => setPassword(e.target.value)} />
      <button type="submit">Login</button>
    </form>
  )
}
```"#;

const CREATIVE_OUTPUT: &str = r#"Here's an innovative approach using modern React patterns:

```typescript
// Using compound component pattern with context
const LoginForm = {
  Root: LoginFormRoot,
  Field: LoginFormField,
  Submit: LoginFormSubmit,
}

// Innovative features: biometric auth, progressive enhancement, micro-interactions
```

This creative solution incorporates cutting-edge UX patterns and accessibility features..."#;

const PROFESSIONAL_OUTPUT: &str = r#"Enterprise-grade login form implementation:

```typescript
/**
 * Production-ready login form component
 * @version 1.0.0
 * @author Development Team
 */
interface LoginFormProps extends FormHTMLAttributes<HTMLFormElement> {
  onSubmit: (credentials: LoginCredentials) => Promise<AuthResult>
  validationSchema?: ValidationSchema
  securityConfig?: SecurityConfiguration
}

export const LoginForm: React.FC<LoginFormProps> = (props) => {
  // Enterprise implementation with security, monitoring, and compliance...
}
```

This implementation meets enterprise security standards and includes comprehensive audit logging..."#;

const SAMPLE_OUTPUTS: &[(&str, &str)] = &[
    ("detailed", DETAILED_OUTPUT),
    ("concise", CONCISE_OUTPUT),
    ("creative", CREATIVE_OUTPUT),
    ("professional", PROFESSIONAL_OUTPUT),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptVariation {
    pub id: String,
    pub name: String,
    pub prompt: String,
    pub parameters: VariationParameters,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetrics {
    /// Milliseconds
    pub response_time: u32,
    pub token_count: u32,
    pub quality: u32,
    pub relevance: u32,
    pub creativity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentResult {
    pub variation_id: String,
    pub output: String,
    pub metrics: ResultMetrics,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundExperiment {
    pub id: String,
    pub name: String,
    pub base_prompt: String,
    pub variations: Vec<PromptVariation>,
    pub results: Vec<ExperimentResult>,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Append the style, tone and complexity instructions to `base_prompt`
pub fn apply_variation_style(base_prompt: &str, parameters: &VariationParameters) -> String {
    let mut prompt = base_prompt.to_string();
    for suffix in [
        lookup(STYLE_SUFFIXES, parameters.style()),
        lookup(TONE_SUFFIXES, parameters.tone()),
        lookup(COMPLEXITY_SUFFIXES, parameters.complexity()),
    ]
    .into_iter()
    .flatten()
    {
        prompt.push_str(suffix);
    }
    prompt
}

/// One variation per preset, at most four
pub fn generate_variations(base_prompt: &str, count: usize) -> Vec<PromptVariation> {
    PRESETS
        .iter()
        .take(count)
        .enumerate()
        .map(|(index, preset)| {
            let parameters = preset.parameters();
            PromptVariation {
                id: format!("variation-{}", index + 1),
                name: preset.name.to_string(),
                prompt: apply_variation_style(base_prompt, &parameters),
                parameters,
                color: preset.color.to_string(),
            }
        })
        .collect()
}

pub fn create_experiment(name: &str, base_prompt: &str, count: usize) -> PlaygroundExperiment {
    let created_at = Utc::now();
    let experiment = PlaygroundExperiment {
        id: format!("experiment-{}", created_at.timestamp_millis()),
        name: name.to_string(),
        base_prompt: base_prompt.to_string(),
        variations: generate_variations(base_prompt, count),
        results: Vec::new(),
        created_at,
        tags: vec!["experiment".to_string()],
    };
    tracing::debug!(
        "🧪 Created experiment {} with {} variations",
        experiment.id,
        experiment.variations.len()
    );
    experiment
}

/// Copy of `experiment` with one more variation appended
pub fn add_variation(
    experiment: &PlaygroundExperiment,
    name: &str,
    prompt: &str,
    parameters: VariationParameters,
) -> PlaygroundExperiment {
    let position = experiment.variations.len();
    let mut next = experiment.clone();
    next.variations.push(PromptVariation {
        id: format!("variation-{}", position + 1),
        name: name.to_string(),
        prompt: prompt.to_string(),
        parameters,
        color: PRESETS[position % PRESETS.len()].color.to_string(),
    });
    next
}

fn sample_output(parameters: &VariationParameters) -> &'static str {
    lookup(SAMPLE_OUTPUTS, parameters.style()).unwrap_or(DETAILED_OUTPUT)
}

fn simulate_metrics(parameters: &VariationParameters, rng: &mut impl Rng) -> ResultMetrics {
    let token_bias = match parameters.style() {
        "detailed" => 100.0,
        "concise" => -50.0,
        _ => 0.0,
    };
    let quality_base = match parameters.complexity() {
        "advanced" => 85.0,
        "intermediate" => 75.0,
        _ => 65.0,
    };
    let relevance_base = if parameters.style() == "professional" { 90.0 } else { 80.0 };
    let creativity_base = if parameters.tone() == "innovative" {
        85.0
    } else if parameters.style() == "creative" {
        80.0
    } else {
        60.0
    };

    ResultMetrics {
        response_time: (2000.0 + rng.gen::<f64>() * 1000.0).round() as u32,
        token_count: (150.0 + token_bias + rng.gen::<f64>() * 50.0).round() as u32,
        quality: (quality_base + rng.gen::<f64>() * 15.0).round() as u32,
        relevance: (relevance_base + rng.gen::<f64>() * 10.0).round() as u32,
        creativity: (creativity_base + rng.gen::<f64>() * 15.0).round() as u32,
    }
}

pub fn simulate_results(variations: &[PromptVariation], rng: &mut impl Rng) -> Vec<ExperimentResult> {
    variations
        .iter()
        .map(|variation| ExperimentResult {
            variation_id: variation.id.clone(),
            output: sample_output(&variation.parameters).to_string(),
            metrics: simulate_metrics(&variation.parameters, rng),
            timestamp: Utc::now(),
        })
        .collect()
}

/// Copy of `experiment` carrying simulated results for all variations
pub fn run_experiment(experiment: &PlaygroundExperiment, rng: &mut impl Rng) -> PlaygroundExperiment {
    let mut next = experiment.clone();
    next.results = simulate_results(&experiment.variations, rng);
    next
}
