use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Equation shown when a request does not carry one of its own.
/// Incoming prompts are never parsed into math content.
pub const DEFAULT_EQUATION: &str = "E = mc^2";

/// Content categories with a dedicated scene recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Algebra,
    Geometry,
    Calculus,
    /// Unrecognized category strings land here instead of failing to parse;
    /// they get the generic title/equation frame only
    #[serde(other)]
    #[value(name = "generic")]
    Unknown,
}

/// Describes what a scene should contain.
///
/// This is deliberately a loose bag of fields: templates read the parts they
/// understand and silently ignore the rest. There is no validation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub topic: String,
    pub equation: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub steps: Vec<String>,
    /// Sub-kind within a category: "circle", "triangle", "derivative", "integral"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ContentRecord {
    /// Build the record for an incoming request. The prompt only becomes the
    /// on-screen caption and the narration text.
    pub fn from_prompt(topic: &str, prompt: &str) -> Self {
        Self {
            topic: topic.to_string(),
            equation: DEFAULT_EQUATION.to_string(),
            explanation: prompt.to_string(),
            category: None,
            steps: Vec::new(),
            kind: None,
        }
    }

    /// A representative record for a category, used by the `sample`
    /// subcommand and as a starting point for hand-written content files.
    pub fn sample(category: Category) -> Self {
        match category {
            Category::Algebra => Self {
                topic: "Factoring Quadratics".to_string(),
                equation: "x^2 - 5x + 6 = 0".to_string(),
                explanation: "Factor the quadratic and read off the roots.".to_string(),
                category: Some(Category::Algebra),
                steps: vec![
                    "(x - 2)(x - 3) = 0".to_string(),
                    "x = 2, \\quad x = 3".to_string(),
                ],
                kind: None,
            },
            Category::Geometry => Self {
                topic: "Area of a Circle".to_string(),
                equation: "A = \\pi r^2".to_string(),
                explanation: "The area grows with the square of the radius.".to_string(),
                category: Some(Category::Geometry),
                steps: Vec::new(),
                kind: Some("circle".to_string()),
            },
            Category::Calculus => Self {
                topic: "The Derivative of Sine".to_string(),
                equation: "f(x) = \\sin(x)".to_string(),
                explanation: "The slope of sine traces out cosine.".to_string(),
                category: Some(Category::Calculus),
                steps: Vec::new(),
                kind: Some("derivative".to_string()),
            },
            Category::Unknown => Self::from_prompt("Relativity", "Energy and mass are equivalent."),
        }
    }

    /// One-line-per-field summary for CLI output
    pub fn summarize(&self) -> String {
        let mut summary = String::new();
        summary.push_str(&format!("Topic: {}\n", self.topic));
        summary.push_str(&format!("Equation: {}\n", self.equation));
        match self.category {
            Some(category) => summary.push_str(&format!("Category: {:?}\n", category)),
            None => summary.push_str("Category: (none, generic scene)\n"),
        }
        if let Some(kind) = &self.kind {
            summary.push_str(&format!("Kind: {}\n", kind));
        }
        if !self.steps.is_empty() {
            summary.push_str(&format!("Steps: {}\n", self.steps.len()));
        }
        summary
    }
}
