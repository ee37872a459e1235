use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Error => "🚫",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub severity: Severity,
    pub issue: String,
    #[serde(default)]
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub technical_details: Vec<Finding>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl StudentLevel {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Débutant" => StudentLevel::Beginner,
            "Intermédiaire" => StudentLevel::Intermediate,
            _ => StudentLevel::Advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Structure,
    Typography,
    Practices,
    Validation,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Structure,
        Criterion::Typography,
        Criterion::Practices,
        Criterion::Validation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Criterion::Structure => "Structure et Organisation CSS",
            Criterion::Typography => "Typographie et Couleurs",
            Criterion::Practices => "Bonnes Pratiques CSS",
            Criterion::Validation => "Validation et Tests",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInputs {
    pub html: u32,
    pub css: u32,
    pub structure: u32,
    pub typography: u32,
    pub practices: u32,
    pub html_max: u32,
    pub css_max: u32,
    pub total_max: u32,
    pub criterion_max: u32,
    pub excellent_threshold: u32,
    pub good_threshold: u32,
    pub validation_min: u32,
}

impl Default for ScoreInputs {
    fn default() -> Self {
        Self {
            html: 0,
            css: 0,
            structure: 0,
            typography: 0,
            practices: 0,
            html_max: 3,
            css_max: 9,
            total_max: 12,
            criterion_max: 3,
            excellent_threshold: 83,
            good_threshold: 67,
            validation_min: 2,
        }
    }
}

impl ScoreInputs {
    pub fn total(&self) -> u32 {
        self.html + self.css
    }

    pub fn score(&self, criterion: Criterion) -> u32 {
        match criterion {
            Criterion::Structure => self.structure,
            Criterion::Typography => self.typography,
            Criterion::Practices => self.practices,
            Criterion::Validation => self.html,
        }
    }

    pub fn max(&self, criterion: Criterion) -> u32 {
        match criterion {
            Criterion::Validation => self.html_max,
            _ => self.criterion_max,
        }
    }

    /// Minimum score below which a criterion triggers its remediation advice.
    pub fn minimum(&self, criterion: Criterion) -> u32 {
        match criterion {
            Criterion::Validation => self.validation_min,
            _ => 2,
        }
    }

    /// Clamps every score into `[0, max]` and the thresholds into `[0, 100]`,
    /// raising the excellent threshold to the good one when they are inverted.
    pub fn normalized(mut self) -> Self {
        self.excellent_threshold = self.excellent_threshold.min(100);
        self.good_threshold = self.good_threshold.min(100);
        if self.excellent_threshold < self.good_threshold {
            log::warn!(
                "EXCELLENT_THRESHOLD {} is below GOOD_THRESHOLD {}, raising it",
                self.excellent_threshold,
                self.good_threshold
            );
            self.excellent_threshold = self.good_threshold;
        }

        self.html = clamp_score("HTML_SCORE", self.html, self.html_max);
        self.css = clamp_score("CSS_SCORE", self.css, self.css_max);
        self.structure = clamp_score("STRUCTURE_SCORE", self.structure, self.criterion_max);
        self.typography = clamp_score("TYPOGRAPHY_SCORE", self.typography, self.criterion_max);
        self.practices = clamp_score("PRACTICES_SCORE", self.practices, self.criterion_max);
        self
    }
}

fn clamp_score(name: &str, score: u32, max: u32) -> u32 {
    if score > max {
        log::warn!("{name} {score} exceeds its maximum {max}, clamping");
        max
    } else {
        score
    }
}
