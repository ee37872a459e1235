use crate::models::{ScoreInputs, StudentLevel};

const SCORE_VARS: [&str; 5] = [
    "HTML_SCORE",
    "CSS_SCORE",
    "STRUCTURE_SCORE",
    "TYPOGRAPHY_SCORE",
    "PRACTICES_SCORE",
];

/// Everything the run needs, read once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub scores: ScoreInputs,
    pub error_count: String,
    pub html_errors: String,
    pub css_errors: String,
    pub competence: String,
    pub bareme: String,
    pub files: String,
    pub repository: String,
    pub niveau: String,
    pub level: StudentLevel,
    pub ai_available: bool,
    pub ai_response: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let defaults = ScoreInputs::default();

        let parsed: Result<Vec<u32>, String> = SCORE_VARS
            .iter()
            .map(|key| parse_score(&lookup, key))
            .collect();
        let [html, css, structure, typography, practices] = match parsed {
            Ok(values) => [values[0], values[1], values[2], values[3], values[4]],
            Err(key) => {
                log::warn!("{key} is not a valid integer, scoring every criterion as 0");
                [0; 5]
            }
        };

        let scores = ScoreInputs {
            html,
            css,
            structure,
            typography,
            practices,
            html_max: parse_or_default(&lookup, "HTML_MAX_SCORE", defaults.html_max),
            css_max: parse_or_default(&lookup, "CSS_MAX_SCORE", defaults.css_max),
            total_max: parse_or_default(&lookup, "TOTAL_MAX_SCORE", defaults.total_max),
            criterion_max: defaults.criterion_max,
            excellent_threshold: parse_or_default(
                &lookup,
                "EXCELLENT_THRESHOLD",
                defaults.excellent_threshold,
            ),
            good_threshold: parse_or_default(&lookup, "GOOD_THRESHOLD", defaults.good_threshold),
            validation_min: parse_or_default(
                &lookup,
                "VALIDATION_MIN_SCORE",
                defaults.validation_min,
            ),
        }
        .normalized();

        let niveau = text("NIVEAU", "Débutant");
        let ai_response = lookup("AI_RESPONSE").filter(|value| !value.trim().is_empty());

        Self {
            scores,
            error_count: text("ERROR_COUNT", "0"),
            html_errors: text("HTML_ERRORS", ""),
            css_errors: text("CSS_ERRORS", ""),
            competence: text("COMPETENCE", "Développement Web HTML/CSS"),
            bareme: text("BAREME", "Structure HTML (10pts), Style CSS (10pts)"),
            files: text("FILES", "index.html,style.css"),
            repository: text("REPOSITORY", "repository"),
            level: StudentLevel::from_label(&niveau),
            niveau,
            ai_available: text("AI_AVAILABLE", "false").trim().eq_ignore_ascii_case("true"),
            ai_response,
        }
    }

    /// Competence as shown to the student, with the course's usual
    /// misspelling of "développement web" corrected.
    pub fn competence_label(&self) -> String {
        self.competence
            .replace("developement web", "Développement Web")
            .trim()
            .to_string()
    }

    pub fn has_html_errors(&self) -> bool {
        self.error_count.trim() != "0"
    }

    pub fn has_css_errors(&self) -> bool {
        !self.css_errors.trim().is_empty()
    }
}

fn parse_score<F>(lookup: &F, key: &str) -> Result<u32, String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(0),
        Some(raw) => raw.trim().parse().map_err(|_| key.to_string()),
    }
}

fn parse_or_default<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{key}={raw:?} is not a valid integer, using {default}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = Config::default();
        assert_eq!(config.scores, ScoreInputs::default());
        assert_eq!(config.niveau, "Débutant");
        assert_eq!(config.level, StudentLevel::Beginner);
        assert_eq!(config.files, "index.html,style.css");
        assert!(!config.ai_available);
        assert!(config.ai_response.is_none());
        assert!(!config.has_html_errors());
        assert!(!config.has_css_errors());
    }

    #[test]
    fn reads_scores_and_context() {
        let config = config(&[
            ("HTML_SCORE", "2"),
            ("CSS_SCORE", "7"),
            ("STRUCTURE_SCORE", "3"),
            ("TYPOGRAPHY_SCORE", "2"),
            ("PRACTICES_SCORE", "2"),
            ("NIVEAU", "Intermédiaire"),
            ("AI_AVAILABLE", "TRUE"),
            ("AI_RESPONSE", "{}"),
            ("ERROR_COUNT", "2"),
        ]);
        assert_eq!(config.scores.total(), 9);
        assert_eq!(config.scores.structure, 3);
        assert_eq!(config.level, StudentLevel::Intermediate);
        assert!(config.ai_available);
        assert_eq!(config.ai_response.as_deref(), Some("{}"));
        assert!(config.has_html_errors());
    }

    #[test]
    fn unparsable_score_zeroes_every_score() {
        let config = config(&[
            ("HTML_SCORE", "3"),
            ("CSS_SCORE", "abc"),
            ("STRUCTURE_SCORE", "3"),
        ]);
        assert_eq!(config.scores.html, 0);
        assert_eq!(config.scores.css, 0);
        assert_eq!(config.scores.structure, 0);
        assert_eq!(config.scores.total(), 0);
    }

    #[test]
    fn unparsable_maximum_keeps_default() {
        let config = config(&[("TOTAL_MAX_SCORE", "twelve"), ("GOOD_THRESHOLD", "70")]);
        assert_eq!(config.scores.total_max, 12);
        assert_eq!(config.scores.good_threshold, 70);
    }

    #[test]
    fn competence_label_fixes_course_spelling() {
        let config = config(&[("COMPETENCE", " developement web HTML/CSS ")]);
        assert_eq!(config.competence_label(), "Développement Web HTML/CSS");
        assert_eq!(Config::default().competence_label(), "Développement Web HTML/CSS");
    }

    #[test]
    fn blank_ai_response_is_treated_as_absent() {
        let config = config(&[("AI_AVAILABLE", "true"), ("AI_RESPONSE", "   ")]);
        assert!(config.ai_response.is_none());
    }
}
