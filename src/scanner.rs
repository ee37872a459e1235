use std::path::Path;

use crate::models::{EvaluationResult, Finding, Severity};

pub const BASELINE_SCORE: u32 = 20;
pub const HTML_FILE: &str = "index.html";
pub const CSS_FILE: &str = "style.css";

const MAX_WIDTH_PERCENT: f64 = 100.0;
const NEGATIVE_OFFSET_PX: f64 = -100.0;

const POSITION_KEYWORDS: [&str; 10] = [
    "static",
    "relative",
    "absolute",
    "fixed",
    "sticky",
    "inherit",
    "initial",
    "unset",
    "revert",
    "revert-layer",
];
const OFFSET_PROPERTIES: [&str; 10] = [
    "top",
    "left",
    "right",
    "bottom",
    "margin",
    "margin-top",
    "margin-left",
    "margin-right",
    "margin-bottom",
    "text-indent",
];
const TERMINATED_PROPERTIES: [&str; 10] = [
    "color",
    "background",
    "background-color",
    "font-size",
    "font-family",
    "margin",
    "padding",
    "width",
    "height",
    "display",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Html,
    Css,
}

impl Target {
    pub fn file_name(self) -> &'static str {
        match self {
            Target::Html => HTML_FILE,
            Target::Css => CSS_FILE,
        }
    }
}

/// One heuristic line check. `matches` sees every line of the file and the
/// index of the line under test so it can look ahead.
pub struct LineRule {
    pub id: &'static str,
    pub target: Target,
    pub severity: Severity,
    pub deduction: u32,
    pub issue: &'static str,
    pub suggestion: &'static str,
    pub matches: fn(&[&str], usize) -> bool,
}

pub const RULES: &[LineRule] = &[
    LineRule {
        id: "missing-doctype",
        target: Target::Html,
        severity: Severity::Warning,
        deduction: 1,
        issue: "DOCTYPE manquant",
        suggestion: "Ajoutez <!DOCTYPE html> en première ligne",
        matches: missing_doctype,
    },
    LineRule {
        id: "unclosed-button",
        target: Target::Html,
        severity: Severity::Error,
        deduction: 3,
        issue: "Balise <button> non fermée",
        suggestion: "Fermez la balise avec </button>",
        matches: unclosed_button,
    },
    LineRule {
        id: "unclosed-link",
        target: Target::Html,
        severity: Severity::Error,
        deduction: 2,
        issue: "Lien <a> non fermé",
        suggestion: "Fermez le lien avec </a>",
        matches: unclosed_link,
    },
    LineRule {
        id: "class-typo",
        target: Target::Html,
        severity: Severity::Error,
        deduction: 2,
        issue: "Attribut mal orthographié : clas= au lieu de class=",
        suggestion: "Corrigez l'attribut en class=",
        matches: class_typo,
    },
    LineRule {
        id: "img-alt",
        target: Target::Html,
        severity: Severity::Warning,
        deduction: 1,
        issue: "Image sans attribut alt",
        suggestion: "Ajoutez un texte alternatif avec alt=\"...\"",
        matches: image_without_alt,
    },
    LineRule {
        id: "width-overflow",
        target: Target::Css,
        severity: Severity::Error,
        deduction: 4,
        issue: "Largeur supérieure à 100%",
        suggestion: "Limitez la largeur à 100% ou utilisez max-width",
        matches: width_overflow,
    },
    LineRule {
        id: "invalid-position",
        target: Target::Css,
        severity: Severity::Error,
        deduction: 3,
        issue: "Valeur de position invalide",
        suggestion: "Utilisez static, relative, absolute, fixed ou sticky",
        matches: invalid_position,
    },
    LineRule {
        id: "negative-offset",
        target: Target::Css,
        severity: Severity::Warning,
        deduction: 2,
        issue: "Décalage négatif excessif",
        suggestion: "Évitez les grandes valeurs négatives qui sortent l'élément de l'écran",
        matches: negative_offset,
    },
    LineRule {
        id: "missing-semicolon",
        target: Target::Css,
        severity: Severity::Warning,
        deduction: 1,
        issue: "Point-virgule manquant en fin de déclaration",
        suggestion: "Terminez chaque déclaration par ;",
        matches: missing_semicolon,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub score: u32,
    pub findings: Vec<Finding>,
    pub files_scanned: Vec<String>,
}

impl Default for ScanOutcome {
    fn default() -> Self {
        Self {
            score: BASELINE_SCORE,
            findings: Vec::new(),
            files_scanned: Vec::new(),
        }
    }
}

impl ScanOutcome {
    fn record(&mut self, rule_id: &str, finding: Finding, deduction: u32) {
        log::debug!(
            "[{}] {}:{} {} (-{})",
            rule_id,
            finding.file,
            finding.line.unwrap_or(0),
            finding.issue,
            deduction
        );
        self.score = self.score.saturating_sub(deduction);
        self.findings.push(finding);
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .count()
    }
}

/// Reads the fixed input files under `dir` and applies every rule. Missing or
/// unreadable files are skipped.
pub fn scan_dir(dir: &Path) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for target in [Target::Html, Target::Css] {
        let path = dir.join(target.file_name());
        if !path.is_file() {
            log::info!("{} not found, skipping its checks", path.display());
            continue;
        }
        match std::fs::read(&path) {
            Ok(bytes) => scan_text(target, &String::from_utf8_lossy(&bytes), &mut outcome),
            Err(err) => log::warn!("could not read {}: {err}", path.display()),
        }
    }

    outcome
}

pub fn scan_text(target: Target, content: &str, outcome: &mut ScanOutcome) {
    let lines: Vec<&str> = content.lines().collect();
    let file = target.file_name();
    outcome.files_scanned.push(file.to_string());

    for index in 0..lines.len() {
        for rule in RULES.iter().filter(|rule| rule.target == target) {
            if (rule.matches)(&lines, index) {
                outcome.record(
                    rule.id,
                    Finding {
                        file: file.to_string(),
                        line: Some(index as u32 + 1),
                        severity: rule.severity,
                        issue: rule.issue.to_string(),
                        suggestion: rule.suggestion.to_string(),
                    },
                    rule.deduction,
                );
            }
        }
    }
}

fn without_bom(line: &str) -> &str {
    line.trim_start_matches('\u{feff}').trim()
}

/// Fires on the first non-blank line of a full document (one with an `<html`
/// tag) when that line is not the HTML5 doctype.
fn missing_doctype(lines: &[&str], index: usize) -> bool {
    let line = without_bom(lines[index]);
    if line.is_empty() || lines[..index].iter().any(|prev| !without_bom(prev).is_empty()) {
        return false;
    }
    lines.iter().any(|text| text.contains("<html"))
        && !line.to_ascii_lowercase().starts_with("<!doctype html")
}

fn unclosed_within_next_line(lines: &[&str], index: usize, open: &str, close: &str) -> bool {
    if !lines[index].contains(open) {
        return false;
    }
    !lines
        .iter()
        .skip(index)
        .take(2)
        .any(|line| line.contains(close))
}

fn unclosed_button(lines: &[&str], index: usize) -> bool {
    unclosed_within_next_line(lines, index, "<button", "</button>")
}

fn unclosed_link(lines: &[&str], index: usize) -> bool {
    unclosed_within_next_line(lines, index, "<a ", "</a>")
}

fn class_typo(lines: &[&str], index: usize) -> bool {
    lines[index].contains("clas=")
}

fn image_without_alt(lines: &[&str], index: usize) -> bool {
    let line = lines[index];
    line.contains("<img") && !line.contains("alt=")
}

/// Drops a trailing `/* ... */` comment from a CSS line.
fn strip_trailing_comment(line: &str) -> &str {
    let line = line.trim();
    match line.rfind("/*") {
        Some(start) if line.ends_with("*/") => line[..start].trim_end(),
        _ => line,
    }
}

/// Splits `property: value;` into a lowercase property and the bare value.
fn declaration(line: &str) -> Option<(String, &str)> {
    let (property, value) = strip_trailing_comment(line).split_once(':')?;
    let property = property.trim().to_ascii_lowercase();
    if property.is_empty() || property.contains(char::is_whitespace) {
        return None;
    }
    let value = value.trim().trim_end_matches(';').trim();
    let value = value.trim_end_matches("!important").trim();
    Some((property, value))
}

fn width_overflow(lines: &[&str], index: usize) -> bool {
    match declaration(lines[index]) {
        Some((property, value)) if property == "width" => value
            .strip_suffix('%')
            .and_then(|number| number.trim().parse::<f64>().ok())
            .is_some_and(|percent| percent > MAX_WIDTH_PERCENT),
        _ => false,
    }
}

fn invalid_position(lines: &[&str], index: usize) -> bool {
    match declaration(lines[index]) {
        Some((property, value)) if property == "position" => {
            let keyword = value.to_ascii_lowercase();
            let keyword = keyword.strip_prefix("-webkit-").unwrap_or(&keyword);
            !POSITION_KEYWORDS.contains(&keyword)
        }
        _ => false,
    }
}

fn negative_offset(lines: &[&str], index: usize) -> bool {
    match declaration(lines[index]) {
        Some((property, value)) if OFFSET_PROPERTIES.contains(&property.as_str()) => value
            .split_whitespace()
            .filter_map(|part| part.strip_suffix("px"))
            .filter_map(|number| number.parse::<f64>().ok())
            .any(|px| px <= NEGATIVE_OFFSET_PX),
        _ => false,
    }
}

fn missing_semicolon(lines: &[&str], index: usize) -> bool {
    let line = strip_trailing_comment(lines[index]);
    if line.ends_with(';') || line.contains('{') || line.contains('}') {
        return false;
    }
    matches!(
        declaration(line),
        Some((property, _)) if TERMINATED_PROPERTIES.contains(&property.as_str())
    )
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

impl From<ScanOutcome> for EvaluationResult {
    fn from(outcome: ScanOutcome) -> Self {
        let errors = outcome.count(Severity::Error);
        let warnings = outcome.count(Severity::Warning);
        let summary = if outcome.files_scanned.is_empty() {
            "Analyse locale : aucun fichier index.html ou style.css trouvé.".to_string()
        } else {
            format!(
                "Analyse locale de {} fichier(s) : {} erreur(s), {} avertissement(s). Score heuristique {}/{}.",
                outcome.files_scanned.len(),
                errors,
                warnings,
                outcome.score,
                BASELINE_SCORE
            )
        };

        let strengths = outcome
            .files_scanned
            .iter()
            .filter(|file| !outcome.findings.iter().any(|finding| &finding.file == *file))
            .map(|file| format!("{file} : aucun problème détecté"))
            .collect();
        let improvements = distinct(outcome.findings.iter().map(|f| f.issue.clone()));
        let recommendations = distinct(outcome.findings.iter().map(|f| f.suggestion.clone()));

        EvaluationResult {
            score: outcome.score,
            summary,
            strengths,
            improvements,
            technical_details: outcome.findings,
            recommendations,
            error: None,
        }
    }
}
