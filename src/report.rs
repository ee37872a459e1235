use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::advice;
use crate::config::Config;
use crate::error::ReportError;
use crate::evaluation::EvaluationSource;
use crate::grading::{self, GlobalBand, GlobalThresholds};
use crate::models::{Criterion, Finding, ScoreInputs};

pub const REPORT_FILE: &str = "FEEDBACK.md";

const STRUCTURE_EXAMPLE: &str = r#"```css
/* Ajoutez des variables CSS organisées */
:root {
  /* Couleurs principales */
  --primary-color: #667eea;
  --secondary-color: #764ba2;
  --text-color: #333333;

  /* Espacement */
  --spacing-sm: 0.5rem;
  --spacing-md: 1rem;
  --spacing-lg: 2rem;
}

/* Utilisez vos variables */
.header {
  background: var(--primary-color);
  padding: var(--spacing-md);
}
```"#;

const TYPOGRAPHY_EXAMPLE: &str = r#"```css
/* Utilisez des unités relatives */
body {
  font-size: 1rem;        /* Au lieu de 16px */
  line-height: 1.6;       /* Proportion relative */
  margin: 2rem auto;      /* Au lieu de 32px */
}

h1 {
  font-size: 2.5rem;      /* Au lieu de 40px */
  margin-bottom: 1.5rem;  /* Au lieu de 24px */
}
```"#;

const PRACTICES_EXAMPLE: &str = r#"```css
/* Classes réutilisables */
.btn {
  padding: var(--spacing-sm) var(--spacing-md);
  border: none;
  border-radius: 4px;
  cursor: pointer;
}

.btn:hover {
  transform: translateY(-2px);
  box-shadow: 0 4px 8px rgba(0,0,0,0.2);
}

.btn--primary { background: var(--primary-color); }
.btn--secondary { background: var(--secondary-color); }
```"#;

/// Ordered report sections. Absent sections are dropped before joining.
#[derive(Default)]
struct ReportBuilder {
    sections: Vec<Option<String>>,
}

impl ReportBuilder {
    fn section(mut self, section: impl Into<Option<String>>) -> Self {
        self.sections.push(section.into());
        self
    }

    fn build(self) -> String {
        let mut output = self
            .sections
            .into_iter()
            .flatten()
            .map(|section| section.trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");
        output.push('\n');
        output
    }
}

/// Everything derived from the scores before rendering.
struct Assessment {
    total: u32,
    band: GlobalBand,
    encouragement: &'static str,
}

impl Assessment {
    fn new(config: &Config) -> Self {
        let scores = &config.scores;
        let total = scores.total();
        let band = GlobalThresholds::from_scores(scores).classify(total);
        Self {
            total,
            band,
            encouragement: advice::encouragement(config.level, band),
        }
    }
}

pub fn build_report(
    config: &Config,
    source: &EvaluationSource,
    generated_at: NaiveDateTime,
) -> Result<String, ReportError> {
    let assessment = Assessment::new(config);

    let report = ReportBuilder::default()
        .section(header(config, generated_at))
        .section(global_result(config, &assessment))
        .section(criteria_analysis(&config.scores))
        .section(detected_errors(config))
        .section(evaluation_summary(source))
        .section(findings_by_file(&source.result().technical_details))
        .section(action_plan(config, source))
        .section(score_table(&config.scores, &assessment))
        .section(code_examples(&config.scores))
        .section(closing(&assessment))
        .section(raw_evaluation(source)?)
        .section(footer(config, generated_at))
        .build();

    Ok(report)
}

pub fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    std::fs::write(path, content).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn header(config: &Config, generated_at: NaiveDateTime) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# 🎯 Rapport d'Évaluation Pédagogique Contextuelle");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "> **Analyse automatique contextuelle générée le {}**",
        generated_at.format("%d/%m/%Y à %H:%M")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## 📋 Contexte de l'Évaluation");
    let _ = writeln!(output);
    let _ = writeln!(output, "- **Repository:** `{}`", config.repository);
    let _ = writeln!(output, "- **Compétence évaluée:** {}", config.competence_label());
    let _ = writeln!(output, "- **Niveau de l'étudiant:** **{}**", config.niveau);
    let _ = writeln!(output, "- **Fichiers analysés:** `{}`", config.files);
    output
}

fn global_result(config: &Config, assessment: &Assessment) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "## 🏆 Résultat Global");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "### 📊 Note Finale: {}/{} points {} **{}** ({})",
        assessment.total,
        config.scores.total_max,
        assessment.band.emoji(),
        assessment.band.message(),
        assessment.band.label()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "{}", assessment.encouragement);
    output
}

fn criterion_heading(criterion: Criterion) -> &'static str {
    match criterion {
        Criterion::Structure => "### 🏗️ **Critère 1: Structure et Organisation du CSS**",
        Criterion::Typography => "### 🔤 **Critère 2: Typographie et Couleurs**",
        Criterion::Practices => "### ⚡ **Critère 3: Bonnes Pratiques CSS**",
        Criterion::Validation => "### ✅ **Critère 4: Validation et Tests**",
    }
}

fn criteria_analysis(scores: &ScoreInputs) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "## 📈 Analyse Détaillée par Critère du Barème");
    for criterion in Criterion::ALL {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", criterion_heading(criterion));
        let _ = writeln!(
            output,
            "{}",
            grading::criterion_analysis(criterion, scores.score(criterion), scores.max(criterion))
        );
    }
    output
}

fn detected_errors(config: &Config) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "## 🔍 Points d'Amélioration Détectés");
    let _ = writeln!(output);
    let _ = writeln!(output, "### **Erreurs Critiques à Corriger**");
    let _ = writeln!(output);

    if config.has_html_errors() {
        let _ = writeln!(output, "#### 🔴 **Validation W3C HTML**");
        let _ = writeln!(output, "{}", config.html_errors.trim());
    } else {
        let _ = writeln!(output, "✅ **Validation HTML**: Code validé sans erreurs critiques");
    }
    let _ = writeln!(output);

    if config.has_css_errors() {
        let _ = writeln!(output, "#### 🎨 **Analyse CSS Contextuelle**");
        let _ = writeln!(output, "{}", config.css_errors.trim());
    } else {
        let _ = writeln!(output, "✅ **Analyse CSS**: Code respectant les critères du barème");
    }
    output
}

fn evaluation_summary(source: &EvaluationSource) -> String {
    let result = source.result();
    let mut output = String::new();
    let _ = writeln!(output, "## 🧠 Synthèse de l'Analyse du Code");
    let _ = writeln!(output);
    let _ = writeln!(output, "- **Source:** {}", source.label());
    let _ = writeln!(output, "- **Note de l'analyse:** {}/20", result.score);
    if !result.summary.trim().is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", result.summary.trim());
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "### ✅ Points Forts");
    let _ = writeln!(output);
    if result.strengths.is_empty() {
        let _ = writeln!(output, "- 💪 Continuez vos efforts, vous êtes sur la bonne voie !");
    } else {
        for strength in &result.strengths {
            let _ = writeln!(output, "- 🎯 {strength}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "### 🔧 Axes d'Amélioration");
    let _ = writeln!(output);
    if result.improvements.is_empty() {
        let _ = writeln!(output, "- ✨ Excellent travail, peu d'améliorations nécessaires !");
    } else {
        for improvement in &result.improvements {
            let _ = writeln!(output, "- 📈 {improvement}");
        }
    }
    output
}

fn findings_by_file(findings: &[Finding]) -> Option<String> {
    if findings.is_empty() {
        return None;
    }

    let mut by_file: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
    for finding in findings {
        by_file.entry(finding.file.as_str()).or_default().push(finding);
    }

    let mut output = String::new();
    let _ = writeln!(output, "## 🔬 Problèmes Détectés par Fichier");
    for (file, findings) in by_file {
        let _ = writeln!(output);
        let _ = writeln!(output, "### 📄 `{file}`");
        for finding in findings {
            let _ = writeln!(output);
            let line = finding
                .line
                .map(|line| format!(" (ligne {line})"))
                .unwrap_or_default();
            let _ = writeln!(output, "- {} **{}**{}", finding.severity.icon(), finding.issue, line);
            if !finding.suggestion.trim().is_empty() {
                let _ = writeln!(output, "  - **Suggestion:** {}", finding.suggestion.trim());
            }
        }
    }
    Some(output)
}

fn action_plan(config: &Config, source: &EvaluationSource) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "## 🗺️ Plan d'Action Personnalisé");
    let _ = writeln!(output);
    let _ = writeln!(output, "### **Recommandations Prioritaires:**");
    let _ = writeln!(output);
    for recommendation in advice::recommendations(&config.scores) {
        let _ = writeln!(output, "- {recommendation}");
    }
    for recommendation in &source.result().recommendations {
        let _ = writeln!(output, "- 💭 {recommendation}");
    }

    let resources = advice::resources(config.level);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "### **Ressources Ciblées selon votre Profil {}:**",
        config.niveau
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "#### {}", resources.heading);
    for link in resources.links {
        let _ = writeln!(output, "- {link}");
    }
    output
}

fn score_table(scores: &ScoreInputs, assessment: &Assessment) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "## 📊 Détail du Barème Appliqué");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "| **Critère d'Évaluation** | **Score Obtenu** | **Score Maximum** | **Niveau Atteint** |"
    );
    let _ = writeln!(
        output,
        "|---------------------------|------------------|-------------------|-------------------|"
    );
    for criterion in Criterion::ALL {
        let score = scores.score(criterion);
        let max = scores.max(criterion);
        let band = grading::table_band(criterion, score, max);
        let _ = writeln!(
            output,
            "| **{}** | {}/{} | {} points | {} {} |",
            criterion.title(),
            score,
            max,
            max,
            band.table_emoji(),
            band.label()
        );
    }
    let _ = writeln!(
        output,
        "| **TOTAL GÉNÉRAL** | **{}/{}** | **{} points** | **{}** |",
        assessment.total,
        scores.total_max,
        scores.total_max,
        assessment.band.label()
    );
    output
}

fn code_examples(scores: &ScoreInputs) -> String {
    let examples = [
        (
            Criterion::Structure,
            "Structure",
            STRUCTURE_EXAMPLE,
            "✅ **Structure excellente** - Continuez ainsi !",
        ),
        (
            Criterion::Typography,
            "Typographie",
            TYPOGRAPHY_EXAMPLE,
            "✅ **Typographie excellente** - Maîtrise des unités relatives !",
        ),
        (
            Criterion::Practices,
            "Pratiques",
            PRACTICES_EXAMPLE,
            "✅ **Pratiques excellentes** - Code maintenable et réutilisable !",
        ),
    ];

    let mut output = String::new();
    let _ = writeln!(output, "## 🎨 Code d'Exemple pour Améliorer votre Score");
    for (criterion, name, example, praise) in examples {
        let max = scores.max(criterion);
        let _ = writeln!(output);
        let _ = writeln!(output, "### **Si {name} < {max} points:**");
        if scores.score(criterion) < max {
            let _ = writeln!(output, "{example}");
        } else {
            let _ = writeln!(output, "{praise}");
        }
    }
    output
}

fn closing(assessment: &Assessment) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "## 🎓 Message Pédagogique Final");
    let _ = writeln!(output);
    let _ = writeln!(output, "**Bilan contextuel:** {}", assessment.encouragement);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "**Votre progression:** {}",
        advice::progress_line(assessment.band)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "**Prochaine étape:** {}", advice::next_step(assessment.band));
    output
}

fn raw_evaluation(source: &EvaluationSource) -> Result<String, ReportError> {
    let json = serde_json::to_string_pretty(source.result())?;
    let mut output = String::new();
    let _ = writeln!(output, "<details>");
    let _ = writeln!(output, "<summary>📦 Données brutes de l'évaluation</summary>");
    let _ = writeln!(output);
    let _ = writeln!(output, "```json");
    let _ = writeln!(output, "{json}");
    let _ = writeln!(output, "```");
    let _ = writeln!(output);
    let _ = writeln!(output, "</details>");
    Ok(output)
}

fn footer(config: &Config, generated_at: NaiveDateTime) -> String {
    let scores = &config.scores;
    format!(
        "<sub>🤖 **Analyse contextuelle automatisée** | 📊 Barème: Structure({max}) + Typo({max}) + Pratiques({max}) + Validation({html_max}) = {total_max}pts | 📝 {bareme} | 🎯 Niveau: {niveau} | ⚡ Générée le {at}</sub>",
        max = scores.criterion_max,
        html_max = scores.html_max,
        total_max = scores.total_max,
        bareme = config.bareme.trim(),
        niveau = config.niveau,
        at = generated_at.format("%d/%m/%Y %H:%M"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvaluationResult, Severity, StudentLevel};
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    fn config(structure: u32, typography: u32, practices: u32, html: u32, css: u32) -> Config {
        let mut config = Config::default();
        config.scores = ScoreInputs {
            structure,
            typography,
            practices,
            html,
            css,
            ..ScoreInputs::default()
        };
        config
    }

    fn local(findings: Vec<Finding>) -> EvaluationSource {
        EvaluationSource::Local(EvaluationResult {
            score: 17,
            summary: "Analyse locale".to_string(),
            technical_details: findings,
            ..EvaluationResult::default()
        })
    }

    fn finding(file: &str, line: u32, issue: &str) -> Finding {
        Finding {
            file: file.to_string(),
            line: Some(line),
            severity: Severity::Error,
            issue: issue.to_string(),
            suggestion: "Corriger".to_string(),
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = config(2, 3, 1, 2, 6);
        let source = local(vec![finding("index.html", 3, "Balise <button> non fermée")]);
        let first = build_report(&config, &source, timestamp()).unwrap();
        let second = build_report(&config, &source, timestamp()).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("générée le 14/03/2026 à 09:30"));
        assert!(first.ends_with("</sub>\n"));
    }

    #[test]
    fn global_result_reflects_thresholds() {
        let report = build_report(&config(3, 3, 3, 3, 9), &local(vec![]), timestamp()).unwrap();
        assert!(report.contains("### 📊 Note Finale: 12/12 points 🎉 **Excellent travail !** (Avancé)"));
        assert!(report.contains("🌟 Remarquable pour un niveau débutant !"));
        assert!(report.contains(advice::OPTIMIZE_FURTHER));
        assert!(report.contains("✅ **Structure excellente**"));
        assert!(!report.contains("```css"));

        let report = build_report(&config(0, 0, 0, 1, 2), &local(vec![]), timestamp()).unwrap();
        assert!(report.contains("3/12 points ⚠️ **Travail à corriger** (Basique)"));
        assert!(report.contains("Maîtrisez d'abord la validation W3C"));
        assert_eq!(report.matches("```css").count(), 3);
    }

    #[test]
    fn findings_are_grouped_by_file() {
        let source = local(vec![
            finding("style.css", 4, "Largeur supérieure à 100%"),
            finding("index.html", 2, "Balise <button> non fermée"),
            finding("style.css", 9, "Valeur de position invalide"),
        ]);
        let report = build_report(&config(1, 1, 1, 1, 3), &source, timestamp()).unwrap();
        let html = report.find("### 📄 `index.html`").unwrap();
        let css = report.find("### 📄 `style.css`").unwrap();
        let width = report.find("Largeur supérieure à 100%** (ligne 4)").unwrap();
        let position = report.find("Valeur de position invalide** (ligne 9)").unwrap();
        assert!(html < css);
        assert!(css < width && width < position);
    }

    #[test]
    fn empty_findings_drop_the_section() {
        let report = build_report(&config(1, 1, 1, 1, 3), &local(vec![]), timestamp()).unwrap();
        assert!(!report.contains("Problèmes Détectés par Fichier"));
    }

    #[test]
    fn error_strings_are_included_when_reported() {
        let mut config = config(1, 1, 1, 1, 3);
        config.error_count = "2".to_string();
        config.html_errors = "- Ligne 4: balise non fermée".to_string();
        config.css_errors = "- Sélecteur inconnu".to_string();
        let report = build_report(&config, &local(vec![]), timestamp()).unwrap();
        assert!(report.contains("#### 🔴 **Validation W3C HTML**\n- Ligne 4: balise non fermée"));
        assert!(report.contains("- Sélecteur inconnu"));
        assert!(!report.contains("Code validé sans erreurs critiques"));
    }

    #[test]
    fn header_shows_normalized_competence() {
        let mut config = config(1, 1, 1, 1, 3);
        config.competence = "developement web".to_string();
        let report = build_report(&config, &local(vec![]), timestamp()).unwrap();
        assert!(report.contains("- **Compétence évaluée:** Développement Web\n"));
    }

    #[test]
    fn resources_follow_student_level() {
        let mut config = config(1, 1, 1, 1, 3);
        config.niveau = "Intermédiaire".to_string();
        config.level = StudentLevel::Intermediate;
        let report = build_report(&config, &local(vec![]), timestamp()).unwrap();
        assert!(report.contains("BEM Methodology"));
        assert!(!report.contains("Validateur W3C HTML"));
        assert!(!report.contains("CSS Houdini"));
    }

    #[test]
    fn external_evaluation_is_labelled_and_embedded() {
        let source = EvaluationSource::External(EvaluationResult {
            score: 15,
            summary: "Code bien structuré".to_string(),
            strengths: vec!["Balises sémantiques".to_string()],
            recommendations: vec!["Ajouter des media queries".to_string()],
            ..EvaluationResult::default()
        });
        let report = build_report(&config(3, 3, 3, 3, 9), &source, timestamp()).unwrap();
        assert!(report.contains("🤖 Évaluation IA"));
        assert!(report.contains("- 🎯 Balises sémantiques"));
        assert!(report.contains("- 💭 Ajouter des media queries"));
        assert!(report.contains("\"summary\": \"Code bien structuré\""));
    }

    #[test]
    fn score_table_lists_every_criterion() {
        let report = build_report(&config(3, 2, 1, 0, 6), &local(vec![]), timestamp()).unwrap();
        assert!(report.contains("| **Structure et Organisation CSS** | 3/3 | 3 points | 🎉 Avancé |"));
        assert!(report.contains("| **Typographie et Couleurs** | 2/3 | 3 points | 👍 Compétent |"));
        assert!(report.contains("| **Bonnes Pratiques CSS** | 1/3 | 3 points | ⚠️ Basique |"));
        assert!(report.contains("| **Validation et Tests** | 0/3 | 3 points | ❌ Insuffisant |"));
        assert!(report.contains("| **TOTAL GÉNÉRAL** | **6/12** | **12 points** | **Basique** |"));
    }

    #[test]
    fn write_report_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILE);
        std::fs::write(&path, "ancien contenu plus long que le nouveau").unwrap();
        write_report(&path, "nouveau").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "nouveau");
    }

    #[test]
    fn write_report_reports_the_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(REPORT_FILE);
        let err = write_report(&path, "contenu").unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
        assert!(err.to_string().contains("missing"));
    }
}
