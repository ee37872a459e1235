use std::path::Path;

use crate::config::Config;
use crate::models::EvaluationResult;
use crate::scanner;

/// Where the structured findings of a run came from.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationSource {
    External(EvaluationResult),
    Local(EvaluationResult),
}

impl EvaluationSource {
    /// Uses the external payload when it is announced, parses and carries no
    /// error; otherwise scans `dir` locally.
    pub fn resolve(config: &Config, dir: &Path) -> Self {
        match external_evaluation(config) {
            Some(result) => {
                log::info!(
                    "using external evaluation ({} findings)",
                    result.technical_details.len()
                );
                EvaluationSource::External(result)
            }
            None => {
                log::info!("falling back to local analysis of {}", dir.display());
                EvaluationSource::Local(scanner::scan_dir(dir).into())
            }
        }
    }

    pub fn result(&self) -> &EvaluationResult {
        match self {
            EvaluationSource::External(result) | EvaluationSource::Local(result) => result,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EvaluationSource::External(_) => "🤖 Évaluation IA",
            EvaluationSource::Local(_) => "🔎 Analyse locale heuristique",
        }
    }
}

fn external_evaluation(config: &Config) -> Option<EvaluationResult> {
    if !config.ai_available {
        log::debug!("AI_AVAILABLE is not true");
        return None;
    }
    let Some(raw) = config.ai_response.as_deref() else {
        log::warn!("AI_AVAILABLE is true but AI_RESPONSE is empty");
        return None;
    };
    match serde_json::from_str::<EvaluationResult>(raw) {
        Ok(result) => match &result.error {
            Some(message) => {
                log::warn!("external evaluation reported an error: {message}");
                None
            }
            None => Some(result),
        },
        Err(err) => {
            log::warn!("AI_RESPONSE is not a valid evaluation: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ai_available: bool, ai_response: Option<&str>) -> Config {
        Config {
            ai_available,
            ai_response: ai_response.map(str::to_string),
            ..Config::default()
        }
    }

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), "width: 250%;\n").unwrap();
        dir
    }

    #[test]
    fn valid_payload_is_used() {
        let dir = workspace();
        let payload = r#"{"score": 16, "summary": "Très bien", "strengths": ["Sémantique"]}"#;
        let source = EvaluationSource::resolve(&config(true, Some(payload)), dir.path());
        match source {
            EvaluationSource::External(result) => {
                assert_eq!(result.score, 16);
                assert_eq!(result.strengths, vec!["Sémantique"]);
            }
            other => panic!("expected external evaluation, got {other:?}"),
        }
    }

    #[test]
    fn disabled_ai_scans_locally() {
        let dir = workspace();
        let payload = r#"{"score": 5}"#;
        let source = EvaluationSource::resolve(&config(false, Some(payload)), dir.path());
        assert!(matches!(source, EvaluationSource::Local(_)));
        assert_eq!(source.result().score, 16);
        assert_eq!(source.result().technical_details.len(), 1);
    }

    #[test]
    fn malformed_or_failed_payload_falls_back() {
        let dir = workspace();
        for payload in [None, Some("{not json"), Some(r#"{"error": "quota exceeded"}"#)] {
            let source = EvaluationSource::resolve(&config(true, payload), dir.path());
            assert!(matches!(source, EvaluationSource::Local(_)), "{payload:?}");
        }
    }
}
