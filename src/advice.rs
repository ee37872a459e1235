use crate::grading::GlobalBand;
use crate::models::{Criterion, ScoreInputs, StudentLevel};

pub const OPTIMIZE_FURTHER: &str =
    "🎯 **Optimisation**: Votre code est solide, explorez les techniques avancées (CSS Grid, animations)";

fn remediation(criterion: Criterion) -> &'static str {
    match criterion {
        Criterion::Structure => {
            "🔧 **Structure**: Organisez votre CSS avec des variables (`--primary-color`) et des commentaires sections"
        }
        Criterion::Typography => {
            "📝 **Typographie**: Utilisez des unités relatives (rem, em, %) plutôt que px"
        }
        Criterion::Practices => {
            "⚡ **Pratiques**: Créez des classes réutilisables et utilisez les pseudo-classes (:hover, :focus)"
        }
        Criterion::Validation => {
            "✅ **Validation**: Corrigez les erreurs W3C avant de finaliser votre code"
        }
    }
}

pub fn recommendations(scores: &ScoreInputs) -> Vec<&'static str> {
    let mut messages: Vec<&'static str> = Criterion::ALL
        .into_iter()
        .filter(|criterion| scores.score(*criterion) < scores.minimum(*criterion))
        .map(remediation)
        .collect();

    if messages.is_empty() {
        messages.push(OPTIMIZE_FURTHER);
    }
    messages
}

pub fn encouragement(level: StudentLevel, band: GlobalBand) -> &'static str {
    match (level, band) {
        (StudentLevel::Beginner, GlobalBand::Advanced) => {
            "🌟 Remarquable pour un niveau débutant ! Vous maîtrisez déjà les concepts avancés."
        }
        (StudentLevel::Beginner, GlobalBand::Competent) => {
            "👏 Très bon travail pour un débutant ! Quelques corrections et vous excellerez."
        }
        (StudentLevel::Beginner, GlobalBand::Basic) => {
            "💪 Bon début ! Concentrez-vous sur les bases: validation W3C et organisation CSS."
        }
        (StudentLevel::Intermediate, GlobalBand::Advanced) => {
            "🚀 Excellent niveau intermédiaire ! Prêt pour des défis plus complexes."
        }
        (StudentLevel::Intermediate, GlobalBand::Competent) => {
            "📈 Bonnes bases intermédiaires. Perfectionnez les détails pour exceller."
        }
        (StudentLevel::Intermediate, GlobalBand::Basic) => {
            "🎯 Niveau intermédiaire à consolider. Focalisez sur les bonnes pratiques CSS."
        }
        (StudentLevel::Advanced, GlobalBand::Advanced) => {
            "🏆 Niveau expert confirmé ! Votre code respecte les standards professionnels."
        }
        (StudentLevel::Advanced, GlobalBand::Competent) => {
            "💼 Bon niveau avancé. Peaufinez les détails pour un code professionnel."
        }
        (StudentLevel::Advanced, GlobalBand::Basic) => {
            "📚 Niveau avancé à renforcer. Approfondissez l'organisation et les pratiques."
        }
    }
}

pub fn progress_line(band: GlobalBand) -> &'static str {
    match band {
        GlobalBand::Advanced => "🔥 Vous excellez dans les critères techniques !",
        GlobalBand::Competent => "📈 Vous progressez bien, quelques ajustements suffisent !",
        GlobalBand::Basic => "💪 Bon départ, focalisez sur les bases pour progresser rapidement !",
    }
}

pub fn next_step(band: GlobalBand) -> &'static str {
    match band {
        GlobalBand::Advanced => "Explorez les techniques CSS avancées (animations, grid layout)",
        GlobalBand::Competent => "Perfectionnez l'organisation du code et les bonnes pratiques",
        GlobalBand::Basic => "Maîtrisez d'abord la validation W3C et l'organisation de base",
    }
}

pub struct ResourceList {
    pub heading: &'static str,
    pub links: [&'static str; 3],
}

pub fn resources(level: StudentLevel) -> ResourceList {
    match level {
        StudentLevel::Beginner => ResourceList {
            heading: "📚 **Pour Débutants:**",
            links: [
                "[Validateur W3C HTML](https://validator.w3.org/) - Vérifiez votre code",
                "[CSS Variables Guide](https://developer.mozilla.org/fr/docs/Web/CSS/Using_CSS_custom_properties) - Organisez vos couleurs",
                "[Unités CSS](https://developer.mozilla.org/fr/docs/Learn/CSS/Building_blocks/Values_and_units) - rem vs px",
            ],
        },
        StudentLevel::Intermediate => ResourceList {
            heading: "🚀 **Pour Niveau Intermédiaire:**",
            links: [
                "[CSS Grid Generator](https://cssgrid-generator.netlify.app/) - Layouts avancés",
                "[Pseudo-classes CSS](https://developer.mozilla.org/fr/docs/Web/CSS/Pseudo-classes) - Interactivité",
                "[BEM Methodology](https://getbem.com/) - Classes réutilisables",
            ],
        },
        StudentLevel::Advanced => ResourceList {
            heading: "🏆 **Pour Niveau Avancé:**",
            links: [
                "[CSS Architecture](https://maintainablecss.com/) - Code professionnel",
                "[Performance CSS](https://web.dev/fast/#css) - Optimisation",
                "[CSS Houdini](https://developer.mozilla.org/fr/docs/Web/Houdini) - Techniques avancées",
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(structure: u32, typography: u32, practices: u32, html: u32) -> ScoreInputs {
        ScoreInputs {
            structure,
            typography,
            practices,
            html,
            ..ScoreInputs::default()
        }
    }

    #[test]
    fn weak_criteria_get_remediation_in_fixed_order() {
        let messages = recommendations(&scores(1, 3, 1, 1));
        assert_eq!(
            messages,
            vec![
                remediation(Criterion::Structure),
                remediation(Criterion::Practices),
                remediation(Criterion::Validation),
            ]
        );
        assert!(!messages.contains(&remediation(Criterion::Typography)));
        assert!(!messages.contains(&OPTIMIZE_FURTHER));
    }

    #[test]
    fn perfect_scores_only_get_the_fallback() {
        assert_eq!(recommendations(&scores(3, 3, 3, 3)), vec![OPTIMIZE_FURTHER]);
    }

    #[test]
    fn validation_minimum_is_configurable() {
        let mut inputs = scores(3, 3, 3, 2);
        assert_eq!(recommendations(&inputs), vec![OPTIMIZE_FURTHER]);
        inputs.validation_min = 3;
        assert_eq!(
            recommendations(&inputs),
            vec![remediation(Criterion::Validation)]
        );
    }

    #[test]
    fn every_level_and_band_has_its_own_sentence() {
        let levels = [
            StudentLevel::Beginner,
            StudentLevel::Intermediate,
            StudentLevel::Advanced,
        ];
        let bands = [GlobalBand::Advanced, GlobalBand::Competent, GlobalBand::Basic];
        let mut seen = std::collections::HashSet::new();
        for level in levels {
            for band in bands {
                assert!(seen.insert(encouragement(level, band)));
            }
        }
        assert_eq!(seen.len(), 9);
        assert!(encouragement(StudentLevel::Beginner, GlobalBand::Basic).starts_with("💪 Bon début"));
    }

    #[test]
    fn resources_follow_level() {
        assert!(resources(StudentLevel::Beginner).links[0].contains("validator.w3.org"));
        assert!(resources(StudentLevel::Intermediate).heading.contains("Intermédiaire"));
        assert!(resources(StudentLevel::Advanced).links[2].contains("Houdini"));
    }
}
