use crate::models::{Criterion, ScoreInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Band {
    Insufficient,
    Basic,
    Competent,
    Advanced,
}

impl Band {
    /// Bands are inclusive at 85 %, 67 % and 33 %. A zero maximum scores 0 %.
    pub fn classify(score: u32, max: u32) -> Self {
        if max == 0 {
            return Band::Insufficient;
        }
        let scaled = u64::from(score) * 100;
        let max = u64::from(max);
        if scaled >= 85 * max {
            Band::Advanced
        } else if scaled >= 67 * max {
            Band::Competent
        } else if scaled >= 33 * max {
            Band::Basic
        } else {
            Band::Insufficient
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Band::Advanced => "✅",
            Band::Competent => "🟡",
            Band::Basic => "🟠",
            Band::Insufficient => "❌",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Advanced => "Avancé",
            Band::Competent => "Compétent",
            Band::Basic => "Basique",
            Band::Insufficient => "Insuffisant",
        }
    }

    pub fn table_emoji(self) -> &'static str {
        match self {
            Band::Advanced => "🎉",
            Band::Competent => "👍",
            Band::Basic => "⚠️",
            Band::Insufficient => "❌",
        }
    }
}

pub fn context(criterion: Criterion, band: Band) -> &'static str {
    match (criterion, band) {
        (Criterion::Structure, Band::Advanced) => {
            "Code bien structuré, variables CSS utilisées, commentaires présents"
        }
        (Criterion::Structure, Band::Competent) => {
            "Structure correcte mais perfectible, quelques optimisations possibles"
        }
        (Criterion::Structure, Band::Basic) => {
            "Organisation confuse, sélecteurs redondants, manque de variables"
        }
        (Criterion::Structure, Band::Insufficient) => {
            "Styles désorganisés, sélecteurs complexes, aucune variable CSS"
        }
        (Criterion::Typography, Band::Advanced) => {
            "Unités relatives privilégiées, typographie cohérente, couleurs hexadécimales"
        }
        (Criterion::Typography, Band::Competent) => {
            "Bonne base typographique, quelques unités fixes à convertir"
        }
        (Criterion::Typography, Band::Basic) => {
            "Typographie basique, mélange d'unités, couleurs incohérentes"
        }
        (Criterion::Typography, Band::Insufficient) => {
            "Typographie négligée, unités fixes prédominantes, couleurs désorganisées"
        }
        (Criterion::Practices, Band::Advanced) => {
            "Classes réutilisables, pseudo-classes maîtrisées, séparation parfaite"
        }
        (Criterion::Practices, Band::Competent) => {
            "Bonnes pratiques appliquées, quelques répétitions à optimiser"
        }
        (Criterion::Practices, Band::Basic) => {
            "Pratiques basiques, code fonctionnel mais peu maintenable"
        }
        (Criterion::Practices, Band::Insufficient) => {
            "Mauvaises pratiques, code difficile à maintenir, styles mélangés"
        }
        (Criterion::Validation, Band::Advanced) => {
            "Code validé W3C sans erreurs, compatible multi-navigateurs"
        }
        (Criterion::Validation, Band::Competent) => {
            "Validation correcte avec avertissements mineurs seulement"
        }
        (Criterion::Validation, Band::Basic) => {
            "Quelques erreurs de validation, problèmes d'affichage possibles"
        }
        (Criterion::Validation, Band::Insufficient) => {
            "Nombreuses erreurs, code non testé, incompatibilités"
        }
    }
}

pub fn criterion_analysis(criterion: Criterion, score: u32, max: u32) -> String {
    let band = Band::classify(score, max);
    format!(
        "{} **{}** ({}/{}): **{}** - {}",
        band.emoji(),
        criterion.title(),
        score,
        max,
        band.label(),
        context(criterion, band)
    )
}

/// Level shown in the recap table. CSS sub-criteria are graded on points
/// left to the maximum, validation on 90/70/50 % of its maximum.
pub fn table_band(criterion: Criterion, score: u32, max: u32) -> Band {
    match criterion {
        Criterion::Validation => {
            let scaled = u64::from(score) * 10;
            let max = u64::from(max);
            if scaled >= 9 * max {
                Band::Advanced
            } else if scaled >= 7 * max {
                Band::Competent
            } else if scaled >= 5 * max {
                Band::Basic
            } else {
                Band::Insufficient
            }
        }
        _ => {
            if score >= max {
                Band::Advanced
            } else if score + 1 >= max {
                Band::Competent
            } else if score + 2 >= max {
                Band::Basic
            } else {
                Band::Insufficient
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalBand {
    Advanced,
    Competent,
    Basic,
}

impl GlobalBand {
    pub fn emoji(self) -> &'static str {
        match self {
            GlobalBand::Advanced => "🎉",
            GlobalBand::Competent => "👍",
            GlobalBand::Basic => "⚠️",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            GlobalBand::Advanced => "Excellent travail !",
            GlobalBand::Competent => "Bon travail avec corrections à apporter",
            GlobalBand::Basic => "Travail à corriger",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GlobalBand::Advanced => "Avancé",
            GlobalBand::Competent => "Compétent",
            GlobalBand::Basic => "Basique",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalThresholds {
    pub excellent_score: u32,
    pub good_score: u32,
}

impl GlobalThresholds {
    pub fn new(total_max: u32, excellent_threshold: u32, good_threshold: u32) -> Self {
        Self {
            excellent_score: floor_percent(total_max, excellent_threshold),
            good_score: floor_percent(total_max, good_threshold),
        }
    }

    pub fn from_scores(scores: &ScoreInputs) -> Self {
        Self::new(
            scores.total_max,
            scores.excellent_threshold,
            scores.good_threshold,
        )
    }

    pub fn classify(&self, total: u32) -> GlobalBand {
        if total >= self.excellent_score {
            GlobalBand::Advanced
        } else if total >= self.good_score {
            GlobalBand::Competent
        } else {
            GlobalBand::Basic
        }
    }
}

fn floor_percent(total: u32, percent: u32) -> u32 {
    (u64::from(total) * u64::from(percent) / 100) as u32
}
