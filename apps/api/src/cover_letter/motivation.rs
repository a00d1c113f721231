//! Motivation sentence selection: an ordered keyword rule table over the job
//! description. The first rule with any keyword present wins.

/// Theme of the motivation sentence in the opening paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotivationTheme {
    Innovation,
    Collaboration,
    Growth,
    /// Description given but no rule matched.
    Reputation,
    /// No description given.
    Admiration,
}

pub struct MotivationRule {
    pub keywords: &'static [&'static str],
    pub theme: MotivationTheme,
}

/// Evaluated top to bottom. Order is precedence.
pub const MOTIVATION_RULES: &[MotivationRule] = &[
    MotivationRule {
        keywords: &["innovation", "cutting-edge"],
        theme: MotivationTheme::Innovation,
    },
    MotivationRule {
        keywords: &["team", "collaboration"],
        theme: MotivationTheme::Collaboration,
    },
    MotivationRule {
        keywords: &["growth", "scale"],
        theme: MotivationTheme::Growth,
    },
];

/// Classifies a job description. Matching is case-insensitive substring
/// presence, so "teams" matches "team".
pub fn classify(description: Option<&str>) -> MotivationTheme {
    let Some(text) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return MotivationTheme::Admiration;
    };
    let text = text.to_lowercase();

    MOTIVATION_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| text.contains(kw)))
        .map(|rule| rule.theme)
        .unwrap_or(MotivationTheme::Reputation)
}

pub fn motivation_sentence(theme: MotivationTheme, company: &str) -> String {
    match theme {
        MotivationTheme::Innovation => format!(
            "I am particularly drawn to {company}'s commitment to innovation and would be \
             thrilled to contribute to your cutting-edge projects."
        ),
        MotivationTheme::Collaboration => format!(
            "I am excited about the collaborative environment at {company} and the opportunity \
             to work with your talented team."
        ),
        MotivationTheme::Growth => format!(
            "{company}'s growth trajectory and scale of impact align perfectly with my career \
             aspirations."
        ),
        MotivationTheme::Reputation => format!(
            "I am impressed by {company}'s reputation in the industry and would be honored to \
             contribute to your continued success."
        ),
        MotivationTheme::Admiration => format!(
            "I have long admired {company}'s work and would be thrilled to contribute to your \
             team's success."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innovation_wins_over_later_rules() {
        let jd = "Join our team to drive growth through innovation.";
        assert_eq!(classify(Some(jd)), MotivationTheme::Innovation);
    }

    #[test]
    fn test_innovation_wins_when_it_appears_last() {
        let jd = "Collaboration and scale matter here. We value innovation.";
        assert_eq!(classify(Some(jd)), MotivationTheme::Innovation);
    }

    #[test]
    fn test_cutting_edge_is_innovation() {
        assert_eq!(
            classify(Some("Work on Cutting-Edge compilers")),
            MotivationTheme::Innovation
        );
    }

    #[test]
    fn test_team_beats_growth() {
        assert_eq!(
            classify(Some("Help us scale with a small team")),
            MotivationTheme::Collaboration
        );
    }

    #[test]
    fn test_growth_keywords() {
        assert_eq!(
            classify(Some("Hypergrowth fintech")),
            MotivationTheme::Growth
        );
        assert_eq!(classify(Some("SCALE matters")), MotivationTheme::Growth);
    }

    #[test]
    fn test_unmatched_description_is_reputation() {
        assert_eq!(
            classify(Some("Write Rust services")),
            MotivationTheme::Reputation
        );
    }

    #[test]
    fn test_missing_or_blank_description_is_admiration() {
        assert_eq!(classify(None), MotivationTheme::Admiration);
        assert_eq!(classify(Some("   ")), MotivationTheme::Admiration);
    }

    #[test]
    fn test_sentences_mention_company() {
        for theme in [
            MotivationTheme::Innovation,
            MotivationTheme::Collaboration,
            MotivationTheme::Growth,
            MotivationTheme::Reputation,
            MotivationTheme::Admiration,
        ] {
            assert!(motivation_sentence(theme, "Acme").contains("Acme"));
        }
    }

    #[test]
    fn test_reputation_and_admiration_differ() {
        assert_ne!(
            motivation_sentence(MotivationTheme::Reputation, "Acme"),
            motivation_sentence(MotivationTheme::Admiration, "Acme")
        );
    }
}
