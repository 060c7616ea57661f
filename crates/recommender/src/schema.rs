//! Wire types shared with the recommender and blog services

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Quiz answers keyed by question id, in the order they were given
pub type Answers = IndexMap<String, String>;

/// Request body for the recommender
#[derive(Debug, Clone, Serialize)]
pub struct QuizInput<'a> {
    pub answers: &'a Answers,
}

/// A training program suggested by the recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDetails {
    /// Exact catalogue name of the program
    pub name: String,
    /// Why the program matches the profile
    pub reason: String,
}

/// Structured recommendation returned for one set of answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutput {
    /// Psychological summary of the candidate profile
    pub profil_analysis: String,
    /// Primary (signature) program
    pub principal_program: ProgramDetails,
    /// One or two complementary modules
    pub complementary_modules: Vec<ProgramDetails>,
    /// Closing encouragement
    pub motivation_message: String,
}

impl RecommendationOutput {
    /// Free text judged by the keyword and similarity metrics
    ///
    /// Profile analysis, primary program justification and motivation
    /// message, joined by single spaces.
    pub fn scored_text(&self) -> String {
        format!(
            "{} {} {}",
            self.profil_analysis, self.principal_program.reason, self.motivation_message
        )
    }
}

/// Request body for the blog generator
#[derive(Debug, Clone, Serialize)]
pub struct BlogRequest<'a> {
    pub subject: &'a str,
}

/// Heuristic quality scores attached to a generated article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpertiseScores {
    pub adn_cozetik: f64,
    pub expertise_tech: f64,
    pub wording_humain: f64,
    pub structure_seo: f64,
    pub cta_impact: f64,
}

impl ExpertiseScores {
    /// Label/value pairs in display order
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("Brand alignment", self.adn_cozetik),
            ("Technical expertise", self.expertise_tech),
            ("Human wording", self.wording_humain),
            ("SEO structure", self.structure_seo),
            ("CTA impact", self.cta_impact),
        ]
    }
}

/// Generated article with provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogArticle {
    pub subject: String,
    pub markdown: String,
    pub expertise_report: ExpertiseScores,
    /// Source excerpts the article was grounded on
    #[serde(default)]
    pub sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "profil_analysis": "Profil organisé mais surchargé",
        "principal_program": {"name": "IA & Productivité", "reason": "Gagner du temps"},
        "complementary_modules": [{"name": "Intelligence Émotionnelle", "reason": "Gérer le stress"}],
        "motivation_message": "Un petit pas à la fois"
    }"#;

    #[test]
    fn test_parse_recommendation() {
        let output: RecommendationOutput = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(output.principal_program.name, "IA & Productivité");
        assert_eq!(output.complementary_modules.len(), 1);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = serde_json::from_str::<RecommendationOutput>(
            r#"{"profil_analysis": "x", "motivation_message": "y"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_scored_text() {
        let output: RecommendationOutput = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            output.scored_text(),
            "Profil organisé mais surchargé Gagner du temps Un petit pas à la fois"
        );
    }

    #[test]
    fn test_quiz_input_keeps_answer_order() {
        let mut answers = Answers::new();
        answers.insert("q2".to_string(), "B".to_string());
        answers.insert("q10".to_string(), "A".to_string());
        answers.insert("q1".to_string(), "C".to_string());

        let json = serde_json::to_string(&QuizInput { answers: &answers }).unwrap();
        assert_eq!(json, r#"{"answers":{"q2":"B","q10":"A","q1":"C"}}"#);
    }

    #[test]
    fn test_blog_sources_default_empty() {
        let article: BlogArticle = serde_json::from_str(
            r##"{"subject": "s", "markdown": "# T", "expertise_report": {
                "adn_cozetik": 0.9, "expertise_tech": 0.8, "wording_humain": 0.7,
                "structure_seo": 0.6, "cta_impact": 0.5}}"##,
        )
        .unwrap();
        assert!(article.sources.is_empty());
        assert_eq!(article.expertise_report.entries()[4], ("CTA impact", 0.5));
    }
}
