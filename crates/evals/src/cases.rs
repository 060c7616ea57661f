//! Test case definitions for evaluation
//!
//! A test case is a full set of quiz answers together with the program the
//! recommender should pick and the concepts its explanation should cover.

use serde::{Deserialize, Serialize};

use recommender::Answers;

/// A single quiz profile to evaluate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique name for the case
    pub name: String,
    /// Quiz answers keyed by question id
    pub answers: Answers,
    /// Canonical name of the program that should be recommended
    pub expected_program: String,
    /// Concepts the generated explanation should mention
    pub expected_keywords: Vec<String>,
}

impl TestCase {
    /// Create a new case with no answers yet
    pub fn new(name: impl Into<String>, expected_program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            answers: Answers::new(),
            expected_program: expected_program.into(),
            expected_keywords: Vec::new(),
        }
    }

    /// Add a single answer
    pub fn answer(mut self, question_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.answers.insert(question_id.into(), text.into());
        self
    }

    /// Add answers numbered q1, q2, ... in order
    pub fn answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let offset = self.answers.len();
        for (i, text) in answers.into_iter().enumerate() {
            self.answers
                .insert(format!("q{}", offset + i + 1), text.into());
        }
        self
    }

    /// Set the expected keywords
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Check that the case can be evaluated
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.name.trim().is_empty(), "test case name is empty");
        anyhow::ensure!(
            !self.expected_program.trim().is_empty(),
            "test case '{}' has no expected program",
            self.name
        );
        anyhow::ensure!(
            !self.answers.is_empty(),
            "test case '{}' has no answers",
            self.name
        );
        Ok(())
    }
}

/// Label used on chart axes: the part of a name before " - "
pub fn short_name(name: &str) -> &str {
    name.split(" - ").next().unwrap_or(name)
}

/// Built-in test cases
pub fn builtin_cases() -> Vec<TestCase> {
    vec![
        // Profile B: overloaded, wants time back
        TestCase::new("Profil B - Productivité Pure", "IA & Productivité")
            .answers([
                "B. Je manque de temps, je suis noyé(e) sous les tâches",
                "B. Penses à tout ce que tu dois faire après, ça te parasite",
                "B. Être organisé(e), léger(ère), moins chargé(e)",
                "B. « J'ai trop de choses en tête, je n'arrête jamais. »",
                "B. Je suis dispersé(e), je papillonne, je m'épuise",
                "B. Des outils qui simplifient ta vie et te font gagner du temps",
                "B. Retrouver de l'air dans ma tête",
                "B. Le manque de temps et la surcharge",
                "B. Je suis efficace, organisé(e), je gère sans subir",
                "B. Efficacité / structure",
            ])
            .keywords([
                "productivité",
                "temps",
                "organisation",
                "efficacité",
                "automatisation",
                "IA",
            ]),

        // Profile A: knows things, struggles to say them
        TestCase::new("Profil A - Communication", "Prise de Parole")
            .answers([
                "A. Je sais des choses, mais je n'arrive pas à les dire comme je veux",
                "A. Perds tes mots ou tu parles trop vite",
                "A. Être clair(e), crédible, écouté(e)",
                "A. « J'ai une bonne tête, mais je n'imprime pas toujours. »",
                "A. Le regard des autres me bloque",
                "A. Des exercices concrets avec feedback sur ta manière de parler",
                "A. Qu'on m'écoute vraiment et qu'on me respecte",
                "A. La peur de parler / d'être jugé(e)",
                "A. Je m'exprime avec aisance, je suis respecté(e)",
                "A. Impact / expression",
            ])
            .keywords(["parole", "communication", "confiance", "expression", "charisme", "oral"]),

        // Profile C: calm outside, tense inside
        TestCase::new("Profil C - Intelligence Émotionnelle", "Intelligence Émotionnelle")
            .answers([
                "C. Je gère en apparence, mais intérieurement je suis souvent tendu(e)",
                "C. Sens le stress monter et ça te fatigue avant même d'y être",
                "C. Être calme, stable, apaisé(e)",
                "C. « Je prends sur moi… mais ça me coûte. »",
                "C. Je rumine / je m'inquiète / je me mets la pression",
                "C. Des méthodes pour retrouver un équilibre intérieur",
                "C. Être solide émotionnellement, même quand c'est dur",
                "C. Le stress et la pression interne",
                "C. Je suis stable, serein(e), plus en paix",
                "C. Profondeur / sensibilité",
            ])
            .keywords(["émotion", "stress", "calme", "stabilité", "équilibre", "sérénité"]),

        // Profile H: body and social ease
        TestCase::new("Profil H - Kizomba Bien-être", "Kizomba")
            .answers([
                "H. Je manque d'aisance dans mon corps / présence / social",
                "H. Te sens pas totalement à l'aise physiquement, ça se voit",
                "H. Être plus à l'aise socialement et dans ton corps",
                "H. « Je suis à l'aise par moments, mais pas \"stablement\". »",
                "H. Je me sens souvent tendu(e) ou pas aligné(e) physiquement",
                "H. Une expérience corporelle, pratique, qui te transforme",
                "H. Me sentir bien dans mon corps et dans ma présence",
                "H. La tension dans ton corps et l'inconfort social",
                "H. Je suis confiant(e), présent(e), à l'aise socialement",
                "H. Présence / énergie",
            ])
            .keywords(["corps", "présence", "bien-être", "confiance", "social", "connexion"]),

        // Mixed A+E: communication should win over career
        TestCase::new("Profil Mixte A+E (Carrière + Communication)", "Prise de Parole")
            .answers([
                "A. Je sais des choses, mais je n'arrive pas à les dire comme je veux",
                "E. Sais que tu pourrais briller mais tu ne sais pas \"te positionner\"",
                "E. Être plus visible, mieux valorisé(e), plus \"choisi(e)\"",
                "A. « J'ai une bonne tête, mais je n'imprime pas toujours. »",
                "E. Je n'ai pas une stratégie claire pour avancer pro",
                "A. Des exercices concrets avec feedback sur ta manière de parler",
                "E. Avoir une carrière qui me ressemble, pas juste un job",
                "A. La peur de parler / d'être jugé(e)",
                "E. J'ai franchi un cap carrière / salaire / opportunité",
                "A. Impact / expression",
            ])
            .keywords(["parole", "carrière", "visibilité", "confiance", "entretien"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_cases_are_valid() {
        let cases = builtin_cases();
        assert_eq!(cases.len(), 5);
        for case in &cases {
            case.validate().unwrap();
            assert_eq!(case.answers.len(), 10, "{}", case.name);
            assert!(!case.expected_keywords.is_empty());
        }
    }

    #[test]
    fn test_builtin_names_unique() {
        let cases = builtin_cases();
        let names: HashSet<_> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), cases.len());
    }

    #[test]
    fn test_answers_are_numbered_in_order() {
        let case = TestCase::new("t", "p")
            .answer("q1", "first")
            .answers(["second", "third"]);
        let keys: Vec<_> = case.answers.keys().cloned().collect();
        assert_eq!(keys, vec!["q1", "q2", "q3"]);
        assert_eq!(case.answers["q3"], "third");
    }

    #[test]
    fn test_validate_rejects_incomplete_case() {
        assert!(TestCase::new("t", "p").validate().is_err());
        assert!(TestCase::new("t", " ").answer("q1", "a").validate().is_err());
        assert!(TestCase::new("", "p").answer("q1", "a").validate().is_err());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Profil B - Productivité Pure"), "Profil B");
        assert_eq!(
            short_name("Profil Mixte A+E (Carrière + Communication)"),
            "Profil Mixte A+E (Carrière + Communication)"
        );
    }
}
