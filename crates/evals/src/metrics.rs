//! Scoring metrics for a single recommendation
//!
//! Three independent signals are combined into the global score:
//! whether the right program was picked, how many expected concepts the
//! explanation mentions, and how close it is semantically to those concepts.

use anyhow::{Context, Result};
use llm::Embedder;
use serde::{Deserialize, Serialize};

/// Weight of the program match in the global score
pub const PROGRAM_MATCH_WEIGHT: f64 = 0.5;
/// Weight of keyword coverage in the global score
pub const KEYWORD_COVERAGE_WEIGHT: f64 = 0.25;
/// Weight of semantic similarity in the global score
pub const SEMANTIC_SIMILARITY_WEIGHT: f64 = 0.25;

/// Component scores for one case
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseMetrics {
    pub program_match: f64,
    pub keyword_coverage: f64,
    pub semantic_similarity: f64,
}

impl CaseMetrics {
    /// Weighted composite of the three components
    pub fn global_score(&self) -> f64 {
        global_score(
            self.program_match,
            self.keyword_coverage,
            self.semantic_similarity,
        )
    }
}

/// 1.0 when either name contains the other, ignoring case
///
/// Names are compared as given: no trimming, and an empty name is contained
/// in every other name.
pub fn calculate_program_match(actual: &str, expected: &str) -> f64 {
    let actual = actual.to_lowercase();
    let expected = expected.to_lowercase();

    if actual.contains(&expected) || expected.contains(&actual) {
        1.0
    } else {
        0.0
    }
}

/// Fraction of keywords found in the text, ignoring case
pub fn calculate_keyword_coverage<S: AsRef<str>>(text: &str, keywords: &[S]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let text_lower = text.to_lowercase();
    let matches = keywords
        .iter()
        .filter(|kw| text_lower.contains(&kw.as_ref().to_lowercase()))
        .count();

    matches as f64 / keywords.len() as f64
}

/// Cosine similarity between the text and the space-joined keywords
pub async fn calculate_semantic_similarity<E, S>(
    embedder: &E,
    text: &str,
    keywords: &[S],
) -> Result<f64>
where
    E: Embedder + ?Sized,
    S: AsRef<str>,
{
    let reference = keywords
        .iter()
        .map(|kw| kw.as_ref())
        .collect::<Vec<_>>()
        .join(" ");

    let embeddings = embedder
        .embed(vec![text.to_string(), reference])
        .await
        .context("Failed to embed text for semantic similarity")?;

    match embeddings.as_slice() {
        [actual, expected] => Ok(cosine_similarity(actual, expected)),
        other => anyhow::bail!("Expected 2 embeddings, got {}", other.len()),
    }
}

/// Cosine of the angle between two vectors
///
/// Mismatched lengths and zero vectors give 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Weighted composite: program match counts double
pub fn global_score(program_match: f64, keyword_coverage: f64, semantic_similarity: f64) -> f64 {
    program_match * PROGRAM_MATCH_WEIGHT
        + keyword_coverage * KEYWORD_COVERAGE_WEIGHT
        + semantic_similarity * SEMANTIC_SIMILARITY_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Bag-of-characters embedding, good enough to rank similar strings
    struct CharEmbedder;

    #[async_trait]
    impl Embedder for CharEmbedder {
        async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0f32; 26];
                    for c in t.to_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
                        v[(c as u8 - b'a') as usize] += 1.0;
                    }
                    v
                })
                .collect())
        }

        fn model(&self) -> &str {
            "chars"
        }
    }

    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0]])
        }

        fn model(&self) -> &str {
            "short"
        }
    }

    #[test]
    fn test_program_match_case_insensitive() {
        assert_eq!(calculate_program_match("IA & Productivité", "ia & productivité"), 1.0);
    }

    #[test]
    fn test_program_match_containment_both_ways() {
        assert_eq!(
            calculate_program_match("Formation Signature : Prise de Parole", "Prise de Parole"),
            1.0
        );
        assert_eq!(calculate_program_match("Kizomba", "Kizomba Bien-être"), 1.0);
    }

    #[test]
    fn test_program_match_no_spurious_match() {
        assert_eq!(calculate_program_match("Prise de Parole", "Kizomba"), 0.0);
    }

    #[test]
    fn test_program_match_plain_containment() {
        assert_eq!(calculate_program_match("", "Kizomba"), 1.0);
        assert_eq!(calculate_program_match("Kizomba", ""), 1.0);
        // Whitespace is significant
        assert_eq!(calculate_program_match(" IA", "IA & Productivité"), 0.0);
        assert_eq!(calculate_program_match("IA & Productivité ", "IA & Productivité"), 1.0);
    }

    #[test]
    fn test_keyword_coverage_empty_keywords() {
        let none: [&str; 0] = [];
        assert_eq!(calculate_keyword_coverage("anything at all", &none), 0.0);
    }

    #[test]
    fn test_keyword_coverage_counts_each_keyword_once() {
        let text = "Le temps, le temps, toujours le TEMPS. Productivité !";
        let coverage = calculate_keyword_coverage(text, &["temps", "productivité", "IA", "calme"]);
        assert_eq!(coverage, 0.5);
    }

    #[test]
    fn test_metric_ranges() {
        let texts = ["", "a", "IA & Productivité", "Prise de Parole en public", "émotion"];
        let keywords = ["ia", "parole", "é", ""];
        for actual in texts {
            for expected in texts {
                let pm = calculate_program_match(actual, expected);
                assert!((0.0..=1.0).contains(&pm));
            }
            for n in 0..=keywords.len() {
                let kc = calculate_keyword_coverage(actual, &keywords[..n]);
                assert!((0.0..=1.0).contains(&kc), "{} {}", actual, kc);
            }
        }
    }

    #[test]
    fn test_global_score_weighting() {
        assert_eq!(global_score(1.0, 0.8, 0.6), 0.85);
        assert_eq!(global_score(0.0, 0.0, 0.0), 0.0);
        assert_eq!(global_score(1.0, 1.0, 1.0), 1.0);

        let metrics = CaseMetrics {
            program_match: 1.0,
            keyword_coverage: 0.8,
            semantic_similarity: 0.6,
        };
        assert_eq!(metrics.global_score(), 0.85);
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[tokio::test]
    async fn test_semantic_similarity_orders_related_text_higher() {
        let embedder = CharEmbedder;
        let keywords = ["stress", "calme"];

        let close = calculate_semantic_similarity(&embedder, "stress et calme", &keywords)
            .await
            .unwrap();
        let far = calculate_semantic_similarity(&embedder, "xyz", &keywords)
            .await
            .unwrap();

        assert!(close > far);
        assert!(close <= 1.0 + 1e-12);
    }

    #[tokio::test]
    async fn test_semantic_similarity_rejects_wrong_batch_size() {
        let err = calculate_semantic_similarity(&ShortEmbedder, "text", &["kw"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Expected 2 embeddings"));
    }
}
