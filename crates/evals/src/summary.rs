//! Aggregate statistics and verdict
//!
//! Failed cases are left out of every mean; they are reported as a count.

use std::fmt;

use serde::Serialize;

use crate::result::{scored_results, EvaluationResult, ScoredView};

/// Qualitative band for the mean global score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// [0.8, 1.0]
    Excellent,
    /// [0.6, 0.8)
    Good,
    /// [0.4, 0.6)
    Fair,
    /// [0, 0.4)
    Poor,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Verdict::Excellent
        } else if score >= 0.6 {
            Verdict::Good
        } else if score >= 0.4 {
            Verdict::Fair
        } else {
            Verdict::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Excellent => "EXCELLENT",
            Verdict::Good => "GOOD",
            Verdict::Fair => "FAIR",
            Verdict::Poor => "POOR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Verdict::Excellent => "The recommender performs very well.",
            Verdict::Good => "Acceptable performance.",
            Verdict::Fair => "Improvement needed.",
            Verdict::Poor => "The recommender needs to be reworked.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Corpus-wide means over the successfully scored cases
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStatistics {
    /// Cases submitted, including failures
    pub attempted: usize,
    /// Cases that produced a full metric set
    pub succeeded: usize,
    pub mean_global_score: f64,
    pub mean_program_match: f64,
    pub mean_keyword_coverage: f64,
    pub mean_semantic_similarity: f64,
    pub verdict: Verdict,
}

impl AggregateStatistics {
    /// Compute statistics, or `None` when no case was scored
    pub fn from_results(results: &[EvaluationResult]) -> Option<Self> {
        let scored = scored_results(results);
        if scored.is_empty() {
            return None;
        }

        let mean_global_score = mean(&scored, |v| v.global_score);

        Some(Self {
            attempted: results.len(),
            succeeded: scored.len(),
            mean_global_score,
            mean_program_match: mean(&scored, |v| v.case.program_match),
            mean_keyword_coverage: mean(&scored, |v| v.case.keyword_coverage),
            mean_semantic_similarity: mean(&scored, |v| v.case.semantic_similarity),
            verdict: Verdict::from_score(mean_global_score),
        })
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    /// Print the summary block
    pub fn print(&self) {
        println!(
            "\n  Cases: {} attempted, {} scored, {} failed",
            self.attempted,
            self.succeeded,
            self.failed()
        );
        println!("\n  Mean global score:         {:.1}%", self.mean_global_score * 100.0);
        println!("  Program accuracy:          {:.1}%", self.mean_program_match * 100.0);
        println!("  Mean keyword coverage:     {:.1}%", self.mean_keyword_coverage * 100.0);
        println!(
            "  Mean semantic similarity:  {:.1}%",
            self.mean_semantic_similarity * 100.0
        );

        println!("\n  {}", "-".repeat(40));
        println!("  VERDICT: {} - {}", self.verdict, self.verdict.description());
        println!("  {}", "-".repeat(40));
    }
}

/// Arithmetic mean of one field; callers guarantee a non-empty slice
fn mean(scored: &[ScoredView<'_>], field: impl Fn(&ScoredView<'_>) -> f64) -> f64 {
    scored.iter().map(field).sum::<f64>() / scored.len() as f64
}

/// Print the evaluation summary and return the statistics it was built from
pub fn print_summary(results: &[EvaluationResult]) -> Option<AggregateStatistics> {
    println!("\n{}", "=".repeat(60));
    println!("EVALUATION SUMMARY");
    println!("{}", "=".repeat(60));

    match AggregateStatistics::from_results(results) {
        Some(stats) => {
            stats.print();
            Some(stats)
        }
        None => {
            println!("  No successful tests ({} attempted).", results.len());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::tests::scored;

    #[test]
    fn test_verdict_bands() {
        assert_eq!(Verdict::from_score(0.85), Verdict::Excellent);
        assert_eq!(Verdict::from_score(0.65), Verdict::Good);
        assert_eq!(Verdict::from_score(0.45), Verdict::Fair);
        assert_eq!(Verdict::from_score(0.2), Verdict::Poor);
    }

    #[test]
    fn test_verdict_band_edges() {
        assert_eq!(Verdict::from_score(1.0), Verdict::Excellent);
        assert_eq!(Verdict::from_score(0.8), Verdict::Excellent);
        assert_eq!(Verdict::from_score(0.6), Verdict::Good);
        assert_eq!(Verdict::from_score(0.4), Verdict::Fair);
        assert_eq!(Verdict::from_score(0.0), Verdict::Poor);
    }

    #[test]
    fn test_no_valid_results() {
        let results = vec![
            EvaluationResult::errored("a", "down"),
            EvaluationResult::errored("b", "down"),
        ];
        assert!(AggregateStatistics::from_results(&results).is_none());
        assert!(print_summary(&results).is_none());
        assert!(print_summary(&[]).is_none());
    }

    #[test]
    fn test_failures_excluded_from_means() {
        let results = vec![
            scored("a", 1.0, 0.8, 0.6),
            EvaluationResult::errored("b", "down"),
            scored("c", 0.0, 0.4, 0.2),
        ];

        let stats = print_summary(&results).unwrap();
        assert_eq!(stats.attempted, 3);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed(), 1);
        assert!((stats.mean_program_match - 0.5).abs() < 1e-12);
        assert!((stats.mean_keyword_coverage - 0.6).abs() < 1e-12);
        assert!((stats.mean_semantic_similarity - 0.4).abs() < 1e-12);
        // (0.85 + 0.15) / 2
        assert!((stats.mean_global_score - 0.5).abs() < 1e-12);
        assert_eq!(stats.verdict, Verdict::Fair);
    }

    #[test]
    fn test_display() {
        assert_eq!(Verdict::Good.to_string(), "GOOD");
    }
}
