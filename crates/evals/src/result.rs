//! Per-case evaluation results and their JSON persistence

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cases::TestCase;
use crate::metrics::CaseMetrics;
use recommender::RecommendationOutput;

/// File name of the persisted results inside the output directory
pub const RESULTS_FILE: &str = "evaluation_results.json";

/// Outcome of evaluating one test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub test_name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Composite score, 0.0 for errored cases
    pub global_score: f64,
}

/// Either a full metric set or the error that prevented scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Scored(ScoredCase),
    Errored { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCase {
    pub expected_program: String,
    pub actual_program: String,
    pub program_match: f64,
    pub keyword_coverage: f64,
    pub semantic_similarity: f64,
    pub full_response: RecommendationOutput,
}

impl ScoredCase {
    pub fn metrics(&self) -> CaseMetrics {
        CaseMetrics {
            program_match: self.program_match,
            keyword_coverage: self.keyword_coverage,
            semantic_similarity: self.semantic_similarity,
        }
    }
}

/// Borrowed view of a successfully scored result
#[derive(Debug, Clone, Copy)]
pub struct ScoredView<'a> {
    pub test_name: &'a str,
    pub case: &'a ScoredCase,
    pub global_score: f64,
}

impl EvaluationResult {
    /// Build a scored result from a service response and its metrics
    pub fn scored(case: &TestCase, response: RecommendationOutput, metrics: CaseMetrics) -> Self {
        Self {
            test_name: case.name.clone(),
            global_score: metrics.global_score(),
            outcome: Outcome::Scored(ScoredCase {
                expected_program: case.expected_program.clone(),
                actual_program: response.principal_program.name.clone(),
                program_match: metrics.program_match,
                keyword_coverage: metrics.keyword_coverage,
                semantic_similarity: metrics.semantic_similarity,
                full_response: response,
            }),
        }
    }

    /// Build an error result; the global score is forced to zero
    pub fn errored(test_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            outcome: Outcome::Errored {
                error: error.into(),
            },
            global_score: 0.0,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Errored { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Errored { error } => Some(error),
            Outcome::Scored(_) => None,
        }
    }

    pub fn as_scored(&self) -> Option<ScoredView<'_>> {
        match &self.outcome {
            Outcome::Scored(case) => Some(ScoredView {
                test_name: &self.test_name,
                case,
                global_score: self.global_score,
            }),
            Outcome::Errored { .. } => None,
        }
    }
}

/// Results that produced a full metric set, in input order
pub fn scored_results(results: &[EvaluationResult]) -> Vec<ScoredView<'_>> {
    results.iter().filter_map(EvaluationResult::as_scored).collect()
}

/// Write results as pretty-printed JSON, replacing any previous file
pub fn save_results(path: &Path, results: &[EvaluationResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(results).context("Failed to serialize results")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write results file: {}", path.display()))
}

/// Read results previously written by `save_results`
pub fn load_results(path: &Path) -> Result<Vec<EvaluationResult>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read results file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse results file: {}", path.display()))
}
