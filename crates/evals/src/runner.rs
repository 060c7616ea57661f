//! Evaluation runner
//!
//! Sends each test case to the recommender, scores the response, and
//! collects one result per case. A failing case is recorded and the run
//! moves on; nothing short of a panic stops the loop.

use anyhow::{Context, Result};
use llm::Embedder;
use recommender::RecommendationService;
use tracing::{debug, info, warn};

use crate::cases::TestCase;
use crate::metrics::{
    calculate_keyword_coverage, calculate_program_match, calculate_semantic_similarity,
    CaseMetrics,
};
use crate::result::EvaluationResult;

/// Drives test cases through a recommendation service
pub struct EvalRunner<S, E> {
    service: S,
    embedder: E,
    verbose: bool,
}

impl<S, E> EvalRunner<S, E>
where
    S: RecommendationService,
    E: Embedder,
{
    /// Create a new runner with the given service and loaded embedding model
    pub fn new(service: S, embedder: E) -> Self {
        Self {
            service,
            embedder,
            verbose: false,
        }
    }

    /// Also print the scored text and the complementary modules per case
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Evaluate every case in order
    pub async fn run(&self, cases: &[TestCase]) -> Vec<EvaluationResult> {
        let total = cases.len();
        let mut results = Vec::with_capacity(total);
        info!(
            "Evaluating {} case(s), similarity model {}",
            total,
            self.embedder.model()
        );

        for (i, case) in cases.iter().enumerate() {
            println!("\n{}", "-".repeat(50));
            println!("Test {}/{}: {}", i + 1, total, case.name);
            println!("{}", "-".repeat(50));

            let result = self.run_case(case).await;
            print_case(case, &result);
            results.push(result);
        }

        let failed = results.iter().filter(|r| r.is_error()).count();
        info!(
            "Evaluation finished: {} case(s), {} scored, {} errored",
            total,
            total - failed,
            failed
        );

        results
    }

    /// Evaluate a single case, converting any failure into an error result
    pub async fn run_case(&self, case: &TestCase) -> EvaluationResult {
        debug!("Case '{}' in flight", case.name);

        match self.score_case(case).await {
            Ok(result) => {
                debug!("Case '{}' scored {:.3}", case.name, result.global_score);
                result
            }
            Err(e) => {
                warn!("Case '{}' errored: {:#}", case.name, e);
                EvaluationResult::errored(&case.name, format!("{:#}", e))
            }
        }
    }

    async fn score_case(&self, case: &TestCase) -> Result<EvaluationResult> {
        let response = self
            .service
            .submit(&case.answers)
            .await
            .context("Recommendation request failed")?;

        let text = response.scored_text();
        if self.verbose {
            println!("  Scored text: {}", text);
            for module in &response.complementary_modules {
                println!("  Complementary: {} ({})", module.name, module.reason);
            }
        }

        let program_match =
            calculate_program_match(&response.principal_program.name, &case.expected_program);
        let keyword_coverage = calculate_keyword_coverage(&text, &case.expected_keywords);
        let semantic_similarity =
            calculate_semantic_similarity(&self.embedder, &text, &case.expected_keywords).await?;

        let metrics = CaseMetrics {
            program_match,
            keyword_coverage,
            semantic_similarity,
        };

        Ok(EvaluationResult::scored(case, response, metrics))
    }
}

fn print_case(case: &TestCase, result: &EvaluationResult) {
    match result.as_scored() {
        Some(view) => {
            let marker = if view.case.program_match == 1.0 {
                "[match]"
            } else {
                "[miss]"
            };
            println!("  Expected program:    {}", case.expected_program);
            println!("  Actual program:      {} {}", view.case.actual_program, marker);
            println!("  Program match:       {:.0}%", view.case.program_match * 100.0);
            println!("  Keyword coverage:    {:.0}%", view.case.keyword_coverage * 100.0);
            println!(
                "  Semantic similarity: {:.2}%",
                view.case.semantic_similarity * 100.0
            );
            println!("  GLOBAL SCORE:        {:.2}%", view.global_score * 100.0);
        }
        None => {
            println!("  Error: {}", result.error().unwrap_or("unknown error"));
        }
    }
}
