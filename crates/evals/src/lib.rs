//! Evaluation framework for the quiz recommender
//!
//! Submits known quiz profiles to the recommendation service and scores
//! each response against what a good recommendation should contain.
//!
//! ## Metrics
//!
//! - **Program match**: the recommended program is the expected one (50%)
//! - **Keyword coverage**: share of expected concepts named in the explanation (25%)
//! - **Semantic similarity**: embedding cosine between explanation and concepts (25%)
//!
//! ## Outputs
//!
//! A console summary with a verdict, `evaluation_results.json`, and four
//! SVG charts in the output directory.

pub mod cases;
pub mod config;
pub mod loader;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod result;
pub mod runner;
pub mod summary;

pub use cases::{builtin_cases, short_name, TestCase};
pub use config::{load_config, Config};
pub use loader::{load_case, load_cases_from_dir};
pub use metrics::{
    calculate_keyword_coverage, calculate_program_match, calculate_semantic_similarity,
    global_score, CaseMetrics,
};
pub use pipeline::{
    get_cases, run_evaluation, select_cases, ReportOutcome, RunOptions, RunOutcome,
};
pub use report::ReportRenderer;
pub use result::{
    load_results, save_results, EvaluationResult, Outcome, ScoredCase, RESULTS_FILE,
};
pub use runner::EvalRunner;
pub use summary::{print_summary, AggregateStatistics, Verdict};
