//! End-to-end evaluation flows behind the `run` and `report` commands
//!
//! Results are persisted before charts are drawn, and a chart failure only
//! produces a warning, so a finished run is never lost.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use llm::Embedder;
use recommender::RecommendationService;
use tracing::warn;

use crate::cases::{builtin_cases, TestCase};
use crate::loader::load_cases_from_dir;
use crate::report::ReportRenderer;
use crate::result::{load_results, save_results, EvaluationResult, RESULTS_FILE};
use crate::runner::EvalRunner;
use crate::summary::{print_summary, AggregateStatistics};

/// Knobs for a single evaluation run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub charts: bool,
    pub verbose: bool,
}

/// What a run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub results: Vec<EvaluationResult>,
    pub stats: Option<AggregateStatistics>,
    pub results_path: PathBuf,
    pub charts: Vec<PathBuf>,
}

impl RunOutcome {
    /// Process exit status: 1 when every case errored
    pub fn exit_code(&self) -> i32 {
        if !self.results.is_empty() && self.results.iter().all(EvaluationResult::is_error) {
            1
        } else {
            0
        }
    }
}

/// What a report over saved results produced
#[derive(Debug)]
pub struct ReportOutcome {
    pub stats: Option<AggregateStatistics>,
    pub charts: Vec<PathBuf>,
}

/// Load cases from directory (if provided) or use built-in cases
pub fn get_cases(cases_dir: Option<&Path>) -> Result<Vec<TestCase>> {
    match cases_dir {
        Some(dir) => {
            println!("Loading test cases from: {}", dir.display());
            let mut cases = load_cases_from_dir(dir)?;

            if cases.is_empty() {
                println!("No test cases found in directory, using built-in cases");
                cases = builtin_cases();
            }

            Ok(cases)
        }
        None => Ok(builtin_cases()),
    }
}

/// Keep the cases whose name contains `filter`
pub fn select_cases(cases: Vec<TestCase>, filter: Option<&str>) -> Vec<TestCase> {
    match filter {
        Some(f) => cases.into_iter().filter(|c| c.name.contains(f)).collect(),
        None => cases,
    }
}

/// Evaluate every case, print the summary, save results, then draw charts
pub async fn run_evaluation<S, E>(
    service: S,
    embedder: E,
    cases: &[TestCase],
    options: &RunOptions,
) -> Result<RunOutcome>
where
    S: RecommendationService,
    E: Embedder,
{
    let runner = EvalRunner::new(service, embedder).verbose(options.verbose);
    let results = runner.run(cases).await;

    let stats = print_summary(&results);

    let results_path = options.output_dir.join(RESULTS_FILE);
    save_results(&results_path, &results).context("Failed to persist evaluation results")?;
    println!("\nResults saved to {}", results_path.display());

    let charts = if options.charts {
        render_charts(&results, &options.output_dir)
    } else {
        Vec::new()
    };

    Ok(RunOutcome {
        results,
        stats,
        results_path,
        charts,
    })
}

/// Print the summary and redraw charts from a saved results file
pub fn report(input: &Path, output_dir: &Path) -> Result<ReportOutcome> {
    println!("Loading results from: {}", input.display());
    let results = load_results(input)?;

    let stats = print_summary(&results);
    let charts = render_charts(&results, output_dir);

    Ok(ReportOutcome { stats, charts })
}

fn render_charts(results: &[EvaluationResult], output_dir: &Path) -> Vec<PathBuf> {
    match ReportRenderer::new(output_dir).render(results) {
        Ok(written) => {
            if !written.is_empty() {
                println!("\nCharts:");
                for path in &written {
                    println!("  {}", path.display());
                }
            }
            written
        }
        Err(e) => {
            warn!("Chart rendering failed: {:#}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{GLOBAL_SCORE_CHART, RADAR_CHART};
    use crate::runner::tests::{case, FakeService, UnitEmbedder};

    async fn run(cases: &[TestCase], dir: &Path, charts: bool) -> RunOutcome {
        let options = RunOptions {
            output_dir: dir.to_path_buf(),
            charts,
            verbose: false,
        };
        run_evaluation(FakeService::new(), UnitEmbedder, cases, &options)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_saves_results_and_charts() {
        let dir = tempfile::tempdir().unwrap();
        let cases = vec![case("one", "IA & Productivité"), case("two", "down")];

        let outcome = run(&cases, dir.path(), true).await;

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.charts.len(), 4);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(outcome.stats.as_ref().unwrap().failed(), 1);
        assert_eq!(load_results(&outcome.results_path).unwrap(), outcome.results);
    }

    #[tokio::test]
    async fn test_all_errored_run_exits_nonzero_but_saves() {
        let dir = tempfile::tempdir().unwrap();
        let cases = vec![case("a", "down"), case("b", "timeout")];

        let outcome = run(&cases, dir.path(), true).await;

        assert_eq!(outcome.exit_code(), 1);
        assert!(outcome.stats.is_none());
        assert!(outcome.charts.is_empty());
        assert_eq!(load_results(&outcome.results_path).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_chart_failure_does_not_lose_results() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a chart file should go makes the write fail
        std::fs::create_dir(dir.path().join(RADAR_CHART)).unwrap();
        let cases = vec![case("one", "IA & Productivité")];

        let outcome = run(&cases, dir.path(), true).await;

        assert!(outcome.charts.is_empty());
        assert!(outcome.results_path.exists());
        assert_eq!(load_results(&outcome.results_path).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_without_charts() {
        let dir = tempfile::tempdir().unwrap();
        let cases = vec![case("one", "IA & Productivité")];

        let outcome = run(&cases, dir.path(), false).await;

        assert!(outcome.charts.is_empty());
        assert!(!dir.path().join(GLOBAL_SCORE_CHART).exists());
        assert!(outcome.results_path.exists());
    }

    #[tokio::test]
    async fn test_report_from_saved_results() {
        let dir = tempfile::tempdir().unwrap();
        let cases = vec![case("one", "IA & Productivité"), case("two", "Kizomba")];
        let saved = run(&cases, dir.path(), false).await;

        let charts_dir = dir.path().join("charts");
        let outcome = report(&saved.results_path, &charts_dir).unwrap();

        assert_eq!(outcome.stats, saved.stats);
        assert_eq!(outcome.charts.len(), 4);
        assert!(charts_dir.join(GLOBAL_SCORE_CHART).exists());
    }

    #[test]
    fn test_report_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(report(&dir.path().join(RESULTS_FILE), dir.path()).is_err());
    }

    #[test]
    fn test_select_cases() {
        let cases = vec![
            case("Profil A - Communication", "x"),
            case("Profil B - Productivité", "y"),
        ];

        let picked = select_cases(cases.clone(), Some("Productivité"));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "Profil B - Productivité");

        assert_eq!(select_cases(cases.clone(), None).len(), 2);
        assert!(select_cases(cases, Some("nothing")).is_empty());
    }

    #[test]
    fn test_get_cases_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let cases = get_cases(Some(dir.path())).unwrap();
        assert_eq!(cases.len(), builtin_cases().len());
        assert_eq!(get_cases(None).unwrap().len(), builtin_cases().len());
    }
}
