//! Chart rendering for evaluation results
//!
//! Writes four SVG charts with fixed names into an output directory. Error
//! results are left out; when nothing was scored, no file is written.

mod charts;
mod svg;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::result::{scored_results, EvaluationResult};
use crate::summary::AggregateStatistics;

pub use charts::{heat_text_color, score_color, ACCEPTABLE_THRESHOLD, MINIMUM_THRESHOLD};

pub const GLOBAL_SCORE_CHART: &str = "chart_1_score_global.svg";
pub const METRICS_DETAIL_CHART: &str = "chart_2_metrics_detail.svg";
pub const RADAR_CHART: &str = "chart_3_radar_means.svg";
pub const HEATMAP_CHART: &str = "chart_4_heatmap.svg";

/// Renders the chart set into a directory
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    output_dir: PathBuf,
}

impl ReportRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render every chart, overwriting previous files
    ///
    /// Returns the written paths, or an empty list when no result was scored.
    pub fn render(&self, results: &[EvaluationResult]) -> Result<Vec<PathBuf>> {
        let scored = scored_results(results);
        let stats = match AggregateStatistics::from_results(results) {
            Some(stats) => stats,
            None => {
                warn!("No valid results, skipping chart rendering");
                println!("No valid results to chart ({} attempted).", results.len());
                return Ok(Vec::new());
            }
        };

        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_dir.display()
            )
        })?;

        let rendered = [
            (GLOBAL_SCORE_CHART, charts::global_scores(&scored)),
            (METRICS_DETAIL_CHART, charts::metrics_detail(&scored)),
            (RADAR_CHART, charts::radar_means(&stats)),
            (HEATMAP_CHART, charts::heatmap(&scored)),
        ];

        let mut written = Vec::with_capacity(rendered.len());
        for (name, content) in rendered {
            let path = self.output_dir.join(name);
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write chart: {}", path.display()))?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        info!(
            "Rendered {} chart(s) for {} scored case(s) into {}",
            written.len(),
            scored.len(),
            self.output_dir.display()
        );
        Ok(written)
    }
}
