//! The four report charts, each rendered to an SVG string

use std::f64::consts::PI;

use super::svg::{sample_palette, Anchor, Stroke, Svg, TextStyle, RED_YELLOW_GREEN, VIRIDIS};
use crate::cases::short_name;
use crate::metrics::{KEYWORD_COVERAGE_WEIGHT, PROGRAM_MATCH_WEIGHT, SEMANTIC_SIMILARITY_WEIGHT};
use crate::result::ScoredView;
use crate::summary::AggregateStatistics;

/// Score above which a case is considered acceptable
pub const ACCEPTABLE_THRESHOLD: f64 = 0.8;
/// Score below which a case is considered failing
pub const MINIMUM_THRESHOLD: f64 = 0.6;

const GREEN: &str = "#27ae60";
const ORANGE: &str = "#e67e22";
const RED: &str = "#c0392b";

const PROGRAM_COLOR: &str = "#2ecc71";
const KEYWORD_COLOR: &str = "#3498db";
const SEMANTIC_COLOR: &str = "#9b59b6";
const RADAR_COLOR: &str = "#e74c3c";

const GRID: &str = "#dddddd";
const AXIS: &str = "#444444";

/// Color of a score label: green when acceptable, orange above the minimum, red below
pub fn score_color(score: f64) -> &'static str {
    if score >= ACCEPTABLE_THRESHOLD {
        GREEN
    } else if score >= MINIMUM_THRESHOLD {
        ORANGE
    } else {
        RED
    }
}

/// Heatmap cell text color, white on the dark low end of the scale
pub fn heat_text_color(value: f64) -> &'static str {
    if value < 0.5 {
        "#ffffff"
    } else {
        "#000000"
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn title(svg: &mut Svg, text: &str) {
    let x = svg.width() / 2.0;
    svg.text(x, 36.0, text, &TextStyle::new(20.0).anchor(Anchor::Middle).bold());
}

/// Legend entry: a colored swatch followed by a label
fn legend_swatch(svg: &mut Svg, x: f64, y: f64, color: &str, label: &str) {
    svg.rect(x, y - 10.0, 14.0, 14.0, color, None);
    svg.text(x + 20.0, y + 2.0, label, &TextStyle::new(12.0));
}

fn legend_line(svg: &mut Svg, x: f64, y: f64, stroke: &Stroke, label: &str) {
    svg.line(x, y - 3.0, x + 24.0, y - 3.0, stroke);
    svg.text(x + 30.0, y + 2.0, label, &TextStyle::new(12.0));
}

/// Horizontal bar per case, best score on top
pub fn global_scores(scored: &[ScoredView<'_>]) -> String {
    let mut ranked: Vec<&ScoredView<'_>> = scored.iter().collect();
    ranked.sort_by(|a, b| b.global_score.total_cmp(&a.global_score));

    let bar_h = 32.0;
    let gap = 16.0;
    let left = 300.0;
    let plot_w = 560.0;
    let top = 110.0;
    let plot_h = ranked.len() as f64 * (bar_h + gap) + gap;
    let note_y = top + plot_h + 60.0;
    let width = left + plot_w + 140.0;
    let height = note_y + 110.0;

    let mut svg = Svg::new(width, height);
    title(&mut svg, "Global score per test case");

    let x_of = |score: f64| left + score.clamp(0.0, 1.0) * plot_w;

    for i in 0..=5 {
        let tick = i as f64 * 0.2;
        let x = x_of(tick);
        svg.line(x, top, x, top + plot_h, &Stroke::new(GRID, 1.0));
        svg.text(
            x,
            top + plot_h + 18.0,
            &format!("{:.0}%", tick * 100.0),
            &TextStyle::new(11.0).anchor(Anchor::Middle),
        );
    }
    svg.line(left, top, left, top + plot_h, &Stroke::new(AXIS, 1.5));
    svg.line(left, top + plot_h, left + plot_w, top + plot_h, &Stroke::new(AXIS, 1.5));
    svg.text(
        left + plot_w / 2.0,
        top + plot_h + 40.0,
        "Global score",
        &TextStyle::new(13.0).anchor(Anchor::Middle).bold(),
    );

    let n = ranked.len().max(2) as f64 - 1.0;
    for (i, view) in ranked.iter().enumerate() {
        let y = top + gap + i as f64 * (bar_h + gap);
        let fill = sample_palette(&VIRIDIS, i as f64 / n).hex();
        let outline = Stroke::new("#333333", 0.8);
        let bar_w = x_of(view.global_score) - left;
        svg.rect(left, y, bar_w, bar_h, &fill, Some(&outline));
        svg.text(
            left - 10.0,
            y + bar_h / 2.0 + 4.0,
            view.test_name,
            &TextStyle::new(12.0).anchor(Anchor::End),
        );
        svg.text(
            x_of(view.global_score) + 8.0,
            y + bar_h / 2.0 + 5.0,
            &percent(view.global_score),
            &TextStyle::new(13.0).bold().fill(score_color(view.global_score)),
        );
    }

    let acceptable = Stroke::new(GREEN, 2.0).dashed();
    let minimum = Stroke::new(ORANGE, 2.0).dashed();
    let thresholds = [(ACCEPTABLE_THRESHOLD, &acceptable), (MINIMUM_THRESHOLD, &minimum)];
    for (threshold, stroke) in thresholds {
        let x = x_of(threshold);
        svg.line(x, top, x, top + plot_h, stroke);
    }

    legend_line(&mut svg, left, 74.0, &acceptable, "Acceptable threshold (80%)");
    legend_line(&mut svg, left + 240.0, 74.0, &minimum, "Minimum threshold (60%)");

    svg.panel(40.0, note_y, width - 80.0, 80.0, "#fdf2d0", 0.8);
    svg.text_lines(
        56.0,
        note_y + 24.0,
        18.0,
        &[
            "Interpretation".to_string(),
            format!(
                "Global score = program match x {:.0}% + keyword coverage x {:.0}% + semantic similarity x {:.0}%",
                PROGRAM_MATCH_WEIGHT * 100.0,
                KEYWORD_COVERAGE_WEIGHT * 100.0,
                SEMANTIC_SIMILARITY_WEIGHT * 100.0
            ),
            "Green: at least 80%   Orange: at least 60%   Red: below 60%".to_string(),
        ],
        &TextStyle::new(12.0),
    );

    svg.finish()
}

/// Three vertical bars per case, one per component metric
pub fn metrics_detail(scored: &[ScoredView<'_>]) -> String {
    let group_w = 150.0;
    let bar_w = 36.0;
    let left = 80.0;
    let top = 100.0;
    let plot_h = 360.0;
    let plot_w = (scored.len() as f64 * group_w).max(group_w);
    let width = (left + plot_w + 60.0).max(760.0);
    let height = top + plot_h + 130.0;

    let mut svg = Svg::new(width, height);
    title(&mut svg, "Metric detail per test case");

    // y axis spans [0, 1.2]
    let y_of = |value: f64| top + plot_h - value.clamp(0.0, 1.2) / 1.2 * plot_h;

    for i in 0..=6 {
        let tick = i as f64 * 0.2;
        let y = y_of(tick);
        svg.line(left, y, left + plot_w, y, &Stroke::new(GRID, 1.0));
        svg.text(
            left - 8.0,
            y + 4.0,
            &format!("{:.1}", tick),
            &TextStyle::new(11.0).anchor(Anchor::End),
        );
    }
    svg.line(left, top, left, top + plot_h, &Stroke::new(AXIS, 1.5));
    svg.line(left, top + plot_h, left + plot_w, top + plot_h, &Stroke::new(AXIS, 1.5));
    svg.line(left, y_of(1.0), left + plot_w, y_of(1.0), &Stroke::new("#888888", 1.5).dotted());
    svg.text(
        24.0,
        top + plot_h / 2.0,
        "Score",
        &TextStyle::new(13.0).anchor(Anchor::Middle).bold().rotate(-90.0),
    );

    let series = [PROGRAM_COLOR, KEYWORD_COLOR, SEMANTIC_COLOR];
    for (i, view) in scored.iter().enumerate() {
        let metrics = view.case.metrics();
        let values = [metrics.program_match, metrics.keyword_coverage, metrics.semantic_similarity];
        let group_x = left + i as f64 * group_w + (group_w - 3.0 * bar_w) / 2.0;

        for (j, (value, color)) in values.iter().zip(series).enumerate() {
            let x = group_x + j as f64 * bar_w;
            let y = y_of(*value);
            svg.rect(x + 2.0, y, bar_w - 4.0, top + plot_h - y, color, None);
        }

        let label_x = left + i as f64 * group_w + group_w / 2.0;
        svg.text(
            label_x,
            top + plot_h + 20.0,
            short_name(view.test_name),
            &TextStyle::new(11.0).anchor(Anchor::End).rotate(-25.0),
        );
    }

    let legend_y = 70.0;
    legend_swatch(&mut svg, left, legend_y, PROGRAM_COLOR, "Program match");
    legend_swatch(&mut svg, left + 150.0, legend_y, KEYWORD_COLOR, "Keyword coverage");
    legend_swatch(&mut svg, left + 310.0, legend_y, SEMANTIC_COLOR, "Semantic similarity");

    svg.finish()
}

/// Polar plot of the three mean component metrics
pub fn radar_means(stats: &AggregateStatistics) -> String {
    let (cx, cy, radius) = (330.0, 340.0, 210.0);
    let mut svg = Svg::new(900.0, 640.0);
    title(&mut svg, "Mean metric profile");

    let axes = [
        ("Program match", stats.mean_program_match),
        ("Keyword coverage", stats.mean_keyword_coverage),
        ("Semantic similarity", stats.mean_semantic_similarity),
    ];

    // First axis at 12 o'clock, then clockwise; screen y grows downward.
    let angle = |i: usize| -PI / 2.0 + i as f64 * 2.0 * PI / axes.len() as f64;
    let point = |i: usize, r: f64| {
        let a = angle(i);
        (cx + radius * r * a.cos(), cy + radius * r * a.sin())
    };

    for ring in 1..=5 {
        let r = ring as f64 * 0.2;
        svg.circle(cx, cy, radius * r, "none", Some(&Stroke::new(GRID, 1.0)));
        svg.text(
            cx + 4.0,
            cy - radius * r - 2.0,
            &format!("{:.1}", r),
            &TextStyle::new(10.0).fill("#888888"),
        );
    }

    for (i, (label, _)) in axes.iter().enumerate() {
        let (x, y) = point(i, 1.0);
        svg.line(cx, cy, x, y, &Stroke::new("#bbbbbb", 1.0));
        let (lx, ly) = point(i, 1.14);
        let anchor = if (lx - cx).abs() < 1.0 {
            Anchor::Middle
        } else if lx > cx {
            Anchor::Start
        } else {
            Anchor::End
        };
        svg.text(lx, ly + 4.0, label, &TextStyle::new(13.0).anchor(anchor).bold());
    }

    let vertices: Vec<(f64, f64)> = axes
        .iter()
        .enumerate()
        .map(|(i, (_, value))| point(i, value.clamp(0.0, 1.0)))
        .collect();
    svg.polygon(&vertices, RADAR_COLOR, 0.25, &Stroke::new(RADAR_COLOR, 2.0));

    for ((x, y), (_, value)) in vertices.iter().zip(axes.iter()) {
        svg.circle(*x, *y, 4.0, RADAR_COLOR, None);
        svg.text(
            *x + 8.0,
            *y - 8.0,
            &percent(*value),
            &TextStyle::new(12.0).bold().fill(RADAR_COLOR),
        );
    }

    let (bx, by) = (600.0, 250.0);
    svg.panel(bx, by, 260.0, 120.0, "#fbe9e7", 0.9);
    svg.text(bx + 14.0, by + 26.0, "Means", &TextStyle::new(13.0).bold());
    let lines: Vec<String> = axes
        .iter()
        .map(|(label, value)| format!("{}: {}", label, percent(*value)))
        .collect();
    svg.text_lines(bx + 14.0, by + 52.0, 22.0, &lines, &TextStyle::new(12.0));

    svg.finish()
}

/// Metrics by case grid, colored on a red to green scale
pub fn heatmap(scored: &[ScoredView<'_>]) -> String {
    let cell_w = 120.0;
    let cell_h = 60.0;
    let left = 190.0;
    let top = 80.0;
    let grid_w = scored.len() as f64 * cell_w;
    let grid_h = 3.0 * cell_h;
    let bar_x = left + grid_w + 40.0;
    let width = (bar_x + 90.0).max(640.0);
    let height = top + grid_h + 130.0;

    let mut svg = Svg::new(width, height);
    title(&mut svg, "Metric heatmap");

    let rows = ["Program match", "Keyword coverage", "Semantic similarity"];
    for (r, label) in rows.iter().enumerate() {
        svg.text(
            left - 10.0,
            top + r as f64 * cell_h + cell_h / 2.0 + 4.0,
            label,
            &TextStyle::new(12.0).anchor(Anchor::End).bold(),
        );
    }

    for (c, view) in scored.iter().enumerate() {
        let metrics = view.case.metrics();
        let values = [metrics.program_match, metrics.keyword_coverage, metrics.semantic_similarity];
        let x = left + c as f64 * cell_w;

        for (r, value) in values.iter().enumerate() {
            let y = top + r as f64 * cell_h;
            let fill = sample_palette(&RED_YELLOW_GREEN, *value).hex();
            svg.rect(x, y, cell_w, cell_h, &fill, Some(&Stroke::new("#ffffff", 2.0)));
            svg.text(
                x + cell_w / 2.0,
                y + cell_h / 2.0 + 5.0,
                &percent(*value),
                &TextStyle::new(13.0).anchor(Anchor::Middle).bold().fill(heat_text_color(*value)),
            );
        }

        svg.text(
            x + cell_w / 2.0,
            top + grid_h + 20.0,
            short_name(view.test_name),
            &TextStyle::new(11.0).anchor(Anchor::End).rotate(-25.0),
        );
    }

    // Color bar, 1.0 at the top
    let stops: Vec<(f64, String)> = (0..=10)
        .map(|i| {
            let offset = i as f64 / 10.0;
            (offset, sample_palette(&RED_YELLOW_GREEN, 1.0 - offset).hex())
        })
        .collect();
    svg.vertical_gradient("heat-scale", &stops);
    svg.rect(bar_x, top, 20.0, grid_h, "url(#heat-scale)", Some(&Stroke::new(AXIS, 1.0)));
    for i in 0..=4 {
        let value = i as f64 * 0.25;
        svg.text(
            bar_x + 26.0,
            top + grid_h - value * grid_h + 4.0,
            &format!("{:.0}%", value * 100.0),
            &TextStyle::new(10.0),
        );
    }

    svg.finish()
}
