//! Text rendering for the `nomogram` command-line calculator.

use medi_nomogram::{Nomogram, NomogramResult, RiskFactor, ScoreResult, Selection};

/// Shown by `score` when no risk factor was given.
pub const SELECTION_PROMPT: &str = "Please select variables and run `score` again.";

const BAR_WIDTH: usize = 40;

/// Builds a selection from the optional per-factor command-line values.
///
/// Returns `Ok(None)` when nothing was selected so the caller can prompt
/// instead of reporting every factor as missing.
pub fn selection_from_args(
    age: Option<&str>,
    sex: Option<&str>,
    cancer: Option<&str>,
    pr: Option<&str>,
) -> NomogramResult<Option<Selection>> {
    let given: Vec<(&str, &str)> = [
        (RiskFactor::Age, age),
        (RiskFactor::Sex, sex),
        (RiskFactor::Cancer, cancer),
        (RiskFactor::PulseRate, pr),
    ]
    .into_iter()
    .filter_map(|(factor, value)| value.map(|v| (factor.key(), v)))
    .collect();

    if given.is_empty() {
        return Ok(None);
    }
    Selection::from_labels(given).map(Some)
}

/// ASCII progress bar for a fraction in `[0, 1]`.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Full report for one scored selection.
pub fn render_score(nomogram: &Nomogram, result: &ScoreResult) -> String {
    let mut out = render_heading(nomogram);

    out.push_str(&format!("Total Points:    {}\n", result.total_points));
    out.push_str(&format!("Predicted Risk:  {:.4}\n", result.risk));
    out.push('\n');

    out.push_str("Risk Probability Visualization\n");
    out.push_str(&format!(
        "{}  {:.1}%\n",
        progress_bar(result.progress(), BAR_WIDTH),
        result.progress() * 100.0
    ));
    out.push('\n');

    out.push_str("Score Details\n");
    out.push_str(&format!("[Total] {} points\n", result.total_points));
    for c in &result.contributions {
        out.push_str(&format!("- {} ({}): {} points\n", c.factor, c.level, c.points));
    }
    out
}

/// Every factor with its legal levels and their points.
pub fn render_options(nomogram: &Nomogram) -> String {
    let mut out = render_heading(nomogram);

    let table = nomogram.point_table();
    for factor in RiskFactor::ALL {
        out.push_str(&format!("{} (--{})\n", factor, factor.key()));
        for level in factor.levels() {
            let points = table.points_for(*level).unwrap_or(0);
            out.push_str(&format!("  {:<18}{:>4} points\n", level.label(), points));
        }
    }
    out.push_str(&format!("Maximum total: {} points\n", table.max_total()));
    out
}

/// Calibration anchors, one row per point total.
pub fn render_calibration(nomogram: &Nomogram) -> String {
    let mut out = render_heading(nomogram);

    out.push_str("Points  Risk\n");
    for anchor in nomogram.calibration().anchors() {
        out.push_str(&format!("{:>6}  {:.4}\n", anchor.points, anchor.probability));
    }
    out
}

fn render_heading(nomogram: &Nomogram) -> String {
    let mut out = format!("{}\n", nomogram.title());
    if let Some(caption) = nomogram.caption() {
        out.push_str(caption);
        out.push('\n');
    }
    out.push('\n');
    out
}
