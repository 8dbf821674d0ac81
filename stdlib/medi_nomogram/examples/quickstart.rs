use medi_nomogram::{builtin, estimate_risk, RiskFactor, Selection};

fn main() {
    let selection = Selection::from_labels([
        ("age", "≤6"),
        ("sex", "Female"),
        ("cancer", "Neuroblastoma"),
        ("pr", "<122 beats/min"),
    ])
    .expect("valid labels");

    let result = builtin().assess(&selection).expect("complete selection");
    println!("total={} risk={:.4}", result.total_points, result.risk);
    for c in &result.contributions {
        println!("  {} ({}): {}", c.factor, c.level, c.points);
    }

    // Curve lookups don't need a selection
    for points in [200, 232, 260] {
        println!("{points} points -> {:.4}", estimate_risk(points).unwrap_or(f64::NAN));
    }

    let missing = Selection::new().with(medi_nomogram::Sex::Male);
    let err = builtin().assess(&missing).unwrap_err();
    println!("incomplete selection: {err}");
    assert!(missing.missing().contains(&RiskFactor::Age));
}
