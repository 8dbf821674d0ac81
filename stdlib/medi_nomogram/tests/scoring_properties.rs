use medi_nomogram::{builtin, tables::BACTEREMIA_CALIBRATION, FactorLevel, RiskFactor, Selection};
use proptest::prelude::*;

fn any_level(factor: RiskFactor) -> impl Strategy<Value = FactorLevel> {
    proptest::sample::select(factor.levels().to_vec())
}

fn any_selection() -> impl Strategy<Value = Selection> {
    (
        any_level(RiskFactor::Age),
        any_level(RiskFactor::Sex),
        any_level(RiskFactor::Cancer),
        any_level(RiskFactor::PulseRate),
    )
        .prop_map(|(a, s, c, p)| [a, s, c, p].into_iter().collect())
}

#[test]
fn every_anchor_is_reproduced_exactly() {
    let calibration = builtin().calibration();
    for anchor in BACTEREMIA_CALIBRATION {
        assert_eq!(
            calibration.estimate_risk(anchor.points).unwrap(),
            anchor.probability
        );
    }
}

proptest! {
    #[test]
    fn total_is_sum_of_contributions(selection in any_selection()) {
        let table = builtin().point_table();
        let total = table.total_points(&selection).unwrap();
        let expected: u32 = RiskFactor::ALL
            .iter()
            .map(|f| table.points_for(selection.get(*f).unwrap()).unwrap())
            .sum();
        prop_assert_eq!(total, expected);
        prop_assert!(total <= table.max_total());
    }

    #[test]
    fn risk_is_monotonic_in_points(a in 0u32..400, b in 0u32..400) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let calibration = builtin().calibration();
        let r_lo = calibration.estimate_risk(lo).unwrap();
        let r_hi = calibration.estimate_risk(hi).unwrap();
        prop_assert!(r_lo <= r_hi, "risk({lo}) = {r_lo} > risk({hi}) = {r_hi}");
    }

    #[test]
    fn risk_stays_within_curve_bounds(points in any::<u32>()) {
        let risk = builtin().calibration().estimate_risk(points).unwrap();
        prop_assert!((0.001..=0.99).contains(&risk));
    }

    #[test]
    fn below_range_returns_lowest_probability(points in 0u32..=205) {
        prop_assert_eq!(builtin().calibration().estimate_risk(points).unwrap(), 0.001);
    }

    #[test]
    fn above_range_returns_highest_probability(points in 249u32..10_000) {
        prop_assert_eq!(builtin().calibration().estimate_risk(points).unwrap(), 0.99);
    }
}
