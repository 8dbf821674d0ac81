//! Built-in tables of the bacteremia nomogram for patients with persistent
//! neutropenic fever.

use crate::calibration::{CalibrationPoint, CalibrationTable};
use crate::factor::{AgeBracket, CancerType, FactorLevel, PulseRate, Sex};
use crate::points::PointTable;

pub const BACTEREMIA_TITLE: &str = "Nomogram Risk Calculator";
pub const BACTEREMIA_CAPTION: &str =
    "Nomogram for Bacteremia in patients with Persistent Neutropenic Fever.";

/// Risk-axis anchors, ascending by points.
pub const BACTEREMIA_CALIBRATION: [CalibrationPoint; 14] = [
    CalibrationPoint::new(205, 0.001),
    CalibrationPoint::new(214, 0.010),
    CalibrationPoint::new(220, 0.050),
    CalibrationPoint::new(223, 0.100),
    CalibrationPoint::new(226, 0.200),
    CalibrationPoint::new(228, 0.300),
    CalibrationPoint::new(230, 0.400),
    CalibrationPoint::new(231, 0.500),
    CalibrationPoint::new(233, 0.600),
    CalibrationPoint::new(234, 0.700),
    CalibrationPoint::new(236, 0.800),
    CalibrationPoint::new(239, 0.900),
    CalibrationPoint::new(242, 0.950),
    CalibrationPoint::new(249, 0.990),
];

pub fn bacteremia_points(level: FactorLevel) -> u32 {
    match level {
        FactorLevel::Age(AgeBracket::Over6) => 0,
        FactorLevel::Age(AgeBracket::UpTo6) => 40,
        FactorLevel::Sex(Sex::Male) => 0,
        FactorLevel::Sex(Sex::Female) => 46,
        FactorLevel::Cancer(CancerType::All) => 0,
        FactorLevel::Cancer(CancerType::Aml) => 56,
        FactorLevel::Cancer(CancerType::BrainTumor) => 5,
        FactorLevel::Cancer(CancerType::Neuroblastoma) => 54,
        FactorLevel::Cancer(CancerType::Lymphoma) => 100,
        FactorLevel::Cancer(CancerType::Others) => 3,
        FactorLevel::PulseRate(PulseRate::Below122) => 0,
        FactorLevel::PulseRate(PulseRate::AtLeast122) => 86,
    }
}

/// Point table built from [`bacteremia_points`].
pub fn bacteremia_point_table() -> PointTable {
    PointTable::complete(bacteremia_points)
}

pub fn bacteremia_calibration() -> CalibrationTable {
    CalibrationTable::from_sorted(&BACTEREMIA_CALIBRATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_calibration_passes_validation() {
        let validated = CalibrationTable::new(BACTEREMIA_CALIBRATION).unwrap();
        assert_eq!(validated, bacteremia_calibration());
    }

    #[test]
    fn builtin_points_pass_validation() {
        let validated =
            PointTable::new(FactorLevel::all().map(|l| (l, bacteremia_points(l)))).unwrap();
        assert_eq!(validated, bacteremia_point_table());
        assert_eq!(validated.max_total(), 40 + 46 + 100 + 86);
    }
}
