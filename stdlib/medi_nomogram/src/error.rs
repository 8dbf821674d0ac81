//! Error type shared by the scoring table, the calibration curve and the
//! configuration loader.

/// The result type used throughout the crate.
pub type NomogramResult<T> = Result<T, NomogramError>;

/// An error raised while building tables or scoring a selection.
#[derive(Debug, thiserror::Error)]
pub enum NomogramError {
    /// A risk factor is missing from a selection, selected twice, or set to a
    /// value that is not one of its declared levels.
    #[error("invalid selection for `{factor}`: {reason}")]
    InvalidSelection {
        /// Key of the offending factor (or the raw key if it was not recognized).
        factor: String,
        /// Human readable description of the problem.
        reason: String,
    },

    /// The calibration table has no anchors to interpolate between.
    #[error("calibration table is empty")]
    EmptyCalibrationTable,

    /// Two calibration anchors share the same point total.
    #[error("calibration table has more than one entry for {0} points")]
    DuplicateCalibrationKey(u32),

    /// A calibration probability is not a finite value in `[0, 1]`.
    #[error("calibration probability {probability} at {points} points is outside [0, 1]")]
    ProbabilityOutOfRange {
        /// Point total of the offending anchor.
        points: u32,
        /// Probability stored at that anchor.
        probability: f64,
    },

    /// Calibration probabilities decrease as the point total increases.
    #[error(
        "calibration table is not monotonic: {probability} at {points} points is below the preceding {previous}"
    )]
    NonMonotonicCalibration {
        /// Point total where the curve drops.
        points: u32,
        /// Probability stored at that total.
        probability: f64,
        /// Probability of the preceding anchor.
        previous: f64,
    },

    /// A point table is missing a level, lists one twice, or names an unknown one.
    #[error("invalid point table for `{factor}`: {reason}")]
    InvalidPointTable {
        /// Key of the factor whose levels are wrong.
        factor: String,
        /// Human readable description of the problem.
        reason: String,
    },

    /// Point values are large enough that a total would not fit in a `u32`.
    #[error("point table allows totals above 4294967295 points")]
    PointOverflow,

    /// A configuration file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration document is not valid JSON for the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NomogramError {
    pub(crate) fn invalid_selection(factor: impl Into<String>, reason: impl Into<String>) -> Self {
        NomogramError::InvalidSelection {
            factor: factor.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_point_table(
        factor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        NomogramError::InvalidPointTable {
            factor: factor.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by request input rather than by table
    /// configuration.
    pub fn is_selection_error(&self) -> bool {
        matches!(self, NomogramError::InvalidSelection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_selection_message_names_factor() {
        let err = NomogramError::invalid_selection("pr", "no level selected");
        assert_eq!(
            err.to_string(),
            "invalid selection for `pr`: no level selected"
        );
        assert!(err.is_selection_error());
    }

    #[test]
    fn configuration_errors_are_not_selection_errors() {
        assert!(!NomogramError::EmptyCalibrationTable.is_selection_error());
        assert!(!NomogramError::DuplicateCalibrationKey(205).is_selection_error());
    }
}
