//! Point-based clinical nomograms.
//!
//! A nomogram turns a handful of categorical risk factors into a point
//! total ([`PointTable`]) and reads the risk for that total off a
//! calibration curve ([`CalibrationTable`]). [`Nomogram`] bundles both
//! tables; [`Nomogram::assess`] runs the two steps in sequence.
//!
//! ```
//! use medi_nomogram::{AgeBracket, CancerType, PulseRate, Selection, Sex};
//!
//! let selection = Selection::new()
//!     .with(AgeBracket::UpTo6)
//!     .with(Sex::Female)
//!     .with(CancerType::Aml)
//!     .with(PulseRate::AtLeast122);
//!
//! let result = medi_nomogram::builtin().assess(&selection).unwrap();
//! assert_eq!(result.total_points, 228);
//! assert!((result.risk - 0.3).abs() < 1e-12);
//! ```

pub mod calibration;
pub mod config;
pub mod error;
pub mod factor;
pub mod points;
pub mod tables;

use lazy_static::lazy_static;
use serde::Serialize;

pub use calibration::{CalibrationPoint, CalibrationTable};
pub use config::NomogramConfig;
pub use error::{NomogramError, NomogramResult};
pub use factor::{AgeBracket, CancerType, FactorLevel, PulseRate, RiskFactor, Sex};
pub use points::{sum_contributions, Contribution, PointTable, Selection};

lazy_static! {
    static ref BUILTIN: Nomogram = Nomogram::bacteremia();
}

/// The built-in bacteremia nomogram, shared for the life of the process.
pub fn builtin() -> &'static Nomogram {
    &BUILTIN
}

/// Point total of `selection` under the built-in nomogram.
pub fn total_points(selection: &Selection) -> NomogramResult<u32> {
    builtin().point_table().total_points(selection)
}

/// Risk for `total_points` under the built-in nomogram.
pub fn estimate_risk(total_points: u32) -> NomogramResult<f64> {
    builtin().calibration().estimate_risk(total_points)
}

/// A point table paired with the calibration curve it was derived with.
#[derive(Debug, Clone, PartialEq)]
pub struct Nomogram {
    title: String,
    caption: Option<String>,
    points: PointTable,
    calibration: CalibrationTable,
}

impl Nomogram {
    /// Fails with [`NomogramError::EmptyCalibrationTable`] if `calibration`
    /// has no anchors.
    pub fn new(
        title: impl Into<String>,
        points: PointTable,
        calibration: CalibrationTable,
    ) -> NomogramResult<Self> {
        if calibration.is_empty() {
            return Err(NomogramError::EmptyCalibrationTable);
        }
        Ok(Self {
            title: title.into(),
            caption: None,
            points,
            calibration,
        })
    }

    /// Bacteremia in patients with persistent neutropenic fever.
    pub fn bacteremia() -> Self {
        Self {
            title: tables::BACTEREMIA_TITLE.to_string(),
            caption: Some(tables::BACTEREMIA_CAPTION.to_string()),
            points: tables::bacteremia_point_table(),
            calibration: tables::bacteremia_calibration(),
        }
    }

    /// Sets the caption printed under the title.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Heading shown above results.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description of the population the nomogram was derived for.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Points awarded per factor level.
    pub fn point_table(&self) -> &PointTable {
        &self.points
    }

    /// Curve mapping point totals to risk.
    pub fn calibration(&self) -> &CalibrationTable {
        &self.calibration
    }

    /// Scores a selection and converts the total into a risk.
    pub fn assess(&self, selection: &Selection) -> NomogramResult<ScoreResult> {
        let contributions = self.points.contributions(selection)?;
        let total_points = sum_contributions(&contributions)?;
        let risk = self.calibration.estimate_risk(total_points)?;
        log::debug!("{}: {total_points} points -> risk {risk:.4}", self.title);
        Ok(ScoreResult {
            total_points,
            risk,
            contributions,
        })
    }
}

impl Default for Nomogram {
    fn default() -> Self {
        Self::bacteremia()
    }
}

/// Outcome of scoring one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Sum of the contribution points.
    pub total_points: u32,
    /// Risk read off the calibration curve for `total_points`.
    pub risk: f64,
    /// Per-factor breakdown, in factor order.
    pub contributions: Vec<Contribution>,
}

impl ScoreResult {
    /// Risk clamped to `[0, 1]`, for progress indicators.
    pub fn progress(&self) -> f64 {
        self.risk.clamp(0.0, 1.0)
    }

    /// Breakdown entry for `factor`.
    pub fn contribution(&self, factor: RiskFactor) -> Option<&Contribution> {
        self.contributions.iter().find(|c| c.factor == factor)
    }
}
