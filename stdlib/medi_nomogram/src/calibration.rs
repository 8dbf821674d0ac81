//! Calibration curve mapping point totals to observed risk.
//!
//! The curve is a sparse set of anchors read off the nomogram's risk axis.
//! Totals between two anchors are linearly interpolated; totals outside the
//! anchored range are clamped to the nearest end.

use serde::{Deserialize, Serialize};

use crate::error::{NomogramError, NomogramResult};

/// One anchor of the calibration curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub points: u32,
    pub probability: f64,
}

impl CalibrationPoint {
    pub const fn new(points: u32, probability: f64) -> Self {
        Self {
            points,
            probability,
        }
    }
}

impl From<(u32, f64)> for CalibrationPoint {
    fn from((points, probability): (u32, f64)) -> Self {
        Self::new(points, probability)
    }
}

/// Sorted, validated calibration anchors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationTable {
    anchors: Vec<CalibrationPoint>,
}

impl CalibrationTable {
    /// Builds a table from anchors in any order.
    ///
    /// Rejects duplicate point totals, probabilities that are not finite
    /// values in `[0, 1]`, and probabilities that decrease as the total
    /// grows. An empty table is accepted here; estimating from it fails.
    pub fn new<I, P>(anchors: I) -> NomogramResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<CalibrationPoint>,
    {
        let mut anchors: Vec<CalibrationPoint> = anchors.into_iter().map(Into::into).collect();
        anchors.sort_by_key(|a| a.points);

        for anchor in &anchors {
            if !anchor.probability.is_finite() || !(0.0..=1.0).contains(&anchor.probability) {
                return Err(NomogramError::ProbabilityOutOfRange {
                    points: anchor.points,
                    probability: anchor.probability,
                });
            }
        }

        for pair in anchors.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if prev.points == next.points {
                return Err(NomogramError::DuplicateCalibrationKey(next.points));
            }
            if next.probability < prev.probability {
                return Err(NomogramError::NonMonotonicCalibration {
                    points: next.points,
                    probability: next.probability,
                    previous: prev.probability,
                });
            }
        }

        Ok(Self { anchors })
    }

    /// Wraps anchors that are already known to be sorted and valid.
    pub(crate) fn from_sorted(anchors: &[CalibrationPoint]) -> Self {
        Self {
            anchors: anchors.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Anchors in ascending point order.
    pub fn anchors(&self) -> &[CalibrationPoint] {
        &self.anchors
    }

    /// Anchored point range as `(min, max)`.
    pub fn range(&self) -> Option<(u32, u32)> {
        Some((self.anchors.first()?.points, self.anchors.last()?.points))
    }

    /// Stored probability for an exact anchor.
    pub fn probability_at(&self, points: u32) -> Option<f64> {
        self.anchors
            .binary_search_by_key(&points, |a| a.points)
            .ok()
            .map(|idx| self.anchors[idx].probability)
    }

    /// Converts a point total into a risk probability.
    pub fn estimate_risk(&self, total_points: u32) -> NomogramResult<f64> {
        let (first, last) = match (self.anchors.first(), self.anchors.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(NomogramError::EmptyCalibrationTable),
        };

        if total_points <= first.points {
            return Ok(first.probability);
        }
        if total_points >= last.points {
            return Ok(last.probability);
        }

        // first.points < total_points < last.points, so 1 <= upper < len
        let upper = self.anchors.partition_point(|a| a.points < total_points);
        let hi = self.anchors[upper];
        if hi.points == total_points {
            return Ok(hi.probability);
        }
        let lo = self.anchors[upper - 1];
        log::trace!(
            "interpolating {total_points} between {} ({}) and {} ({})",
            lo.points,
            lo.probability,
            hi.points,
            hi.probability
        );
        interpolate(lo, hi, total_points)
    }
}

fn interpolate(lo: CalibrationPoint, hi: CalibrationPoint, x: u32) -> NomogramResult<f64> {
    if hi.points == lo.points {
        return Err(NomogramError::DuplicateCalibrationKey(hi.points));
    }
    let span = f64::from(hi.points - lo.points);
    let offset = f64::from(x - lo.points);
    Ok(lo.probability + (hi.probability - lo.probability) * offset / span)
}
