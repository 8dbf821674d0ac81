//! Point table and risk-factor selections.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{NomogramError, NomogramResult};
use crate::factor::{FactorLevel, RiskFactor};

/// Points awarded for every level of every risk factor.
///
/// A `PointTable` is always complete: construction fails unless each legal
/// level of each factor has exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointTable {
    points: BTreeMap<FactorLevel, u32>,
}

impl PointTable {
    /// Validates that every level has exactly one entry and that the
    /// highest reachable total fits in a `u32`.
    pub fn new(entries: impl IntoIterator<Item = (FactorLevel, u32)>) -> NomogramResult<Self> {
        let mut points = BTreeMap::new();
        for (level, value) in entries {
            if points.insert(level, value).is_some() {
                return Err(NomogramError::invalid_point_table(
                    level.factor().key(),
                    format!("level `{level}` is listed more than once"),
                ));
            }
        }

        if let Some(missing) = FactorLevel::all().find(|level| !points.contains_key(level)) {
            return Err(NomogramError::invalid_point_table(
                missing.factor().key(),
                format!("no points defined for level `{missing}`"),
            ));
        }

        if checked_max_total(&points).is_none() {
            return Err(NomogramError::PointOverflow);
        }

        Ok(Self { points })
    }

    /// Builds a table by asking `points` for every level.
    pub(crate) fn complete(points: impl Fn(FactorLevel) -> u32) -> Self {
        Self {
            points: FactorLevel::all().map(|level| (level, points(level))).collect(),
        }
    }

    /// Points for a single level.
    pub fn points_for(&self, level: FactorLevel) -> Option<u32> {
        self.points.get(&level).copied()
    }

    /// Iterates `(level, points)` in factor order.
    pub fn iter(&self) -> impl Iterator<Item = (FactorLevel, u32)> + '_ {
        FactorLevel::all().filter_map(|level| self.points_for(level).map(|p| (level, p)))
    }

    /// Highest total any selection can reach.
    pub fn max_total(&self) -> u32 {
        checked_max_total(&self.points).unwrap_or(u32::MAX)
    }

    /// Per-factor breakdown of a selection, in factor order.
    pub fn contributions(&self, selection: &Selection) -> NomogramResult<Vec<Contribution>> {
        RiskFactor::ALL
            .into_iter()
            .map(|factor| -> NomogramResult<Contribution> {
                let level = selection.get(factor).ok_or_else(|| {
                    NomogramError::invalid_selection(factor.key(), "no level selected")
                })?;
                let points = self.points_for(level).ok_or_else(|| {
                    NomogramError::invalid_selection(
                        factor.key(),
                        format!("`{level}` has no entry in the point table"),
                    )
                })?;
                Ok(Contribution {
                    factor,
                    level,
                    points,
                })
            })
            .collect()
    }

    /// Sums the points of every selected level.
    ///
    /// Fails with [`NomogramError::InvalidSelection`] if any factor is
    /// missing from the selection.
    pub fn total_points(&self, selection: &Selection) -> NomogramResult<u32> {
        let total = sum_contributions(&self.contributions(selection)?)?;
        log::debug!("selection {selection:?} scored {total} points");
        Ok(total)
    }
}

/// Adds up contribution points, failing instead of wrapping on overflow.
pub fn sum_contributions(contributions: &[Contribution]) -> NomogramResult<u32> {
    contributions
        .iter()
        .try_fold(0u32, |acc, c| acc.checked_add(c.points))
        .ok_or(NomogramError::PointOverflow)
}

fn checked_max_total(points: &BTreeMap<FactorLevel, u32>) -> Option<u32> {
    RiskFactor::ALL.into_iter().try_fold(0u32, |acc, factor| {
        let best = factor
            .levels()
            .iter()
            .filter_map(|level| points.get(level).copied())
            .max()
            .unwrap_or(0);
        acc.checked_add(best)
    })
}

/// Points contributed by one factor of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contribution {
    /// Factor the points were awarded for.
    pub factor: RiskFactor,
    /// Level selected for that factor.
    pub level: FactorLevel,
    /// Points awarded for the level.
    pub points: u32,
}

/// One chosen level per risk factor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    levels: BTreeMap<RiskFactor, FactorLevel>,
}

impl Selection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Selection::set`].
    pub fn with(mut self, level: impl Into<FactorLevel>) -> Self {
        self.set(level);
        self
    }

    /// Selects `level` for its factor, replacing any previous choice.
    pub fn set(&mut self, level: impl Into<FactorLevel>) -> Option<FactorLevel> {
        let level = level.into();
        self.levels.insert(level.factor(), level)
    }

    /// Level chosen for `factor`, if any.
    pub fn get(&self, factor: RiskFactor) -> Option<FactorLevel> {
        self.levels.get(&factor).copied()
    }

    /// Clears the choice for `factor`, returning it.
    pub fn remove(&mut self, factor: RiskFactor) -> Option<FactorLevel> {
        self.levels.remove(&factor)
    }

    /// Number of factors with a level.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// `true` when no factor has a level yet.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// `true` once every factor has a level.
    pub fn is_complete(&self) -> bool {
        RiskFactor::ALL
            .iter()
            .all(|factor| self.levels.contains_key(factor))
    }

    /// Factors that still need a level.
    pub fn missing(&self) -> Vec<RiskFactor> {
        RiskFactor::ALL
            .into_iter()
            .filter(|factor| !self.levels.contains_key(factor))
            .collect()
    }

    /// Builds a selection from raw `(factor key, level label)` strings.
    ///
    /// Unknown keys, unrecognized labels, and a factor given twice all fail
    /// with [`NomogramError::InvalidSelection`]. Completeness is checked
    /// later, when the selection is scored.
    pub fn from_labels<'a, I>(pairs: I) -> NomogramResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut selection = Selection::new();
        for (key, label) in pairs {
            let factor: RiskFactor = key.parse()?;
            let level = factor.parse_level(label)?;
            if let Some(previous) = selection.set(level) {
                return Err(NomogramError::invalid_selection(
                    factor.key(),
                    format!("selected twice (`{previous}` and `{level}`)"),
                ));
            }
        }
        Ok(selection)
    }

    /// Chosen `(factor, level)` pairs in factor order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, FactorLevel)> + '_ {
        self.levels.iter().map(|(f, l)| (*f, *l))
    }
}

impl FromIterator<FactorLevel> for Selection {
    fn from_iter<T: IntoIterator<Item = FactorLevel>>(iter: T) -> Self {
        let mut selection = Selection::new();
        for level in iter {
            selection.set(level);
        }
        selection
    }
}
