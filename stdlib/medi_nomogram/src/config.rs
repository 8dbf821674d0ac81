//! JSON configuration for nomogram tables.
//!
//! The document mirrors how the tables are printed on a nomogram: point
//! values keyed by factor key and level label, and calibration
//! probabilities keyed by point total.
//!
//! ```json
//! {
//!   "title": "Nomogram Risk Calculator",
//!   "points": { "age": { ">6": 0, "≤6": 40 }, "sex": { "Male": 0, "Female": 46 } },
//!   "calibration": { "205": 0.001, "249": 0.99 }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationTable;
use crate::error::{NomogramError, NomogramResult};
use crate::factor::RiskFactor;
use crate::points::PointTable;
use crate::Nomogram;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NomogramConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// factor key -> level label -> points
    pub points: BTreeMap<String, BTreeMap<String, u32>>,
    /// point total -> probability
    pub calibration: BTreeMap<u32, f64>,
}

impl NomogramConfig {
    pub fn load(path: impl AsRef<Path>) -> NomogramResult<Self> {
        let path = path.as_ref();
        let text = read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!(
            "loaded nomogram tables `{}` from {}",
            config.title,
            path.display()
        );
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> NomogramResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> NomogramResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Captures the tables of an existing nomogram.
    pub fn from_nomogram(nomogram: &Nomogram) -> Self {
        let mut points: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
        for (level, value) in nomogram.point_table().iter() {
            points
                .entry(level.factor().key().to_string())
                .or_default()
                .insert(level.label().to_string(), value);
        }

        let calibration = nomogram
            .calibration()
            .anchors()
            .iter()
            .map(|a| (a.points, a.probability))
            .collect();

        Self {
            title: nomogram.title().to_string(),
            caption: nomogram.caption().map(str::to_string),
            points,
            calibration,
        }
    }

    /// Validates the document and builds the tables it describes.
    pub fn into_nomogram(self) -> NomogramResult<Nomogram> {
        let mut entries = Vec::new();
        for (key, levels) in &self.points {
            let factor: RiskFactor = key.parse().map_err(|_| {
                NomogramError::invalid_point_table(key.as_str(), "unknown risk factor")
            })?;
            for (label, value) in levels {
                let level = factor.parse_level(label).map_err(|_| {
                    NomogramError::invalid_point_table(
                        factor.key(),
                        format!("`{label}` is not a level of this factor"),
                    )
                })?;
                entries.push((level, *value));
            }
        }
        let points = PointTable::new(entries)?;
        let calibration = CalibrationTable::new(self.calibration)?;

        let mut nomogram = Nomogram::new(self.title, points, calibration)?;
        if let Some(caption) = self.caption {
            nomogram = nomogram.with_caption(caption);
        }
        Ok(nomogram)
    }
}

impl Default for NomogramConfig {
    fn default() -> Self {
        Self::from_nomogram(&Nomogram::bacteremia())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_lists_every_factor() {
        let config = NomogramConfig::default();
        let keys: Vec<&str> = config.points.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["age", "cancer", "pr", "sex"]);
        assert_eq!(config.points["cancer"]["Lymphoma"], 100);
        assert_eq!(config.calibration.len(), 14);
        assert_eq!(config.calibration[&231], 0.5);
    }

    #[test]
    fn calibration_keys_serialize_as_strings() {
        let json = NomogramConfig::default().to_json_pretty().unwrap();
        assert!(json.contains("\"205\": 0.001"));
        assert!(json.contains("\"≥122 beats/min\": 86"));
    }

    #[test]
    fn unknown_factor_is_rejected() {
        let mut config = NomogramConfig::default();
        config
            .points
            .insert("weight".into(), BTreeMap::from([("heavy".to_string(), 3)]));
        let err = config.into_nomogram().unwrap_err();
        assert!(
            matches!(err, NomogramError::InvalidPointTable { ref factor, .. } if factor == "weight")
        );
    }

    #[test]
    fn empty_calibration_is_rejected() {
        let mut config = NomogramConfig::default();
        config.calibration.clear();
        assert!(matches!(
            config.into_nomogram(),
            Err(NomogramError::EmptyCalibrationTable)
        ));
    }
}
