//! Risk factors and their closed sets of levels.
//!
//! Every factor has a stable key (used in configuration files and on the
//! command line), a display name, and a fixed list of levels. Level labels
//! are the ones printed on the published nomogram.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{NomogramError, NomogramResult};

/// A categorical clinical attribute contributing points to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "sex")]
    Sex,
    #[serde(rename = "cancer")]
    Cancer,
    #[serde(rename = "pr")]
    PulseRate,
}

impl RiskFactor {
    /// All factors in the order they appear on the nomogram.
    pub const ALL: [RiskFactor; 4] = [
        RiskFactor::Age,
        RiskFactor::Sex,
        RiskFactor::Cancer,
        RiskFactor::PulseRate,
    ];

    /// Stable key used in configuration files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            RiskFactor::Age => "age",
            RiskFactor::Sex => "sex",
            RiskFactor::Cancer => "cancer",
            RiskFactor::PulseRate => "pr",
        }
    }

    /// Name printed on the nomogram.
    pub fn display_name(self) -> &'static str {
        match self {
            RiskFactor::Age => "Age",
            RiskFactor::Sex => "Sex",
            RiskFactor::Cancer => "Cancer Type",
            RiskFactor::PulseRate => "Pulse Rate (PR)",
        }
    }

    /// The legal levels of this factor, in presentation order.
    pub fn levels(self) -> &'static [FactorLevel] {
        match self {
            RiskFactor::Age => &AGE_LEVELS,
            RiskFactor::Sex => &SEX_LEVELS,
            RiskFactor::Cancer => &CANCER_LEVELS,
            RiskFactor::PulseRate => &PULSE_RATE_LEVELS,
        }
    }

    /// Parses a raw level label for this factor.
    ///
    /// Accepts the exact label, a case-insensitive match, and the ASCII
    /// spellings `<=` / `>=` for `≤` / `≥`.
    pub fn parse_level(self, raw: &str) -> NomogramResult<FactorLevel> {
        let wanted = normalize_label(raw);
        self.levels()
            .iter()
            .copied()
            .find(|level| level.label() == raw || normalize_label(level.label()) == wanted)
            .ok_or_else(|| {
                let options: Vec<&str> = self.levels().iter().map(|l| l.label()).collect();
                NomogramError::invalid_selection(
                    self.key(),
                    format!(
                        "`{raw}` is not a recognized option (expected one of: {})",
                        options.join(", ")
                    ),
                )
            })
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for RiskFactor {
    type Err = NomogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        RiskFactor::ALL
            .iter()
            .copied()
            .find(|factor| factor.key() == key)
            .ok_or_else(|| NomogramError::invalid_selection(s, "unknown risk factor"))
    }
}

fn normalize_label(raw: &str) -> String {
    raw.trim()
        .replace("<=", "≤")
        .replace(">=", "≥")
        .to_lowercase()
}

/// Levels of [`RiskFactor::Age`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeBracket {
    /// Older than six years.
    Over6,
    /// Six years or younger.
    UpTo6,
}

/// Levels of [`RiskFactor::Sex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Male,
    Female,
}

/// Levels of [`RiskFactor::Cancer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CancerType {
    /// Acute lymphoblastic leukemia.
    All,
    /// Acute myeloid leukemia.
    Aml,
    BrainTumor,
    Neuroblastoma,
    Lymphoma,
    Others,
}

/// Levels of [`RiskFactor::PulseRate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PulseRate {
    /// Below 122 beats per minute.
    Below122,
    /// 122 beats per minute or more.
    AtLeast122,
}

/// One concrete level of one risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FactorLevel {
    Age(AgeBracket),
    Sex(Sex),
    Cancer(CancerType),
    PulseRate(PulseRate),
}

const AGE_LEVELS: [FactorLevel; 2] = [
    FactorLevel::Age(AgeBracket::Over6),
    FactorLevel::Age(AgeBracket::UpTo6),
];

const SEX_LEVELS: [FactorLevel; 2] = [FactorLevel::Sex(Sex::Male), FactorLevel::Sex(Sex::Female)];

const CANCER_LEVELS: [FactorLevel; 6] = [
    FactorLevel::Cancer(CancerType::All),
    FactorLevel::Cancer(CancerType::Aml),
    FactorLevel::Cancer(CancerType::BrainTumor),
    FactorLevel::Cancer(CancerType::Neuroblastoma),
    FactorLevel::Cancer(CancerType::Lymphoma),
    FactorLevel::Cancer(CancerType::Others),
];

const PULSE_RATE_LEVELS: [FactorLevel; 2] = [
    FactorLevel::PulseRate(PulseRate::Below122),
    FactorLevel::PulseRate(PulseRate::AtLeast122),
];

impl FactorLevel {
    /// Iterates every level of every factor, factor by factor.
    pub fn all() -> impl Iterator<Item = FactorLevel> {
        RiskFactor::ALL
            .into_iter()
            .flat_map(|factor| factor.levels().iter().copied())
    }

    /// The factor this level belongs to.
    pub fn factor(self) -> RiskFactor {
        match self {
            FactorLevel::Age(_) => RiskFactor::Age,
            FactorLevel::Sex(_) => RiskFactor::Sex,
            FactorLevel::Cancer(_) => RiskFactor::Cancer,
            FactorLevel::PulseRate(_) => RiskFactor::PulseRate,
        }
    }

    /// Label printed on the nomogram axis.
    pub fn label(self) -> &'static str {
        match self {
            FactorLevel::Age(AgeBracket::Over6) => ">6",
            FactorLevel::Age(AgeBracket::UpTo6) => "≤6",
            FactorLevel::Sex(Sex::Male) => "Male",
            FactorLevel::Sex(Sex::Female) => "Female",
            FactorLevel::Cancer(CancerType::All) => "ALL",
            FactorLevel::Cancer(CancerType::Aml) => "AML",
            FactorLevel::Cancer(CancerType::BrainTumor) => "Brain tumor",
            FactorLevel::Cancer(CancerType::Neuroblastoma) => "Neuroblastoma",
            FactorLevel::Cancer(CancerType::Lymphoma) => "Lymphoma",
            FactorLevel::Cancer(CancerType::Others) => "Others",
            FactorLevel::PulseRate(PulseRate::Below122) => "<122 beats/min",
            FactorLevel::PulseRate(PulseRate::AtLeast122) => "≥122 beats/min",
        }
    }
}

impl fmt::Display for FactorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FactorLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl From<AgeBracket> for FactorLevel {
    fn from(v: AgeBracket) -> Self {
        FactorLevel::Age(v)
    }
}

impl From<Sex> for FactorLevel {
    fn from(v: Sex) -> Self {
        FactorLevel::Sex(v)
    }
}

impl From<CancerType> for FactorLevel {
    fn from(v: CancerType) -> Self {
        FactorLevel::Cancer(v)
    }
}

impl From<PulseRate> for FactorLevel {
    fn from(v: PulseRate) -> Self {
        FactorLevel::PulseRate(v)
    }
}
