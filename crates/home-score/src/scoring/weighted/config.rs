use std::fmt;

use serde::{Deserialize, Serialize};

/// Points awarded by threshold and dealbreaker rules that do not configure their own.
pub const DEFAULT_POINTS: i64 = 10;

/// Evaluation strategy of a weighted rule.
///
/// Stored as a plain string; names this crate does not know are kept in `Unknown` so the
/// breakdown can report them instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleKind {
    Threshold,
    Banded,
    Enum,
    Dealbreaker,
    Unknown(String),
}

impl RuleKind {
    pub fn as_str(&self) -> &str {
        match self {
            RuleKind::Threshold => "threshold",
            RuleKind::Banded => "banded",
            RuleKind::Enum => "enum",
            RuleKind::Dealbreaker => "dealbreaker",
            RuleKind::Unknown(name) => name,
        }
    }
}

impl From<String> for RuleKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "threshold" => RuleKind::Threshold,
            "banded" => RuleKind::Banded,
            "enum" => RuleKind::Enum,
            "dealbreaker" => RuleKind::Dealbreaker,
            _ => RuleKind::Unknown(value),
        }
    }
}

impl From<RuleKind> for String {
    fn from(value: RuleKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of a threshold passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdDirection {
    /// Passes when `value >= threshold`.
    #[default]
    HigherIsBetter,
    /// Passes when `value <= threshold`, e.g. a maximum floor level.
    LowerIsBetter,
}

impl ThresholdDirection {
    pub fn passes(self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdDirection::HigherIsBetter => value >= threshold,
            ThresholdDirection::LowerIsBetter => value <= threshold,
        }
    }

    fn is_default(&self) -> bool {
        *self == ThresholdDirection::HigherIsBetter
    }
}

/// Contiguous numeric range with an associated point value. `max_value = None` is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringBand {
    pub min_value: f64,
    #[serde(default)]
    pub max_value: Option<f64>,
    pub points: i64,
}

impl ScoringBand {
    pub fn new(min_value: f64, max_value: Option<f64>, points: i64) -> Self {
        Self {
            min_value,
            max_value,
            points,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_value && self.max_value.map_or(true, |max| value <= max)
    }

    pub fn range_label(&self) -> String {
        match self.max_value {
            Some(max) if max != 0.0 => format!("{}-{}", self.min_value, max),
            _ => format!("{}+", self.min_value),
        }
    }
}

/// Named option of an enum rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    pub option: String,
    pub points: i64,
    #[serde(default)]
    pub is_dealbreaker: bool,
}

impl EnumOption {
    pub fn new(option: impl Into<String>, points: i64) -> Self {
        Self {
            option: option.into(),
            points,
            is_dealbreaker: false,
        }
    }

    pub fn dealbreaker(option: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            points: 0,
            is_dealbreaker: true,
        }
    }
}

/// Complete configuration of one weighted rule, joined with its bands and enum options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub key: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default)]
    pub default_threshold: Option<f64>,
    #[serde(default)]
    pub default_points: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub is_dealbreaker: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "ThresholdDirection::is_default")]
    pub direction: ThresholdDirection,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bands: Vec<ScoringBand>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumOption>,
}

impl ScoringRule {
    pub fn new(key: impl Into<String>, category: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            key: key.into(),
            category: category.into(),
            kind,
            default_threshold: None,
            default_points: None,
            weight: None,
            is_dealbreaker: false,
            description: None,
            direction: ThresholdDirection::HigherIsBetter,
            bands: Vec::new(),
            enums: Vec::new(),
        }
    }

    pub fn threshold(key: impl Into<String>, category: impl Into<String>, threshold: f64) -> Self {
        Self::new(key, category, RuleKind::Threshold).with_threshold(threshold)
    }

    pub fn banded(
        key: impl Into<String>,
        category: impl Into<String>,
        bands: Vec<ScoringBand>,
    ) -> Self {
        let mut rule = Self::new(key, category, RuleKind::Banded);
        rule.bands = bands;
        rule
    }

    pub fn enumerated(
        key: impl Into<String>,
        category: impl Into<String>,
        enums: Vec<EnumOption>,
    ) -> Self {
        let mut rule = Self::new(key, category, RuleKind::Enum);
        rule.enums = enums;
        rule
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.default_threshold = Some(threshold);
        self
    }

    pub fn with_points(mut self, points: i64) -> Self {
        self.default_points = Some(points);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_direction(mut self, direction: ThresholdDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn as_dealbreaker(mut self) -> Self {
        self.is_dealbreaker = true;
        self
    }

    pub fn points(&self) -> i64 {
        self.default_points.unwrap_or(DEFAULT_POINTS)
    }

    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }

    /// Label used in reasons: the description when present, otherwise the key.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.key)
    }

    /// Best attainable weighted points, ignoring dealbreaker enum options. Never negative
    /// for banded and enum rules.
    pub fn max_possible(&self) -> f64 {
        let weight = self.weight();
        match self.kind {
            RuleKind::Threshold | RuleKind::Dealbreaker => self.points() as f64 * weight,
            RuleKind::Banded => self
                .bands
                .iter()
                .map(|band| band.points as f64 * weight)
                .fold(0.0, f64::max),
            RuleKind::Enum => self
                .enums
                .iter()
                .filter(|option| !option.is_dealbreaker)
                .map(|option| option.points as f64 * weight)
                .fold(0.0, f64::max),
            RuleKind::Unknown(_) => 0.0,
        }
    }
}
