use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::domain::AttributeId;

static RULE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Identifier wrapper for rules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub String);

impl RuleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        let id = RULE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("rule-{id:06}"))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a rule interprets an attribute value. Pure data; see `RuleEngine` for semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Informational only. Never contributes points.
    InfoOnly,
    /// Awards the rule's flat score when the value is at least `min`.
    MinValue { min: i64 },
    /// Awards `points` when the value lies in `[min, max]`; a missing bound is unbounded.
    ThresholdBand {
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
        points: i64,
    },
    /// Awards `points` on an exact match against string or enum values.
    Equals { value: String, points: i64 },
}

impl RuleCondition {
    pub fn band(min: Option<i64>, max: Option<i64>, points: i64) -> Self {
        RuleCondition::ThresholdBand { min, max, points }
    }

    pub fn equals(value: impl Into<String>, points: i64) -> Self {
        RuleCondition::Equals {
            value: value.into(),
            points,
        }
    }
}

/// Binds a condition to an attribute.
///
/// `score` is the flat award used by conditions that carry no points of their own.
/// The attribute reference is only resolved at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub attribute_id: AttributeId,
    pub condition: RuleCondition,
    #[serde(default)]
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub is_dealbreaker: bool,
}

impl Rule {
    pub fn new(attribute_id: AttributeId, condition: RuleCondition) -> Self {
        Self {
            id: RuleId::generate(),
            attribute_id,
            condition,
            score: 0,
            weight: None,
            is_dealbreaker: false,
        }
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn dealbreaker(mut self) -> Self {
        self.is_dealbreaker = true;
        self
    }

    pub fn weight_or_default(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}
