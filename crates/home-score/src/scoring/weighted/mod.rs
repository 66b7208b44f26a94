mod config;
mod policy;
mod rules;

pub use config::{
    EnumOption, RuleKind, ScoringBand, ScoringRule, ThresholdDirection, DEFAULT_POINTS,
};
pub use policy::{normalize, DEFAULT_NORMALIZED_SCALE};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::resolver::PropertyResolver;
use policy::vetoed_raw;
use rules::evaluate_rule;

/// Stateless evaluator for keyed, weighted rule configurations.
///
/// Rules are independent; a single failed dealbreaker zeroes the raw score of the whole
/// record while the attainable maximum is still accumulated.
#[derive(Debug, Clone, Copy)]
pub struct WeightedScoringEngine {
    scale: f64,
}

impl Default for WeightedScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightedScoringEngine {
    pub fn new() -> Self {
        Self {
            scale: DEFAULT_NORMALIZED_SCALE,
        }
    }

    /// Engine normalizing onto `[0, scale]` instead of `[0, 10]`.
    pub fn with_scale(scale: f64) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn score<R>(&self, rules: &[ScoringRule], resolver: &R) -> ScoringResult
    where
        R: PropertyResolver + ?Sized,
    {
        let mut score_breakdown = BTreeMap::new();
        let mut dealbreakers = Vec::new();
        let mut score_raw = 0.0;
        let mut score_max_possible = 0.0;

        for rule in rules {
            let value = resolver.resolve(&rule.key);
            let outcome = evaluate_rule(rule, value.as_ref());

            if let RuleKind::Unknown(kind) = &rule.kind {
                debug!(rule = %rule.key, %kind, "skipping rule with unknown type");
            }

            if outcome.is_dealbreaker {
                debug!(rule = %rule.key, reason = %outcome.reason, "dealbreaker triggered");
                dealbreakers.push(outcome.reason.clone());
            } else {
                score_raw += outcome.score;
            }
            score_max_possible += outcome.max_possible;

            score_breakdown.insert(
                rule.key.clone(),
                BreakdownEntry {
                    score: outcome.score,
                    reason: outcome.reason,
                    category: rule.category.clone(),
                    kind: rule.kind.clone(),
                },
            );
        }

        let score_raw = vetoed_raw(score_raw, &dealbreakers);
        let score_normalized = normalize(score_raw, score_max_possible, self.scale);

        ScoringResult {
            score_raw,
            score_max_possible,
            score_normalized,
            score_breakdown,
            dealbreakers,
        }
    }
}

/// Explanation of one rule's contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub score: f64,
    pub reason: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
}

/// Weighted evaluation output with raw, maximum, and normalized totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score_raw: f64,
    pub score_max_possible: f64,
    pub score_normalized: f64,
    pub score_breakdown: BTreeMap<String, BreakdownEntry>,
    pub dealbreakers: Vec<String>,
}

impl ScoringResult {
    pub fn has_dealbreakers(&self) -> bool {
        !self.dealbreakers.is_empty()
    }

    pub fn breakdown_for(&self, key: &str) -> Option<&BreakdownEntry> {
        self.score_breakdown.get(key)
    }
}
