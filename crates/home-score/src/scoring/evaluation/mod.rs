mod conditions;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::condition::{Rule, RuleId};
use super::domain::{AttributeDefinition, AttributeId, Entry};
use conditions::{apply_condition, ConditionOutcome};

/// Stateless evaluator applying attribute-scoped rules to an entry.
///
/// Each attribute scores the best of its matching rules; the total is the sum over
/// attributes. A failed rule never affects other attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        entry: &Entry,
        attributes: &[AttributeDefinition],
        rules: &[Rule],
    ) -> EvaluationResult {
        let mut attribute_scores = BTreeMap::new();
        let mut failed_dealbreakers = Vec::new();

        for attribute in attributes {
            let Some(value) = entry.value(&attribute.id) else {
                attribute_scores.insert(attribute.id.clone(), 0);
                continue;
            };

            let mut best = 0;
            for rule in rules.iter().filter(|rule| rule.attribute_id == attribute.id) {
                let outcome = apply_condition(rule, value);
                trace!(rule = %rule.id, attribute = %attribute.name, ?outcome, "rule applied");
                if rule.is_dealbreaker && !matches!(outcome, ConditionOutcome::Matched(_)) {
                    failed_dealbreakers.push(rule.id.clone());
                }
                best = best.max(outcome.points());
            }

            attribute_scores.insert(attribute.id.clone(), best);
        }

        let total_score = attribute_scores
            .values()
            .copied()
            .fold(0, i64::saturating_add);

        EvaluationResult {
            attribute_scores,
            total_score,
            failed_dealbreakers,
        }
    }
}

/// Per-attribute scores and their sum.
///
/// `failed_dealbreakers` lists dealbreaker-flagged rules that did not match. It is
/// informational only: this mode never vetoes the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub attribute_scores: BTreeMap<AttributeId, i64>,
    pub total_score: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_dealbreakers: Vec<RuleId>,
}

impl EvaluationResult {
    pub fn score_for(&self, attribute: &AttributeId) -> i64 {
        self.attribute_scores.get(attribute).copied().unwrap_or(0)
    }
}
