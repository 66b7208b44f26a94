use super::super::condition::{Rule, RuleCondition};
use super::super::domain::AttributeValue;

/// Outcome of applying one rule to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConditionOutcome {
    Matched(i64),
    Failed,
    TypeMismatch,
}

impl ConditionOutcome {
    pub(crate) fn points(self) -> i64 {
        match self {
            ConditionOutcome::Matched(points) => points,
            ConditionOutcome::Failed | ConditionOutcome::TypeMismatch => 0,
        }
    }
}

pub(crate) fn apply_condition(rule: &Rule, value: &AttributeValue) -> ConditionOutcome {
    match &rule.condition {
        RuleCondition::InfoOnly => ConditionOutcome::Matched(0),
        RuleCondition::MinValue { min } => match value {
            AttributeValue::Integer(value) => outcome(*value >= *min, weighted(rule, rule.score)),
            AttributeValue::Decimal(value) => {
                outcome(*value >= *min as f64, weighted(rule, rule.score))
            }
            AttributeValue::String(_) | AttributeValue::Enum(_) => ConditionOutcome::TypeMismatch,
        },
        RuleCondition::ThresholdBand { min, max, points } => match value {
            AttributeValue::Integer(value) => {
                let within = min.map_or(true, |min| *value >= min)
                    && max.map_or(true, |max| *value <= max);
                outcome(within, weighted(rule, *points))
            }
            AttributeValue::Decimal(value) => {
                let within = min.map_or(true, |min| *value >= min as f64)
                    && max.map_or(true, |max| *value <= max as f64);
                outcome(within, weighted(rule, *points))
            }
            AttributeValue::String(_) | AttributeValue::Enum(_) => ConditionOutcome::TypeMismatch,
        },
        RuleCondition::Equals {
            value: expected,
            points,
        } => match value {
            AttributeValue::String(actual) | AttributeValue::Enum(actual) => {
                outcome(actual == expected, weighted(rule, *points))
            }
            AttributeValue::Integer(_) | AttributeValue::Decimal(_) => {
                ConditionOutcome::TypeMismatch
            }
        },
    }
}

fn outcome(passed: bool, points: i64) -> ConditionOutcome {
    if passed {
        ConditionOutcome::Matched(points)
    } else {
        ConditionOutcome::Failed
    }
}

fn weighted(rule: &Rule, points: i64) -> i64 {
    match rule.weight {
        Some(weight) => (points as f64 * weight).round() as i64,
        None => points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::AttributeId;

    fn rule(condition: RuleCondition) -> Rule {
        Rule::new(AttributeId::new("attr"), condition)
    }

    #[test]
    fn band_bounds_are_inclusive() {
        let band = rule(RuleCondition::band(Some(80), Some(85), 5));
        assert_eq!(apply_condition(&band, &AttributeValue::Integer(80)).points(), 5);
        assert_eq!(apply_condition(&band, &AttributeValue::Integer(85)).points(), 5);
        assert_eq!(apply_condition(&band, &AttributeValue::Integer(79)).points(), 0);
        assert_eq!(apply_condition(&band, &AttributeValue::Integer(86)).points(), 0);
    }

    #[test]
    fn open_lower_bound_accepts_negative_decimals() {
        let band = rule(RuleCondition::band(None, Some(0), 2));
        assert_eq!(
            apply_condition(&band, &AttributeValue::Decimal(-12.5)),
            ConditionOutcome::Matched(2)
        );
    }

    #[test]
    fn numeric_condition_against_text_is_a_mismatch() {
        let min = rule(RuleCondition::MinValue { min: 10 }).with_score(4);
        assert_eq!(
            apply_condition(&min, &AttributeValue::String("not_a_number".to_string())),
            ConditionOutcome::TypeMismatch
        );
    }

    #[test]
    fn weight_scales_awarded_points() {
        let min = rule(RuleCondition::MinValue { min: 1 })
            .with_score(4)
            .with_weight(1.5);
        assert_eq!(apply_condition(&min, &AttributeValue::Integer(3)).points(), 6);
    }
}
