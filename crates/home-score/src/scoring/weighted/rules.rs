use super::super::domain::AttributeValue;
use super::config::{RuleKind, ScoringRule, ThresholdDirection};

/// Result of evaluating one weighted rule.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RuleOutcome {
    pub score: f64,
    pub max_possible: f64,
    pub reason: String,
    pub is_dealbreaker: bool,
}

impl RuleOutcome {
    fn neutral(max_possible: f64, reason: String) -> Self {
        Self {
            score: 0.0,
            max_possible,
            reason,
            is_dealbreaker: false,
        }
    }

    fn awarded(score: f64, max_possible: f64, reason: String) -> Self {
        Self {
            score,
            max_possible,
            reason,
            is_dealbreaker: false,
        }
    }

    fn vetoed(max_possible: f64, reason: String) -> Self {
        Self {
            score: 0.0,
            max_possible,
            reason,
            is_dealbreaker: true,
        }
    }
}

pub(crate) fn evaluate_rule(rule: &ScoringRule, value: Option<&AttributeValue>) -> RuleOutcome {
    let max_possible = rule.max_possible();
    let label = rule.label();

    let evaluate = match &rule.kind {
        RuleKind::Threshold => threshold_rule,
        RuleKind::Banded => banded_rule,
        RuleKind::Enum => enum_rule,
        RuleKind::Dealbreaker => dealbreaker_rule,
        RuleKind::Unknown(kind) => {
            return RuleOutcome::neutral(0.0, format!("Unknown rule type: {kind}"));
        }
    };

    match value {
        Some(value) => evaluate(rule, value, max_possible),
        None => RuleOutcome::neutral(max_possible, format!("{label} not specified")),
    }
}

fn threshold_rule(rule: &ScoringRule, value: &AttributeValue, max_possible: f64) -> RuleOutcome {
    let label = rule.label();
    let Some(number) = value.as_number() else {
        return type_mismatch(label, "a number", value, max_possible);
    };
    let Some(threshold) = rule.default_threshold else {
        return RuleOutcome::neutral(max_possible, format!("{label} has no threshold configured"));
    };

    let passed = rule.direction.passes(number, threshold);
    let reason = match (rule.direction, passed) {
        (ThresholdDirection::HigherIsBetter, true) => {
            format!("{label} meets threshold ({value} ≥ {threshold})")
        }
        (ThresholdDirection::HigherIsBetter, false) => {
            format!("{label} below threshold ({value} < {threshold})")
        }
        (ThresholdDirection::LowerIsBetter, true) => {
            format!("{label} acceptable ({value} ≤ {threshold})")
        }
        (ThresholdDirection::LowerIsBetter, false) => {
            format!("{label} too high ({value} > {threshold})")
        }
    };

    if passed {
        RuleOutcome::awarded(rule.points() as f64 * rule.weight(), max_possible, reason)
    } else if rule.is_dealbreaker {
        RuleOutcome::vetoed(max_possible, reason)
    } else {
        RuleOutcome::neutral(max_possible, reason)
    }
}

fn banded_rule(rule: &ScoringRule, value: &AttributeValue, max_possible: f64) -> RuleOutcome {
    let label = rule.label();
    let Some(number) = value.as_number() else {
        return type_mismatch(label, "a number", value, max_possible);
    };

    if rule.is_dealbreaker {
        if let Some(threshold) = rule.default_threshold {
            if !rule.direction.passes(number, threshold) {
                let reason = match rule.direction {
                    ThresholdDirection::HigherIsBetter => {
                        format!("{label} below threshold ({value} < {threshold})")
                    }
                    ThresholdDirection::LowerIsBetter => {
                        format!("{label} too high ({value} > {threshold})")
                    }
                };
                return RuleOutcome::vetoed(max_possible, reason);
            }
        }
    }

    match rule.bands.iter().find(|band| band.contains(number)) {
        Some(band) => RuleOutcome::awarded(
            band.points as f64 * rule.weight(),
            max_possible,
            format!(
                "{label} in range {} ({value}, {} points)",
                band.range_label(),
                band.points
            ),
        ),
        None => RuleOutcome::neutral(
            max_possible,
            format!("{label} value {value} doesn't match any band"),
        ),
    }
}

fn enum_rule(rule: &ScoringRule, value: &AttributeValue, max_possible: f64) -> RuleOutcome {
    let label = rule.label();
    let Some(text) = value.as_text() else {
        return type_mismatch(label, "text", value, max_possible);
    };

    match rule.enums.iter().find(|option| option.option == text) {
        None => RuleOutcome::neutral(max_possible, format!("Unknown {label}: {text}")),
        Some(option) if option.is_dealbreaker => {
            RuleOutcome::vetoed(max_possible, format!("{label} {text} (dealbreaker)"))
        }
        Some(option) => RuleOutcome::awarded(
            option.points as f64 * rule.weight(),
            max_possible,
            format!("{label} {text} ({} points)", option.points),
        ),
    }
}

fn dealbreaker_rule(rule: &ScoringRule, value: &AttributeValue, max_possible: f64) -> RuleOutcome {
    let label = rule.label();
    let Some(number) = value.as_number() else {
        return type_mismatch(label, "a number", value, max_possible);
    };
    let Some(threshold) = rule.default_threshold else {
        return RuleOutcome::neutral(max_possible, format!("{label} has no threshold configured"));
    };

    let (pass_symbol, fail_symbol) = match rule.direction {
        ThresholdDirection::HigherIsBetter => ("≥", "<"),
        ThresholdDirection::LowerIsBetter => ("≤", ">"),
    };

    if rule.direction.passes(number, threshold) {
        RuleOutcome::awarded(
            rule.points() as f64 * rule.weight(),
            max_possible,
            format!("{label} passes ({value} {pass_symbol} {threshold})"),
        )
    } else {
        RuleOutcome::vetoed(
            max_possible,
            format!("{label} fails ({value} {fail_symbol} {threshold})"),
        )
    }
}

fn type_mismatch(
    label: &str,
    expected: &str,
    value: &AttributeValue,
    max_possible: f64,
) -> RuleOutcome {
    RuleOutcome::neutral(
        max_possible,
        format!("{label} type mismatch (expected {expected}, got {value})"),
    )
}
