use serde::{Deserialize, Serialize};
use tracing::debug;

use super::weighted::{EnumOption, ScoringBand, ScoringRule, ThresholdDirection};

/// In-memory set of weighted rule configurations keyed by rule key.
///
/// Rules are kept ordered by category, then key, which is also the evaluation order and
/// therefore the order dealbreaker reasons are reported in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScoringRule>", into = "Vec<ScoringRule>")]
pub struct RuleCatalog {
    rules: Vec<ScoringRule>,
}

/// Partial update applied by [`RuleCatalog::update_rule`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleUpdate {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub default_threshold: Option<f64>,
    #[serde(default)]
    pub default_points: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub is_dealbreaker: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub direction: Option<ThresholdDirection>,
}

/// Errors raised by catalog mutations and loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("rule '{0}' already exists")]
    DuplicateKey(String),
    #[error("rule '{0}' not found")]
    UnknownRule(String),
    #[error("rule '{key}' is a {actual} rule, expected {expected}")]
    WrongKind {
        key: String,
        expected: &'static str,
        actual: String,
    },
    #[error("band {min}-{max} of rule '{key}' has its minimum above its maximum")]
    InvalidBand { key: String, min: f64, max: f64 },
    #[error("invalid rule catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TryFrom<Vec<ScoringRule>> for RuleCatalog {
    type Error = CatalogError;

    fn try_from(rules: Vec<ScoringRule>) -> Result<Self, Self::Error> {
        let mut catalog = RuleCatalog::new();
        for rule in rules {
            catalog.insert_rule(rule)?;
        }
        Ok(catalog)
    }
}

impl From<RuleCatalog> for Vec<ScoringRule> {
    fn from(catalog: RuleCatalog) -> Self {
        catalog.rules
    }
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON array of rules. Duplicate keys surface as [`CatalogError::DuplicateKey`].
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let rules: Vec<ScoringRule> = serde_json::from_str(raw)?;
        RuleCatalog::try_from(rules)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules ordered by category, then key.
    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    /// Owned rule configurations, including bands and enum options, ready for evaluation.
    pub fn complete_rule_configs(&self) -> Vec<ScoringRule> {
        self.rules.clone()
    }

    pub fn rule(&self, key: &str) -> Option<&ScoringRule> {
        self.rules.iter().find(|rule| rule.key == key)
    }

    pub fn insert_rule(&mut self, rule: ScoringRule) -> Result<(), CatalogError> {
        if self.rule(&rule.key).is_some() {
            return Err(CatalogError::DuplicateKey(rule.key));
        }
        for band in &rule.bands {
            validate_band(&rule.key, band)?;
        }
        debug!(rule = %rule.key, kind = %rule.kind, "rule registered");
        self.rules.push(rule);
        self.sort();
        Ok(())
    }

    pub fn update_rule(
        &mut self,
        key: &str,
        update: RuleUpdate,
    ) -> Result<&ScoringRule, CatalogError> {
        let rule = self.rule_mut(key)?;
        if let Some(category) = update.category {
            rule.category = category;
        }
        if let Some(threshold) = update.default_threshold {
            rule.default_threshold = Some(threshold);
        }
        if let Some(points) = update.default_points {
            rule.default_points = Some(points);
        }
        if let Some(weight) = update.weight {
            rule.weight = Some(weight);
        }
        if let Some(is_dealbreaker) = update.is_dealbreaker {
            rule.is_dealbreaker = is_dealbreaker;
        }
        if let Some(description) = update.description {
            rule.description = Some(description);
        }
        if let Some(direction) = update.direction {
            rule.direction = direction;
        }
        self.sort();
        self.rule(key)
            .ok_or_else(|| CatalogError::UnknownRule(key.to_string()))
    }

    pub fn remove_rule(&mut self, key: &str) -> Result<ScoringRule, CatalogError> {
        let index = self
            .rules
            .iter()
            .position(|rule| rule.key == key)
            .ok_or_else(|| CatalogError::UnknownRule(key.to_string()))?;
        Ok(self.rules.remove(index))
    }

    /// Bands of a banded rule in definition order, which is also their matching order.
    pub fn bands_for_rule(&self, key: &str) -> Result<&[ScoringBand], CatalogError> {
        let rule = self
            .rule(key)
            .ok_or_else(|| CatalogError::UnknownRule(key.to_string()))?;
        Ok(&rule.bands)
    }

    pub fn add_band(&mut self, key: &str, band: ScoringBand) -> Result<(), CatalogError> {
        validate_band(key, &band)?;
        let rule = self.rule_of_kind(key, "banded")?;
        rule.bands.push(band);
        Ok(())
    }

    pub fn replace_bands(
        &mut self,
        key: &str,
        bands: Vec<ScoringBand>,
    ) -> Result<(), CatalogError> {
        for band in &bands {
            validate_band(key, band)?;
        }
        let rule = self.rule_of_kind(key, "banded")?;
        rule.bands = bands;
        Ok(())
    }

    /// Enum options of a rule ordered by option name.
    pub fn enums_for_rule(&self, key: &str) -> Result<Vec<&EnumOption>, CatalogError> {
        let rule = self
            .rule(key)
            .ok_or_else(|| CatalogError::UnknownRule(key.to_string()))?;
        let mut options: Vec<&EnumOption> = rule.enums.iter().collect();
        options.sort_by(|left, right| left.option.cmp(&right.option));
        Ok(options)
    }

    pub fn add_enum(&mut self, key: &str, option: EnumOption) -> Result<(), CatalogError> {
        let rule = self.rule_of_kind(key, "enum")?;
        match rule.enums.iter_mut().find(|existing| existing.option == option.option) {
            Some(existing) => *existing = option,
            None => rule.enums.push(option),
        }
        Ok(())
    }

    pub fn replace_enums(
        &mut self,
        key: &str,
        options: Vec<EnumOption>,
    ) -> Result<(), CatalogError> {
        let rule = self.rule_of_kind(key, "enum")?;
        rule.enums = options;
        Ok(())
    }

    /// Restores a seeded rule to its default configuration. Rules without a seed only get
    /// their weight reset.
    pub fn reset_rule_to_defaults(&mut self, key: &str) -> Result<&ScoringRule, CatalogError> {
        let seeded = Self::home_search_defaults()
            .rules
            .into_iter()
            .find(|rule| rule.key == key);

        let rule = self.rule_mut(key)?;
        match seeded {
            Some(seeded) => *rule = seeded,
            None => rule.weight = None,
        }
        self.sort();
        self.rule(key)
            .ok_or_else(|| CatalogError::UnknownRule(key.to_string()))
    }

    /// Rule set used for home listings unless the caller configures its own.
    pub fn home_search_defaults() -> Self {
        let rules = vec![
            ScoringRule::threshold("bedroom_min_sqm", "Sizing", 8.0)
                .with_points(10)
                .with_weight(1.0)
                .as_dealbreaker()
                .with_description("Minimum bedroom size in m² (dealbreaker threshold)"),
            ScoringRule::banded(
                "total_area_min_sqm",
                "Area",
                vec![
                    ScoringBand::new(77.0, Some(79.0), 5),
                    ScoringBand::new(80.0, Some(85.0), 7),
                    ScoringBand::new(86.0, Some(90.0), 9),
                    ScoringBand::new(91.0, None, 10),
                ],
            )
            .with_threshold(77.0)
            .with_weight(1.0)
            .as_dealbreaker()
            .with_description("Minimum total area in m² (dealbreaker threshold)"),
            ScoringRule::threshold("floor_max_entrance", "Access", 2.0)
                .with_points(10)
                .with_weight(1.0)
                .with_direction(ThresholdDirection::LowerIsBetter)
                .as_dealbreaker()
                .with_description("Maximum floor number allowed (dealbreaker threshold)"),
            ScoringRule::banded(
                "budget_max_price",
                "Financials",
                vec![
                    ScoringBand::new(0.0, Some(750_000.0), 10),
                    ScoringBand::new(751_000.0, Some(790_000.0), 5),
                    ScoringBand::new(791_000.0, None, -5),
                ],
            )
            .with_weight(1.0)
            .with_description("Budget scoring based on price bands"),
            ScoringRule::enumerated(
                "kitchen_layout",
                "Layout",
                vec![
                    EnumOption::new("open", 10),
                    EnumOption::new("relocatable", 5),
                    EnumOption::dealbreaker("closed"),
                ],
            )
            .with_weight(1.0)
            .with_description("Kitchen layout scoring"),
        ];

        let mut catalog = RuleCatalog { rules };
        catalog.sort();
        catalog
    }

    fn rule_mut(&mut self, key: &str) -> Result<&mut ScoringRule, CatalogError> {
        self.rules
            .iter_mut()
            .find(|rule| rule.key == key)
            .ok_or_else(|| CatalogError::UnknownRule(key.to_string()))
    }

    fn rule_of_kind(
        &mut self,
        key: &str,
        expected: &'static str,
    ) -> Result<&mut ScoringRule, CatalogError> {
        let rule = self.rule_mut(key)?;
        if rule.kind.as_str() != expected {
            return Err(CatalogError::WrongKind {
                key: key.to_string(),
                expected,
                actual: rule.kind.to_string(),
            });
        }
        Ok(rule)
    }

    fn sort(&mut self) {
        self.rules.sort_by(|left, right| {
            left.category
                .cmp(&right.category)
                .then_with(|| left.key.cmp(&right.key))
        });
    }
}

fn validate_band(key: &str, band: &ScoringBand) -> Result<(), CatalogError> {
    match band.max_value {
        Some(max) if band.min_value > max => Err(CatalogError::InvalidBand {
            key: key.to_string(),
            min: band.min_value,
            max,
        }),
        _ => Ok(()),
    }
}
