use std::collections::BTreeMap;
use std::sync::Arc;

use crate::scoring::catalog::RuleCatalog;
use crate::scoring::condition::{Rule, RuleCondition};
use crate::scoring::domain::{AttributeDefinition, AttributeType, AttributeValue, Entry};
use crate::scoring::repository::{
    AttributeRepository, EntryRepository, InMemoryRepository, RuleRepository,
};
use crate::scoring::service::EntryScoringService;
use crate::scoring::weighted::{EnumOption, ScoringBand, ScoringRule};

pub(super) fn integer_attribute(name: &str) -> AttributeDefinition {
    AttributeDefinition::new(name, name.replace('_', " "), AttributeType::Integer)
}

pub(super) fn string_attribute(name: &str) -> AttributeDefinition {
    AttributeDefinition::new(name, name.replace('_', " "), AttributeType::String)
}

pub(super) fn entry_with(values: &[(&AttributeDefinition, AttributeValue)]) -> Entry {
    values
        .iter()
        .fold(Entry::new(BTreeMap::new()), |entry, (attribute, value)| {
            entry.with_value(&attribute.id, value.clone())
        })
}

/// Area bands used throughout the home search configuration.
pub(super) fn area_band_rules(attribute: &AttributeDefinition) -> Vec<Rule> {
    vec![
        Rule::new(attribute.id.clone(), RuleCondition::band(Some(77), Some(79), 5)),
        Rule::new(attribute.id.clone(), RuleCondition::band(Some(80), Some(85), 7)),
        Rule::new(attribute.id.clone(), RuleCondition::band(Some(90), None, 10)),
    ]
}

pub(super) fn listing(pairs: &[(&str, AttributeValue)]) -> BTreeMap<String, AttributeValue> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub(super) fn weighted_rules() -> Vec<ScoringRule> {
    vec![
        ScoringRule::threshold("bedroom_min_sqm", "Sizing", 8.0)
            .with_points(10)
            .as_dealbreaker(),
        ScoringRule::banded(
            "budget_max_price",
            "Financials",
            vec![
                ScoringBand::new(0.0, Some(750_000.0), 10),
                ScoringBand::new(751_000.0, Some(790_000.0), 5),
                ScoringBand::new(791_000.0, None, -5),
            ],
        ),
        ScoringRule::enumerated(
            "kitchen_layout",
            "Layout",
            vec![
                EnumOption::new("open", 10),
                EnumOption::new("relocatable", 5),
                EnumOption::dealbreaker("closed"),
            ],
        ),
    ]
}

pub(super) fn catalog() -> RuleCatalog {
    RuleCatalog::home_search_defaults()
}

pub(super) struct Fixture {
    pub attributes: Arc<InMemoryRepository<AttributeDefinition>>,
    pub rules: Arc<InMemoryRepository<Rule>>,
    pub entries: Arc<InMemoryRepository<Entry>>,
}

impl Fixture {
    pub fn new(
        attributes: Vec<AttributeDefinition>,
        rules: Vec<Rule>,
        entries: Vec<Entry>,
    ) -> Self {
        Self {
            attributes: Arc::new(InMemoryRepository::with_records(attributes)),
            rules: Arc::new(InMemoryRepository::with_records(rules)),
            entries: Arc::new(InMemoryRepository::with_records(entries)),
        }
    }

    pub fn service(
        &self,
    ) -> EntryScoringService<AttributeRepository, RuleRepository, EntryRepository> {
        let attributes: Arc<AttributeRepository> = self.attributes.clone();
        let rules: Arc<RuleRepository> = self.rules.clone();
        let entries: Arc<EntryRepository> = self.entries.clone();
        EntryScoringService::new(attributes, rules, entries)
    }
}
