use std::collections::BTreeMap;
use std::sync::Arc;

use home_score::scoring::{
    AttributeDefinition, AttributeRepository, AttributeType, AttributeValue, Entry,
    EntryRepository, EntryScoringService, InMemoryRepository, Repository, Rule, RuleCondition,
    RuleRepository,
};

#[test]
fn entries_are_scored_and_updated_in_place() {
    let area = AttributeDefinition::new("area", "Living area", AttributeType::Integer)
        .with_category("Sizing")
        .with_order(1);
    let city = AttributeDefinition::new("city", "City", AttributeType::String).with_order(2);
    let rules = vec![
        Rule::new(area.id.clone(), RuleCondition::band(Some(77), Some(79), 5)),
        Rule::new(area.id.clone(), RuleCondition::band(Some(80), Some(85), 7)),
        Rule::new(area.id.clone(), RuleCondition::band(Some(90), None, 10)),
        Rule::new(area.id.clone(), RuleCondition::MinValue { min: 60 }).with_score(2),
        Rule::new(city.id.clone(), RuleCondition::equals("Amsterdam", 10)).with_weight(0.5),
        Rule::new(city.id.clone(), RuleCondition::InfoOnly).with_score(99),
    ];
    let canal_house = Entry::new(BTreeMap::new())
        .with_value(&area.id, AttributeValue::Integer(82))
        .with_value(&city.id, AttributeValue::String("Amsterdam".to_string()));
    let studio = Entry::new(BTreeMap::new())
        .with_value(&area.id, AttributeValue::Decimal(64.5))
        .with_value(&city.id, AttributeValue::Enum("Utrecht".to_string()));

    let entries = Arc::new(InMemoryRepository::with_records(vec![
        canal_house,
        studio.clone(),
    ]));
    let attributes: Arc<AttributeRepository> =
        Arc::new(InMemoryRepository::with_records(vec![area.clone(), city.clone()]));
    let rule_store: Arc<RuleRepository> = Arc::new(InMemoryRepository::with_records(rules));
    let entry_store: Arc<EntryRepository> = entries.clone();
    let service = EntryScoringService::new(attributes, rule_store, entry_store);

    let scored = service.evaluate_all().expect("entries score");

    assert_eq!(scored[0].result.score_for(&area.id), 7);
    assert_eq!(scored[0].result.score_for(&city.id), 5);
    assert_eq!(scored[0].result.total_score, 12);
    assert_eq!(scored[1].result.score_for(&area.id), 2);
    assert_eq!(scored[1].result.total_score, 2);

    let stored = entries
        .find_by_id(&studio.id)
        .expect("repository readable")
        .expect("studio stored");
    assert_eq!(stored.evaluated_score, 2);
}
