use home_score::scoring::{
    FieldBinding, FieldMapping, RuleCatalog, RuleUpdate, ValueAdapter, WeightedScoringService,
};
use serde_json::json;

fn listing(area: i64, floor: &str, price: i64, kitchen: &str, bedroom: f64) -> serde_json::Value {
    json!({
        "id": format!("listing-{area}-{price}"),
        "details": { "area_sqm": area, "floor_info": floor },
        "price": { "asking_price_eur": price },
        "scoring": { "main_bedroom_sqm": bedroom, "kitchen_type": kitchen },
    })
}

#[test]
fn default_catalog_ranks_listings() {
    let service = WeightedScoringService::new(
        RuleCatalog::home_search_defaults(),
        FieldMapping::home_search_defaults(),
    );

    let ideal = service.score_record(&listing(95, "parterre", 700_000, "open", 14.0));
    assert_eq!(ideal.score_raw, 50.0);
    assert_eq!(ideal.score_normalized, 10.0);
    assert!(ideal.dealbreakers.is_empty());

    let stretched = service.score_record(&listing(78, "2e", 780_000, "relocatable", 9.0));
    assert_eq!(stretched.score_raw, 35.0);
    assert_eq!(stretched.score_normalized, 7.0);

    let too_high = service.score_record(&listing(95, "3de", 700_000, "open", 14.0));
    assert_eq!(too_high.score_raw, 0.0);
    assert_eq!(
        too_high.dealbreakers,
        vec!["Maximum floor number allowed (dealbreaker threshold) too high (3 > 2)".to_string()]
    );
}

#[test]
fn over_budget_listing_loses_points_without_veto() {
    let service = WeightedScoringService::new(
        RuleCatalog::home_search_defaults(),
        FieldMapping::home_search_defaults(),
    );

    let result = service.score_record(&listing(82, "1e", 800_000, "open", 10.0));

    let budget = result.breakdown_for("budget_max_price").expect("budget scored");
    assert_eq!(budget.score, -5.0);
    assert_eq!(
        budget.reason,
        "Budget scoring based on price bands in range 791000+ (800000, -5 points)"
    );
    assert_eq!(result.score_raw, 32.0);
    assert_eq!(result.score_normalized, 6.4);
}

#[test]
fn configured_rules_and_mapping_load_from_json() {
    let catalog = RuleCatalog::from_json(
        r#"[
            {
                "key": "floor",
                "category": "Access",
                "type": "dealbreaker",
                "default_threshold": 3,
                "direction": "lower_is_better"
            },
            {
                "key": "energy_label",
                "category": "Comfort",
                "type": "enum",
                "weight": 0.5,
                "enums": [
                    { "option": "A", "points": 10 },
                    { "option": "G", "points": 0, "is_dealbreaker": true }
                ]
            }
        ]"#,
    )
    .expect("catalog parses");
    let mapping = FieldMapping::new()
        .bind(
            "floor",
            FieldBinding::new("/location/floor").with_adapter(ValueAdapter::FloorLevel),
        )
        .bind("energy_label", FieldBinding::new("/energy/label"));
    let service = WeightedScoringService::new(catalog, mapping);

    let result = service.score_record(&json!({
        "location": { "floor": "2nd" },
        "energy": { "label": "A" },
    }));

    assert_eq!(result.score_raw, 15.0);
    assert_eq!(result.score_max_possible, 15.0);
    assert_eq!(result.score_normalized, 10.0);
}

#[test]
fn catalog_changes_take_effect_on_next_score() {
    let mut service = WeightedScoringService::new(
        RuleCatalog::home_search_defaults(),
        FieldMapping::home_search_defaults(),
    );
    let record = listing(82, "1e", 700_000, "open", 7.0);
    assert!(service.score_record(&record).has_dealbreakers());

    service
        .catalog_mut()
        .update_rule(
            "bedroom_min_sqm",
            RuleUpdate {
                default_threshold: Some(6.5),
                ..RuleUpdate::default()
            },
        )
        .expect("rule updates");

    let result = service.score_record(&record);
    assert!(!result.has_dealbreakers());
    assert_eq!(result.score_raw, 47.0);
}
