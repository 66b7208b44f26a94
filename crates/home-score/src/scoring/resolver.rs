//! Rule-key to property-value resolution for the weighted engine.
//!
//! The engine never knows record schemas: callers hand it a [`PropertyResolver`]. The
//! JSON resolver keeps the key-to-field table as data so it can be loaded with the rules.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::AttributeValue;

/// Supplies the property value a weighted rule key refers to; `None` means not specified.
pub trait PropertyResolver {
    fn resolve(&self, key: &str) -> Option<AttributeValue>;
}

impl PropertyResolver for BTreeMap<String, AttributeValue> {
    fn resolve(&self, key: &str) -> Option<AttributeValue> {
        self.get(key).cloned()
    }
}

impl PropertyResolver for HashMap<String, AttributeValue> {
    fn resolve(&self, key: &str) -> Option<AttributeValue> {
        self.get(key).cloned()
    }
}

impl<T: PropertyResolver + ?Sized> PropertyResolver for &T {
    fn resolve(&self, key: &str) -> Option<AttributeValue> {
        (**self).resolve(key)
    }
}

/// Adapts a closure into a resolver.
pub struct FnResolver<F>(pub F);

impl<F> PropertyResolver for FnResolver<F>
where
    F: Fn(&str) -> Option<AttributeValue>,
{
    fn resolve(&self, key: &str) -> Option<AttributeValue> {
        (self.0)(key)
    }
}

/// Conversion applied to a raw JSON field before scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueAdapter {
    #[default]
    AsIs,
    /// Parses floor labels such as `parterre`, `2e`, `3de` or `3rd` into a level number.
    FloorLevel,
}

/// Where one rule key's value lives inside a JSON record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    /// JSON pointer, e.g. `/details/area_sqm`.
    pub pointer: String,
    #[serde(default)]
    pub adapter: ValueAdapter,
}

impl FieldBinding {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            adapter: ValueAdapter::AsIs,
        }
    }

    pub fn with_adapter(mut self, adapter: ValueAdapter) -> Self {
        self.adapter = adapter;
        self
    }
}

/// Rule key to JSON field table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    bindings: BTreeMap<String, FieldBinding>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, key: impl Into<String>, binding: FieldBinding) -> Self {
        self.bindings.insert(key.into(), binding);
        self
    }

    pub fn binding(&self, key: &str) -> Option<&FieldBinding> {
        self.bindings.get(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Field table for home listing records.
    pub fn home_search_defaults() -> Self {
        Self::new()
            .bind("bedroom_min_sqm", FieldBinding::new("/scoring/main_bedroom_sqm"))
            .bind("total_area_min_sqm", FieldBinding::new("/details/area_sqm"))
            .bind(
                "floor_max_entrance",
                FieldBinding::new("/details/floor_info").with_adapter(ValueAdapter::FloorLevel),
            )
            .bind("budget_max_price", FieldBinding::new("/price/asking_price_eur"))
            .bind("kitchen_layout", FieldBinding::new("/scoring/kitchen_type"))
            .bind("foundation_status", FieldBinding::new("/scoring/foundation_status"))
            .bind("street_noise", FieldBinding::new("/scoring/street_noise"))
            .bind(
                "smelly_business_below",
                FieldBinding::new("/scoring/smelly_business_below"),
            )
            .bind(
                "commute_time_central_min",
                FieldBinding::new("/scoring/commute_time_central_min"),
            )
            .bind(
                "commute_time_mark_min",
                FieldBinding::new("/scoring/commute_time_mark_min"),
            )
            .bind(
                "commute_time_sarah_min",
                FieldBinding::new("/scoring/commute_time_sarah_min"),
            )
            .bind("workspace_count", FieldBinding::new("/scoring/workspace_count"))
            .bind("viewing_status", FieldBinding::new("/scoring/viewing_status"))
    }
}

/// Resolves rule keys against a JSON record through a [`FieldMapping`].
///
/// Keys without a binding fall back to a top-level field of the same name.
pub struct JsonRecordResolver<'a> {
    mapping: &'a FieldMapping,
    record: &'a Value,
}

impl<'a> JsonRecordResolver<'a> {
    pub fn new(mapping: &'a FieldMapping, record: &'a Value) -> Self {
        Self { mapping, record }
    }
}

impl PropertyResolver for JsonRecordResolver<'_> {
    fn resolve(&self, key: &str) -> Option<AttributeValue> {
        let (raw, adapter) = match self.mapping.binding(key) {
            Some(binding) => (self.record.pointer(&binding.pointer)?, binding.adapter),
            None => (self.record.get(key)?, ValueAdapter::AsIs),
        };

        match adapter {
            ValueAdapter::AsIs => json_to_value(raw),
            ValueAdapter::FloorLevel => match raw {
                Value::String(label) => parse_floor_level(label).map(AttributeValue::Integer),
                other => json_to_value(other),
            },
        }
    }
}

/// Maps a JSON scalar onto an attribute value. Null, arrays and objects are absent.
pub fn json_to_value(raw: &Value) -> Option<AttributeValue> {
    match raw {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        Value::Bool(flag) => Some(AttributeValue::Integer(i64::from(*flag))),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Some(AttributeValue::Integer(integer)),
            None => number.as_f64().map(AttributeValue::Decimal),
        },
        Value::String(text) => Some(AttributeValue::String(text.clone())),
    }
}

fn floor_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [r"(\d+)e", r"(\d+)(ste|de)", r"(\d+)(st|nd|rd|th)"]
            .into_iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    })
}

/// Parses Dutch and English floor labels into a level; ground floor is 0.
pub fn parse_floor_level(label: &str) -> Option<i64> {
    let lower = label.trim().to_lowercase();
    if lower == "parterre" || lower == "begane grond" {
        return Some(0);
    }

    floor_patterns().iter().find_map(|pattern| {
        pattern
            .captures(&lower)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_floor_labels() {
        assert_eq!(parse_floor_level("Parterre"), Some(0));
        assert_eq!(parse_floor_level("begane grond"), Some(0));
        assert_eq!(parse_floor_level("2e verdieping"), Some(2));
        assert_eq!(parse_floor_level("1ste"), Some(1));
        assert_eq!(parse_floor_level("3de"), Some(3));
        assert_eq!(parse_floor_level("3rd floor"), Some(3));
        assert_eq!(parse_floor_level("souterrain"), None);
    }

    #[test]
    fn resolves_nested_fields_through_mapping() {
        let mapping = FieldMapping::home_search_defaults();
        let record = json!({
            "details": { "area_sqm": 82, "floor_info": "1e" },
            "price": { "asking_price_eur": 745000.5 },
            "scoring": { "kitchen_type": "open", "main_bedroom_sqm": null },
        });
        let resolver = JsonRecordResolver::new(&mapping, &record);

        assert_eq!(
            resolver.resolve("total_area_min_sqm"),
            Some(AttributeValue::Integer(82))
        );
        assert_eq!(
            resolver.resolve("floor_max_entrance"),
            Some(AttributeValue::Integer(1))
        );
        assert_eq!(
            resolver.resolve("budget_max_price"),
            Some(AttributeValue::Decimal(745000.5))
        );
        assert_eq!(
            resolver.resolve("kitchen_layout"),
            Some(AttributeValue::String("open".to_string()))
        );
        assert_eq!(resolver.resolve("bedroom_min_sqm"), None);
        assert_eq!(resolver.resolve("street_noise"), None);
    }

    #[test]
    fn unmapped_keys_fall_back_to_top_level_fields() {
        let mapping = FieldMapping::new();
        let record = json!({ "balcony": true });
        let resolver = JsonRecordResolver::new(&mapping, &record);
        assert_eq!(resolver.resolve("balcony"), Some(AttributeValue::Integer(1)));
    }

    #[test]
    fn closures_resolve_keys() {
        let resolver = FnResolver(|key: &str| {
            (key == "workspace_count").then_some(AttributeValue::Integer(2))
        });
        assert_eq!(
            resolver.resolve("workspace_count"),
            Some(AttributeValue::Integer(2))
        );
        assert_eq!(resolver.resolve("street_noise"), None);
    }

    #[test]
    fn mapping_loads_from_json() {
        let mapping: FieldMapping = serde_json::from_value(json!({
            "floor_max_entrance": { "pointer": "/floor", "adapter": "floor_level" }
        }))
        .expect("parses");
        assert_eq!(
            mapping.binding("floor_max_entrance").map(|binding| binding.adapter),
            Some(ValueAdapter::FloorLevel)
        );
    }

    #[test]
    fn default_mapping_covers_every_commute_key() {
        let mapping = FieldMapping::home_search_defaults();
        let record = json!({
            "scoring": {
                "commute_time_central_min": 18,
                "commute_time_mark_min": 25,
                "commute_time_sarah_min": 32,
            },
        });
        let resolver = JsonRecordResolver::new(&mapping, &record);

        assert_eq!(mapping.len(), 13);
        assert_eq!(
            resolver.resolve("commute_time_mark_min"),
            Some(AttributeValue::Integer(25))
        );
        assert_eq!(
            resolver.resolve("commute_time_sarah_min"),
            Some(AttributeValue::Integer(32))
        );
    }
}
