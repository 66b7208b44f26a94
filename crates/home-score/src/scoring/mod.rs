//! Rule-based scoring of entries and listing records.
//!
//! Two evaluation modes share one value model:
//!
//! * [`RuleEngine`] scores attribute-scoped [`Rule`]s against an [`Entry`]: every attribute
//!   takes its best matching rule and the total is the sum over attributes.
//! * [`WeightedScoringEngine`] scores keyed [`ScoringRule`]s (threshold, banded, enum,
//!   dealbreaker) against any [`PropertyResolver`], applying weights, a global dealbreaker
//!   veto, and normalization onto a fixed scale.
//!
//! Both engines are pure functions of their inputs. Bad configuration data degrades to a
//! zero contribution with an explanatory reason; it never produces an error.

pub mod catalog;
pub mod condition;
pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod resolver;
pub mod service;
pub mod weighted;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, RuleCatalog, RuleUpdate};
pub use condition::{Rule, RuleCondition, RuleId};
pub use domain::{AttributeDefinition, AttributeId, AttributeType, AttributeValue, Entry, EntryId};
pub use evaluation::{EvaluationResult, RuleEngine};
pub use repository::{
    AttributeRepository, EntryRepository, Identified, InMemoryRepository, Repository,
    RepositoryError, RuleRepository,
};
pub use resolver::{
    parse_floor_level, FieldBinding, FieldMapping, FnResolver, JsonRecordResolver,
    PropertyResolver, ValueAdapter,
};
pub use service::{
    EntryScoringService, ScoredEntry, ScoredRecord, ScoringServiceError, WeightedScoringService,
};
pub use weighted::{
    normalize, BreakdownEntry, EnumOption, RuleKind, ScoringBand, ScoringResult, ScoringRule,
    ThresholdDirection, WeightedScoringEngine, DEFAULT_NORMALIZED_SCALE, DEFAULT_POINTS,
};
