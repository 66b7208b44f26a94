use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::catalog::RuleCatalog;
use super::condition::Rule;
use super::domain::{AttributeDefinition, Entry, EntryId};
use super::evaluation::{EvaluationResult, RuleEngine};
use super::repository::{Repository, RepositoryError};
use super::resolver::{FieldMapping, JsonRecordResolver, PropertyResolver};
use super::weighted::{ScoringResult, WeightedScoringEngine};

/// Outcome of scoring a stored entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntry {
    pub entry_id: EntryId,
    pub result: EvaluationResult,
    pub scored_at: DateTime<Utc>,
}

/// Service loading attributes, rules and entries from repositories and scoring them with
/// the attribute-scoped [`RuleEngine`].
pub struct EntryScoringService<A: ?Sized, R: ?Sized, E: ?Sized> {
    attributes: Arc<A>,
    rules: Arc<R>,
    entries: Arc<E>,
    engine: RuleEngine,
}

impl<A, R, E> EntryScoringService<A, R, E>
where
    A: Repository<AttributeDefinition> + ?Sized,
    R: Repository<Rule> + ?Sized,
    E: Repository<Entry> + ?Sized,
{
    pub fn new(attributes: Arc<A>, rules: Arc<R>, entries: Arc<E>) -> Self {
        Self {
            attributes,
            rules,
            entries,
            engine: RuleEngine::new(),
        }
    }

    /// Score one entry and persist its evaluated score.
    pub fn evaluate(&self, entry_id: &EntryId) -> Result<ScoredEntry, ScoringServiceError> {
        let entry = self
            .entries
            .find_by_id(entry_id)?
            .ok_or_else(|| RepositoryError::NotFound(entry_id.to_string()))?;
        let attributes = self.attributes.all()?;
        let rules = self.rules.all()?;

        self.score_and_store(entry, &attributes, &rules)
    }

    /// Score every stored entry in repository order.
    pub fn evaluate_all(&self) -> Result<Vec<ScoredEntry>, ScoringServiceError> {
        let attributes = self.attributes.all()?;
        let rules = self.rules.all()?;

        self.entries
            .all()?
            .into_iter()
            .map(|entry| self.score_and_store(entry, &attributes, &rules))
            .collect()
    }

    fn score_and_store(
        &self,
        mut entry: Entry,
        attributes: &[AttributeDefinition],
        rules: &[Rule],
    ) -> Result<ScoredEntry, ScoringServiceError> {
        let result = self.engine.evaluate(&entry, attributes, rules);
        info!(entry = %entry.id, total = result.total_score, "entry scored");

        entry.evaluated_score = result.total_score;
        let entry_id = entry.id.clone();
        self.entries.save(entry)?;

        Ok(ScoredEntry {
            entry_id,
            result,
            scored_at: Utc::now(),
        })
    }
}

/// Weighted result tagged with the record it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: String,
    pub result: ScoringResult,
}

/// Service scoring records against a [`RuleCatalog`] with the weighted engine.
#[derive(Debug, Clone)]
pub struct WeightedScoringService {
    catalog: RuleCatalog,
    mapping: FieldMapping,
    engine: WeightedScoringEngine,
}

impl WeightedScoringService {
    pub fn new(catalog: RuleCatalog, mapping: FieldMapping) -> Self {
        Self {
            catalog,
            mapping,
            engine: WeightedScoringEngine::new(),
        }
    }

    pub fn with_engine(mut self, engine: WeightedScoringEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut RuleCatalog {
        &mut self.catalog
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn score<P: PropertyResolver + ?Sized>(&self, resolver: &P) -> ScoringResult {
        self.engine.score(self.catalog.rules(), resolver)
    }

    pub fn score_record(&self, record: &Value) -> ScoringResult {
        let resolver = JsonRecordResolver::new(&self.mapping, record);
        self.score(&resolver)
    }

    /// Scores a batch; records are labelled by their `id` field, else by position.
    pub fn score_records(&self, records: &[Value]) -> Vec<ScoredRecord> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let label = match record.get("id") {
                    Some(Value::String(id)) => id.clone(),
                    Some(Value::Number(id)) => id.to_string(),
                    _ => index.to_string(),
                };
                let result = self.score_record(record);
                info!(
                    record = %label,
                    normalized = result.score_normalized,
                    dealbreakers = result.dealbreakers.len(),
                    "record scored"
                );
                ScoredRecord {
                    record: label,
                    result,
                }
            })
            .collect()
    }
}

/// Error raised by the scoring services.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
