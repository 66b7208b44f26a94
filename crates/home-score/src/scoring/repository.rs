use std::hash::Hash;
use std::sync::Mutex;

use super::condition::{Rule, RuleId};
use super::domain::{AttributeDefinition, AttributeId, Entry, EntryId};

/// Records stored behind a [`Repository`] expose a stable identifier.
pub trait Identified {
    type Id: Clone + Eq + Hash + std::fmt::Display;

    fn id(&self) -> &Self::Id;
}

impl Identified for AttributeDefinition {
    type Id = AttributeId;

    fn id(&self) -> &AttributeId {
        &self.id
    }
}

impl Identified for Rule {
    type Id = RuleId;

    fn id(&self) -> &RuleId {
        &self.id
    }
}

impl Identified for Entry {
    type Id = EntryId;

    fn id(&self) -> &EntryId {
        &self.id
    }
}

/// Storage abstraction so scoring can be driven without a concrete store.
pub trait Repository<T: Identified>: Send + Sync {
    fn all(&self) -> Result<Vec<T>, RepositoryError>;
    fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, RepositoryError>;
    /// Inserts or replaces the record with the same id.
    fn save(&self, record: T) -> Result<(), RepositoryError>;
    fn delete(&self, id: &T::Id) -> Result<(), RepositoryError>;
}

pub type AttributeRepository = dyn Repository<AttributeDefinition>;
pub type RuleRepository = dyn Repository<Rule>;
pub type EntryRepository = dyn Repository<Entry>;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record '{0}' not found")]
    NotFound(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Mutex-guarded repository keeping records in insertion order.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    records: Mutex<Vec<T>>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().collect()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<T>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Identified + Clone + Send,
{
    fn all(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.lock()?.clone())
    }

    fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, RepositoryError> {
        Ok(self.lock()?.iter().find(|record| record.id() == id).cloned())
    }

    fn save(&self, record: T) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(existing) => *existing = record,
            None => guard.push(record),
        }
        Ok(())
    }

    fn delete(&self, id: &T::Id) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let index = guard
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        guard.remove(index);
        Ok(())
    }
}
