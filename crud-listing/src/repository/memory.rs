//! In-memory record store
//!
//! Backs the service when no external database is configured, and the test
//! suite. All records live in one `Vec` behind a tokio `RwLock`; reads take
//! the shared lock, writes the exclusive one.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::query::{Pagination, RecordQuery};
use super::traits::{Repository, RepositoryResult};
use crate::models::{Thing, ThingInput, DEFAULT_ORDERING, LOCKED1_DEFAULT, LOCKED2_DEFAULT};

#[derive(Debug, Default)]
struct ThingStore {
    things: Vec<Thing>,
    next_id: i64,
}

/// [`Repository`] of [`Thing`]s held in process memory
#[derive(Debug)]
pub struct MemoryRepository {
    store: RwLock<ThingStore>,
    available: AtomicBool,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(ThingStore::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Take the store offline (or back online)
    ///
    /// While offline every operation fails with an `Unavailable` error, the
    /// same way a lost database connection would.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        tracing::warn!(available, "Record store availability changed");
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn ensure_available(&self, operation: RepositoryOperation) -> RepositoryResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(RepositoryError::unavailable(operation, "record store is offline"))
        }
    }

    /// Insert demo records for a team: "Thing 001", "Thing 002", ...
    ///
    /// # Errors
    ///
    /// Fails only while the store is offline.
    pub async fn seed(&self, scope: &str, count: u32) -> RepositoryResult<()> {
        for n in 1..=count {
            let input = ThingInput::new(format!("Thing {n:03}"), i64::from(n % 10));
            self.create(scope, input).await?;
        }
        tracing::info!(team = scope, count, "Seeded demo records");
        Ok(())
    }
}

impl Repository for MemoryRepository {
    type Entity = Thing;
    type Create = ThingInput;
    type Update = ThingInput;

    async fn find_by_id(&self, scope: &str, id: i64) -> RepositoryResult<Option<Thing>> {
        self.ensure_available(RepositoryOperation::FindById)?;
        let store = self.store.read().await;
        Ok(store
            .things
            .iter()
            .find(|t| t.id == id && t.team == scope)
            .cloned())
    }

    async fn find_all(
        &self,
        query: &RecordQuery,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<Vec<Thing>> {
        self.ensure_available(RepositoryOperation::FindAll)?;
        let store = self.store.read().await;

        let mut matches: Vec<&Thing> = store.things.iter().filter(|t| query.matches(*t)).collect();
        matches.sort_by(|a, b| query.compare(*a, *b, DEFAULT_ORDERING));

        let (skip, take) = match pagination {
            Some(p) => (
                usize::try_from(p.offset).unwrap_or(usize::MAX),
                usize::try_from(p.limit).unwrap_or(usize::MAX),
            ),
            None => (0, usize::MAX),
        };

        Ok(matches.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn count(&self, query: &RecordQuery) -> RepositoryResult<u64> {
        self.ensure_available(RepositoryOperation::Count)?;
        let store = self.store.read().await;
        let count = store.things.iter().filter(|t| query.matches(*t)).count();
        Ok(count as u64)
    }

    async fn create(&self, scope: &str, data: ThingInput) -> RepositoryResult<Thing> {
        self.ensure_available(RepositoryOperation::Create)?;
        let mut store = self.store.write().await;
        store.next_id += 1;

        let now = Utc::now();
        let thing = Thing {
            id: store.next_id,
            team: scope.to_string(),
            name: data.name,
            birthdate: data.birthdate,
            email: data.email,
            extra: data.extra,
            number: data.number,
            notes: data.notes,
            more_notes: data.more_notes,
            locked1: LOCKED1_DEFAULT.to_string(),
            locked2: LOCKED2_DEFAULT.to_string(),
            created_at: now,
            updated_at: now,
        };
        store.things.push(thing.clone());

        tracing::debug!(team = scope, id = thing.id, "Created thing");
        Ok(thing)
    }

    async fn update(&self, scope: &str, id: i64, data: ThingInput) -> RepositoryResult<Thing> {
        self.ensure_available(RepositoryOperation::Update)?;
        let mut store = self.store.write().await;

        let thing = store
            .things
            .iter_mut()
            .find(|t| t.id == id && t.team == scope)
            .ok_or_else(|| {
                RepositoryError::not_found("Thing", id.to_string())
                    .with_operation(RepositoryOperation::Update)
            })?;

        thing.name = data.name;
        thing.birthdate = data.birthdate;
        thing.email = data.email;
        thing.extra = data.extra;
        thing.number = data.number;
        thing.notes = data.notes;
        thing.more_notes = data.more_notes;
        thing.updated_at = Utc::now();

        tracing::debug!(team = scope, id, "Updated thing");
        Ok(thing.clone())
    }

    async fn delete(&self, scope: &str, id: i64) -> RepositoryResult<bool> {
        self.ensure_available(RepositoryOperation::Delete)?;
        let mut store = self.store.write().await;
        let len_before = store.things.len();
        store.things.retain(|t| !(t.id == id && t.team == scope));
        let deleted = store.things.len() < len_before;

        tracing::debug!(team = scope, id, deleted, "Deleted thing");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{FilterCondition, OrderTerm, RepositoryErrorKind};

    fn input(name: &str, number: i64) -> ThingInput {
        ThingInput::new(name, number)
    }

    async fn repo_with(names: &[(&str, i64)]) -> MemoryRepository {
        let repo = MemoryRepository::new();
        for (name, number) in names {
            repo.create("acme", input(name, *number)).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_default_ordering_is_by_name() {
        let repo = repo_with(&[("cherry", 1), ("apple", 2), ("Banana", 3)]).await;
        let all = repo.find_all(&RecordQuery::scoped("acme"), None).await.unwrap();
        let names: Vec<_> = all.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "Banana", "cherry"]);
    }

    #[tokio::test]
    async fn test_requested_ordering_wins() {
        let repo = repo_with(&[("a", 1), ("b", 3), ("c", 2)]).await;
        let query = RecordQuery::scoped("acme").order_by(OrderTerm::descending("number"));
        let all = repo.find_all(&query, None).await.unwrap();
        let numbers: Vec<_> = all.iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_filter_count_and_slice() {
        let repo = repo_with(&[("red box", 1), ("Red hat", 2), ("blue box", 3)]).await;
        let query = RecordQuery::scoped("acme").filter(FilterCondition::contains("name", "red"));
        assert_eq!(repo.count(&query).await.unwrap(), 2);

        let slice = repo.find_all(&query, Some(Pagination::new(1, 5))).await.unwrap();
        assert_eq!(slice.len(), 1);
        assert_eq!(slice[0].name, "Red hat");
    }

    #[tokio::test]
    async fn test_team_scoping() {
        let repo = repo_with(&[("mine", 1)]).await;
        let other = repo.create("globex", input("theirs", 1)).await.unwrap();

        assert_eq!(repo.count(&RecordQuery::scoped("acme")).await.unwrap(), 1);
        assert!(repo.find_by_id("acme", other.id).await.unwrap().is_none());
        assert!(!repo.delete("acme", other.id).await.unwrap());

        let err = repo.update("acme", other.id, input("x", 0)).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = repo_with(&[("old", 1)]).await;
        let changes = ThingInput {
            email: "new@example.com".to_string(),
            extra: false,
            ..input("new", 5)
        };
        let updated = repo.update("acme", 1, changes).await.unwrap();
        assert_eq!(updated.name, "new");
        assert_eq!(updated.number, 5);
        assert_eq!(updated.email, "new@example.com");
        assert!(!updated.extra);
        assert_eq!(updated.locked1, LOCKED1_DEFAULT);
        assert_eq!(updated.locked2, LOCKED2_DEFAULT);

        assert!(repo.delete("acme", 1).await.unwrap());
        assert!(repo.find_by_id("acme", 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_operation() {
        let repo = repo_with(&[("a", 1)]).await;
        repo.set_available(false);

        let err = repo.count(&RecordQuery::scoped("acme")).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::Unavailable);
        assert!(repo.find_by_id("acme", 1).await.is_err());
        assert!(repo.create("acme", input("b", 2)).await.is_err());

        repo.set_available(true);
        assert_eq!(repo.count(&RecordQuery::scoped("acme")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seed() {
        let repo = MemoryRepository::new();
        repo.seed("acme", 10).await.unwrap();
        let all = repo.find_all(&RecordQuery::scoped("acme"), None).await.unwrap();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].name, "Thing 001");
    }
}
