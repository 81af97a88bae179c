//! Repository trait definitions
//!
//! Async methods use RPITIT (Return Position Impl Trait In Traits) so
//! implementations can be written as plain `async fn` without `async_trait`.

use std::future::Future;

use super::error::RepositoryError;
use super::query::{Pagination, RecordQuery};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Team-scoped record store
///
/// Every operation takes the team scope, either explicitly or inside the
/// [`RecordQuery`]; a record that exists under another team is reported as
/// not found.
///
/// # Example
///
/// ```rust,ignore
/// use crud_listing::repository::{Pagination, RecordQuery, Repository};
///
/// let query = RecordQuery::scoped("acme");
/// let total = repo.count(&query).await?;
/// let first = repo.find_all(&query, Some(Pagination::new(0, 4))).await?;
/// ```
pub trait Repository: Send + Sync {
    /// The stored record
    type Entity: Send;
    /// Validated input for a new record
    type Create: Send;
    /// Validated input replacing an existing record's editable fields
    type Update: Send;

    /// Find a record by id within a team
    ///
    /// Returns `Ok(None)` when the id is unknown or owned by another team.
    fn find_by_id(
        &self,
        scope: &str,
        id: i64,
    ) -> impl Future<Output = RepositoryResult<Option<Self::Entity>>> + Send;

    /// Read the records matching `query`, in query order
    ///
    /// `None` for `pagination` returns every match.
    fn find_all(
        &self,
        query: &RecordQuery,
        pagination: Option<Pagination>,
    ) -> impl Future<Output = RepositoryResult<Vec<Self::Entity>>> + Send;

    /// Count the records matching `query`
    fn count(&self, query: &RecordQuery) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Create a new record; the store assigns id and timestamps
    fn create(
        &self,
        scope: &str,
        data: Self::Create,
    ) -> impl Future<Output = RepositoryResult<Self::Entity>> + Send;

    /// Update an existing record
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` with `NotFound` kind if the record doesn't
    /// exist within `scope`.
    fn update(
        &self,
        scope: &str,
        id: i64,
        data: Self::Update,
    ) -> impl Future<Output = RepositoryResult<Self::Entity>> + Send;

    /// Delete a record
    ///
    /// Returns `true` if the record was deleted, `false` if it didn't exist.
    fn delete(&self, scope: &str, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;
}
