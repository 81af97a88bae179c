//! Record store abstraction
//!
//! The listing pipeline only needs two reads from the store: how many
//! records match a query, and one window of them in order. [`Repository`]
//! adds the usual CRUD operations for the edit views and the JSON API.
//!
//! - [`RecordQuery`] - team scope, [`FilterCondition`]s and [`OrderTerm`]s
//! - [`Pagination`] - offset/limit window
//! - [`MemoryRepository`] - in-process implementation
//!
//! # Example
//!
//! ```rust
//! use crud_listing::repository::{
//!     FilterCondition, MemoryRepository, Pagination, RecordQuery, Repository,
//! };
//!
//! # tokio_test_block(async {
//! let repo = MemoryRepository::new();
//! repo.seed("acme", 6).await.unwrap();
//!
//! let query = RecordQuery::scoped("acme").filter(FilterCondition::eq("number", 3_i64));
//! assert_eq!(repo.count(&query).await.unwrap(), 1);
//!
//! let first_two = repo
//!     .find_all(&RecordQuery::scoped("acme"), Some(Pagination::new(0, 2)))
//!     .await
//!     .unwrap();
//! assert_eq!(first_two.len(), 2);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod memory;
mod query;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryRepository;
pub use query::{
    FieldValue, FilterCondition, FilterOperator, FilterValue, OrderDirection, OrderTerm,
    Pagination, Record, RecordQuery,
};
pub use traits::{Repository, RepositoryResult};
