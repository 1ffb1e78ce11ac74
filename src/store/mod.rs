//! Persistence behind the student endpoints.
//!
//! Handlers only see [`StudentStore`]. Production runs on [`MongoStore`];
//! [`MemoryStore`] backs the tests and `STORE_BACKEND=memory` local runs.

mod memory;
mod mongo;

use std::future::Future;

use thiserror::Error;

use crate::students::{Student, StudentFilter, StudentId, StudentPatch, StudentSummary};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Failures talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("store assigned a non-ObjectId identifier: {0}")]
    UnexpectedId(String),
}

/// A collection of student documents.
///
/// Each call is one store round-trip and atomic per document; nothing here
/// spans documents or requests.
pub trait StudentStore: Send + Sync + 'static {
    /// Inserts a new record and returns the identifier the store assigned.
    fn insert(&self, student: Student) -> impl Future<Output = Result<StudentId, StoreError>> + Send;

    /// Returns at most `limit` summaries matching `filter`, in store order.
    fn list(
        &self,
        filter: &StudentFilter,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<StudentSummary>, StoreError>> + Send;

    fn find(&self, id: &StudentId) -> impl Future<Output = Result<Option<Student>, StoreError>> + Send;

    /// Merges `patch` into the record. `false` when no record matched.
    fn update(
        &self,
        id: &StudentId,
        patch: StudentPatch,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Removes the record. `false` when no record matched.
    fn delete(&self, id: &StudentId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Round-trips to the store without touching data.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// A store whose every call fails, for exercising the error paths.
#[cfg(test)]
pub(crate) struct DownStore;

/// The error a driver reports when the server refuses the connection.
#[cfg(test)]
fn offline() -> StoreError {
    let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "store offline");
    StoreError::Mongo(mongodb::error::Error::from(refused))
}

#[cfg(test)]
impl StudentStore for DownStore {
    async fn insert(&self, _student: Student) -> Result<StudentId, StoreError> {
        Err(offline())
    }

    async fn list(&self, _filter: &StudentFilter, _limit: usize) -> Result<Vec<StudentSummary>, StoreError> {
        Err(offline())
    }

    async fn find(&self, _id: &StudentId) -> Result<Option<Student>, StoreError> {
        Err(offline())
    }

    async fn update(&self, _id: &StudentId, _patch: StudentPatch) -> Result<bool, StoreError> {
        Err(offline())
    }

    async fn delete(&self, _id: &StudentId) -> Result<bool, StoreError> {
        Err(offline())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(offline())
    }
}
