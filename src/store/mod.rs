mod memory;
mod postgres;

pub use memory::MemorySubscriberStore;
pub use postgres::PgSubscriberStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewSubscriber, Subscriber, SubscriberEmail, SubscriberPatch};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    Conflict(SubscriberEmail),
    #[error("Malformed data")]
    MalformedData(#[source] anyhow::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Single-collection persistence for subscribers.
///
/// Lookups return `None` when nothing matches. Mutations are conditional
/// writes: they return `None` when no subscriber matched and
/// [`StoreError::Conflict`] when the write would duplicate an email, so callers
/// never need to look up a record before writing.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Subscriber>, StoreError>;

    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscriber>, StoreError>;

    async fn exists_by_email(&self, email: &SubscriberEmail) -> Result<bool, StoreError> {
        self.find_by_email(email).await.map(|s| s.is_some())
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        self.find_by_id(id).await.map(|s| s.is_some())
    }

    async fn create(&self, subscriber: NewSubscriber) -> Result<Subscriber, StoreError>;

    async fn update_by_email(
        &self,
        email: &SubscriberEmail,
        patch: SubscriberPatch,
    ) -> Result<Option<Subscriber>, StoreError>;

    /// Also refreshes `date` to the current time.
    async fn update_by_id(
        &self,
        id: Uuid,
        patch: SubscriberPatch,
    ) -> Result<Option<Subscriber>, StoreError>;

    async fn delete_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Subscriber>, StoreError>;
}
