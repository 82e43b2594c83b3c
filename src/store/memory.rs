use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, SubscriberStore};
use crate::domain::{NewSubscriber, Subscriber, SubscriberEmail, SubscriberPatch};

/// Process-local store. Every mutation holds the write lock for its whole
/// check-and-write, which keeps emails unique.
#[derive(Debug, Default)]
pub struct MemorySubscriberStore {
    subscribers: RwLock<HashMap<Uuid, Subscriber>>,
}

impl MemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_of(subscribers: &HashMap<Uuid, Subscriber>, email: &SubscriberEmail) -> Option<Uuid> {
    subscribers
        .values()
        .find(|s| &s.email == email)
        .map(|s| s.id)
}

fn patch_in_place(
    subscribers: &mut HashMap<Uuid, Subscriber>,
    id: Uuid,
    patch: &SubscriberPatch,
) -> Result<Option<Subscriber>, StoreError> {
    if let Some(email) = &patch.email {
        if id_of(subscribers, email).map_or(false, |owner| owner != id) {
            return Err(StoreError::Conflict(email.clone()));
        }
    }
    Ok(subscribers.get_mut(&id).map(|subscriber| {
        patch.apply(subscriber);
        subscriber.clone()
    }))
}

#[async_trait]
impl SubscriberStore for MemorySubscriberStore {
    #[tracing::instrument(name = "Listing subscribers from memory", skip(self))]
    async fn find_all(&self) -> Result<Vec<Subscriber>, StoreError> {
        let mut all = self
            .subscribers
            .read()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        all.sort_by_key(|s| s.date);
        Ok(all)
    }

    #[tracing::instrument(name = "Finding subscriber by email in memory", skip(self))]
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let subscribers = self.subscribers.read().await;
        Ok(id_of(&subscribers, email).and_then(|id| subscribers.get(&id).cloned()))
    }

    #[tracing::instrument(name = "Finding subscriber by id in memory", skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscriber>, StoreError> {
        Ok(self.subscribers.read().await.get(&id).cloned())
    }

    #[tracing::instrument(name = "Saving new subscriber in memory", skip(self))]
    async fn create(&self, subscriber: NewSubscriber) -> Result<Subscriber, StoreError> {
        let mut subscribers = self.subscribers.write().await;
        if id_of(&subscribers, &subscriber.email).is_some() {
            return Err(StoreError::Conflict(subscriber.email));
        }
        let created = Subscriber {
            id: Uuid::new_v4(),
            email: subscriber.email,
            subscribed: subscriber.subscribed,
            date: Utc::now(),
        };
        subscribers.insert(created.id, created.clone());
        Ok(created)
    }

    #[tracing::instrument(name = "Updating subscriber by email in memory", skip(self))]
    async fn update_by_email(
        &self,
        email: &SubscriberEmail,
        patch: SubscriberPatch,
    ) -> Result<Option<Subscriber>, StoreError> {
        let mut subscribers = self.subscribers.write().await;
        match id_of(&subscribers, email) {
            Some(id) => patch_in_place(&mut subscribers, id, &patch),
            None => Ok(None),
        }
    }

    #[tracing::instrument(name = "Updating subscriber by id in memory", skip(self))]
    async fn update_by_id(
        &self,
        id: Uuid,
        patch: SubscriberPatch,
    ) -> Result<Option<Subscriber>, StoreError> {
        let mut subscribers = self.subscribers.write().await;
        let updated = patch_in_place(&mut subscribers, id, &patch)?;
        Ok(updated.and_then(|_| {
            subscribers.get_mut(&id).map(|subscriber| {
                subscriber.date = Utc::now();
                subscriber.clone()
            })
        }))
    }

    #[tracing::instrument(name = "Deleting subscriber by email from memory", skip(self))]
    async fn delete_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let mut subscribers = self.subscribers.write().await;
        Ok(id_of(&subscribers, email).and_then(|id| subscribers.remove(&id)))
    }

    #[tracing::instrument(name = "Deleting subscriber by id from memory", skip(self))]
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Subscriber>, StoreError> {
        Ok(self.subscribers.write().await.remove(&id))
    }
}
