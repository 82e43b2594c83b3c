use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::SubscriberEmail;

/// A stored newsletter subscriber.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: SubscriberEmail,
    pub subscribed: bool,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub subscribed: bool,
}

impl NewSubscriber {
    pub fn new(email: SubscriberEmail) -> Self {
        Self {
            email,
            subscribed: true,
        }
    }
}

/// Fields that may be changed on an existing subscriber. `None` leaves the
/// stored value untouched.
#[derive(Clone, Debug, Default)]
pub struct SubscriberPatch {
    pub email: Option<SubscriberEmail>,
    pub subscribed: Option<bool>,
}

impl SubscriberPatch {
    pub fn apply(&self, subscriber: &mut Subscriber) {
        if let Some(email) = &self.email {
            subscriber.email = email.clone();
        }
        if let Some(subscribed) = self.subscribed {
            subscriber.subscribed = subscribed;
        }
    }
}
