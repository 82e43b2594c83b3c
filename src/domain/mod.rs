mod subscriber;
mod subscriber_email;
mod subscriber_key;

pub use subscriber::{NewSubscriber, Subscriber, SubscriberPatch};
pub use subscriber_email::SubscriberEmail;
pub use subscriber_key::SubscriberKey;
