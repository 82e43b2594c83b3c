use actix_web::{
    web::{Data, Json},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::NewsletterError;
use crate::{
    domain::{NewSubscriber, SubscriberEmail},
    store::SubscriberStore,
};

#[derive(Clone, Debug, Deserialize)]
pub struct CreateBody {
    email: Option<String>,
    subscribed: Option<bool>,
}

impl TryInto<NewSubscriber> for CreateBody {
    type Error = String;

    fn try_into(self) -> Result<NewSubscriber, Self::Error> {
        let email = self.email.ok_or("email is missing")?;
        let mut subscriber = NewSubscriber::new(SubscriberEmail::try_from(email)?);
        if let Some(subscribed) = self.subscribed {
            subscriber.subscribed = subscribed;
        }
        Ok(subscriber)
    }
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, store),
    fields(subscriber_email = ?body.email)
)]
pub async fn create_subscriber(
    Json(body): Json<CreateBody>,
    store: Data<dyn SubscriberStore>,
) -> Result<HttpResponse, NewsletterError> {
    let subscriber: NewSubscriber = body.try_into().map_err(NewsletterError::InvalidEmail)?;
    let message = format!("Error creating {}", subscriber.email);
    let created = store
        .create(subscriber)
        .await
        .map_err(|e| NewsletterError::from_store(e, message))?;
    Ok(HttpResponse::Created().json(json!({ "message": "User created", "data": created })))
}
