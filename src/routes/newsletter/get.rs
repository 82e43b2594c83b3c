use actix_web::{
    web::{Data, Path},
    HttpResponse,
};
use serde_json::json;

use super::{not_found, NewsletterError};
use crate::{domain::SubscriberKey, store::SubscriberStore};

#[tracing::instrument(name = "Listing all subscribers", skip(store))]
pub async fn list_subscribers(
    store: Data<dyn SubscriberStore>,
) -> Result<HttpResponse, NewsletterError> {
    let users = store
        .find_all()
        .await
        .map_err(|e| NewsletterError::from_store(e, "Error getting users"))?;
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

#[tracing::instrument(name = "Retrieving a subscriber", skip(store))]
pub async fn get_subscriber(
    key: Path<String>,
    store: Data<dyn SubscriberStore>,
) -> Result<HttpResponse, NewsletterError> {
    let key = SubscriberKey::try_from(key.into_inner()).map_err(NewsletterError::InvalidEmail)?;
    let user = match &key {
        SubscriberKey::Id(id) => store.find_by_id(*id).await,
        SubscriberKey::Email(email) => store.find_by_email(email).await,
    }
    .map_err(|e| NewsletterError::from_store(e, format!("Error retrieving {}", key)))?;
    match user {
        Some(user) => Ok(HttpResponse::Ok().json(json!({ "user": user }))),
        None => Err(not_found(&key)),
    }
}

#[tracing::instrument(name = "Checking whether a subscriber exists", skip(store))]
pub async fn subscriber_exists(
    key: Path<String>,
    store: Data<dyn SubscriberStore>,
) -> Result<HttpResponse, NewsletterError> {
    let key = SubscriberKey::try_from(key.into_inner()).map_err(NewsletterError::InvalidEmail)?;
    let exists = match &key {
        SubscriberKey::Id(id) => store.exists_by_id(*id).await,
        SubscriberKey::Email(email) => store.exists_by_email(email).await,
    }
    .map_err(|e| NewsletterError::from_store(e, format!("Error retrieving {}", key)))?;
    if exists {
        Ok(HttpResponse::Ok().finish())
    } else {
        Err(not_found(&key))
    }
}
