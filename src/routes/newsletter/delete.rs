use actix_web::{
    web::{Data, Path},
    HttpResponse,
};
use serde_json::json;

use super::{not_found, NewsletterError};
use crate::{domain::SubscriberKey, store::SubscriberStore};

#[tracing::instrument(name = "Deleting a subscriber", skip(store))]
pub async fn delete_subscriber(
    key: Path<String>,
    store: Data<dyn SubscriberStore>,
) -> Result<HttpResponse, NewsletterError> {
    let key = SubscriberKey::try_from(key.into_inner()).map_err(NewsletterError::InvalidEmail)?;
    let deleted = match &key {
        SubscriberKey::Id(id) => store.delete_by_id(*id).await,
        SubscriberKey::Email(email) => store.delete_by_email(email).await,
    }
    .map_err(|e| NewsletterError::from_store(e, format!("Error deleting {}", key)))?
    .ok_or_else(|| not_found(&key))?;
    tracing::info!("{} successfully deleted from database", deleted.id);
    let message = match key {
        SubscriberKey::Id(id) => format!("{} successfully deleted.", id),
        SubscriberKey::Email(_) => format!("Email {} successfully deleted", deleted.email),
    };
    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}
