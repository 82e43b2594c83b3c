use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::NewsletterError;
use crate::{
    domain::{SubscriberEmail, SubscriberPatch},
    store::SubscriberStore,
};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PatchBody {
    email: Option<String>,
    subscribed: Option<bool>,
}

impl TryInto<SubscriberPatch> for PatchBody {
    type Error = String;

    fn try_into(self) -> Result<SubscriberPatch, Self::Error> {
        let email = self.email.map(SubscriberEmail::try_from).transpose()?;
        Ok(SubscriberPatch {
            email,
            subscribed: self.subscribed,
        })
    }
}

#[tracing::instrument(name = "Updating a subscriber by email", skip(body, store))]
pub async fn update_subscriber_by_email(
    email: Path<String>,
    Json(body): Json<PatchBody>,
    store: Data<dyn SubscriberStore>,
) -> Result<HttpResponse, NewsletterError> {
    let email = email.into_inner();
    let patch: SubscriberPatch = body.try_into().map_err(NewsletterError::InvalidEmail)?;
    // A malformed target cannot be stored, so it is simply absent.
    let target = match SubscriberEmail::try_from(email.as_str()) {
        Ok(target) => target,
        Err(_) => return Err(NewsletterError::EmailNotFound(email)),
    };
    let updated = store
        .update_by_email(&target, patch)
        .await
        .map_err(|e| NewsletterError::from_store(e, format!("Error updating {}", email)))?
        .ok_or_else(|| NewsletterError::EmailNotFound(email))?;
    tracing::info!("User updated: {}", updated.id);
    Ok(HttpResponse::Ok().json(json!({ "message": "User updated", "result": updated })))
}

#[tracing::instrument(name = "Updating a subscriber by id", skip(body, store))]
pub async fn update_subscriber_by_id(
    id: Path<String>,
    Json(body): Json<PatchBody>,
    store: Data<dyn SubscriberStore>,
) -> Result<HttpResponse, NewsletterError> {
    let raw_id = id.into_inner();
    let id = match Uuid::parse_str(&raw_id) {
        Ok(id) => id,
        Err(_) => return Err(NewsletterError::IdNotFound(raw_id)),
    };
    let patch: SubscriberPatch = match body.try_into() {
        Ok(patch) => patch,
        // An unknown id wins over a bad body.
        Err(e) => {
            let exists = store.exists_by_id(id).await.map_err(|e| {
                NewsletterError::from_store(e, format!("Error updating user with id {}", id))
            })?;
            return Err(if exists {
                NewsletterError::InvalidEmail(e)
            } else {
                NewsletterError::IdNotFound(id.to_string())
            });
        }
    };
    let updated = store
        .update_by_id(id, patch)
        .await
        .map_err(|e| {
            NewsletterError::from_store(e, format!("Error updating user with id {}", id))
        })?
        .ok_or_else(|| NewsletterError::IdNotFound(id.to_string()))?;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("User with id {} updated", id),
        "result": updated,
    })))
}
