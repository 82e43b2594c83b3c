mod delete;
mod get;
mod patch;
mod post;

pub use delete::*;
pub use get::*;
pub use patch::*;
pub use post::*;

use actix_web::{
    body::BoxBody,
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use serde_json::json;
use tracing::error;

use crate::{
    domain::{SubscriberEmail, SubscriberKey},
    store::StoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum NewsletterError {
    #[error("Invalid email format")]
    InvalidEmail(String),
    #[error("{0} already exists")]
    AlreadyExists(SubscriberEmail),
    #[error("Malformed data")]
    MalformedData(#[source] anyhow::Error),
    #[error("{0} does not exist in database")]
    EmailNotFound(String),
    #[error("User with {0} does not exist in database")]
    IdNotFound(String),
    #[error("{message}")]
    Unexpected {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl NewsletterError {
    /// Maps a store failure, using `message` for anything the caller cannot fix.
    fn from_store(e: StoreError, message: impl Into<String>) -> Self {
        match e {
            StoreError::Conflict(email) => Self::AlreadyExists(email),
            StoreError::MalformedData(source) => Self::MalformedData(source),
            StoreError::Unexpected(source) => {
                let message = message.into();
                error!("{}: {:?}", message, source);
                Self::Unexpected { message, source }
            }
        }
    }
}

/// The not-found error for whichever way `key` addresses the subscriber.
fn not_found(key: &SubscriberKey) -> NewsletterError {
    tracing::info!("{} does not exist", key);
    match key {
        SubscriberKey::Id(id) => NewsletterError::IdNotFound(id.to_string()),
        SubscriberKey::Email(email) => NewsletterError::EmailNotFound(email.to_string()),
    }
}

impl ResponseError for NewsletterError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AlreadyExists(_) | Self::MalformedData(_) => StatusCode::BAD_REQUEST,
            Self::EmailNotFound(_) | Self::IdNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}

/// Rejected request bodies get the same `{"message": ...}` shape as handler errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response =
        HttpResponse::build(err.status_code()).json(json!({ "message": err.to_string() }));
    InternalError::from_response(err, response).into()
}
