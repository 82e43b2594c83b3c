use uuid::Uuid;

use super::SubscriberEmail;

/// How a path segment addresses a subscriber.
#[derive(Clone, Debug, PartialEq)]
pub enum SubscriberKey {
    Id(Uuid),
    Email(SubscriberEmail),
}

impl TryFrom<String> for SubscriberKey {
    type Error = String;

    /// Anything that parses as a UUID is an id, everything else must be an email.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match Uuid::parse_str(&value) {
            Ok(id) => Ok(Self::Id(id)),
            Err(_) => SubscriberEmail::try_from(value).map(Self::Email),
        }
    }
}

impl std::fmt::Display for SubscriberKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => id.fmt(f),
            Self::Email(email) => email.fmt(f),
        }
    }
}
