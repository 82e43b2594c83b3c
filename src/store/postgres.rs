use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::error;
use uuid::Uuid;

use super::{StoreError, SubscriberStore};
use crate::{
    domain::{NewSubscriber, Subscriber, SubscriberEmail, SubscriberPatch},
    DbPool,
};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(sqlx::FromRow)]
struct SubscriberRow {
    id: Uuid,
    email: String,
    subscribed: bool,
    date: DateTime<Utc>,
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = StoreError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::try_from(row.email)
            .map_err(|e| StoreError::Unexpected(anyhow!(e)))?;
        Ok(Subscriber {
            id: row.id,
            email,
            subscribed: row.subscribed,
            date: row.date,
        })
    }
}

fn into_subscriber(row: Option<SubscriberRow>) -> Result<Option<Subscriber>, StoreError> {
    row.map(Subscriber::try_from).transpose()
}

/// Classifies a failed write. `email` is the value a unique violation would
/// have duplicated.
fn write_error(e: sqlx::Error, email: Option<&SubscriberEmail>) -> StoreError {
    error!("Failed to execute query: {:?}", e);
    let code = match &e {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    };
    match (code.as_deref(), email) {
        (Some(UNIQUE_VIOLATION), Some(email)) => StoreError::Conflict(email.clone()),
        // Class 22 is data exception, class 23 integrity constraint violation.
        (Some(code), _) if code.starts_with("22") || code.starts_with("23") => {
            StoreError::MalformedData(anyhow!(e))
        }
        _ => StoreError::Unexpected(anyhow!(e)),
    }
}

/// Subscribers kept in the `subscribers` table. Email uniqueness is a table
/// constraint, so conditional writes are single statements.
#[derive(Clone, Debug)]
pub struct PgSubscriberStore {
    pool: DbPool,
}

impl PgSubscriberStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "Running database migrations", skip(self))]
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations on the database")
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    #[tracing::instrument(name = "Fetching all subscribers", skip(self))]
    async fn find_all(&self) -> Result<Vec<Subscriber>, StoreError> {
        sqlx::query_as::<_, SubscriberRow>(
            r#"
            select id, email, subscribed, date from subscribers
            order by date;
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch subscribers")?
        .into_iter()
        .map(Subscriber::try_from)
        .collect()
    }

    #[tracing::instrument(name = "Fetching subscriber by email", skip(self))]
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            select id, email, subscribed, date from subscribers
            where email = $1;
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch subscriber by email")?;
        into_subscriber(row)
    }

    #[tracing::instrument(name = "Fetching subscriber by id", skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscriber>, StoreError> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            select id, email, subscribed, date from subscribers
            where id = $1;
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch subscriber by id")?;
        into_subscriber(row)
    }

    #[tracing::instrument(name = "Saving new subscriber in the database", skip(self))]
    async fn create(&self, subscriber: NewSubscriber) -> Result<Subscriber, StoreError> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            insert into subscribers (id, email, subscribed, date)
            values ($1, $2, $3, $4)
            on conflict (email) do nothing
            returning id, email, subscribed, date;
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subscriber.email.as_ref())
        .bind(subscriber.subscribed)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, None))?;
        match row {
            Some(row) => row.try_into(),
            None => Err(StoreError::Conflict(subscriber.email)),
        }
    }

    #[tracing::instrument(name = "Updating subscriber by email", skip(self))]
    async fn update_by_email(
        &self,
        email: &SubscriberEmail,
        patch: SubscriberPatch,
    ) -> Result<Option<Subscriber>, StoreError> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            update subscribers
            set email = coalesce($2, email),
                subscribed = coalesce($3, subscribed)
            where email = $1
            returning id, email, subscribed, date;
            "#,
        )
        .bind(email.as_ref())
        .bind(patch.email.as_ref().map(AsRef::<str>::as_ref))
        .bind(patch.subscribed)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, patch.email.as_ref()))?;
        into_subscriber(row)
    }

    #[tracing::instrument(name = "Updating subscriber by id", skip(self))]
    async fn update_by_id(
        &self,
        id: Uuid,
        patch: SubscriberPatch,
    ) -> Result<Option<Subscriber>, StoreError> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            update subscribers
            set email = coalesce($2, email),
                subscribed = coalesce($3, subscribed),
                date = $4
            where id = $1
            returning id, email, subscribed, date;
            "#,
        )
        .bind(id)
        .bind(patch.email.as_ref().map(AsRef::<str>::as_ref))
        .bind(patch.subscribed)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, patch.email.as_ref()))?;
        into_subscriber(row)
    }

    #[tracing::instrument(name = "Deleting subscriber by email", skip(self))]
    async fn delete_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            delete from subscribers
            where email = $1
            returning id, email, subscribed, date;
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, None))?;
        into_subscriber(row)
    }

    #[tracing::instrument(name = "Deleting subscriber by id", skip(self))]
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Subscriber>, StoreError> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            delete from subscribers
            where id = $1
            returning id, email, subscribed, date;
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, None))?;
        into_subscriber(row)
    }
}
