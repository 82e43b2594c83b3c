//! Store tests against a real Postgres, configured through `config/` and
//! `APP_DATABASE__URL`. Run with `cargo test -- --ignored`.

use newsletter_api::{
    configuration::DatabaseConfig,
    domain::{NewSubscriber, SubscriberEmail, SubscriberPatch},
    store::{PgSubscriberStore, StoreError, SubscriberStore},
    Config,
};
use sqlx::{Connection, Executor, PgConnection};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// A throwaway database, dropped with the value.
struct TestDatabase {
    config: DatabaseConfig,
    store: PgSubscriberStore,
}

impl TestDatabase {
    async fn create() -> Self {
        let mut config = Config::init()
            .expect("Failed to initialize config")
            .database;
        config.options.database = Uuid::new_v4().to_string();

        PgConnection::connect_with(&config.without_db().database("postgres"))
            .await
            .expect("Failed to connect to Postgres")
            .execute(format!(r#"create database "{}";"#, config.options.database).as_str())
            .await
            .expect("Failed to create database");

        let store = PgSubscriberStore::new(config.lazy_pool());
        store
            .migrate()
            .await
            .expect("Failed to run migrations on the database");
        Self { config, store }
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let (tx, rx) = std::sync::mpsc::channel();
        let config = self.config.clone();

        std::thread::spawn(move || {
            let rt = Runtime::new().expect("Failed to start runtime");
            rt.block_on(async {
                let database = &config.options.database;
                let mut conn =
                    PgConnection::connect_with(&config.without_db().database("postgres"))
                        .await
                        .expect("Failed to connect to Postgres");

                conn.execute(&*format!(
                    "select pg_terminate_backend(pg_stat_activity.pid)
                    from pg_stat_activity
                    where datname = '{}'
                      and pid <> pg_backend_pid();",
                    database
                ))
                .await
                .expect("Failed to disconnect other sessions");

                conn.execute(format!(r#"drop database "{}";"#, database).as_str())
                    .await
                    .expect("Failed to drop temporary database");

                let _ = tx.send(());
            })
        });
        let _ = rx.recv();
    }
}

fn email(s: &str) -> SubscriberEmail {
    SubscriberEmail::try_from(s).unwrap()
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn create_assigns_defaults_and_rejects_duplicates() {
    let db = TestDatabase::create().await;
    let created = db
        .store
        .create(NewSubscriber::new(email("a@b.com")))
        .await
        .unwrap();
    assert!(created.subscribed);

    let result = db.store.create(NewSubscriber::new(email("a@b.com"))).await;
    assert!(matches!(result, Err(StoreError::Conflict(e)) if e.as_ref() == "a@b.com"));
    assert_eq!(db.store.find_all().await.unwrap(), vec![created]);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn find_and_exists_by_email_and_id() {
    let db = TestDatabase::create().await;
    let created = db
        .store
        .create(NewSubscriber::new(email("a@b.com")))
        .await
        .unwrap();

    let by_email = db.store.find_by_email(&email("a@b.com")).await.unwrap();
    let by_id = db.store.find_by_id(created.id).await.unwrap();
    assert_eq!(by_email.as_ref(), Some(&created));
    assert_eq!(by_id.as_ref(), Some(&created));
    assert!(db.store.exists_by_email(&email("a@b.com")).await.unwrap());
    assert!(!db.store.exists_by_id(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn update_by_email_keeps_fields_missing_from_the_patch() {
    let db = TestDatabase::create().await;
    db.store
        .create(NewSubscriber::new(email("a@b.com")))
        .await
        .unwrap();

    let patch = SubscriberPatch {
        email: None,
        subscribed: Some(false),
    };
    let updated = db
        .store
        .update_by_email(&email("a@b.com"), patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.email.as_ref(), "a@b.com");
    assert!(!updated.subscribed);

    let missing = db
        .store
        .update_by_email(&email("c@d.com"), SubscriberPatch::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn update_to_a_taken_email_conflicts() {
    let db = TestDatabase::create().await;
    db.store
        .create(NewSubscriber::new(email("a@b.com")))
        .await
        .unwrap();
    let other = db
        .store
        .create(NewSubscriber::new(email("c@d.com")))
        .await
        .unwrap();

    let patch = SubscriberPatch {
        email: Some(email("a@b.com")),
        subscribed: None,
    };
    let by_email = db
        .store
        .update_by_email(&email("c@d.com"), patch.clone())
        .await;
    let by_id = db.store.update_by_id(other.id, patch).await;
    assert!(matches!(by_email, Err(StoreError::Conflict(_))));
    assert!(matches!(by_id, Err(StoreError::Conflict(_))));
    assert!(db.store.find_by_email(&email("c@d.com")).await.unwrap().is_some());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn update_by_id_refreshes_date() {
    let db = TestDatabase::create().await;
    let created = db
        .store
        .create(NewSubscriber::new(email("a@b.com")))
        .await
        .unwrap();
    std::thread::sleep(std::time::Duration::from_millis(10));

    let patch = SubscriberPatch {
        email: Some(email("c@d.com")),
        subscribed: None,
    };
    let updated = db
        .store
        .update_by_id(created.id, patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.email.as_ref(), "c@d.com");
    assert!(updated.subscribed);
    assert!(updated.date > created.date);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn delete_returns_the_removed_row() {
    let db = TestDatabase::create().await;
    let first = db
        .store
        .create(NewSubscriber::new(email("a@b.com")))
        .await
        .unwrap();
    let second = db
        .store
        .create(NewSubscriber::new(email("c@d.com")))
        .await
        .unwrap();

    let deleted = db.store.delete_by_email(&email("a@b.com")).await.unwrap();
    assert_eq!(deleted, Some(first));
    let deleted = db.store.delete_by_id(second.id).await.unwrap();
    assert_eq!(deleted, Some(second.clone()));
    assert!(db.store.delete_by_id(second.id).await.unwrap().is_none());
    assert!(db.store.find_all().await.unwrap().is_empty());
}
