use crate::{
    configuration::StorageKind,
    routes::*,
    store::{MemorySubscriberStore, PgSubscriberStore, SubscriberStore},
    Config,
};
use actix_web::{
    dev::Server as ActixServer,
    web::{delete, get, head, patch, post, Data, JsonConfig},
    App, HttpServer,
};
use std::{net::TcpListener, sync::Arc};
use tracing_actix_web::TracingLogger;

pub struct Server {
    port: u16,
    server: ActixServer,
}

impl Server {
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let store = Self::subscriber_store(&config).await?;
        let listener = TcpListener::bind(config.application.addr())?;
        tracing::info!("Listening on {}", listener.local_addr()?);
        Ok(Self::with_store(listener, store)?)
    }

    /// Serves on an already bound listener with the given store.
    pub fn with_store(
        listener: TcpListener,
        store: Arc<dyn SubscriberStore>,
    ) -> std::io::Result<Self> {
        let port = listener.local_addr()?.port();
        let server = Self::http_server(listener, store)?;
        Ok(Self { port, server })
    }

    pub async fn run(self) -> std::io::Result<()> {
        self.server.await
    }

    async fn subscriber_store(config: &Config) -> anyhow::Result<Arc<dyn SubscriberStore>> {
        match config.storage {
            StorageKind::Memory => Ok(Arc::new(MemorySubscriberStore::new())),
            StorageKind::Postgres => {
                let store = PgSubscriberStore::new(config.database.lazy_pool());
                if config.database.migrate_on_startup {
                    store.migrate().await?;
                }
                Ok(Arc::new(store))
            }
        }
    }

    fn http_server(
        listener: TcpListener,
        store: Arc<dyn SubscriberStore>,
    ) -> std::io::Result<ActixServer> {
        let store: Data<dyn SubscriberStore> = Data::from(store);
        HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .route("/health_check", get().to(health_check))
                .route("/newsletter", get().to(list_subscribers))
                .route("/newsletter", post().to(create_subscriber))
                .route("/newsletter/update/{id}", patch().to(update_subscriber_by_id))
                .route("/newsletter/{key}", get().to(get_subscriber))
                .route("/newsletter/{key}", head().to(subscriber_exists))
                .route("/newsletter/{email}", patch().to(update_subscriber_by_email))
                .route("/newsletter/{key}", delete().to(delete_subscriber))
                .app_data(JsonConfig::default().error_handler(json_error_handler))
                .app_data(store.clone())
        })
        .listen(listener)
        .map(|s| s.run())
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
