use newsletter_api::{configuration::StorageKind, Config, Server};

#[test]
fn local_configuration_is_loaded_from_the_config_directory() {
    let config = Config::init().expect("Failed to initialize config");
    assert_eq!(config.application.host, "127.0.0.1");
    assert_eq!(config.storage, StorageKind::Postgres);
}

#[tokio::test]
async fn server_builds_with_the_memory_store() {
    let mut config = Config::init().expect("Failed to initialize config");
    config.application.port = 0;
    config.storage = StorageKind::Memory;
    let server = Server::build(config).await.expect("Failed to build server");
    assert_ne!(server.port(), 0);
}
