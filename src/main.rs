use dotenvy::dotenv;
use newsletter_api::{telemetry, Config, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    telemetry::init(telemetry::SERVICE_NAME, "info", std::io::stdout)
        .expect("Failed to initialize telemetry");
    let config = Config::init().expect("Failed to initialize config");
    Server::build(config).await?.run().await?;
    Ok(())
}
