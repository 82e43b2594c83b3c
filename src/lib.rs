pub mod configuration;
pub mod domain;
mod routes;
mod server;
pub mod store;
pub mod telemetry;

pub use configuration::Config;
pub use server::Server;

pub type Database = sqlx::Postgres;
pub type DbPool = sqlx::Pool<Database>;
