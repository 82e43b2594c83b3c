mod configuration;
mod postgres;

use helpers::TestServer;
