//! # Job Tracker - Entry Point
//! src/main.rs
//!
//! Inicializa logging, carga la configuración, abre la tabla de jobs y
//! levanta el servidor.

use job_tracker::config::Config;
use job_tracker::jobs::{JobService, JobStore};
use job_tracker::server::Server;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::new();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(2);
    }

    tracing::info!(
        address = %config.address(),
        database = %config.database_path,
        max_body_bytes = config.max_body_bytes,
        "Starting job tracker"
    );

    // La tabla se crea si no existe; si existe solo se carga
    let store = match JobStore::open(&config.database_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open jobs table");
            std::process::exit(1);
        }
    };

    tracing::info!(
        path = ?store.path(),
        rows = store.count().unwrap_or_default(),
        "Jobs table ready"
    );

    let service = JobService::new(store);

    let server = match Server::bind(&config, service) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(address = %config.address(), error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}
