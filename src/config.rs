//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./job_tracker --port 8080 --database-path ./data/jobs.json
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! PORT=8080 DATABASE_PATH=/var/lib/job_tracker/jobs.json ./job_tracker
//! ```

use clap::Parser;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "job_tracker")]
#[command(about = "Servidor HTTP/1.0 para el seguimiento de postulaciones laborales")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Archivo de la tabla jobs (se crea si no existe)
    #[arg(long = "database-path", default_value = "./data/jobs.json", env = "DATABASE_PATH")]
    pub database_path: String,

    /// Tamaño máximo del body de un request, en bytes
    #[arg(long = "max-body-bytes", default_value = "65536", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Timeout de lectura del socket, en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Nivel de log por defecto (RUST_LOG tiene prioridad)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Parsea argumentos CLI y variables de entorno
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use job_tracker::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.database_path.trim().is_empty() {
            return Err("Database path must not be empty".to_string());
        }
        if self.max_body_bytes == 0 {
            return Err("Max body bytes must be >= 1".to_string());
        }
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            database_path: "./data/jobs.json".to_string(),
            max_body_bytes: 65_536,
            read_timeout_ms: 5_000,
            log_level: "info".to_string(),
        }
    }
}
