//! # Taxonomía de Errores
//! src/error.rs
//!
//! `ServiceError` es el vocabulario que ve la capa HTTP. `StorageError` son
//! las señales de la tabla de jobs; el servicio las traduce a `ServiceError`.

use crate::jobs::JobId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Un campo requerido llegó vacío
    #[error("{message}")]
    FieldValidation { field: String, message: String },

    /// El estado no pertenece a la enumeración
    #[error("Invalid application status: {given}")]
    StatusValidation { given: String, allowed: Vec<String> },

    #[error("Invalid job ID: {0:?}")]
    InvalidIdentifier(String),

    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    pub fn required_field(field: &str) -> Self {
        ServiceError::FieldValidation {
            field: field.to_string(),
            message: format!("{} is required", field),
        }
    }

    pub fn invalid_status(given: &str) -> Self {
        ServiceError::StatusValidation {
            given: given.to_string(),
            allowed: crate::jobs::ApplicationStatus::allowed(),
        }
    }

    /// `true` si el error lo causó el cliente (400/404)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::Storage(_))
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Jobs table at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Violación del constraint de la columna (ej: enum de estados)
    #[error("Value {value:?} violates constraint on column {column}")]
    ConstraintViolation { column: String, value: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
pub type StorageResult<T> = std::result::Result<T, StorageError>;
