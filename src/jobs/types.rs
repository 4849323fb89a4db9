//! # Tipos del Dominio de Postulaciones
//! src/jobs/types.rs
//!
//! Define la entidad `Job`, su identificador y la enumeración cerrada
//! `ApplicationStatus`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador de un job, asignado por la tabla al crearlo
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Estado de una postulación
///
/// No hay reglas de transición: cualquier valor válido puede reemplazar
/// a cualquier otro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Rejected,
    Offer,
}

impl ApplicationStatus {
    /// Todos los valores, en el orden en que se reportan al cliente
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Rejected,
        ApplicationStatus::Offer,
    ];

    /// Parsea un estado ignorando mayúsculas y espacios alrededor
    ///
    /// # Ejemplo
    /// ```
    /// use job_tracker::jobs::ApplicationStatus;
    ///
    /// assert_eq!(ApplicationStatus::parse(" Applied "), Some(ApplicationStatus::Applied));
    /// assert_eq!(ApplicationStatus::parse("hired"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "applied" => Some(ApplicationStatus::Applied),
            "interviewing" => Some(ApplicationStatus::Interviewing),
            "rejected" => Some(ApplicationStatus::Rejected),
            "offer" => Some(ApplicationStatus::Offer),
            _ => None,
        }
    }

    /// Forma normalizada, tal como se guarda en la tabla
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Offer => "offer",
        }
    }

    /// Lista de valores permitidos, para los mensajes de error
    pub fn allowed() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body de `POST /jobs`
///
/// Los campos ausentes se tratan como vacíos para que lleguen a la
/// validación del servicio. `id` y los timestamps se ignoran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewJob {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, rename = "type")]
    pub job_type: String,
    #[serde(default)]
    pub application_status: String,
}

/// Fila ya validada que el servicio entrega al gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobRow {
    pub title: String,
    pub company: String,
    pub url: String,
    pub location: String,
    pub job_type: String,
    pub application_status: String,
}

/// Postulación persistida
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub url: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub application_status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
