//! # Postulaciones Laborales
//!
//! Núcleo del sistema: la entidad `Job`, el servicio que valida y el
//! gateway que persiste.
//!
//! ## Endpoints
//!
//! - `GET /jobs` - Listar jobs
//! - `POST /jobs` - Crear job
//! - `GET /jobs/{id}` - Obtener un job
//! - `PUT /jobs/{id}?status=S` - Cambiar el estado
//! - `DELETE /jobs/{id}` - Eliminar job

pub mod gateway;
pub mod handlers;
pub mod service;
pub mod storage;
pub mod types;

pub use gateway::JobGateway;
pub use service::JobService;
pub use storage::JobStore;
pub use types::{ApplicationStatus, Job, JobId, NewJob, NewJobRow};
