//! # Job Tracker
//! src/lib.rs
//!
//! Backend HTTP/1.0 para el seguimiento de postulaciones laborales: crear,
//! listar, consultar, cambiar el estado y eliminar registros.
//!
//! ## Arquitectura
//!
//! ```text
//! TCP → server → router → jobs::handlers → JobService → JobGateway (JobStore)
//! ```
//!
//! - `http`: Parsing y construcción de mensajes HTTP/1.0
//! - `server`: Servidor TCP, un thread por conexión
//! - `router`: Enrutamiento por método y patrón de path
//! - `jobs`: Entidad `Job`, servicio de validación y tabla persistente
//! - `error`: Taxonomía de errores del dominio y del storage
//! - `config`: Configuración por CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```
//! use job_tracker::jobs::{JobService, JobStore, NewJob};
//!
//! let service = JobService::new(JobStore::in_memory());
//! let job = service
//!     .create_job(NewJob {
//!         title: "Engineer".into(),
//!         company: "Acme".into(),
//!         url: "http://acme.example/job/1".into(),
//!         location: "Remote".into(),
//!         job_type: "full-time".into(),
//!         application_status: "Applied".into(),
//!     })
//!     .unwrap();
//!
//! service.update_job_status(&job.id.to_string(), "Offer").unwrap();
//! let job = service.get_job(&job.id.to_string()).unwrap();
//! assert_eq!(job.application_status.as_str(), "offer");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod jobs;
pub mod router;
pub mod server;
