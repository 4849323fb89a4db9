//! # Módulo HTTP
//!
//! Implementación del protocolo HTTP/1.0 desde cero:
//!
//! - Parsing de requests (GET, HEAD, POST, PUT, DELETE)
//! - Construcción de responses JSON
//! - Códigos de estado
//! - Query parameters con decodificación `%XX`
//!
//! Cada conexión atiende un único request y se cierra
//! (`Connection: close`), como manda HTTP/1.0.

pub mod request;
pub mod response;
pub mod status;

pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
