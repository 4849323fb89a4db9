//! # Gateway de Persistencia
//! src/jobs/gateway.rs
//!
//! Contrato entre el servicio y la tabla `jobs`. El gateway no valida nada:
//! ejecuta la operación y reporta lo que pasó. `update_status` y `delete`
//! devuelven filas afectadas; es el servicio quien convierte 0 en
//! `NotFound`.

use crate::error::StorageResult;
use crate::jobs::types::{Job, JobId, NewJobRow};

pub trait JobGateway: Send + Sync {
    /// Inserta una fila; la tabla asigna id y timestamps
    fn insert(&self, row: NewJobRow) -> StorageResult<Job>;

    /// `None` es la señal de "no existe"
    fn find(&self, id: JobId) -> StorageResult<Option<Job>>;

    /// Todas las filas en el orden natural de la tabla
    fn find_all(&self) -> StorageResult<Vec<Job>>;

    fn update_status(&self, id: JobId, status: &str) -> StorageResult<u64>;

    fn delete(&self, id: JobId) -> StorageResult<u64>;
}
