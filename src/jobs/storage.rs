//! # Tabla de Jobs
//! src/jobs/storage.rs
//!
//! Implementación de `JobGateway` sobre un archivo JSON.
//!
//! La tabla vive en memoria (`BTreeMap` ordenado por id) y cada mutación se
//! escribe completa al disco con escritura atómica (archivo temporal +
//! rename). Cada operación toma el lock una sola vez, así que un insert,
//! update o delete es atómico respecto a otros threads.
//!
//! ## Formato en disco
//!
//! ```text
//! {
//!   "next_id": 3,
//!   "rows": [ {"id": 1, ...}, {"id": 2, ...} ]
//! }
//! ```

use crate::error::{StorageError, StorageResult};
use crate::jobs::gateway::JobGateway;
use crate::jobs::types::{ApplicationStatus, Job, JobId, NewJobRow};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const STATUS_COLUMN: &str = "application_status";

/// Contenido de la tabla
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Table {
    next_id: u64,
    rows: Vec<Job>,
}

#[derive(Debug)]
struct TableState {
    next_id: u64,
    rows: BTreeMap<u64, Job>,
}

impl TableState {
    fn empty() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn from_table(table: Table) -> Self {
        let rows: BTreeMap<u64, Job> = table
            .rows
            .into_iter()
            .map(|job| (job.id.as_u64(), job))
            .collect();

        // Nunca reutilizar ids aunque el archivo traiga un next_id viejo
        let max_id = rows.keys().next_back().copied().unwrap_or(0);
        Self {
            next_id: table.next_id.max(max_id + 1),
            rows,
        }
    }

    fn to_table(&self) -> Table {
        Table {
            next_id: self.next_id,
            rows: self.rows.values().cloned().collect(),
        }
    }
}

/// Tabla `jobs` persistida en un archivo JSON
pub struct JobStore {
    /// Ruta al archivo; `None` para una tabla solo en memoria
    path: Option<PathBuf>,

    state: Mutex<TableState>,
}

impl JobStore {
    /// Abre la tabla, creándola si no existe
    ///
    /// Es idempotente: sobre un archivo existente solo lo carga.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let state = TableState::empty();
            Self::write_to_file(&path, &state)?;
            tracing::info!(path = %path.display(), "Created jobs table");
            state
        };

        tracing::debug!(path = %path.display(), rows = state.rows.len(), "Opened jobs table");

        Ok(Self {
            path: Some(path),
            state: Mutex::new(state),
        })
    }

    /// Tabla sin archivo de respaldo
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(TableState::empty()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Número de filas en la tabla
    pub fn count(&self) -> StorageResult<usize> {
        Ok(self.lock()?.rows.len())
    }

    fn load_from_file(path: &Path) -> StorageResult<TableState> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let table: Table = serde_json::from_reader(reader).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(TableState::from_table(table))
    }

    fn write_to_file(path: &Path, state: &TableState) -> StorageResult<()> {
        let temp_path = path.with_extension("json.tmp");
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, &state.to_table())?;
        writer.flush()?;

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    fn persist(&self, state: &TableState) -> StorageResult<()> {
        match &self.path {
            Some(path) => Self::write_to_file(path, state),
            None => Ok(()),
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, TableState>> {
        self.state
            .lock()
            .map_err(|_| StorageError::Unavailable("jobs table lock poisoned".to_string()))
    }

    /// Constraint de la columna: solo la forma exacta en minúsculas
    fn check_status(value: &str) -> StorageResult<ApplicationStatus> {
        ApplicationStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| StorageError::ConstraintViolation {
                column: STATUS_COLUMN.to_string(),
                value: value.to_string(),
            })
    }
}

impl JobGateway for JobStore {
    fn insert(&self, row: NewJobRow) -> StorageResult<Job> {
        let status = Self::check_status(&row.application_status)?;

        let mut state = self.lock()?;
        let id = state.next_id;
        let now = Utc::now();

        let job = Job {
            id: JobId(id),
            title: row.title,
            company: row.company,
            url: row.url,
            location: row.location,
            job_type: row.job_type,
            application_status: status,
            created_at: now,
            updated_at: now,
        };

        state.rows.insert(id, job.clone());
        state.next_id = id + 1;

        if let Err(e) = self.persist(&state) {
            state.rows.remove(&id);
            state.next_id = id;
            return Err(e);
        }

        Ok(job)
    }

    fn find(&self, id: JobId) -> StorageResult<Option<Job>> {
        let state = self.lock()?;
        Ok(state.rows.get(&id.as_u64()).cloned())
    }

    fn find_all(&self) -> StorageResult<Vec<Job>> {
        let state = self.lock()?;
        Ok(state.rows.values().cloned().collect())
    }

    fn update_status(&self, id: JobId, status: &str) -> StorageResult<u64> {
        let status = Self::check_status(status)?;

        let mut state = self.lock()?;
        let previous = match state.rows.get_mut(&id.as_u64()) {
            Some(job) => {
                let previous = (job.application_status, job.updated_at);
                job.application_status = status;
                job.updated_at = Utc::now();
                previous
            }
            None => return Ok(0),
        };

        if let Err(e) = self.persist(&state) {
            if let Some(job) = state.rows.get_mut(&id.as_u64()) {
                job.application_status = previous.0;
                job.updated_at = previous.1;
            }
            return Err(e);
        }

        Ok(1)
    }

    fn delete(&self, id: JobId) -> StorageResult<u64> {
        let mut state = self.lock()?;
        let removed = match state.rows.remove(&id.as_u64()) {
            Some(job) => job,
            None => return Ok(0),
        };

        if let Err(e) = self.persist(&state) {
            state.rows.insert(id.as_u64(), removed);
            return Err(e);
        }

        Ok(1)
    }
}
