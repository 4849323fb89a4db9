//! # Servicio de Validación y Estados
//! src/jobs/service.rs
//!
//! Único lugar con reglas de negocio. Valida la entrada, normaliza el estado
//! y traduce las señales del gateway a `ServiceError`.
//!
//! La validación es fail-fast: se devuelve el primer error encontrado.
//! Ningún error se descarta; todos llegan a la capa HTTP.

use crate::error::{Result, ServiceError, StorageError};
use crate::jobs::gateway::JobGateway;
use crate::jobs::types::{ApplicationStatus, Job, JobId, NewJob, NewJobRow};

pub struct JobService<G: JobGateway> {
    gateway: G,
}

impl<G: JobGateway> JobService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Valida y crea un job
    ///
    /// Orden de validación: title, company, url, location, type,
    /// application_status.
    pub fn create_job(&self, job: NewJob) -> Result<Job> {
        let given = job.application_status.clone();
        let row = validate_new_job(job)?;

        match self.gateway.insert(row) {
            Ok(job) => {
                tracing::info!(job_id = %job.id, company = %job.company, "Job created");
                Ok(job)
            }
            Err(e) => Err(map_storage_error(e, &given)),
        }
    }

    pub fn get_job(&self, id: &str) -> Result<Job> {
        let id = parse_id(id)?;

        match self.gateway.find(id) {
            Ok(Some(job)) => Ok(job),
            Ok(None) => Err(ServiceError::NotFound(id)),
            Err(e) => Err(storage_failure(e)),
        }
    }

    /// Todos los jobs; una tabla vacía devuelve un Vec vacío
    pub fn get_jobs(&self) -> Result<Vec<Job>> {
        self.gateway.find_all().map_err(storage_failure)
    }

    pub fn update_job_status(&self, id: &str, status: &str) -> Result<()> {
        let id = parse_id(id)?;

        if status.trim().is_empty() {
            tracing::debug!(job_id = %id, "Rejected empty status");
            return Err(ServiceError::FieldValidation {
                field: "status".to_string(),
                message: "status query parameter is required".to_string(),
            });
        }

        let normalized = ApplicationStatus::parse(status).ok_or_else(|| {
            tracing::debug!(job_id = %id, status, "Rejected unknown status");
            ServiceError::invalid_status(status)
        })?;

        match self.gateway.update_status(id, normalized.as_str()) {
            Ok(0) => Err(ServiceError::NotFound(id)),
            Ok(_) => {
                tracing::info!(job_id = %id, status = %normalized, "Job status updated");
                Ok(())
            }
            Err(e) => Err(map_storage_error(e, status)),
        }
    }

    pub fn delete_job(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;

        match self.gateway.delete(id) {
            Ok(0) => Err(ServiceError::NotFound(id)),
            Ok(_) => {
                tracing::info!(job_id = %id, "Job deleted");
                Ok(())
            }
            Err(e) => Err(storage_failure(e)),
        }
    }
}

fn validate_new_job(job: NewJob) -> Result<NewJobRow> {
    let fields = [
        ("title", &job.title),
        ("company", &job.company),
        ("url", &job.url),
        ("location", &job.location),
        ("type", &job.job_type),
        ("application_status", &job.application_status),
    ];

    if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
        tracing::debug!(field, "Rejected job with missing field");
        return Err(ServiceError::required_field(field));
    }

    let status = ApplicationStatus::parse(&job.application_status).ok_or_else(|| {
        tracing::debug!(status = %job.application_status, "Rejected job with unknown status");
        ServiceError::invalid_status(&job.application_status)
    })?;

    // Solo el estado se normaliza; el resto se guarda tal como llegó
    Ok(NewJobRow {
        title: job.title,
        company: job.company,
        url: job.url,
        location: job.location,
        job_type: job.job_type,
        application_status: status.as_str().to_string(),
    })
}

/// Ids vacíos o no numéricos nunca llegan al gateway
fn parse_id(raw: &str) -> Result<JobId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidIdentifier(raw.to_string()));
    }

    trimmed
        .parse::<u64>()
        .map(JobId)
        .map_err(|_| ServiceError::InvalidIdentifier(raw.to_string()))
}

/// El constraint del enum en la tabla es el mismo error que la validación local
fn map_storage_error(err: StorageError, given_status: &str) -> ServiceError {
    match err {
        StorageError::ConstraintViolation { ref column, ref value } => {
            tracing::warn!(column = %column, value = %value, "Status constraint fired in storage");
            ServiceError::invalid_status(given_status)
        }
        other => storage_failure(other),
    }
}

fn storage_failure(err: StorageError) -> ServiceError {
    tracing::error!(error = %err, "Jobs storage failure");
    ServiceError::Storage(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageResult;
    use crate::jobs::storage::JobStore;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn valid_job() -> NewJob {
        NewJob {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            url: "http://acme.example/job/1".to_string(),
            location: "Remote".to_string(),
            job_type: "full-time".to_string(),
            application_status: "applied".to_string(),
        }
    }

    /// Gateway que cuenta las llamadas y responde lo que se le configure
    #[derive(Default)]
    struct ScriptedGateway {
        calls: AtomicUsize,
        rows_affected: u64,
        constraint_violation: bool,
        last_status: Mutex<Option<String>>,
    }

    impl ScriptedGateway {
        fn violating() -> Self {
            Self {
                constraint_violation: true,
                ..Default::default()
            }
        }

        fn affecting(rows: u64) -> Self {
            Self {
                rows_affected: rows,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn violation(&self, value: &str) -> StorageError {
            StorageError::ConstraintViolation {
                column: "application_status".to_string(),
                value: value.to_string(),
            }
        }
    }

    impl JobGateway for ScriptedGateway {
        fn insert(&self, row: NewJobRow) -> StorageResult<Job> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.constraint_violation {
                return Err(self.violation(&row.application_status));
            }
            let now = Utc::now();
            Ok(Job {
                id: JobId(1),
                title: row.title,
                company: row.company,
                url: row.url,
                location: row.location,
                job_type: row.job_type,
                application_status: ApplicationStatus::parse(&row.application_status)
                    .ok_or_else(|| self.violation(&row.application_status))?,
                created_at: now,
                updated_at: now,
            })
        }

        fn find(&self, _id: JobId) -> StorageResult<Option<Job>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        fn find_all(&self) -> StorageResult<Vec<Job>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable("down".to_string()))
        }

        fn update_status(&self, _id: JobId, status: &str) -> StorageResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_status.lock().unwrap() = Some(status.to_string());
            if self.constraint_violation {
                return Err(self.violation(status));
            }
            Ok(self.rows_affected)
        }

        fn delete(&self, _id: JobId) -> StorageResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows_affected)
        }
    }

    // ==================== CreateJob ====================

    #[test]
    fn test_create_job_field_order() {
        let service = JobService::new(ScriptedGateway::default());

        let cases: [(&str, fn(&mut NewJob)); 6] = [
            ("title", |j| j.title = "  ".to_string()),
            ("company", |j| j.company = String::new()),
            ("url", |j| j.url = "\t".to_string()),
            ("location", |j| j.location = String::new()),
            ("type", |j| j.job_type = " ".to_string()),
            ("application_status", |j| j.application_status = String::new()),
        ];

        for (expected, blank) in cases {
            let mut job = valid_job();
            blank(&mut job);
            match service.create_job(job) {
                Err(ServiceError::FieldValidation { field, message }) => {
                    assert_eq!(field, expected);
                    assert_eq!(message, format!("{} is required", expected));
                }
                other => panic!("expected field error for {}, got {:?}", expected, other),
            }
        }

        assert_eq!(service.gateway().calls(), 0);
    }

    #[test]
    fn test_create_job_reports_first_failing_field() {
        let service = JobService::new(ScriptedGateway::default());
        let job = NewJob {
            company: String::new(),
            job_type: String::new(),
            application_status: "hired".to_string(),
            ..valid_job()
        };

        match service.create_job(job) {
            Err(ServiceError::FieldValidation { field, .. }) => assert_eq!(field, "company"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_create_job_invalid_status() {
        let service = JobService::new(ScriptedGateway::default());
        let job = NewJob {
            application_status: "hired".to_string(),
            ..valid_job()
        };

        match service.create_job(job) {
            Err(ServiceError::StatusValidation { given, allowed }) => {
                assert_eq!(given, "hired");
                assert_eq!(allowed, ApplicationStatus::allowed());
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(service.gateway().calls(), 0);
    }

    #[test]
    fn test_create_job_normalizes_status() {
        let service = JobService::new(JobStore::in_memory());

        for raw in ["Applied", " applied ", "applied"] {
            let job = service
                .create_job(NewJob {
                    application_status: raw.to_string(),
                    ..valid_job()
                })
                .unwrap();
            assert_eq!(job.application_status, ApplicationStatus::Applied);
        }
    }

    #[test]
    fn test_create_job_constraint_maps_to_status_error() {
        let service = JobService::new(ScriptedGateway::violating());
        let job = NewJob {
            application_status: " Offer ".to_string(),
            ..valid_job()
        };

        match service.create_job(job) {
            Err(ServiceError::StatusValidation { given, allowed }) => {
                assert_eq!(given, " Offer ");
                assert_eq!(allowed.len(), 4);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_constraint_reports_same_value_on_create_and_update() {
        let service = JobService::new(ScriptedGateway::violating());
        let job = NewJob {
            application_status: " Offer ".to_string(),
            ..valid_job()
        };

        let given_on = |result: Result<()>| match result {
            Err(ServiceError::StatusValidation { given, .. }) => given,
            other => panic!("unexpected result: {:?}", other),
        };

        let on_create = given_on(service.create_job(job).map(|_| ()));
        let on_update = given_on(service.update_job_status("1", " Offer "));
        assert_eq!(on_create, on_update);
    }

    #[test]
    fn test_create_job_keeps_text_fields_as_given() {
        let service = JobService::new(JobStore::in_memory());
        let input = NewJob {
            title: " Engineer ".to_string(),
            company: "Acme\t".to_string(),
            location: "  Remote".to_string(),
            ..valid_job()
        };

        let job = service.create_job(input.clone()).unwrap();
        assert_eq!(job.title, input.title);
        assert_eq!(job.company, input.company);
        assert_eq!(job.location, input.location);
    }

    // ==================== Identifiers ====================

    #[test]
    fn test_blank_ids_never_reach_gateway() {
        let service = JobService::new(ScriptedGateway::affecting(1));

        for id in ["", "   ", "\t\n"] {
            assert!(matches!(service.get_job(id), Err(ServiceError::InvalidIdentifier(_))));
            assert!(matches!(
                service.update_job_status(id, "offer"),
                Err(ServiceError::InvalidIdentifier(_))
            ));
            assert!(matches!(service.delete_job(id), Err(ServiceError::InvalidIdentifier(_))));
        }

        assert_eq!(service.gateway().calls(), 0);
    }

    #[test]
    fn test_malformed_ids_are_invalid() {
        let service = JobService::new(ScriptedGateway::affecting(1));

        for id in ["abc", "-1", "1.5", "1 2"] {
            assert!(matches!(service.get_job(id), Err(ServiceError::InvalidIdentifier(_))));
        }
        assert_eq!(service.gateway().calls(), 0);
    }

    #[test]
    fn test_get_job_not_found() {
        let service = JobService::new(ScriptedGateway::default());
        assert!(matches!(service.get_job("7"), Err(ServiceError::NotFound(JobId(7)))));
    }

    // ==================== UpdateJobStatus ====================

    #[test]
    fn test_update_blank_status() {
        let service = JobService::new(ScriptedGateway::affecting(1));

        match service.update_job_status("1", "  ") {
            Err(ServiceError::FieldValidation { field, .. }) => assert_eq!(field, "status"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(service.gateway().calls(), 0);
    }

    #[test]
    fn test_update_invalid_status_checked_before_gateway() {
        let service = JobService::new(ScriptedGateway::affecting(1));

        assert!(matches!(
            service.update_job_status("1", "hired"),
            Err(ServiceError::StatusValidation { .. })
        ));
        assert_eq!(service.gateway().calls(), 0);
    }

    #[test]
    fn test_update_passes_normalized_status() {
        let service = JobService::new(ScriptedGateway::affecting(1));

        service.update_job_status("1", " Offer ").unwrap();
        let sent = service.gateway().last_status.lock().unwrap().clone();
        assert_eq!(sent.as_deref(), Some("offer"));
    }

    #[test]
    fn test_update_zero_rows_is_not_found() {
        let service = JobService::new(ScriptedGateway::affecting(0));
        assert!(matches!(
            service.update_job_status("3", "offer"),
            Err(ServiceError::NotFound(JobId(3)))
        ));
    }

    #[test]
    fn test_update_constraint_maps_to_status_error() {
        let service = JobService::new(ScriptedGateway::violating());

        match service.update_job_status("1", "Offer") {
            Err(ServiceError::StatusValidation { given, allowed }) => {
                assert_eq!(given, "Offer");
                assert_eq!(allowed, ApplicationStatus::allowed());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    // ==================== DeleteJob / GetJobs ====================

    #[test]
    fn test_delete_zero_rows_is_not_found() {
        let service = JobService::new(ScriptedGateway::affecting(0));
        assert!(matches!(service.delete_job("5"), Err(ServiceError::NotFound(JobId(5)))));
    }

    #[test]
    fn test_get_jobs_storage_failure_propagates() {
        let service = JobService::new(ScriptedGateway::default());
        assert!(matches!(service.get_jobs(), Err(ServiceError::Storage(_))));
    }

    #[test]
    fn test_get_jobs_empty_store() {
        let service = JobService::new(JobStore::in_memory());
        assert!(service.get_jobs().unwrap().is_empty());
    }
}
