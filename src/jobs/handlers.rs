//! # Handlers HTTP para Jobs
//! src/jobs/handlers.rs
//!
//! Adaptan requests HTTP a llamadas del servicio y deciden el código de
//! estado de cada `ServiceError`:
//!
//! | Error                | Status |
//! |----------------------|--------|
//! | `FieldValidation`    | 400    |
//! | `StatusValidation`   | 400    |
//! | `InvalidIdentifier`  | 400    |
//! | `NotFound`           | 404    |
//! | `Storage`            | 500    |

use crate::error::ServiceError;
use crate::http::{Method, Request, Response, StatusCode};
use crate::jobs::gateway::JobGateway;
use crate::jobs::service::JobService;
use crate::jobs::types::NewJob;
use crate::router::{PathParams, Router};
use serde_json::json;

/// Router con todas las rutas de `/jobs`
pub fn routes<G: JobGateway>() -> Router<JobService<G>> {
    let mut router = Router::new();
    router.register(Method::GET, "/jobs", list_jobs_handler::<G>);
    router.register(Method::POST, "/jobs", create_job_handler::<G>);
    router.register(Method::GET, "/jobs/{id}", get_job_handler::<G>);
    router.register(Method::PUT, "/jobs/{id}", update_job_handler::<G>);
    router.register(Method::DELETE, "/jobs/{id}", delete_job_handler::<G>);
    router
}

/// Handler para `GET /jobs`
pub fn list_jobs_handler<G: JobGateway>(
    _req: &Request,
    _params: &PathParams,
    service: &JobService<G>,
) -> Response {
    match service.get_jobs() {
        Ok(jobs) => Response::json(StatusCode::Ok, &jobs),
        Err(e) => error_response(&e),
    }
}

/// Handler para `POST /jobs`
///
/// # Ejemplo de response
/// ```json
/// {"message": "Job created successfully", "id": 1}
/// ```
pub fn create_job_handler<G: JobGateway>(
    req: &Request,
    _params: &PathParams,
    service: &JobService<G>,
) -> Response {
    let job: NewJob = match serde_json::from_slice(req.body()) {
        Ok(job) => job,
        Err(e) => {
            let error = if e.is_syntax() || e.is_eof() {
                "Invalid JSON format"
            } else {
                "Invalid request body"
            };
            return Response::json(
                StatusCode::BadRequest,
                &json!({ "error": error, "details": e.to_string() }),
            );
        }
    };

    match service.create_job(job) {
        Ok(job) => Response::json(
            StatusCode::Created,
            &json!({ "message": "Job created successfully", "id": job.id }),
        ),
        Err(e) => error_response(&e),
    }
}

/// Handler para `GET /jobs/{id}`
pub fn get_job_handler<G: JobGateway>(
    _req: &Request,
    params: &PathParams,
    service: &JobService<G>,
) -> Response {
    match service.get_job(params.get("id").unwrap_or_default()) {
        Ok(job) => Response::json(StatusCode::Ok, &job),
        Err(e) => error_response(&e),
    }
}

/// Handler para `PUT /jobs/{id}?status=S`
pub fn update_job_handler<G: JobGateway>(
    req: &Request,
    params: &PathParams,
    service: &JobService<G>,
) -> Response {
    let id = params.get("id").unwrap_or_default();
    let status = req.query_param("status").unwrap_or_default();

    match service.update_job_status(id, status) {
        Ok(()) => Response::json(
            StatusCode::Ok,
            &json!({ "message": "Job updated successfully" }),
        ),
        Err(e) => error_response(&e),
    }
}

/// Handler para `DELETE /jobs/{id}`
pub fn delete_job_handler<G: JobGateway>(
    _req: &Request,
    params: &PathParams,
    service: &JobService<G>,
) -> Response {
    match service.delete_job(params.get("id").unwrap_or_default()) {
        Ok(()) => Response::json(
            StatusCode::Ok,
            &json!({ "message": "Job deleted successfully" }),
        ),
        Err(e) => error_response(&e),
    }
}

/// Traduce un `ServiceError` a la respuesta que ve el cliente
///
/// Los errores de storage no exponen detalles.
pub fn error_response(err: &ServiceError) -> Response {
    // Los errores de storage ya se loguean en el servicio
    if err.is_client_error() {
        tracing::debug!(error = %err, "Request rejected");
    }

    match err {
        ServiceError::FieldValidation { field, message } => Response::json(
            StatusCode::BadRequest,
            &json!({ "error": message, "field": field }),
        ),
        ServiceError::StatusValidation { given, allowed } => Response::json(
            StatusCode::BadRequest,
            &json!({
                "error": format!("Invalid application status: {}", given),
                "valid_statuses": allowed,
            }),
        ),
        ServiceError::InvalidIdentifier(_) => {
            Response::error(StatusCode::BadRequest, "Invalid job ID")
        }
        ServiceError::NotFound(_) => Response::error(StatusCode::NotFound, "Job not found"),
        ServiceError::Storage(_) => {
            Response::error(StatusCode::InternalServerError, "Internal server error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::jobs::storage::JobStore;
    use crate::jobs::types::JobId;

    fn service() -> JobService<JobStore> {
        JobService::new(JobStore::in_memory())
    }

    fn send(service: &JobService<JobStore>, raw: &[u8]) -> Response {
        let request = Request::parse(raw).unwrap();
        routes::<JobStore>().route(&request, service)
    }

    fn post_job(service: &JobService<JobStore>, body: &str) -> Response {
        let raw = format!(
            "POST /jobs HTTP/1.0\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        send(service, raw.as_bytes())
    }

    const VALID_BODY: &str = r#"{"title":"Engineer","company":"Acme","url":"http://acme.example/job/1","location":"Remote","type":"full-time","application_status":"applied"}"#;

    #[test]
    fn test_list_empty() {
        let response = send(&service(), b"GET /jobs HTTP/1.0\r\n\r\n");
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"[]");
    }

    #[test]
    fn test_create_returns_201() {
        let service = service();
        let response = post_job(&service, VALID_BODY);

        assert_eq!(response.status(), StatusCode::Created);
        let body = response.body_json().unwrap();
        assert_eq!(body["message"], "Job created successfully");
        assert_eq!(body["id"], 1);
    }

    #[test]
    fn test_create_malformed_json() {
        let response = post_job(&service(), "{not json");
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(response.body_json().unwrap()["error"], "Invalid JSON format");
    }

    #[test]
    fn test_create_wrong_shape() {
        let response = post_job(&service(), r#"{"title": 5}"#);
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(response.body_json().unwrap()["error"], "Invalid request body");
    }

    #[test]
    fn test_create_missing_field() {
        let response = post_job(&service(), r#"{"title":"Engineer"}"#);

        assert_eq!(response.status(), StatusCode::BadRequest);
        let body = response.body_json().unwrap();
        assert_eq!(body["field"], "company");
        assert_eq!(body["error"], "company is required");
    }

    #[test]
    fn test_create_invalid_status() {
        let body = VALID_BODY.replace("\"applied\"", "\"hired\"");
        let response = post_job(&service(), &body);

        assert_eq!(response.status(), StatusCode::BadRequest);
        let body = response.body_json().unwrap();
        assert_eq!(body["error"], "Invalid application status: hired");
        assert_eq!(
            body["valid_statuses"],
            json!(["applied", "interviewing", "rejected", "offer"])
        );
    }

    #[test]
    fn test_get_job() {
        let service = service();
        post_job(&service, VALID_BODY);

        let response = send(&service, b"GET /jobs/1 HTTP/1.0\r\n\r\n");
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body_json().unwrap()["company"], "Acme");

        let response = send(&service, b"GET /jobs/2 HTTP/1.0\r\n\r\n");
        assert_eq!(response.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_update_status_flow() {
        let service = service();
        post_job(&service, VALID_BODY);

        let response = send(&service, b"PUT /jobs/1?status=Offer HTTP/1.0\r\n\r\n");
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.body_json().unwrap()["message"],
            "Job updated successfully"
        );

        let response = send(&service, b"GET /jobs/1 HTTP/1.0\r\n\r\n");
        assert_eq!(response.body_json().unwrap()["application_status"], "offer");
    }

    #[test]
    fn test_update_errors() {
        let service = service();
        post_job(&service, VALID_BODY);

        let missing = send(&service, b"PUT /jobs/1 HTTP/1.0\r\n\r\n");
        assert_eq!(missing.status(), StatusCode::BadRequest);
        assert_eq!(missing.body_json().unwrap()["field"], "status");

        let invalid = send(&service, b"PUT /jobs/1?status=hired HTTP/1.0\r\n\r\n");
        assert_eq!(invalid.status(), StatusCode::BadRequest);

        let bad_id = send(&service, b"PUT /jobs/%20?status=offer HTTP/1.0\r\n\r\n");
        assert_eq!(bad_id.status(), StatusCode::BadRequest);
        assert_eq!(bad_id.body_json().unwrap()["error"], "Invalid job ID");

        let slashed = send(&service, b"PUT /jobs/1%2F2?status=offer HTTP/1.0\r\n\r\n");
        assert_eq!(slashed.status(), StatusCode::BadRequest);
        assert_eq!(slashed.body_json().unwrap()["error"], "Invalid job ID");

        let absent = send(&service, b"PUT /jobs/99?status=offer HTTP/1.0\r\n\r\n");
        assert_eq!(absent.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_delete_flow() {
        let service = service();
        post_job(&service, VALID_BODY);

        let response = send(&service, b"DELETE /jobs/1 HTTP/1.0\r\n\r\n");
        assert_eq!(response.status(), StatusCode::Ok);

        let again = send(&service, b"DELETE /jobs/1 HTTP/1.0\r\n\r\n");
        assert_eq!(again.status(), StatusCode::NotFound);

        let bad_id = send(&service, b"DELETE /jobs/ HTTP/1.0\r\n\r\n");
        assert_eq!(bad_id.status(), StatusCode::BadRequest);
    }

    #[test]
    fn test_storage_error_hides_details() {
        let err = ServiceError::Storage(StorageError::Unavailable("secret detail".to_string()));
        let response = error_response(&err);

        assert_eq!(response.status(), StatusCode::InternalServerError);
        let body = String::from_utf8(response.body().to_vec()).unwrap();
        assert!(!body.contains("secret"));
        assert!(body.contains("Internal server error"));
    }

    #[test]
    fn test_not_found_mapping() {
        let response = error_response(&ServiceError::NotFound(JobId(4)));
        assert_eq!(response.status(), StatusCode::NotFound);
        assert_eq!(response.body_json().unwrap()["error"], "Job not found");
    }
}
