//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea `(método, patrón de path)` a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler(&Request, &PathParams, &S) → Response
//! ```
//!
//! Los patrones aceptan segmentos `{nombre}` que se capturan en
//! `PathParams`. Si ningún patrón coincide con el path se responde 404; si
//! coincide pero no con ese método, 405.

use crate::http::request::percent_decode;
use crate::http::{Method, Request, Response, StatusCode};
use std::collections::HashMap;

/// Parámetros capturados del path (ej: `{id}` → "3")
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }
}

/// Un handler recibe el request, los parámetros del path y el estado
/// compartido del servidor
pub type Handler<S> = fn(&Request, &PathParams, &S) -> Response;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

struct Route<S> {
    method: Method,
    pattern: Vec<Segment>,
    handler: Handler<S>,
}

/// Router que mapea rutas a handlers
pub struct Router<S> {
    routes: Vec<Route<S>>,
}

impl<S> Router<S> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta
    ///
    /// # Ejemplo
    /// ```
    /// use job_tracker::router::{PathParams, Router};
    /// use job_tracker::http::{Method, Request, Response, StatusCode};
    ///
    /// fn show(_req: &Request, params: &PathParams, _state: &()) -> Response {
    ///     Response::json(StatusCode::Ok, &params.get("id"))
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/jobs/{id}", show);
    ///
    /// let request = Request::parse(b"GET /jobs/3 HTTP/1.0\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request, &()).status(), StatusCode::Ok);
    /// ```
    pub fn register(&mut self, method: Method, pattern: &str, handler: Handler<S>) {
        let pattern = split_path(pattern)
            .map(|segment| {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request, state: &S) -> Response {
        let path = request.path();

        // Se separa antes de decodificar: un `%2F` no crea un segmento nuevo
        let segments: Vec<String> = split_path(path).map(percent_decode).collect();

        // HEAD se atiende como GET pero sin body
        let (method, strip_body) = match request.method() {
            Method::HEAD => (Method::GET, true),
            other => (other, false),
        };

        let mut path_matched = false;

        for route in &self.routes {
            let params = match match_pattern(&route.pattern, &segments) {
                Some(params) => params,
                None => continue,
            };
            path_matched = true;

            if route.method != method {
                continue;
            }

            let mut response = (route.handler)(request, &params, state);
            if strip_body {
                let length = response.body().len().to_string();
                response = response.with_body("");
                response.add_header("Content-Length", &length);
            }
            add_common_headers(&mut response);
            return response;
        }

        let mut response = if path_matched {
            Response::error(
                StatusCode::MethodNotAllowed,
                &format!("Method {} not allowed on {}", request.method().as_str(), path),
            )
        } else {
            Response::error(StatusCode::NotFound, &format!("Route not found: {}", path))
        };
        add_common_headers(&mut response);
        response
    }
}

impl<S> Default for Router<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// "/jobs/3" → ["jobs", "3"]; "/jobs/" → ["jobs", ""]
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

fn match_pattern(pattern: &[Segment], segments: &[String]) -> Option<PathParams> {
    if pattern.len() != segments.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (expected, actual) in pattern.iter().zip(segments) {
        match expected {
            Segment::Literal(literal) if literal == actual => {}
            Segment::Literal(_) => return None,
            Segment::Param(name) => {
                params.insert(name.clone(), actual.clone());
            }
        }
    }

    Some(PathParams(params))
}

/// Headers comunes a todas las respuestas
fn add_common_headers(response: &mut Response) {
    response.add_header("Server", "JobTracker-HTTP/1.0");
}
