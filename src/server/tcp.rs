//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor que maneja múltiples conexiones simultáneas usando threads.
//! Cada conexión se procesa en su propio thread y atiende un solo request.
//!
//! El único estado compartido entre threads es el `JobService` (y su
//! gateway), envuelto en `Arc`.

use crate::config::Config;
use crate::http::request::header_end;
use crate::http::{Request, Response, StatusCode};
use crate::jobs::{handlers, JobGateway, JobService};
use crate::router::Router;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Tamaño máximo de la sección de headers
const MAX_HEADER_BYTES: usize = 8192;

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Límites aplicados a cada conexión
#[derive(Debug, Clone, Copy)]
struct Limits {
    max_body_bytes: usize,
    read_timeout: Duration,
}

impl Limits {
    fn from_config(config: &Config) -> Self {
        Self {
            max_body_bytes: config.max_body_bytes,
            read_timeout: Duration::from_millis(config.read_timeout_ms),
        }
    }
}

/// Resultado de leer un request del socket
#[derive(Debug)]
enum ReadOutcome {
    /// El cliente cerró sin enviar nada
    Closed,
    Complete(Vec<u8>),
    Rejected(String),
}

/// Servidor HTTP/1.0 de jobs
pub struct Server<G: JobGateway + 'static> {
    listener: TcpListener,
    router: Arc<Router<JobService<G>>>,
    service: Arc<JobService<G>>,
    limits: Limits,
}

impl<G: JobGateway + 'static> Server<G> {
    /// Hace bind a `config.address()`; usar puerto 0 para uno efímero
    pub fn bind(config: &Config, service: JobService<G>) -> io::Result<Self> {
        let listener = TcpListener::bind(config.address())?;

        Ok(Self {
            listener,
            router: Arc::new(handlers::routes::<G>()),
            service: Arc::new(service),
            limits: Limits::from_config(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Acepta conexiones indefinidamente, un thread por conexión
    pub fn run(self) -> io::Result<()> {
        let address = self.local_addr()?;
        tracing::info!(%address, "Server listening (one thread per connection)");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let service = Arc::clone(&self.service);
                    let limits = self.limits;

                    let peer = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());
                    tracing::debug!(%peer, "Accepted connection");

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, &router, &service, limits) {
                            tracing::warn!(%peer, error = %e, "Connection error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(
        mut stream: TcpStream,
        router: &Router<JobService<G>>,
        service: &JobService<G>,
        limits: Limits,
    ) -> io::Result<()> {
        let start = Instant::now();
        let request_id = next_request_id();

        stream.set_read_timeout(Some(limits.read_timeout))?;

        let (mut response, method, path) = match read_request(&mut stream, limits.max_body_bytes)? {
            ReadOutcome::Closed => {
                tracing::debug!(request_id = %request_id, "Connection closed before request");
                return Ok(());
            }
            ReadOutcome::Rejected(reason) => {
                tracing::debug!(request_id = %request_id, %reason, "Rejected request");
                (
                    Response::error(StatusCode::BadRequest, &reason),
                    "-".to_string(),
                    "-".to_string(),
                )
            }
            ReadOutcome::Complete(buffer) => match Request::parse(&buffer) {
                Ok(request) => {
                    tracing::debug!(
                        request_id = %request_id,
                        version = request.version(),
                        user_agent = request.header("user-agent").unwrap_or("-"),
                        "Parsed request"
                    );
                    let response = router.route(&request, service);
                    (
                        response,
                        request.method().as_str().to_string(),
                        request.path().to_string(),
                    )
                }
                Err(e) => {
                    tracing::debug!(request_id = %request_id, error = %e, "Parse error");
                    (
                        Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e)),
                        "-".to_string(),
                        "-".to_string(),
                    )
                }
            },
        };

        response.add_header("X-Request-Id", &request_id);
        response.add_header("Connection", "close");

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Request completed"
        );

        Ok(())
    }
}

/// Id corto para correlacionar logs y respuestas
fn next_request_id() -> String {
    let mut hasher = DefaultHasher::new();
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
        .hash(&mut hasher);
    thread::current().id().hash(&mut hasher);
    REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed).hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Lee headers y, si hay `Content-Length`, el body completo
fn read_request(stream: &mut impl Read, max_body_bytes: usize) -> io::Result<ReadOutcome> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_len = loop {
        if let Some(end) = header_end(&buffer) {
            break end;
        }
        if buffer.len() > MAX_HEADER_BYTES {
            return Ok(ReadOutcome::Rejected("Request headers too large".to_string()));
        }

        let n = stream.read(&mut chunk)?;
        if n == 0 {
            // Sin línea vacía final: se parsea lo que haya llegado
            return Ok(if buffer.is_empty() {
                ReadOutcome::Closed
            } else {
                ReadOutcome::Complete(buffer)
            });
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let content_length = match content_length(&buffer[..head_len]) {
        Ok(length) => length,
        Err(reason) => return Ok(ReadOutcome::Rejected(reason)),
    };

    if content_length > max_body_bytes {
        return Ok(ReadOutcome::Rejected(format!(
            "Request body too large (max {} bytes)",
            max_body_bytes
        )));
    }

    let total = head_len + content_length;
    while buffer.len() < total {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            return Ok(ReadOutcome::Rejected("Incomplete request body".to_string()));
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
    buffer.truncate(total);

    Ok(ReadOutcome::Complete(buffer))
}

fn content_length(head: &[u8]) -> Result<usize, String> {
    let head = String::from_utf8_lossy(head);

    for line in head.split("\r\n").skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                return value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid Content-Length: {}", value.trim()));
            }
        }
    }

    Ok(0)
}
