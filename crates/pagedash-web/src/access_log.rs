//! Access logging middleware.
//!
//! Page and region API requests are logged at `info`, server errors at
//! `warn`. The change stream and health checks are logged at `debug`: the
//! stream already reports connects and disconnects, and health checks come
//! from orchestrators every few seconds. Static files are not logged.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::Request;
use tracing::{debug, info, warn};

/// How a finished request is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Skip,
    Debug,
    Info,
    Warn,
}

fn log_level(path: &str, status: u16) -> LogLevel {
    if status >= 500 {
        return LogLevel::Warn;
    }
    match path {
        "/favicon.ico" => LogLevel::Skip,
        "/api/v1/stream" | "/api/v1/health" => LogLevel::Debug,
        p if p.starts_with("/assets/") || p.starts_with("/swagger-ui/") => LogLevel::Skip,
        _ => LogLevel::Info,
    }
}

#[derive(Clone)]
pub(crate) struct AccessLogLayer;

impl<S> tower::Layer<S> for AccessLogLayer {
    type Service = AccessLogService<S>;
    fn layer(&self, inner: S) -> Self::Service {
        AccessLogService { inner }
    }
}

#[derive(Clone)]
pub(crate) struct AccessLogService<S> {
    inner: S,
}

impl<S> tower::Service<Request> for AccessLogService<S>
where
    S: tower::Service<Request, Response = axum::response::Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let client = req
            .extensions()
            .get::<axum::extract::ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string())
            .unwrap_or_else(|| "-".to_owned());
        let t0 = Instant::now();

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let response = inner.call(req).await?;
            let latency_ms = t0.elapsed().as_millis() as u64;
            let status = response.status().as_u16();
            match log_level(&path, status) {
                LogLevel::Skip => {}
                LogLevel::Debug => debug!(client, status, latency_ms, "{method} {path}"),
                LogLevel::Info => info!(client, status, latency_ms, "{method} {path}"),
                LogLevel::Warn => warn!(client, status, latency_ms, "{method} {path}"),
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_requests_logged_at_info() {
        assert_eq!(log_level("/", 200), LogLevel::Info);
        assert_eq!(log_level("/api/v1/regions", 200), LogLevel::Info);
        assert_eq!(log_level("/api/v1/regions/footer", 404), LogLevel::Info);
    }

    #[test]
    fn test_stream_and_health_logged_at_debug() {
        assert_eq!(log_level("/api/v1/stream", 200), LogLevel::Debug);
        assert_eq!(log_level("/api/v1/health", 200), LogLevel::Debug);
    }

    #[test]
    fn test_static_files_not_logged() {
        assert_eq!(log_level("/assets/dashboard.js", 200), LogLevel::Skip);
        assert_eq!(log_level("/assets/missing.css", 404), LogLevel::Skip);
        assert_eq!(log_level("/swagger-ui/index.css", 200), LogLevel::Skip);
        assert_eq!(log_level("/favicon.ico", 404), LogLevel::Skip);
    }

    #[test]
    fn test_server_errors_always_warn() {
        assert_eq!(log_level("/api/v1/regions", 500), LogLevel::Warn);
        assert_eq!(log_level("/assets/dashboard.js", 503), LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_layer_passes_response_through() {
        use tower::{Layer, Service};

        let inner = tower::service_fn(|_req: Request| async {
            Ok::<_, std::convert::Infallible>(
                axum::response::Response::builder()
                    .status(418)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
        });
        let mut service = AccessLogLayer.layer(inner);
        let request = Request::builder()
            .uri("/api/v1/regions")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = service.call(request).await.unwrap();
        assert_eq!(response.status().as_u16(), 418);
    }
}
