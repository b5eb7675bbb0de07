//! HTTP Server

use std::{
    net::{Ipv4Addr, SocketAddr, TcpListener},
    time::Duration,
};

use anyhow::Context;
use axum::{
    extract::Request,
    http::{header, Method},
    routing::{get, post},
    Json, Router,
};
use axum_server::Handle;
use clap::Parser;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, info_span};
use utoipa::OpenApi;

use crate::domain::registrations::RegistrationService;

use handlers::{submit_form, welcome};
use open_api::ApiDocs;
use state::AppState;

pub mod errors;
pub mod handlers;
mod open_api;
pub mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The port to listen on
    #[arg(short, long, env = "PORT", default_value = "5002")]
    pub port: u16,

    /// The frontend expected to call this API
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:5173")]
    pub frontend_url: String,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
    config: HttpServerConfig,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(
        registrations: impl RegistrationService,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(AppState::new(registrations));

        let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
        let listener = TcpListener::bind(address)
            .with_context(|| format!("failed to listen on {}", config.port))?;
        listener
            .set_nonblocking(true)
            .context("failed to configure listener")?;

        Ok(Self {
            router,
            listener,
            config,
        })
    }

    /// Runs the HTTP server until Ctrl+C or SIGTERM.
    #[mutants::skip]
    pub async fn run(self) -> anyhow::Result<()> {
        debug!(
            "listening on {}",
            self.listener
                .local_addr()
                .context("failed to get local address")?
        );
        info!("Server running on http://localhost:{}", self.config.port);
        info!("CORS configured for frontend: {}", self.config.frontend_url);

        let handle = Handle::new();

        tokio::spawn(shutdown_signal(handle.clone()));

        axum_server::from_tcp(self.listener)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await
            .context("server error")?;

        Ok(())
    }
}

/// Create the application's router
pub fn router<R: RegistrationService>(state: AppState<R>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(welcome::handler))
        .route("/submit-form", post(submit_form::handler::<R>))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handlers::panic_handler))
        .layer(cors_layer)
        .layer(trace_layer)
        .with_state(state)
}

#[mutants::skip]
async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutting down gracefully");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}

#[cfg(test)]
mod tests {
    use axum::http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
        },
        HeaderName, HeaderValue, Method, StatusCode,
    };
    use axum_test::{TestResponse, TestServer};
    use serde_json::Value;
    use testresult::TestResult;

    use super::{router, state::test_state};

    fn header_value(response: &TestResponse, name: HeaderName) -> String {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_lowercase()
    }

    #[tokio::test]
    async fn test_preflight_is_answered_for_every_path() -> TestResult {
        let server = TestServer::new(router(test_state(None)))?;

        for path in ["/submit-form", "/", "/does-not-exist"] {
            let response = server
                .method(Method::OPTIONS, path)
                .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5173"))
                .add_header(
                    ACCESS_CONTROL_REQUEST_METHOD,
                    HeaderValue::from_static("POST"),
                )
                .await;

            assert!(response.status_code().is_success(), "preflight to {path}");
            assert_eq!(header_value(&response, ACCESS_CONTROL_ALLOW_ORIGIN), "*");

            let methods = header_value(&response, ACCESS_CONTROL_ALLOW_METHODS);
            for method in ["get", "post", "put", "delete", "patch", "options"] {
                assert!(methods.contains(method), "{method} missing from {methods}");
            }

            let headers = header_value(&response, ACCESS_CONTROL_ALLOW_HEADERS);
            assert!(headers.contains("content-type"));
            assert!(headers.contains("authorization"));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_cors_headers_on_simple_requests() -> TestResult {
        let response = TestServer::new(router(test_state(None)))?
            .get("/")
            .add_header(ORIGIN, HeaderValue::from_static("https://example.com"))
            .await;

        response.assert_status_ok();
        assert_eq!(header_value(&response, ACCESS_CONTROL_ALLOW_ORIGIN), "*");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_route() -> TestResult {
        let response = TestServer::new(router(test_state(None)))?
            .get("/does-not-exist")
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>(),
            serde_json::json!({ "success": false, "message": "Not found" })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_openapi_document() -> TestResult {
        let response = TestServer::new(router(test_state(None)))?
            .get("/openapi.json")
            .await;

        response.assert_status_ok();

        let json = response.json::<Value>();

        assert!(json["paths"]["/submit-form"]["post"].is_object());
        assert!(json["paths"]["/"]["get"].is_object());
        assert!(json["components"]["schemas"]["FormDataBody"].is_object());

        Ok(())
    }
}
