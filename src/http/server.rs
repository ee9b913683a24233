//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compose external route groups, status route and static mount
//! - Intercept front-end namespace traffic ahead of the routes
//! - Wire up middleware (CORS, body limit, tracing)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::{BridgeConfig, CorsConfig};
use crate::http::request::Forwarder;
use crate::http::upstream::{UpstreamKind, Upstreams};
use crate::observability::metrics;
use crate::routing::{Disposition, RouteClassifier};

/// Application state injected into the proxy middleware and status route.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<RouteClassifier>,
    pub forwarder: Forwarder,
    /// Public path of the web interface.
    pub web_path: String,
}

/// HTTP server for the API and its front-end bridge.
pub struct HttpServer {
    router: Router,
    config: BridgeConfig,
}

impl HttpServer {
    /// Create a server with no external route groups.
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_routes(config, Router::new())
    }

    /// Create a server around externally defined route groups, mounted under
    /// `app.base_path`.
    pub fn with_routes(config: BridgeConfig, routes: Router) -> Self {
        let upstreams = Upstreams::new(config.backend_base_url(), config.dev_server_base_url());
        let state = AppState {
            classifier: Arc::new(RouteClassifier::from_config(&config.frontend)),
            forwarder: Forwarder::new(upstreams, Duration::from_secs(config.timeouts.connect_secs)),
            web_path: config.frontend.namespace.clone(),
        };

        tracing::debug!(
            backend = %state.forwarder.upstreams().backend,
            dev_server = %state.forwarder.upstreams().dev_server,
            namespace = %config.frontend.namespace,
            "Front-end bridge configured"
        );

        let router = Self::build_router(&config, state, routes);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BridgeConfig, state: AppState, routes: Router) -> Router {
        let base_path = config.app.base_path.as_str();
        let index = if base_path.is_empty() { "/" } else { base_path };

        let mut app = Router::new()
            .route(index, get(status_handler))
            .fallback(not_found)
            .with_state(state.clone());

        if let Some(dir) = &config.app.static_dir {
            app = app.nest_service(&format!("{}/statics", base_path), ServeDir::new(dir));
        }

        let routes = if base_path.is_empty() {
            routes
        } else {
            Router::new().nest(base_path, routes)
        };

        app.merge(routes)
            .layer(middleware::from_fn_with_state(state, frontend_proxy))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(cors_layer(&config.cors))
            .layer(TraceLayer::new_for_http())
    }

    /// The composed router, for serving on a custom transport or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

/// Front-end bridge middleware.
/// Classifies the path and forwards namespace traffic; everything else falls through.
async fn frontend_proxy(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (kind, target_path) = match state.classifier.classify(request.uri().path()) {
        Disposition::NotApplicable => return next.run(request).await,
        Disposition::LocalApi(path) => (UpstreamKind::Backend, path),
        Disposition::ExternalDevServer(path) => (UpstreamKind::DevServer, path),
    };

    let start_time = Instant::now();
    let method = request.method().clone();

    tracing::debug!(
        method = %method,
        path = %request.uri().path(),
        upstream = %kind,
        target = %target_path,
        "Proxying front-end request"
    );

    let response = match state.forwarder.forward(kind, &target_path, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(method = %method, upstream = %kind, target = %target_path, error = %e, "Front-end proxy failed");
            e.into_response()
        }
    };

    metrics::record_proxy_request(method.as_str(), response.status().as_u16(), kind.as_str(), start_time);
    response
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub web_url: String,
}

async fn status_handler(State(state): State<AppState>, headers: HeaderMap) -> Json<SystemStatus> {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        web_url: format!("http://{}{}", host, state.web_path),
    })
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.allow_credentials)
}
