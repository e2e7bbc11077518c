//! HTTP server setup and the catch-all file handler.
//!
//! # Responsibilities
//! - Create Axum Router with the single `GET /*` route
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch each request by MIME category to the content pipeline
//! - Turn resolution errors into a generic 404
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Config, ConfigError};
use crate::content::resolver::{resolve, Resolved};
use crate::content::rewrite::rewrite;
use crate::content::{FileLoader, ResolveError, Rules};
use crate::http::mime::{Category, Mime};

const NOT_FOUND_BODY: &str = "file not found";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<Rules>,
}

/// HTTP server for the dev site.
pub struct HttpServer {
    router: Router,
    config: Config,
}

impl HttpServer {
    /// Compile the rules of a validated configuration and build the router.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let state = AppState {
            rules: Arc::new(Rules::from_config(&config)?),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &Config, state: AppState) -> Router {
        Router::new()
            .route("/", get(serve_handler))
            .route("/{*path}", get(serve_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// A clone of the router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the server until a shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.root,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// A fully processed response body.
struct Rendered {
    mime: Mime,
    body: Vec<u8>,
}

/// Serve any path below the root.
///
/// File reads and resolution are blocking, so the pipeline runs on the
/// blocking pool and the handler waits for its single result.
async fn serve_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    let rules = Arc::clone(&state.rules);

    let task_path = path.clone();
    let result = tokio::task::spawn_blocking(move || render(&rules, &task_path)).await;

    match result {
        Ok(Ok(rendered)) => (
            [(header::CONTENT_TYPE, rendered.mime.header_value())],
            rendered.body,
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::warn!(path = %path, error = %e, "Serving not found");
            not_found()
        }
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Resolution task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Load a request path and process it according to its category.
fn render(rules: &Rules, uri: &str) -> Result<Rendered, ResolveError> {
    let loader = FileLoader::new(rules);
    let path = loader.request_path(uri)?;
    let mime = Mime::for_path(&path);

    let body = match mime.category {
        Category::Html => {
            let Resolved { document, passes } = resolve(loader.load(&path), rules);
            tracing::debug!(path = %path, passes, "HTML resolved");
            document.into_result()?.into_bytes()
        }
        Category::Asset => rewrite(loader.load(&path), rules).into_result()?.into_bytes(),
        Category::Other => loader.load_bytes(&path)?,
    };

    Ok(Rendered { mime, body })
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        NOT_FOUND_BODY,
    )
        .into_response()
}
