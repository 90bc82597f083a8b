//! Development server: one fallback handler dispatching on [`Route`].

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::dev::routes::{resolve_route, Route};
use crate::dev::shell::{self, MISSING_SHELL_MESSAGE};
use crate::dev::state::DevState;
use crate::dev::static_files;
use crate::dev::ws;
use crate::error::{CliError, Result};

/// How long shutdown waits for open sockets to finish closing.
const SOCKET_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Development server.
pub struct DevServer {
    addr: SocketAddr,
    state: Arc<DevState>,
}

impl DevServer {
    pub fn new(addr: SocketAddr, state: Arc<DevState>) -> Self {
        Self { addr, state }
    }

    /// Router with every route and the CORS layer.
    pub fn router(state: Arc<DevState>) -> Router {
        Router::new()
            .fallback(dispatch)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(state)
    }

    /// Bind the configured address and serve until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound.
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", self.addr, e)))?;

        crate::ui::success(&format!("Development server running at http://{}", self.addr));
        crate::ui::info("Press Ctrl+C to stop");

        Self::serve(listener, self.state, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// Once it does, no new connections are accepted, every open socket is
    /// sent a Close frame, and this waits a bounded time for them to finish.
    pub async fn serve(
        listener: TcpListener,
        state: Arc<DevState>,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let app = Self::router(Arc::clone(&state));
        let signal_state = Arc::clone(&state);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!(sockets = signal_state.open_sockets(), "shutting down");
                signal_state.close_sockets();
            })
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))?;

        if !state.wait_for_sockets(SOCKET_DRAIN_TIMEOUT).await {
            tracing::warn!(
                sockets = state.open_sockets(),
                "websocket connections still open after shutdown timeout"
            );
        }

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

async fn dispatch(State(state): State<Arc<DevState>>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = resolve_route(&state, &path).await;

    let response = match route {
        Route::Api { handler, .. } => api_response(handler(state.mock())),
        Route::WebSocket => {
            let (parts, _body) = request.into_parts();
            ws::upgrade(Arc::clone(&state), parts).await
        }
        Route::Shell => shell_response(&state, StatusCode::INTERNAL_SERVER_ERROR).await,
        Route::StaticFile(ref file) => static_response(file).await,
        Route::Fallback => shell_response(&state, StatusCode::NOT_FOUND).await,
    };

    tracing::debug!(
        %method,
        %path,
        route = route.kind(),
        status = response.status().as_u16(),
        "request"
    );
    response
}

fn api_response(payload: serde_json::Value) -> Response {
    (
        [(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        )],
        Json(payload),
    )
        .into_response()
}

/// Render the shell, or answer `missing` if it cannot be read.
async fn shell_response(state: &DevState, missing: StatusCode) -> Response {
    match shell::render(state).await {
        Ok(html) => (
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            html,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(
                path = %state.shell_path().display(),
                error = %e,
                "failed to read shell"
            );
            let body = if missing == StatusCode::NOT_FOUND {
                "Not found".to_string()
            } else {
                MISSING_SHELL_MESSAGE.to_string()
            };
            (missing, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
        }
    }
}

async fn static_response(file: &std::path::Path) -> Response {
    match tokio::fs::read(file).await {
        Ok(content) => (
            [
                (header::CONTENT_TYPE, static_files::content_type(file)),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            Body::from(content),
        )
            .into_response(),
        Err(e) => {
            crate::ui::warning(&format!("Failed to read file {}: {}", file.display(), e));
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response()
        }
    }
}
