//! Request routing for the dev server.
//!
//! Resolution is a pure function of the request path and [`DevState`], so the
//! decision order can be tested without binding a socket.

use std::path::PathBuf;

use serde_json::Value;

use crate::dev::mock::{self, MockData};
use crate::dev::state::DevState;
use crate::dev::static_files;

/// Produces a JSON payload from the mock data.
pub type Handler = fn(&MockData) -> Value;

/// How a route table entry matches a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Exact(String),
    Prefix(String),
}

impl Matcher {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Matcher::Exact(exact) => path == exact,
            Matcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// Mock API routes.
///
/// Exact matches always win over prefixes; prefixes are tried in insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(Matcher, Handler)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact route. Registering the same path twice keeps the last
    /// handler.
    pub fn exact(mut self, path: &str, handler: Handler) -> Self {
        let matcher = Matcher::Exact(path.to_string());
        match self.routes.iter_mut().find(|(m, _)| *m == matcher) {
            Some(existing) => existing.1 = handler,
            None => self.routes.push((matcher, handler)),
        }
        self
    }

    pub fn prefix(mut self, prefix: &str, handler: Handler) -> Self {
        self.routes.push((Matcher::Prefix(prefix.to_string()), handler));
        self
    }

    /// Public, admin and write endpoints of the streaming backend.
    pub fn standard() -> Self {
        Self::new()
            .exact("/api/status", MockData::status_payload)
            .exact("/api/config", MockData::config_payload)
            .exact("/api/emoji", MockData::emoji)
            .exact("/api/video/variants", MockData::video_variants)
            .exact("/api/chat/register", MockData::register_chat_user)
            .exact("/api/chat", MockData::chat_history)
            .exact("/api/admin/serverconfig", MockData::server_config)
            .exact("/api/admin/status", MockData::admin_status)
            .exact("/api/admin/hardwarestats", MockData::hardware_stats)
            .exact("/api/admin/logs", MockData::logs)
            .exact("/api/admin/viewers", MockData::viewers)
            .exact("/api/admin/chat/messages", MockData::chat_messages)
            .exact("/api/admin/webhooks", MockData::webhooks)
            .exact("/api/admin/accesstokens", MockData::access_tokens)
            .exact("/api/admin/followers", MockData::followers)
            .exact("/api/admin/chat/send", mock::ack)
            .prefix("/api/admin/config/", mock::ack)
    }

    pub fn lookup(&self, path: &str) -> Option<(&Matcher, Handler)> {
        let exact = self
            .routes
            .iter()
            .find(|(m, _)| matches!(m, Matcher::Exact(_)) && m.matches(path));
        let found = exact.or_else(|| {
            self.routes
                .iter()
                .find(|(m, _)| matches!(m, Matcher::Prefix(_)) && m.matches(path))
        });
        found.map(|(m, h)| (m, *h))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// What a request resolves to.
#[derive(Debug, Clone)]
pub enum Route {
    /// Mock API payload.
    Api { pattern: Matcher, handler: Handler },
    /// WebSocket upgrade.
    WebSocket,
    /// Shell render for `/`, the admin UI, or the shell file itself.
    Shell,
    /// Existing file under the output directory.
    StaticFile(PathBuf),
    /// Nothing else matched; SPA fallback.
    Fallback,
}

impl Route {
    /// Short label for request logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Route::Api { .. } => "api",
            Route::WebSocket => "websocket",
            Route::Shell => "shell",
            Route::StaticFile(_) => "static",
            Route::Fallback => "fallback",
        }
    }
}

/// Decide how to answer `path`. First match wins:
///
/// 1. mock API route
/// 2. the WebSocket endpoint
/// 3. `/`, the admin prefix itself, or any path below it
/// 4. a regular file in the output directory
/// 5. the SPA fallback
pub async fn resolve_route(state: &DevState, path: &str) -> Route {
    if let Some((pattern, handler)) = state.routes().lookup(path) {
        return Route::Api {
            pattern: pattern.clone(),
            handler,
        };
    }

    let settings = state.settings();
    if path == settings.ws_path {
        return Route::WebSocket;
    }

    if path == "/" || is_under(path, &settings.admin_prefix) {
        return Route::Shell;
    }

    if let Some(file) = static_files::resolve(state.out_dir(), path).await {
        // The raw template must never be served with its markers intact.
        if file == state.shell_path() {
            return Route::Shell;
        }
        return Route::StaticFile(file);
    }

    Route::Fallback
}

/// `path` is `prefix` or lies below it on a segment boundary.
fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
