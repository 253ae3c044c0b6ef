//! Static development server with live reload via Server-Sent Events.
//!
//! Serves the output tree from disk. HTML responses get the reload client
//! injected before `</body>`; the client listens on `/__fob_sse__`.

use crate::config::ServerConfig;
use crate::dev::{ReloadEvent, SharedHub};
use crate::error::{CliError, Result};
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{sse::Event, sse::KeepAlive, IntoResponse, Response, Sse},
    routing::get,
    Router,
};
use rust_embed::RustEmbed;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};

pub const SSE_PATH: &str = "/__fob_sse__";
pub const RELOAD_SCRIPT_PATH: &str = "/__fob_reload__.js";
const RELOAD_SCRIPT_TAG: &str = r#"<script src="/__fob_reload__.js"></script>"#;

#[derive(RustEmbed)]
#[folder = "assets/dev"]
struct ClientAssets;

#[derive(Clone)]
struct ServerState {
    root: Arc<PathBuf>,
    hub: SharedHub,
}

/// Development server over the output directory.
pub struct DevServer {
    root: PathBuf,
    config: ServerConfig,
    hub: SharedHub,
}

impl DevServer {
    pub fn new(root: PathBuf, config: ServerConfig, hub: SharedHub) -> Self {
        Self { root, config, hub }
    }

    /// Bind the first free port at or above the configured one.
    ///
    /// Port `0` lets the OS pick.
    pub async fn bind(&self) -> Result<TcpListener> {
        bind_available(&self.config.host, self.config.port, self.config.port_attempts).await
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = local_addr(&listener)?;

        crate::ui::success(&format!("Development server running at http://{}", addr));
        tracing::info!(%addr, root = %self.root.display(), "serving");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))
    }

    fn router(self) -> Router {
        let state = ServerState {
            root: Arc::new(self.root),
            hub: self.hub,
        };

        Router::new()
            .route(SSE_PATH, get(handle_sse))
            .route(RELOAD_SCRIPT_PATH, get(handle_reload_script))
            .fallback(handle_request)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(state)
    }
}

/// Try `port`, `port + 1`, ... until one binds.
pub async fn bind_available(host: &str, port: u16, attempts: u16) -> Result<TcpListener> {
    let mut last_error = None;

    for offset in 0..attempts.max(1) {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        let addr = format!("{}:{}", host, candidate);

        match TcpListener::bind(&addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                tracing::debug!(%addr, error = %e, "port unavailable");
                last_error = Some(e);
            }
        }

        // The OS picks a free port; retrying is pointless.
        if port == 0 {
            break;
        }
    }

    Err(CliError::Server(format!(
        "No free port on {} in {}..{}: {}",
        host,
        port,
        port.saturating_add(attempts),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

async fn handle_sse(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let (id, rx) = state.hub.register_client();
    tracing::debug!(client = id, "client connected");
    state.hub.send_to(id, &ReloadEvent::Connected { id });

    let stream = ReceiverStream::new(rx).map(|data| Ok(Event::default().data(data)));

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)).text("ping"))
}

async fn handle_reload_script() -> Response {
    match ClientAssets::get("reload-client.js") {
        Some(file) => (
            [
                (header::CONTENT_TYPE, "application/javascript"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            file.data.into_owned(),
        )
            .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "Missing reload client").into_response(),
    }
}

async fn handle_request(State(state): State<ServerState>, uri: Uri) -> Response {
    let path = uri.path();

    let Some(mut file_path) = resolve_request_path(&state.root, path) else {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    };

    if file_path.is_dir() {
        file_path = file_path.join("index.html");
    }

    if !file_path.is_file() {
        if path == "/favicon.ico" {
            return StatusCode::NO_CONTENT.into_response();
        }
        return (StatusCode::NOT_FOUND, format!("File not found: {}", path)).into_response();
    }

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let content_type = determine_content_type(&file_path);
            let body = inject_reload_script(content, content_type);
            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            crate::ui::warning(&format!("Failed to read file {}: {}", file_path.display(), e));
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response()
        }
    }
}

/// Map a URL path onto `root`, refusing anything that would escape it.
fn resolve_request_path(root: &Path, url_path: &str) -> Option<PathBuf> {
    let relative = Path::new(url_path.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                if part.to_string_lossy().contains('\\') {
                    return None;
                }
                resolved.push(part);
            }
            Component::CurDir => {}
            _ => return None,
        }
    }

    Some(resolved)
}

/// Insert the reload client before the closing `</body>` of HTML responses.
fn inject_reload_script(content: Vec<u8>, content_type: &str) -> Vec<u8> {
    if !content_type.starts_with("text/html") {
        return content;
    }

    let html = String::from_utf8_lossy(&content);

    if let Some(pos) = html.rfind("</body>") {
        let mut result = String::with_capacity(html.len() + RELOAD_SCRIPT_TAG.len() + 4);
        result.push_str(&html[..pos]);
        result.push_str(RELOAD_SCRIPT_TAG);
        result.push('\n');
        result.push_str(&html[pos..]);
        return result.into_bytes();
    }

    let mut result = html.into_owned();
    result.push('\n');
    result.push_str(RELOAD_SCRIPT_TAG);
    result.into_bytes()
}

fn determine_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// Address the server would report for `listener`.
pub fn local_addr(listener: &TcpListener) -> Result<SocketAddr> {
    listener
        .local_addr()
        .map_err(|e| CliError::Server(format!("Failed to read bound address: {}", e)))
}
