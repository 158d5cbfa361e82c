//! Course site HTTP server lifecycle.
//!
//! [`start_server`] binds a TCP port and serves until the process ends.

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::content_type_for;

const NOT_FOUND_PAGE: &str = "<h1>404 Not Found</h1>";
const SERVER_ERROR_PAGE: &str = "<h1>500 Internal Server Error</h1>";

/// Build the router serving files under `root`.
pub fn build_router(root: PathBuf) -> Router {
    Router::new()
        .fallback(serve_file)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(root))
}

async fn serve_file(State(root): State<Arc<PathBuf>>, uri: Uri) -> Response {
    let request_path = match uri.path() {
        "/" => "/index.html",
        other => other,
    };
    let Some(file) = resolve(&root, request_path) else {
        return not_found();
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type_for(&file))], bytes).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => not_found(),
        Err(e) => {
            warn!(path = %file.display(), error = %e, "failed to read site file");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
        }
    }
}

/// Map a request path onto `root`. Paths that try to leave the root are
/// rejected.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut file = root.to_path_buf();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => file.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(file)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
}

/// Start the course site server.
///
/// # Errors
///
/// Returns an error if the address is invalid, the listener cannot bind,
/// or the server hits a fatal I/O error.
pub async fn start_server(host: &str, port: u16, root: PathBuf) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(root.clone());

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, root = %root.display(), "course site listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    Ok(())
}

/// Errors that can occur when starting or running the site server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bind error: {0}")]
    Bind(String),

    #[error("serve error: {0}")]
    Serve(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_stays_under_root() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve(root, "/css/app.css"),
            Some(PathBuf::from("/srv/site/css/app.css"))
        );
        assert_eq!(
            resolve(root, "/./index.html"),
            Some(PathBuf::from("/srv/site/index.html"))
        );
        assert_eq!(resolve(root, "/../etc/passwd"), None);
        assert_eq!(resolve(root, "/a/../../b"), None);
    }

    #[tokio::test]
    async fn invalid_host_is_a_bind_error() {
        let err = start_server("not a host", 8000, PathBuf::from("."))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Bind(_)));
    }
}
