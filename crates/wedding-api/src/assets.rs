use std::io::ErrorKind;
use std::path::PathBuf;

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

/// Subdirectories of the front-end served verbatim when present.
pub const STATIC_SUBDIRS: [&str; 3] = ["css", "js", "images"];

const INDEX_MISSING: &str = "<h1>Error: index.html not found.</h1>";

/// The companion front-end bundle. Its layout is checked once at startup;
/// a missing directory only disables the pages, never the API.
#[derive(Debug, Clone)]
pub struct Frontend {
    dir: PathBuf,
    subdirs: Vec<&'static str>,
}

impl Frontend {
    pub fn discover(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();

        if !dir.is_dir() {
            warn!(
                "Frontend directory not found at {}; only /api routes will be served",
                dir.display()
            );
            return Self {
                dir,
                subdirs: Vec::new(),
            };
        }

        info!("Serving frontend from {}", dir.display());
        let subdirs = STATIC_SUBDIRS
            .into_iter()
            .filter(|sub| {
                let present = dir.join(sub).is_dir();
                if !present {
                    warn!("Frontend subdirectory '{}' not found in {}", sub, dir.display());
                }
                present
            })
            .collect();

        Self { dir, subdirs }
    }

    /// Subdirectories that were found and are mounted.
    pub fn mounted(&self) -> &[&'static str] {
        &self.subdirs
    }

    pub fn routes(&self) -> Router {
        let index_dir = self.dir.clone();
        let favicon_dir = self.dir.clone();

        let mut router = Router::new()
            .route("/", get(move || serve_index(index_dir.clone())))
            .route("/favicon.ico", get(move || serve_favicon(favicon_dir.clone())));

        for sub in &self.subdirs {
            let service = ServeDir::new(self.dir.join(sub))
                .not_found_service(crate::not_found.into_service());
            router = router.nest_service(&format!("/{sub}"), service);
        }

        router
    }
}

/// Read on every request so edits to the page show up without a restart.
async fn serve_index(dir: PathBuf) -> Response {
    let path = dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Html(content).into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("{} not found", path.display());
            (StatusCode::NOT_FOUND, Html(INDEX_MISSING)).into_response()
        }
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Error: index.html could not be read.</h1>"),
            )
                .into_response()
        }
    }
}

/// A missing favicon answers 204 so browsers don't log a 404 on every visit.
async fn serve_favicon(dir: PathBuf) -> Response {
    match tokio::fs::read(dir.join("favicon.ico")).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/x-icon")], bytes).into_response(),
        Err(e) => {
            debug!("No favicon served: {}", e);
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
