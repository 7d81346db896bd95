use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::{HeaderValue, Method};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const HOST: &str = "WEDDING_HOST";
pub const PORT: &str = "WEDDING_PORT";
pub const FRONTEND_DIR: &str = "WEDDING_FRONTEND_DIR";
pub const CORS_ORIGINS: &str = "WEDDING_CORS_ORIGINS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set; point it at the database, e.g. DATABASE_URL=sqlite://wedding.db")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub addr: SocketAddr,
    pub frontend_dir: PathBuf,
    /// `None` allows every origin.
    pub cors_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL))?;

        let host = lookup(HOST).unwrap_or_else(|| "0.0.0.0".into());
        let port = lookup(PORT).unwrap_or_else(|| "8000".into());
        let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
            var: PORT,
            value: port.clone(),
        })?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                var: HOST,
                value: host.clone(),
            })?;

        let frontend_dir = lookup(FRONTEND_DIR)
            .unwrap_or_else(|| "frontend".into())
            .into();

        let cors_origins = lookup(CORS_ORIGINS)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty());

        if let Some(origins) = &cors_origins {
            if let Some(bad) = origins.iter().find(|o| HeaderValue::from_str(o).is_err()) {
                return Err(ConfigError::Invalid {
                    var: CORS_ORIGINS,
                    value: bad.clone(),
                });
            }
        }

        Ok(Self {
            database_url,
            addr,
            frontend_dir,
            cors_origins,
        })
    }

    pub fn cors_layer(&self) -> CorsLayer {
        match &self.cors_origins {
            None => CorsLayer::permissive(),
            Some(origins) => {
                let origins: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|o| HeaderValue::from_str(o).ok())
                    .collect();
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers(Any)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn database_url_required() {
        assert!(matches!(config(&[]), Err(ConfigError::Missing(DATABASE_URL))));
        assert!(matches!(
            config(&[(DATABASE_URL, "  ")]),
            Err(ConfigError::Missing(DATABASE_URL))
        ));
    }

    #[test]
    fn defaults() {
        let cfg = config(&[(DATABASE_URL, "sqlite://wedding.db")]).unwrap();
        assert_eq!(cfg.database_url, "sqlite://wedding.db");
        assert_eq!(cfg.addr, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(cfg.frontend_dir, PathBuf::from("frontend"));
        assert_eq!(cfg.cors_origins, None);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            (DATABASE_URL, "sqlite://wedding.db"),
            (HOST, "127.0.0.1"),
            (PORT, "3000"),
            (FRONTEND_DIR, "/srv/wedding"),
            (CORS_ORIGINS, "https://example.com, https://www.example.com,"),
        ])
        .unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cfg.frontend_dir, PathBuf::from("/srv/wedding"));
        assert_eq!(
            cfg.cors_origins,
            Some(vec![
                "https://example.com".to_string(),
                "https://www.example.com".to_string()
            ])
        );
    }

    #[test]
    fn bad_port() {
        let err = config(&[(DATABASE_URL, "sqlite://wedding.db"), (PORT, "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: PORT, .. }));
    }

    async fn allowed_origin(cfg: &Config, origin: &str) -> Option<String> {
        let app: Router = Router::new()
            .route("/api", get(|| async { "ok" }))
            .layer(cfg.cors_layer());
        let resp = app
            .oneshot(
                Request::get("/api")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn permissive_cors_by_default() {
        let cfg = config(&[(DATABASE_URL, "sqlite://wedding.db")]).unwrap();
        assert_eq!(
            allowed_origin(&cfg, "https://anywhere.test").await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn restricted_cors_origins() {
        let cfg = config(&[
            (DATABASE_URL, "sqlite://wedding.db"),
            (CORS_ORIGINS, "https://example.com"),
        ])
        .unwrap();
        assert_eq!(
            allowed_origin(&cfg, "https://example.com").await.as_deref(),
            Some("https://example.com")
        );
        assert_eq!(allowed_origin(&cfg, "https://evil.test").await, None);
    }
}
