//! Server settings loaded via OrthoConfig, and the assembled server config.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use backend::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_HOST: &str = "0.0.0.0";

/// Runtime settings read from `COMICS_*` environment variables, CLI flags or
/// a configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMICS")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Seconds to wait for a pooled connection before failing a request.
    #[ortho_config(default = 30)]
    pub db_connect_timeout_secs: u64,
    /// JSON file of users provisioned at startup.
    pub seed_users: Option<PathBuf>,
    /// Comma-separated origins allowed to call the API; any origin when unset.
    pub cors_allowed_origins: Option<String>,
}

impl ServerSettings {
    /// Return the configured host, falling back to every interface.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path of the user seed file, if one is configured.
    pub fn seed_users(&self) -> Option<&Path> {
        self.seed_users.as_deref()
    }

    /// Origins granted cross-origin access. Empty means every origin.
    pub fn cors_allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve the socket address to bind.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the host is not an IP address.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let host = self.host();
        host.parse()
            .map(|ip| SocketAddr::new(ip, self.port()))
            .map_err(|err| std::io::Error::other(format!("invalid bind host {host}: {err}")))
    }

    /// Pool settings for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_deref().map(|url| {
            PoolConfig::new(url)
                .with_max_size(self.db_max_connections)
                .with_connection_timeout(Duration::from_secs(self.db_connect_timeout_secs))
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seed_users: Option<PathBuf>,
    pub(crate) cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            seed_users: None,
            cors_allowed_origins: Vec::new(),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the server runs on in-memory stores.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Restrict cross-origin access to `origins`; empty admits every origin.
    #[must_use]
    pub fn with_cors_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_allowed_origins = origins;
        self
    }

    /// Provision the users listed in `path` before serving.
    #[must_use]
    pub fn with_seed_users(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_users = Some(path.into());
        self
    }
}
