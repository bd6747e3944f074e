//! # Configuration
//!
//! Runtime configuration read from environment variables at startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `8080` |
//! | `DATABASE_URL` | unset |
//! | `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD` | `localhost`, `5432`, `employee_tracker`, `postgres`, empty |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `STATIC_DIR` | `public` |
//! | `ADMIN_USERNAME`, `ADMIN_PASSWORD`, `ADMIN_NAME` | unset |
//!
//! `DATABASE_URL` wins when set. Otherwise connect options are built from
//! the `DB_*` parts, but only if `DB_HOST` or `DB_PASSWORD` is present; with
//! neither, the service runs against the in-memory store. The parts are set
//! field by field, so a password may contain any character.

use std::path::PathBuf;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Configuration errors, reported before the server starts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("{var} must be a number, got \"{value}\"")]
    InvalidNumber { var: &'static str, value: String },

    /// `DATABASE_URL` could not be parsed as a PostgreSQL URL.
    #[error("DATABASE_URL is not a valid PostgreSQL URL: {0}")]
    InvalidDatabaseUrl(String),
}

/// Where records are kept.
#[derive(Clone)]
pub enum DatabaseConfig {
    /// PostgreSQL with the given connect options.
    Postgres {
        options: PgConnectOptions,
        max_connections: u32,
    },
    /// Process-local store. State is lost on restart.
    InMemory,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres {
                options,
                max_connections,
            } => f
                .debug_struct("Postgres")
                .field("host", &options.get_host())
                .field("port", &options.get_port())
                .field("database", &options.get_database())
                .field("password", &"[REDACTED]")
                .field("max_connections", max_connections)
                .finish(),
            Self::InMemory => f.write_str("InMemory"),
        }
    }
}

/// Administrator account created at startup if it does not exist yet.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    pub database: DatabaseConfig,
    /// Directory holding the front-end (`index.html` and assets).
    pub static_dir: PathBuf,
    pub admin: Option<AdminSeed>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database: DatabaseConfig::InMemory,
            static_dir: PathBuf::from("public"),
            admin: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup. Empty values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_number(&get, "PORT", 8080u16)?;
        let max_connections = parse_number(&get, "DB_MAX_CONNECTIONS", 10u32)?;

        let database = if let Some(url) = get("DATABASE_URL") {
            let options = PgConnectOptions::from_str(url.trim())
                .map_err(|e| ConfigError::InvalidDatabaseUrl(e.to_string()))?;
            DatabaseConfig::Postgres {
                options,
                max_connections,
            }
        } else if get("DB_HOST").is_some() || get("DB_PASSWORD").is_some() {
            let host = get("DB_HOST").unwrap_or_else(|| "localhost".to_string());
            let db_port = parse_number(&get, "DB_PORT", 5432u16)?;
            let name = get("DB_NAME").unwrap_or_else(|| "employee_tracker".to_string());
            let user = get("DB_USER").unwrap_or_else(|| "postgres".to_string());
            let mut options = PgConnectOptions::new_without_pgpass()
                .host(&host)
                .port(db_port)
                .username(&user)
                .database(&name);
            if let Some(password) = lookup("DB_PASSWORD") {
                options = options.password(&password);
            }
            DatabaseConfig::Postgres {
                options,
                max_connections,
            }
        } else {
            DatabaseConfig::InMemory
        };

        let admin = match (get("ADMIN_USERNAME"), get("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminSeed {
                name: get("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                username,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            port,
            database,
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            admin,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    fn postgres(cfg: &AppConfig) -> (&PgConnectOptions, u32) {
        match &cfg.database {
            DatabaseConfig::Postgres {
                options,
                max_connections,
            } => (options, *max_connections),
            DatabaseConfig::InMemory => panic!("expected a Postgres config"),
        }
    }

    #[test]
    fn defaults_to_in_memory_on_8080() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert!(matches!(cfg.database, DatabaseConfig::InMemory));
        assert_eq!(cfg.static_dir, PathBuf::from("public"));
        assert!(cfg.admin.is_none());
    }

    #[test]
    fn database_url_wins() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://u:p@db:6543/x"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        let (options, max_connections) = postgres(&cfg);
        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "u");
        assert_eq!(options.get_database(), Some("x"));
        assert_eq!(max_connections, 10);
    }

    #[test]
    fn invalid_database_url_is_an_error() {
        let err = config(&[("DATABASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDatabaseUrl(_)));
    }

    #[test]
    fn options_built_from_parts() {
        let cfg = config(&[("DB_PASSWORD", "pw"), ("DB_MAX_CONNECTIONS", "4")]).unwrap();
        let (options, max_connections) = postgres(&cfg);
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "postgres");
        assert_eq!(options.get_database(), Some("employee_tracker"));
        assert_eq!(max_connections, 4);
    }

    #[test]
    fn password_with_url_delimiters_keeps_host_and_database() {
        let cfg = config(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "tracker"),
            ("DB_PASSWORD", "p@ss#word/:?"),
        ])
        .unwrap();
        let (options, _) = postgres(&cfg);
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "tracker");
        assert_eq!(options.get_database(), Some("employee_tracker"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: "PORT",
                value: "eighty".into()
            }
        );
    }

    #[test]
    fn admin_requires_username_and_password() {
        assert!(config(&[("ADMIN_USERNAME", "root")]).unwrap().admin.is_none());
        let cfg = config(&[("ADMIN_USERNAME", "root"), ("ADMIN_PASSWORD", "pw")]).unwrap();
        let admin = cfg.admin.unwrap();
        assert_eq!(admin.username, "root");
        assert_eq!(admin.name, "Administrator");
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://u:topsecret@db/x"),
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_PASSWORD", "hunter2"),
        ])
        .unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("topsecret"));
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("REDACTED"));
    }
}
