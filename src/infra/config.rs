use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::SecretString;

use super::InfraError;

const DEFAULT_SQLITE_PATH: &str = "waitlist.db";

/// Where waitlist rows are stored.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Networked relational store, e.g. a managed Postgres.
    Postgres { url: String },
    /// Local file (or any sqlx SQLite URL).
    Sqlite { url: String },
}

impl StorageBackend {
    /// Pick the backend from `DATABASE_URL`, falling back to a local SQLite file.
    pub fn from_settings(
        database_url: Option<&str>,
        sqlite_path: &str,
    ) -> Result<Self, InfraError> {
        let url = database_url.map(str::trim).filter(|u| !u.is_empty());

        match url {
            Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
                Ok(StorageBackend::Postgres {
                    url: url.to_string(),
                })
            }
            Some(url) if url.starts_with("sqlite:") => Ok(StorageBackend::Sqlite {
                url: url.to_string(),
            }),
            // Never echo the URL itself, it usually carries a password
            Some(_) => Err(InfraError::ConfigInvalid {
                var: "DATABASE_URL",
                reason: "must start with postgres://, postgresql:// or sqlite:".to_string(),
            }),
            None => Ok(StorageBackend::Sqlite {
                url: format!("sqlite://{sqlite_path}"),
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StorageBackend::Postgres { .. } => "postgres",
            StorageBackend::Sqlite { .. } => "sqlite",
        }
    }
}

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub db_max_connections: u32,
    /// When set, the entries listing requires `Authorization: Bearer <token>`.
    pub admin_token: Option<SecretString>,
    /// When unset, the request origin is mirrored back.
    pub cors_origin: Option<HeaderValue>,
    /// Download name for CSV exports.
    pub csv_filename: String,
    /// Optional path for structured JSON logs.
    pub log_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let mut bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8000)));
        if let Some(port) = optional_env("PORT") {
            let port: u16 = port.parse().map_err(|_| InfraError::ConfigInvalid {
                var: "PORT",
                reason: "must be a valid port number".to_string(),
            })?;
            bind_addr.set_port(port);
        }

        let sqlite_path: String =
            get_env_default("WAITLIST_DB_PATH", DEFAULT_SQLITE_PATH.to_string());
        let storage =
            StorageBackend::from_settings(optional_env("DATABASE_URL").as_deref(), &sqlite_path)?;
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 10);

        let admin_token = optional_env("ADMIN_TOKEN").map(|t| SecretString::new(t.into()));

        let cors_origin = optional_env("CORS_ORIGIN")
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| InfraError::ConfigInvalid {
                    var: "CORS_ORIGIN",
                    reason: "must be a valid header value".to_string(),
                })
            })
            .transpose()?;

        let csv_filename = parse_csv_filename(get_env_default(
            "CSV_FILENAME",
            "waitlist.csv".to_string(),
        ))?;
        let log_file = optional_env("LOG_FILE");

        Ok(Self {
            bind_addr,
            storage,
            db_max_connections,
            admin_token,
            cors_origin,
            csv_filename,
            log_file,
        })
    }
}

/// Unset and empty are treated the same.
fn optional_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The filename ends up inside a quoted Content-Disposition value.
fn parse_csv_filename(name: String) -> Result<String, InfraError> {
    let name = name.trim().to_string();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ');
    if valid {
        Ok(name)
    } else {
        Err(InfraError::ConfigInvalid {
            var: "CSV_FILENAME",
            reason: "must be printable ASCII without quotes or backslashes".to_string(),
        })
    }
}
