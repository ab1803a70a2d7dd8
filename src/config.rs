//! Configuration module
//!
//! The service reads a single TOML file. Every section has defaults, so an
//! empty or missing file yields a working SQLite setup:
//!
//! ```toml
//! [server]
//! api_host = "0.0.0.0"
//! api_port = 8080
//!
//! [database]
//! url = "sqlite://./roomescape.db?mode=rwc"
//! pool_size = 5
//!
//! [booking]
//! slot_scope = "per_theme"      # or "global"
//! delete_mode = "return_count"  # or "require_existing"
//!
//! [[themes]]
//! name = "Haunted Manor"
//! description = "Escape before midnight"
//! price = 29000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::application::DeleteMode;
use crate::domain::SlotScope;
use crate::infrastructure::DatabaseConfig;

/// Environment variable pointing at the config file
pub const CONFIG_ENV: &str = "ROOMESCAPE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// `~/.config/roomescape/config.toml` (platform equivalent elsewhere)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roomescape")
        .join("config.toml")
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub booking: BookingSection,
    pub logging: LoggingSection,
    /// Themes created on startup when no theme with the same name exists
    pub themes: Vec<ThemeSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
    /// Upper bound for handling one HTTP request
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Connection endpoint, e.g. `sqlite://./roomescape.db?mode=rwc`
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub pool_size: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./roomescape.db?mode=rwc".to_string(),
            username: None,
            password: None,
            pool_size: 5,
            connect_timeout_secs: 5,
            acquire_timeout_secs: 5,
        }
    }
}

impl DatabaseSection {
    /// Endpoint with credentials applied, unless the URL already carries
    /// its own user info. Credentials are percent-encoded; an endpoint that
    /// cannot hold user info is returned unchanged.
    pub fn connection_url(&self) -> String {
        let Some(user) = self.username.as_deref().filter(|u| !u.is_empty()) else {
            return self.url.clone();
        };
        let Ok(mut url) = Url::parse(&self.url) else {
            return self.url.clone();
        };
        if !url.username().is_empty() || url.password().is_some() {
            return self.url.clone();
        }
        if url.set_username(user).is_err() {
            return self.url.clone();
        }
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            if url.set_password(Some(password)).is_err() {
                return self.url.clone();
            }
        }
        url.to_string()
    }
}

impl From<&DatabaseSection> for DatabaseConfig {
    fn from(section: &DatabaseSection) -> Self {
        Self {
            url: section.connection_url(),
            pool_size: section.pool_size,
            connect_timeout: Duration::from_secs(section.connect_timeout_secs),
            acquire_timeout: Duration::from_secs(section.acquire_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSection {
    pub slot_scope: SlotScope,
    pub delete_mode: DeleteMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `tracing_subscriber::EnvFilter` directive, e.g. "info,sqlx=warn"
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSeed {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: i32,
}

impl AppConfig {
    /// Load configuration from `path`. A missing file yields the defaults.
    /// `DATABASE_URL` overrides `database.url`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url must not be empty".into()));
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::Invalid("database.pool_size must be at least 1".into()));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be at least 1".into(),
            ));
        }
        for seed in &self.themes {
            if seed.name.trim().is_empty() {
                return Err(ConfigError::Invalid("themes[].name must not be blank".into()));
            }
            if seed.price < 0 {
                return Err(ConfigError::Invalid(format!(
                    "themes[{}].price must not be negative",
                    seed.name
                )));
            }
        }
        Ok(())
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.database.pool_size, 5);
        assert_eq!(cfg.booking.slot_scope, SlotScope::Global);
        assert_eq!(cfg.booking.delete_mode, DeleteMode::ReturnCount);
        assert_eq!(cfg.logging.format, LogFormat::Pretty);
        assert!(cfg.themes.is_empty());
    }

    #[test]
    fn parses_full_file() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9090

            [database]
            url = "postgres://db:5432/rooms"
            username = "app"
            password = "pw"
            pool_size = 10

            [booking]
            slot_scope = "per_theme"
            delete_mode = "require_existing"

            [logging]
            level = "debug"
            format = "json"

            [[themes]]
            name = "Haunted Manor"
            price = 29000
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.api_port, 9090);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.database.connection_url(), "postgres://app:pw@db:5432/rooms");
        assert_eq!(cfg.booking.slot_scope, SlotScope::PerTheme);
        assert_eq!(cfg.booking.delete_mode, DeleteMode::RequireExisting);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.themes[0].description, "");
        assert_eq!(cfg.themes[0].price, 29000);
    }

    #[test]
    fn connection_url_keeps_existing_userinfo() {
        let section = DatabaseSection {
            url: "postgres://owner:x@db/rooms".into(),
            username: Some("app".into()),
            ..DatabaseSection::default()
        };
        assert_eq!(section.connection_url(), "postgres://owner:x@db/rooms");

        let no_password = DatabaseSection {
            url: "postgres://db/rooms".into(),
            username: Some("app".into()),
            ..DatabaseSection::default()
        };
        assert_eq!(no_password.connection_url(), "postgres://app@db/rooms");
    }

    #[test]
    fn connection_url_encodes_reserved_characters() {
        let section = DatabaseSection {
            url: "postgres://db:5432/rooms".into(),
            username: Some("ops@corp".into()),
            password: Some("p@ss:w/rd".into()),
            ..DatabaseSection::default()
        };
        assert_eq!(
            section.connection_url(),
            "postgres://ops%40corp:p%40ss%3Aw%2Frd@db:5432/rooms"
        );

        let opaque = DatabaseSection {
            url: "sqlite::memory:".into(),
            username: Some("app".into()),
            ..DatabaseSection::default()
        };
        assert_eq!(opaque.connection_url(), "sqlite::memory:");
    }

    #[test]
    fn database_config_from_section() {
        let section = DatabaseSection {
            pool_size: 3,
            acquire_timeout_secs: 2,
            ..DatabaseSection::default()
        };
        let db = DatabaseConfig::from(&section);
        assert_eq!(db.pool_size, 3);
        assert_eq!(db.acquire_timeout, Duration::from_secs(2));
    }

    #[test]
    fn rejects_negative_seed_price() {
        let cfg = AppConfig::from_toml(
            r#"
            [[themes]]
            name = "Cheap"
            price = -5
            "#,
        )
        .unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\napi_port = 7000").unwrap();

        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.server.api_port, 7000);
    }

    #[test]
    fn load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\napi_port = ").unwrap();

        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
