//! Configuration module
//!
//! Application settings read from a TOML file
//! (`~/.config/campus-reservations/config.toml` by default). Every section
//! and field is optional; anything left out falls back to its default.
//!
//! ```toml
//! [server]
//! api_port = 8080
//!
//! [database]
//! backend = "sqlite"
//!
//! [schedule]
//! opens_at = "11:00"
//! closes_at = "15:00"
//! slot_minutes = 30
//! operating_days = ["Mon", "Tue", "Wed", "Thu", "Fri"]
//! closed_dates = ["2026-12-25"]
//!
//! [reservations]
//! fleet_size = 5
//! ```

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ServiceSchedule, TableFleet};
use crate::infrastructure::DatabaseConfig;

const APP_DIR: &str = "campus-reservations";

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default config file location: `<config dir>/campus-reservations/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

fn default_database_path() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("reservations.db")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub schedule: ScheduleConfig,
    pub reservations: ReservationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds allowed for in-flight requests to drain on shutdown
    pub shutdown_timeout: u64,
    /// Seconds before a request is answered with 408
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    /// Process-local store; reservations are lost on restart
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    /// SQLite file. Ignored when `url` is set.
    pub path: PathBuf,
    /// Full connection URL, e.g. `sqlite://./reservations.db?mode=rwc`
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: default_database_path(),
            url: None,
            max_connections: 5,
            connect_timeout_secs: 10,
        }
    }
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", self.path.display()),
        }
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.connection_url(),
            max_connections: self.max_connections,
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Venue-local "HH:MM"
    pub opens_at: String,
    /// Venue-local "HH:MM"
    pub closes_at: String,
    pub slot_minutes: u32,
    pub operating_days: Vec<Weekday>,
    pub closed_dates: Vec<NaiveDate>,
    /// Venue offset from UTC in minutes (e.g. 330 for UTC+05:30)
    pub utc_offset_minutes: i32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            opens_at: "11:00".to_string(),
            closes_at: "15:00".to_string(),
            slot_minutes: 30,
            operating_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            closed_dates: Vec::new(),
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationsConfig {
    /// Tables are numbered 1..=fleet_size
    pub fleet_size: u32,
    /// Dates scanned by next-available, the origin date included
    pub next_available_horizon_days: u32,
}

impl Default for ReservationsConfig {
    fn default() -> Self {
        Self {
            fleet_size: 5,
            next_available_horizon_days: 7,
        }
    }
}

fn parse_time(field: &str, raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ConfigError::Invalid(format!("schedule.{field} must be HH:MM, got '{raw}'")))
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Config file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reservations.fleet_size == 0 {
            return Err(ConfigError::Invalid(
                "reservations.fleet_size must be at least 1".into(),
            ));
        }
        if self.reservations.next_available_horizon_days == 0 {
            return Err(ConfigError::Invalid(
                "reservations.next_available_horizon_days must be at least 1".into(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be at least 1".into(),
            ));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"text\" or \"json\", got '{}'",
                self.logging.format
            )));
        }
        self.to_schedule().map(|_| ())
    }

    /// Build the service schedule described by `[schedule]`
    pub fn to_schedule(&self) -> Result<ServiceSchedule, ConfigError> {
        let s = &self.schedule;
        let offset = FixedOffset::east_opt(s.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "schedule.utc_offset_minutes out of range: {}",
                s.utc_offset_minutes
            ))
        })?;

        ServiceSchedule::new(
            parse_time("opens_at", &s.opens_at)?,
            parse_time("closes_at", &s.closes_at)?,
            s.slot_minutes,
            s.operating_days.clone(),
            s.closed_dates.clone(),
            offset,
        )
        .map_err(|e| ConfigError::Invalid(format!("schedule: {e}")))
    }

    pub fn fleet(&self) -> TableFleet {
        TableFleet::numbered(self.reservations.fleet_size)
    }
}
