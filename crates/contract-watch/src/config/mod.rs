//! Runtime settings read from the process environment (and `.env`, if any).

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub reminders: ReminderConfig,
}

impl AppConfig {
    /// Reads `APP_ENV`, `APP_HOST`, `APP_PORT`, `APP_LOG_LEVEL` and
    /// `APP_REMINDER_SWEEP_SECS`. Unset or blank variables take defaults.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = read_var("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or_default();

        let host = read_var("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match read_var("APP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let log_level =
            read_var("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let sweep_interval = read_var("APP_REMINDER_SWEEP_SECS")
            .map(|raw| parse_sweep_interval(&raw))
            .transpose()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            reminders: ReminderConfig { sweep_interval },
        })
    }
}

fn read_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_sweep_interval(raw: &str) -> Result<Duration, ConfigError> {
    raw.parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidSweepInterval(raw.to_string()))
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Background reminder sweep. `None` leaves dispatch to the HTTP trigger.
#[derive(Debug, Clone, Default)]
pub struct ReminderConfig {
    pub sweep_interval: Option<Duration>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),
    #[error("APP_HOST '{host}' is neither localhost nor an IP address")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("APP_REMINDER_SWEEP_SECS must be a positive number of seconds, got '{0}'")]
    InvalidSweepInterval(String),
}
