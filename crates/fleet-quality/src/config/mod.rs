use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::quality::AlertSettings;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub quality: QualityConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            quality: QualityConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Engine seed and the default alerting preferences for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityConfig {
    pub seed: u64,
    pub alerts: AlertSettings,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            alerts: AlertSettings::default(),
        }
    }
}

impl QualityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let seed = match env::var("QUALITY_SEED") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidSeed)?,
            Err(_) => defaults.seed,
        };

        let alert_threshold = match env::var("QUALITY_ALERT_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| (0.0..=100.0).contains(value))
                .ok_or(ConfigError::InvalidAlertThreshold)?,
            Err(_) => defaults.alerts.alert_threshold,
        };

        Ok(Self {
            seed,
            alerts: AlertSettings {
                enable_real_time_checks: flag(
                    "QUALITY_REAL_TIME_CHECKS",
                    defaults.alerts.enable_real_time_checks,
                )?,
                alert_threshold,
                auto_refresh: flag("QUALITY_AUTO_REFRESH", defaults.alerts.auto_refresh)?,
            },
        })
    }
}

fn flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSeed,
    InvalidAlertThreshold,
    InvalidFlag { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSeed => write!(f, "QUALITY_SEED must be a valid u64"),
            ConfigError::InvalidAlertThreshold => {
                write!(f, "QUALITY_ALERT_THRESHOLD must be a number between 0 and 100")
            }
            ConfigError::InvalidFlag { name } => write!(f, "{name} must be true or false"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "QUALITY_SEED",
            "QUALITY_ALERT_THRESHOLD",
            "QUALITY_REAL_TIME_CHECKS",
            "QUALITY_AUTO_REFRESH",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.quality, QualityConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_quality_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUALITY_SEED", "7");
        env::set_var("QUALITY_ALERT_THRESHOLD", "90");
        env::set_var("QUALITY_REAL_TIME_CHECKS", "off");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.quality.seed, 7);
        assert_eq!(config.quality.alerts.alert_threshold, 90.0);
        assert!(!config.quality.alerts.enable_real_time_checks);
        assert!(config.quality.alerts.auto_refresh);
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUALITY_ALERT_THRESHOLD", "140");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidAlertThreshold)
        ));
        reset_env();
    }

    #[test]
    fn rejects_unparseable_flags() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUALITY_AUTO_REFRESH", "sometimes");
        match AppConfig::load() {
            Err(ConfigError::InvalidFlag { name }) => assert_eq!(name, "QUALITY_AUTO_REFRESH"),
            other => panic!("expected invalid flag, got {other:?}"),
        }
        reset_env();
    }
}
