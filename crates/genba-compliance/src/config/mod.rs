use crate::workflows::genba::scoring::{
    ScoreRounding, ScoringPolicy, DEFAULT_PRODUCTION_DEPARTMENT,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Search debounce observed on the dashboard list views.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

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
    pub compliance: ComplianceConfig,
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
            compliance: ComplianceConfig::from_env()?,
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

/// Scoring dials shared by every compliance view.
#[derive(Debug, Clone)]
pub struct ComplianceConfig {
    pub production_department: String,
    pub rounding: ScoreRounding,
    pub search_debounce: Duration,
}

impl ComplianceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let production_department = env::var("GENBA_PRODUCTION_DEPARTMENT")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_PRODUCTION_DEPARTMENT.to_string());

        let rounding = match env::var("GENBA_SCORE_ROUNDING") {
            Ok(raw) => ScoreRounding::parse(&raw).ok_or(ConfigError::InvalidRounding(raw))?,
            Err(_) => ScoreRounding::default(),
        };

        let debounce_ms = match env::var("GENBA_SEARCH_DEBOUNCE_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDebounce(raw))?,
            Err(_) => DEFAULT_SEARCH_DEBOUNCE_MS,
        };

        Ok(Self {
            production_department,
            rounding,
            search_debounce: Duration::from_millis(debounce_ms),
        })
    }

    pub fn policy(&self) -> ScoringPolicy {
        ScoringPolicy::new(self.production_department.clone(), self.rounding)
    }
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            production_department: DEFAULT_PRODUCTION_DEPARTMENT.to_string(),
            rounding: ScoreRounding::default(),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRounding(String),
    InvalidDebounce(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRounding(value) => write!(
                f,
                "GENBA_SCORE_ROUNDING must be one of floor, nearest, one_decimal (found '{value}')"
            ),
            ConfigError::InvalidDebounce(value) => write!(
                f,
                "GENBA_SEARCH_DEBOUNCE_MS must be a whole number of milliseconds (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRounding(_)
            | ConfigError::InvalidDebounce(_) => None,
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
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("GENBA_PRODUCTION_DEPARTMENT");
        env::remove_var("GENBA_SCORE_ROUNDING");
        env::remove_var("GENBA_SEARCH_DEBOUNCE_MS");
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
        assert_eq!(config.compliance.production_department, "Production");
        assert_eq!(config.compliance.rounding, ScoreRounding::Nearest);
        assert_eq!(config.compliance.search_debounce, Duration::from_millis(300));
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
    fn reads_compliance_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("GENBA_PRODUCTION_DEPARTMENT", "Assembly");
        env::set_var("GENBA_SCORE_ROUNDING", "floor");
        env::set_var("GENBA_SEARCH_DEBOUNCE_MS", "150");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.compliance.production_department, "Assembly");
        assert_eq!(config.compliance.rounding, ScoreRounding::Floor);
        assert_eq!(config.compliance.search_debounce, Duration::from_millis(150));
        assert!(config.compliance.policy().is_production("Assembly"));
        reset_env();
    }

    #[test]
    fn rejects_unknown_rounding_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("GENBA_SCORE_ROUNDING", "banker");
        match AppConfig::load() {
            Err(ConfigError::InvalidRounding(value)) => assert_eq!(value, "banker"),
            other => panic!("expected rounding error, got {other:?}"),
        }
        reset_env();
    }
}
