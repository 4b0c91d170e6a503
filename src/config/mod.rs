use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::certification::{
    ModelConfig, ValidityConfig, WindowLength, WorkbookLayout, ALLOWED_SCHOOLS,
};

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

    /// Log level applied when `APP_LOG_LEVEL` is unset.
    pub fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Test | Self::Production => "info",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub model: ModelConfig,
    pub validity: ValidityConfig,
    pub workbook: WorkbookLayout,
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

        let log_level = env::var("APP_LOG_LEVEL")
            .unwrap_or_else(|_| environment.default_log_level().to_string());

        let model = ModelConfig {
            api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            max_output_tokens: parse_env_number("GEMINI_MAX_OUTPUT_TOKENS", 8192)?,
            timeout_seconds: parse_env_number("GEMINI_TIMEOUT_SECONDS", 60)?,
            allowed_schools: ALLOWED_SCHOOLS.iter().map(|school| school.to_string()).collect(),
        };

        // Observed rule tables disagree on the NR33 window, so the duration
        // is an explicit deployment choice.
        let nr33_window = match env::var("NR33_WINDOW") {
            Err(_) => WindowLength::OneYear,
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "annual" | "anual" | "1y" | "1" => WindowLength::OneYear,
                "biennial" | "bienal" | "2y" | "2" => WindowLength::TwoYears,
                _ => return Err(ConfigError::InvalidNr33Window { value }),
            },
        };

        let workbook = WorkbookLayout {
            document_column: parse_env_number("RULES_DOCUMENT_COLUMN", 0)?,
            criteria_column: parse_env_number("RULES_CRITERIA_COLUMN", 2)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            model,
            validity: ValidityConfig { nr33_window },
            workbook,
        })
    }
}

fn parse_env_number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
    InvalidNr33Window { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative number, got '{value}'")
            }
            ConfigError::InvalidNr33Window { value } => {
                write!(f, "NR33_WINDOW must be 'annual' or 'biennial', got '{value}'")
            }
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
            "GEMINI_API_KEY",
            "GEMINI_MODEL",
            "GEMINI_MAX_OUTPUT_TOKENS",
            "GEMINI_TIMEOUT_SECONDS",
            "NR33_WINDOW",
            "RULES_DOCUMENT_COLUMN",
            "RULES_CRITERIA_COLUMN",
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
        assert_eq!(config.telemetry.log_level, "debug");
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert_eq!(config.model.max_output_tokens, 8192);
        assert_eq!(config.validity.nr33_window, WindowLength::OneYear);
        assert_eq!(config.workbook.document_column, 0);
        assert_eq!(config.workbook.criteria_column, 2);
    }

    #[test]
    fn nr33_window_accepts_biennial_and_rejects_noise() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("NR33_WINDOW", "biennial");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.validity.nr33_window, WindowLength::TwoYears);

        env::set_var("NR33_WINDOW", "monthly");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNr33Window { .. })
        ));
        env::remove_var("NR33_WINDOW");
    }

    #[test]
    fn log_level_default_follows_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.telemetry.log_level, "info");

        env::set_var("APP_LOG_LEVEL", "trace");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.telemetry.log_level, "trace");
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        env::remove_var("APP_HOST");
    }
}
