use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use dishpicker_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_SESSION_IDLE_MINUTES: i64 = 60;

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCommand {
    Serve,
    Migrate,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub command: ApiCommand,
    pub database_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub session_idle_minutes: i64,
    pub dev_seed: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let command = match env::args().nth(1).as_deref() {
            None | Some("serve") => ApiCommand::Serve,
            Some("migrate") => ApiCommand::Migrate,
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "unknown command '{other}', expected 'serve' or 'migrate'"
                )));
            }
        };

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let session_idle_minutes = match env::var("SESSION_IDLE_MINUTES") {
            Ok(value) => parse_idle_minutes(&value)?,
            Err(_) => DEFAULT_SESSION_IDLE_MINUTES,
        };

        Ok(Self {
            command,
            database_url,
            frontend_url,
            api_host,
            api_port,
            cookie_secure: flag_env("SESSION_COOKIE_SECURE"),
            session_idle_minutes,
            dev_seed: flag_env("DEV_SEED"),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_idle_minutes(value: &str) -> Result<i64, AppError> {
    let minutes = value.trim().parse::<i64>().map_err(|error| {
        AppError::Validation(format!("invalid SESSION_IDLE_MINUTES: {error}"))
    })?;

    if minutes < 1 {
        return Err(AppError::Validation(
            "SESSION_IDLE_MINUTES must be at least 1".to_owned(),
        ));
    }

    Ok(minutes)
}

fn flag_env(name: &str) -> bool {
    env::var(name)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{ApiConfig, ApiCommand, is_truthy, parse_idle_minutes};

    #[test]
    fn truthy_flags_accept_common_spellings() {
        assert!(is_truthy("true"));
        assert!(is_truthy(" TRUE "));
        assert!(is_truthy("1"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn idle_minutes_must_be_positive() {
        assert_eq!(parse_idle_minutes("15").ok(), Some(15));
        assert!(parse_idle_minutes("0").is_err());
        assert!(parse_idle_minutes("soon").is_err());
    }

    #[test]
    fn socket_address_rejects_hostnames() {
        let mut config = ApiConfig {
            command: ApiCommand::Serve,
            database_url: "postgres://localhost/dishpicker".to_owned(),
            frontend_url: "http://localhost:3000".to_owned(),
            api_host: "0.0.0.0".to_owned(),
            api_port: 3001,
            cookie_secure: false,
            session_idle_minutes: 60,
            dev_seed: false,
        };
        assert_eq!(
            config.socket_address().map(|address| address.port()).ok(),
            Some(3001)
        );

        config.api_host = "localhost".to_owned();
        assert!(config.socket_address().is_err());
    }
}
