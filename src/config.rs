use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MEMBERS_PATH: &str = "./data/organigram.json";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CACHE_TTL_SECS: u64 = 10 * 60;
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub members_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub cache_ttl: Duration,
    pub session_ttl: Duration,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            members_path: PathBuf::from(DEFAULT_MEMBERS_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the environment (and `.env`), falling
    /// back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let members_path = env::var("ORGANIGRAM_MEMBERS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                log::warn!(
                    "ORGANIGRAM_MEMBERS_PATH not set, using default path: {}",
                    DEFAULT_MEMBERS_PATH
                );
                defaults.members_path.clone()
            });

        let allowed_origins = match env::var("ORGANIGRAM_ALLOWED_ORIGINS") {
            Ok(value) => value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.allowed_origins,
        };

        Ok(Self {
            members_path,
            host: env::var("ORGANIGRAM_HOST").unwrap_or(defaults.host),
            port: parse_var("ORGANIGRAM_PORT", defaults.port)?,
            cache_ttl: Duration::from_secs(parse_var(
                "ORGANIGRAM_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )?),
            session_ttl: Duration::from_secs(parse_var(
                "ORGANIGRAM_SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )?),
            allowed_origins,
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_rejects_garbage() {
        // Unique key so parallel tests never observe it.
        env::set_var("ORGANIGRAM_TEST_BAD_PORT", "eighty");
        let err = parse_var::<u16>("ORGANIGRAM_TEST_BAD_PORT", 8080).unwrap_err();
        env::remove_var("ORGANIGRAM_TEST_BAD_PORT");

        assert!(err.to_string().contains("ORGANIGRAM_TEST_BAD_PORT"));
    }

    #[test]
    fn test_parse_var_uses_default_when_unset() {
        assert_eq!(parse_var("ORGANIGRAM_TEST_UNSET", 42u64).unwrap(), 42);
    }
}
