//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Development signing secret. Token signing on the client side is illustrative only.
pub const DEFAULT_JWT_SECRET: &str = "roleplay-hub-jwt-secret-key";

/// Access token lifetime (1 hour).
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
/// Refresh token lifetime (7 days).
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// What a façade does with the mock record it computed after a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackMode {
    /// Mutate the mock store, then still reject with the operation's error message.
    #[default]
    Reject,
    /// Mutate the mock store and return the synthesized record as a success.
    Synthesize,
}

impl FromStr for FallbackMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(FallbackMode::Reject),
            "synthesize" => Ok(FallbackMode::Synthesize),
            _ => Err(ConfigError::Invalid("MOCK_FALLBACK")),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the character API (e.g. `http://localhost:8080/api`)
    pub api_base_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    /// Behavior of mock fallbacks after a failed remote call
    pub fallback_mode: FallbackMode,
    /// File backing the durable token namespace (in memory when unset)
    pub token_store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            jwt_signing_key: DEFAULT_JWT_SECRET.as_bytes().to_vec(),
            access_token_ttl_secs: ACCESS_TOKEN_TTL_SECS,
            refresh_token_ttl_secs: REFRESH_TOKEN_TTL_SECS,
            fallback_mode: FallbackMode::default(),
            token_store_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Ok(Self {
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map(String::into_bytes)
                .unwrap_or(defaults.jwt_signing_key),
            access_token_ttl_secs: parse_secs("ACCESS_TOKEN_TTL_SECS", ACCESS_TOKEN_TTL_SECS)?,
            refresh_token_ttl_secs: parse_secs("REFRESH_TOKEN_TTL_SECS", REFRESH_TOKEN_TTL_SECS)?,
            fallback_mode: match env::var("MOCK_FALLBACK") {
                Ok(raw) => raw.parse()?,
                Err(_) => defaults.fallback_mode,
            },
            token_store_path: env::var("TOKEN_STORE_PATH").ok().map(PathBuf::from),
        })
    }

    /// Config for tests: an API URL nothing listens on.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9/api".to_string(),
            ..Self::default()
        }
    }

    /// Test config with the given fallback behavior.
    pub fn with_fallback(mut self, mode: FallbackMode) -> Self {
        self.fallback_mode = mode;
        self
    }
}

fn parse_secs(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("MOCK_FALLBACK", "Synthesize");
        env::remove_var("ACCESS_TOKEN_TTL_SECS");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.fallback_mode, FallbackMode::Synthesize);
        assert_eq!(config.access_token_ttl_secs, ACCESS_TOKEN_TTL_SECS);

        env::remove_var("MOCK_FALLBACK");
        env::remove_var("JWT_SIGNING_KEY");
    }

    #[test]
    fn test_fallback_mode_parse() {
        assert_eq!("reject".parse::<FallbackMode>().unwrap(), FallbackMode::Reject);
        assert!("sometimes".parse::<FallbackMode>().is_err());
    }

    #[test]
    fn test_default_lifetimes() {
        let config = Config::default();
        assert_eq!(config.access_token_ttl_secs, 3600);
        assert_eq!(config.refresh_token_ttl_secs, 604_800);
        assert_eq!(config.fallback_mode, FallbackMode::Reject);
    }
}
