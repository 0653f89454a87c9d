//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables once at startup.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::error::ConfigError;
use crate::verify::VerificationKey;

/// Default cap on interaction request bodies (64 KiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Hex-encoded Ed25519 public key of the Discord application
    pub discord_public_key: Option<String>,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_var("PORT", 8080),

            discord_public_key: env::var("DISCORD_PUBLIC_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            max_body_bytes: parse_var("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
        }
    }

    /// Parse the configured public key.
    pub fn verification_key(&self) -> Result<VerificationKey, ConfigError> {
        match &self.discord_public_key {
            Some(raw) => VerificationKey::from_hex(raw),
            None => Err(ConfigError::MissingPublicKey),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            discord_public_key: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid.
fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_valid() {
        env::set_var("TEST_PARSE_VAR_VALID", " 9000 ");
        let result: u16 = parse_var("TEST_PARSE_VAR_VALID", 1);
        assert_eq!(result, 9000);
        env::remove_var("TEST_PARSE_VAR_VALID");
    }

    #[test]
    fn test_parse_var_invalid() {
        env::set_var("TEST_PARSE_VAR_INVALID", "not-a-port");
        let result: u16 = parse_var("TEST_PARSE_VAR_INVALID", 8080);
        assert_eq!(result, 8080);
        env::remove_var("TEST_PARSE_VAR_INVALID");
    }

    #[test]
    fn test_parse_var_default() {
        let result: usize = parse_var("NONEXISTENT_VAR", 42);
        assert_eq!(result, 42);
    }

    #[test]
    fn test_verification_key_missing() {
        let config = Config::default();
        assert_eq!(config.verification_key(), Err(ConfigError::MissingPublicKey));
    }

    #[test]
    fn test_verification_key_malformed() {
        let config = Config {
            discord_public_key: Some("xyz".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.verification_key(),
            Err(ConfigError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_verification_key_valid() {
        let key = ed25519_dalek::SigningKey::from_bytes(&[1u8; 32]).verifying_key();
        let config = Config {
            discord_public_key: Some(hex::encode(key.as_bytes())),
            ..Config::default()
        };
        assert_eq!(config.verification_key(), Ok(VerificationKey::from(key)));
    }
}
