//! Configuration loading from environment variables.
//!
//! Uses the following environment variables:
//! - `RECEPTOR_HTTP_ADDR`: HTTP bind address (default: 0.0.0.0:8887)
//! - `RECEPTOR_SEED_FILE`: JSON list of actual LRP groups to preload into the
//!   in-memory backend (optional)

use std::{
    env,
    net::SocketAddr,
    path::PathBuf,
    str::FromStr,
};

use anyhow::{Context, Result};

use crate::receptor::{DEFAULT_RECEPTOR_ADDR, ReceptorConfig};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server configuration
    pub receptor: ReceptorConfig,

    /// Fixture loaded into the memory backend at boot
    pub seed_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` file if present, then reads from environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let http_addr =
            env::var("RECEPTOR_HTTP_ADDR").unwrap_or_else(|_| DEFAULT_RECEPTOR_ADDR.to_string());
        let http_addr =
            SocketAddr::from_str(&http_addr).context("invalid RECEPTOR_HTTP_ADDR format")?;

        let seed_file = env::var("RECEPTOR_SEED_FILE")
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            receptor: ReceptorConfig::new(http_addr),
            seed_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized.
        unsafe {
            env::remove_var("RECEPTOR_HTTP_ADDR");
            env::remove_var("RECEPTOR_SEED_FILE");
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.receptor, ReceptorConfig::default());
        assert_eq!(config.seed_file, None);
    }

    #[test]
    fn test_default_addr_matches_constant() {
        let expected: SocketAddr = DEFAULT_RECEPTOR_ADDR.parse().unwrap();
        assert_eq!(ReceptorConfig::default().bind_addr(), expected);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        // SAFETY: tests touching the environment are serialized.
        unsafe {
            env::set_var("RECEPTOR_HTTP_ADDR", "127.0.0.1:9999");
            env::set_var("RECEPTOR_SEED_FILE", "/tmp/seed.json");
        }
        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.receptor.addr.port(), 9999);
        assert_eq!(config.seed_file, Some(PathBuf::from("/tmp/seed.json")));
    }

    #[test]
    #[serial]
    fn test_invalid_addr() {
        clear_env();
        // SAFETY: tests touching the environment are serialized.
        unsafe {
            env::set_var("RECEPTOR_HTTP_ADDR", "not-an-addr");
        }
        let err = Config::from_env().unwrap_err();
        clear_env();

        assert!(err.to_string().contains("RECEPTOR_HTTP_ADDR"));
    }
}
