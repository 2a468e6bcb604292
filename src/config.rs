//! Configuration Module
//!
//! Service configuration from environment variables. Missing or
//! unparseable values fall back to defaults; startup never fails on
//! configuration alone.

use std::env;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_TTL_MS: u64 = 300_000;
const DEFAULT_SEED_DEMO: bool = true;

// == Configuration ==
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Port the HTTP server binds
    pub port: u16,
    /// Default TTL for cache entries, in milliseconds
    pub default_ttl_ms: u64,
    /// Whether to seed the in-memory backend with the demo project
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_ttl_ms: DEFAULT_TTL_MS,
            seed_demo: DEFAULT_SEED_DEMO,
        }
    }
}

impl Config {
    /// Reads `SERVER_PORT`, `DEFAULT_TTL_MS` and `SEED_DEMO` from the
    /// environment, keeping defaults for anything absent or malformed.
    pub fn from_env() -> Self {
        Self {
            port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_MS),
            seed_demo: env::var("SEED_DEMO")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEED_DEMO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.port, 4000);
        assert_eq!(config.default_ttl_ms, 300_000);
        assert!(config.seed_demo);
    }

    // Env overrides and fallback live in one test so parallel test threads
    // never race on the shared process environment.
    #[test]
    fn test_from_env_overrides_and_fallbacks() {
        env::set_var("SERVER_PORT", "8088");
        env::set_var("DEFAULT_TTL_MS", "not-a-number");
        env::set_var("SEED_DEMO", "false");

        let config = Config::from_env();
        assert_eq!(config.port, 8088);
        assert_eq!(config.default_ttl_ms, 300_000);
        assert!(!config.seed_demo);

        env::remove_var("SERVER_PORT");
        env::remove_var("DEFAULT_TTL_MS");
        env::remove_var("SEED_DEMO");
    }
}
