//! Runtime Configuration
//!
//! Read from environment variables with sensible defaults. Invalid values
//! fall back to the default and log a warning.

use std::path::PathBuf;
use std::str::FromStr;

use crate::ranking::DEFAULT_TOP_N;

pub const DEFAULT_DATA_PATH: &str = "data/merged_output/merged_aqi_india.csv";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Largest `top_n` a caller may request
pub const MAX_TOP_N: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Historical dataset CSV (`DATA_PATH`)
    pub data_path: PathBuf,
    /// Cities listed in `mostPolluted` (`TOP_N`)
    pub top_n: usize,
    /// HTTP port (`PORT`)
    pub port: u16,
    /// Ranking cache entries (`CACHE_CAPACITY`)
    pub cache_capacity: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_n: DEFAULT_TOP_N,
            port: DEFAULT_PORT,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test fixtures)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            data_path: lookup("DATA_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            top_n: parse_or("TOP_N", lookup("TOP_N"), defaults.top_n).min(MAX_TOP_N),
            port: parse_or("PORT", lookup("PORT"), defaults.port),
            cache_capacity: parse_or("CACHE_CAPACITY", lookup("CACHE_CAPACITY"), defaults.cache_capacity),
        }
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
    }
}
