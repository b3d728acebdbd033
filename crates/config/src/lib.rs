//! Configuration management for the Sumo Logic search client.
//!
//! This crate provides types and loaders for resolving connection settings,
//! credentials, polling behaviour and cache TTLs from CLI flags, environment
//! variables, `.env` files and the credentials file.

pub mod constants;
mod loader;
pub mod persistence;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use persistence::{default_credentials_path, save_credentials};
pub use types::{CacheConfig, Config, ConnectionConfig, Credentials, PollingConfig, SearchConfig};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
