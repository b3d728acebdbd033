//! Configuration loader for environment variables and files.
//!
//! Responsibilities:
//! - Load configuration from `.env` files, environment variables, and the credentials file.
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Persisting credentials back to disk (see `persistence`).
//!
//! Invariants / Assumptions:
//! - Builder methods beat environment variables, which beat the credentials file.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod credentials_file;
mod env;
mod error;

#[cfg(test)]
mod tests;

pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;
