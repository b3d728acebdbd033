//! Configuration type definitions.
//!
//! Responsibilities:
//! - Define the resolved `Config` and its sections (connection, credentials, polling, search, cache).
//! - Provide serde helpers for secrets and durations.
//!
//! Does NOT handle:
//! - Loading values from env, dotenv or the credentials file (see `loader`).
//! - Writing the credentials file (see `persistence`).
//!
//! Invariants:
//! - Secrets are held as `secrecy::SecretString` and never appear in `Debug` output.
//! - Defaults come from `crate::constants`, never from literals in this module.

mod connection;
mod credentials;
mod polling;
mod search;

pub use connection::{Config, ConnectionConfig};
pub use credentials::Credentials;
pub use polling::PollingConfig;
pub use search::{CacheConfig, SearchConfig};

/// Serialize a `Duration` as whole seconds.
pub(crate) mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

/// Serialize a `Duration` as whole milliseconds.
pub(crate) mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
