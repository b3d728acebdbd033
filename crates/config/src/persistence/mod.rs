//! Credentials persistence.
//!
//! Responsibilities:
//! - Resolve the platform path of the credentials file.
//! - Read and atomically write the `{access_id, access_key}` JSON file.
//!
//! Does NOT handle:
//! - Merging credentials with env vars (see `loader`).
//! - Prompting the user (see the CLI `setup` command).
//!
//! Invariants:
//! - Writes go to a temp file first and are renamed into place.
//! - On Unix the file is created with mode 0600.

mod credentials;
mod path;

pub use credentials::save_credentials;
pub use path::default_credentials_path;

pub(crate) use credentials::read_credentials;
