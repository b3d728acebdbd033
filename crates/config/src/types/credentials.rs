//! Access id/key pair used for HTTP basic auth.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Sumo Logic access credentials.
///
/// This is also the on-disk shape of the credentials file written by
/// `sumo-cli setup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_id: String,
    #[serde(with = "secret_string")]
    pub access_key: SecretString,
}

impl Credentials {
    pub fn new(access_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            access_key: SecretString::new(access_key.into().into()),
        }
    }
}
