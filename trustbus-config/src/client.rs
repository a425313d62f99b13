//! The configuration of a trustbus client.

use serde::{Deserialize, Serialize};
use trustbus_key::{Ed25519KeyPair, KeyPairGenerate};
use typed_builder::TypedBuilder;

use crate::{ConfigError, ConfigResult, MainConfig};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The configuration of a trustbus client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, TypedBuilder)]
pub struct ClientConfig {
    /// Name of the client, used in logs.
    #[serde(default = "super::default::default_name")]
    #[builder(default = super::default::default_name(), setter(into))]
    pub name: String,

    /// The hex-encoded `ed25519` private key of the client.
    ///
    /// A fresh key is generated each time the client starts when this is absent.
    #[serde(default)]
    #[builder(default, setter(strip_option, into))]
    pub signing_key: Option<String>,

    /// How duplicate routing objects are handled before a message is sealed.
    #[serde(default = "super::default::default_routing_dedup")]
    #[builder(default = super::default::default_routing_dedup())]
    pub routing_dedup: RoutingDedup,
}

/// Policy for removing duplicate routing objects from a message before it is signed.
///
/// Access chain elaboration may append the same chain or certificate more than once. Which
/// copies count as duplicates is a deployment decision, so it is configurable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingDedup {
    /// Keep every routing object in the order it was added.
    #[default]
    Keep,

    /// Drop later objects whose kind and encoded content equal an earlier object.
    Exact,

    /// Treat hash-only and elaborated copies of the same object as duplicates. The first
    /// position is kept and holds the most elaborated copy seen.
    PreferElaborated,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ClientConfig {
    /// Returns the configured key pair, or a freshly generated one when none is configured.
    pub fn key_pair(&self) -> ConfigResult<Ed25519KeyPair> {
        match &self.signing_key {
            Some(encoded) => Ok(Ed25519KeyPair::from_private_key_hex(encoded)?),
            None => {
                tracing::debug!(name = %self.name, "no signing key configured, generating one");
                Ok(Ed25519KeyPair::generate(&mut rand::thread_rng()))
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl MainConfig for ClientConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if let Some(encoded) = &self.signing_key {
            Ed25519KeyPair::from_private_key_hex(encoded)?;
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: super::default::default_name(),
            signing_key: None,
            routing_dedup: super::default::default_routing_dedup(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use trustbus_key::{KeyPairBytes, PublicKeyBytes};

    use crate::default::DEFAULT_NAME;

    use super::*;

    const KEY: &str = "bef4939b5397e18507a60fb79da88e1980046a22c73c3c09beb302c4b3b34086";

    #[test]
    fn test_toml_full() -> anyhow::Result<()> {
        let toml = format!(
            r#"
            name = "alice"
            signing_key = "{KEY}"
            routing_dedup = "prefer-elaborated"
            "#
        );

        let config = ClientConfig::from_string(toml)?;

        assert_eq!(config.name, "alice");
        assert_eq!(config.signing_key.as_deref(), Some(KEY));
        assert_eq!(config.routing_dedup, RoutingDedup::PreferElaborated);

        let key_pair = config.key_pair()?;
        assert_eq!(hex::encode(key_pair.private_key_bytes()), KEY);

        Ok(())
    }

    #[test]
    fn test_toml_defaults() -> anyhow::Result<()> {
        let config = ClientConfig::from_string("")?;

        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.name, DEFAULT_NAME);
        assert_eq!(config.routing_dedup, RoutingDedup::Keep);

        // Each call without a configured key yields a fresh identity.
        let a = config.key_pair()?;
        let b = config.key_pair()?;
        assert_ne!(a.public_key_bytes(), b.public_key_bytes());

        Ok(())
    }

    #[test]
    fn test_invalid_signing_key_rejected() {
        let result = ClientConfig::from_string(r#"signing_key = "abcd""#);
        assert!(matches!(result, Err(ConfigError::InvalidSigningKey(_))));

        let result = ClientConfig::from_string(r#"routing_dedup = "sometimes""#);
        assert!(matches!(result, Err(ConfigError::TomlError(_))));

        let result = ClientConfig::from_string(r#"name = "  ""#);
        assert!(matches!(result, Err(ConfigError::EmptyName)));
    }

    #[test]
    fn test_from_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, r#"name = "bob""#)?;
        writeln!(file, r#"routing_dedup = "exact""#)?;

        let config = ClientConfig::from_file(file.path())?;
        assert_eq!(config.name, "bob");
        assert_eq!(config.routing_dedup, RoutingDedup::Exact);

        Ok(())
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .name("carol")
            .signing_key(KEY)
            .build();

        assert_eq!(config.name, "carol");
        assert_eq!(config.signing_key.as_deref(), Some(KEY));
        assert_eq!(config.routing_dedup, RoutingDedup::Keep);
    }
}
