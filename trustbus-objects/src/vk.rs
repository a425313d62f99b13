use std::{fmt, str::FromStr};

use base64::prelude::{Engine, BASE64_URL_SAFE};
use serde::{Deserialize, Serialize};
use trustbus_key::{Ed25519PubKey, PublicKeyGenerate, Verify};

use crate::{ObjectError, ObjectResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The length of a verifying key in bytes.
pub const VK_LENGTH: usize = 32;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The 32-byte `ed25519` verifying key identifying a principal or a master authority.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vk([u8; VK_LENGTH]);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Vk {
    /// The universal "everyone" identity. Grants to it are grants to any principal.
    ///
    /// It is a small-order point, so no principal holds a key that signs for it.
    pub const EVERYONE: Vk = Vk([0; VK_LENGTH]);

    /// Creates a key from a byte slice, which must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> ObjectResult<Self> {
        let array: [u8; VK_LENGTH] = bytes
            .try_into()
            .map_err(|_| ObjectError::InvalidVkLength(bytes.len()))?;

        Ok(Self(array))
    }

    /// Returns the raw bytes of the key.
    pub fn as_bytes(&self) -> &[u8; VK_LENGTH] {
        &self.0
    }

    /// Returns whether this is [`Vk::EVERYONE`].
    pub fn is_everyone(&self) -> bool {
        *self == Self::EVERYONE
    }

    /// Verifies an `ed25519` signature made by the holder of this key.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> ObjectResult<()> {
        let key = Ed25519PubKey::from_public_key(&self.0)?;
        key.verify(data, signature)?;
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<[u8; VK_LENGTH]> for Vk {
    fn from(bytes: [u8; VK_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Vk {
    type Error = ObjectError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl AsRef<[u8]> for Vk {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Vk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BASE64_URL_SAFE.encode(self.0))
    }
}

impl fmt::Debug for Vk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vk({self})")
    }
}

impl FromStr for Vk {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = BASE64_URL_SAFE.decode(s.as_bytes())?;
        Self::from_slice(&decoded)
    }
}

impl Serialize for Vk {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Vk {
    fn deserialize<D>(deserializer: D) -> Result<Vk, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
