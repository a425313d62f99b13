use std::{fmt, str::FromStr};

use base64::prelude::{Engine, BASE64_URL_SAFE};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{ObjectError, ObjectResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The length of an object hash in bytes.
pub const HASH_LENGTH: usize = 32;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A SHA-256 digest identifying a DOT or a delegation chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHash([u8; HASH_LENGTH]);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ObjectHash {
    /// Hashes the concatenation of `parts`.
    pub fn digest<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }

        Self(hasher.finalize().into())
    }

    /// Creates a hash from a byte slice, which must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> ObjectResult<Self> {
        let array: [u8; HASH_LENGTH] = bytes
            .try_into()
            .map_err(|_| ObjectError::InvalidHashLength(bytes.len()))?;

        Ok(Self(array))
    }

    /// Returns the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<[u8; HASH_LENGTH]> for ObjectHash {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ObjectHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ObjectHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BASE64_URL_SAFE.encode(self.0))
    }
}

impl fmt::Debug for ObjectHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHash({self})")
    }
}

impl FromStr for ObjectHash {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = BASE64_URL_SAFE.decode(s.as_bytes())?;
        Self::from_slice(&decoded)
    }
}

impl Serialize for ObjectHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ObjectHash {
    fn deserialize<D>(deserializer: D) -> Result<ObjectHash, D::Error>
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_concatenates_parts() {
        let split = ObjectHash::digest([&b"hello "[..], &b"world"[..]]);
        let whole = ObjectHash::digest([&b"hello world"[..]]);
        assert_eq!(split, whole);
        assert_ne!(whole, ObjectHash::digest([&b"hello"[..]]));
    }

    #[test]
    fn test_hash_length_is_enforced() {
        assert!(matches!(
            ObjectHash::from_slice(&[0; 16]),
            Err(ObjectError::InvalidHashLength(16))
        ));
    }
}
