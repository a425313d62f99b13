use std::hash::{Hash, Hasher};

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::{
    AsymmetricKey, KeyError, KeyPairBytes, KeyPairGenerate, KeyResult, PubKey, PublicKeyBytes,
    PublicKeyGenerate, Sign, Verify,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An [`ed25519`][ref] verifying key.
///
/// [ref]: https://en.wikipedia.org/wiki/EdDSA
pub type Ed25519PubKey = PubKey<VerifyingKey>;

/// An [`ed25519`][ref] key pair with a signing key.
///
/// [ref]: https://en.wikipedia.org/wiki/EdDSA
pub type Ed25519KeyPair = Ed25519Key<SigningKey>;

pub(crate) type Ed25519Key<S> = AsymmetricKey<VerifyingKey, S>;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl<S> Ed25519Key<S> {
    /// Returns the verifying key as a fixed-size array.
    pub fn public_key_array(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.public.to_bytes()
    }

    /// Returns the public half of the key.
    pub fn to_public(&self) -> Ed25519PubKey {
        Ed25519PubKey {
            public: self.public,
            private: (),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<S> Verify for Ed25519Key<S> {
    fn verify(&self, data: &[u8], signature: &[u8]) -> KeyResult<()> {
        self.public
            .verify_strict(data, &Signature::try_from(signature)?)
            .map_err(Into::into)
    }
}

impl Sign for Ed25519KeyPair {
    fn sign(&self, data: &[u8]) -> Vec<u8> {
        self.private.sign(data).to_vec()
    }
}

impl PublicKeyGenerate for Ed25519PubKey {
    fn from_public_key(bytes: &[u8]) -> KeyResult<Self> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(KeyError::InvalidKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            public: VerifyingKey::try_from(bytes)?,
            private: (),
        })
    }
}

impl KeyPairGenerate for Ed25519KeyPair {
    fn generate(rng: &mut impl CryptoRngCore) -> Self {
        let signing_key = SigningKey::generate(rng);
        Self {
            public: signing_key.verifying_key(),
            private: signing_key,
        }
    }

    fn from_private_key(bytes: &[u8]) -> KeyResult<Self> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidKeyLength {
                expected: SECRET_KEY_LENGTH,
                actual: bytes.len(),
            });
        }

        let signing_key = SigningKey::try_from(bytes)?;
        Ok(Self {
            public: signing_key.verifying_key(),
            private: signing_key,
        })
    }
}

impl<S> PublicKeyBytes for Ed25519Key<S> {
    fn public_key_bytes(&self) -> Vec<u8> {
        self.public.to_bytes().to_vec()
    }
}

impl KeyPairBytes for Ed25519KeyPair {
    fn private_key_bytes(&self) -> Vec<u8> {
        self.private.to_bytes().to_vec()
    }
}

impl From<Ed25519KeyPair> for Ed25519PubKey {
    fn from(key_pair: Ed25519KeyPair) -> Self {
        Self {
            public: key_pair.public,
            private: (),
        }
    }
}

impl Hash for Ed25519PubKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.public_key_bytes().hash(state);
    }
}

impl Serialize for Ed25519PubKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.public_key_bytes().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Ed25519PubKey {
    fn deserialize<D>(deserializer: D) -> Result<Ed25519PubKey, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Ed25519PubKey::from_public_key(&bytes).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
