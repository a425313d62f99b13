use rand_core::CryptoRngCore;

use crate::KeyResult;

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// A trait for keys that can verify signatures.
pub trait Verify {
    /// Verifies a signature against data with a verifying key.
    fn verify(&self, data: &[u8], signature: &[u8]) -> KeyResult<()>;
}

/// A trait for keys that can sign data.
///
/// Signing with a well-formed key pair cannot fail, so no result is returned.
pub trait Sign: Verify {
    /// Signs data with a signing key.
    fn sign(&self, data: &[u8]) -> Vec<u8>;
}

/// A trait for constructing a public key.
pub trait PublicKeyGenerate {
    /// Generates a public key from its bytes.
    fn from_public_key(bytes: &[u8]) -> KeyResult<Self>
    where
        Self: Sized;
}

/// A trait for constructing a key pair.
pub trait KeyPairGenerate {
    /// Generates a key pair from a cryptographically secure random number generator.
    fn generate(rng: &mut impl CryptoRngCore) -> Self
    where
        Self: Sized;

    /// Constructs a key pair from its private key bytes.
    fn from_private_key(bytes: &[u8]) -> KeyResult<Self>
    where
        Self: Sized;

    /// Constructs a key pair from a hex-encoded private key.
    fn from_private_key_hex(encoded: &str) -> KeyResult<Self>
    where
        Self: Sized,
    {
        Self::from_private_key(&hex::decode(encoded.trim())?)
    }
}

/// A trait for getting the public key bytes.
pub trait PublicKeyBytes {
    /// Returns the public key bytes.
    fn public_key_bytes(&self) -> Vec<u8>;
}

/// A trait for getting the key pair bytes.
pub trait KeyPairBytes: PublicKeyBytes {
    /// Returns the private key bytes.
    fn private_key_bytes(&self) -> Vec<u8>;
}
