use trustbus_key::{Ed25519KeyPair, Sign};

use crate::Vk;

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// The local principal: something that signs on behalf of a verifying key.
pub trait Identity: Send + Sync {
    /// Returns the verifying key of the principal.
    fn vk(&self) -> Vk;

    /// Signs `data` with the principal's signing key.
    fn sign(&self, data: &[u8]) -> Vec<u8>;
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Identity for Ed25519KeyPair {
    fn vk(&self) -> Vk {
        Vk::from(self.public_key_array())
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        Sign::sign(self, data)
    }
}
