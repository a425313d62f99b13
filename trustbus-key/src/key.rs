//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A key pair with a public and private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsymmetricKey<P, S> {
    pub(crate) public: P,
    pub(crate) private: S,
}

/// A public key.
pub type PubKey<P> = AsymmetricKey<P, ()>;
