//! Error types of the trustbus-key crate.

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result type for key operations.
pub type KeyResult<T> = Result<T, KeyError>;

/// Defines the types of errors that can occur in key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Signature or key material rejected by `ed25519`.
    #[error("Ed25519 error: {0}")]
    Ed25519Error(#[from] ed25519_dalek::SignatureError),

    /// Hex decoding error
    #[error("Hex decoding error: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Key material of the wrong size
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// The number of bytes the key must have.
        expected: usize,

        /// The number of bytes supplied.
        actual: usize,
    },
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `KeyResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> KeyResult<T> {
    Result::Ok(value)
}
