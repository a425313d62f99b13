//! Error types of the trustbus-objects crate.

use thiserror::Error;

use crate::{DotKind, ObjectHash, Vk};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result type for object operations.
pub type ObjectResult<T> = Result<T, ObjectError>;

/// Defines the types of errors that can occur while building or decoding objects.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// Unable to parse the input.
    #[error("Unable to parse")]
    UnableToParse,

    /// A verifying key that is not exactly 32 bytes.
    #[error("Invalid verifying key length: {0}")]
    InvalidVkLength(usize),

    /// A hash that is not exactly 32 bytes.
    #[error("Invalid hash length: {0}")]
    InvalidHashLength(usize),

    /// Malformed topic suffix in an access grant.
    #[error("Invalid topic suffix: {0}")]
    InvalidSuffix(#[from] trustbus_path::PathError),

    /// Malformed access permission string.
    #[error("Invalid access permissions: {0:?}")]
    InvalidPermissions(String),

    /// The grant of a DOT does not match its kind.
    #[error("A {0:?} DOT must carry a matching grant")]
    GrantKindMismatch(DotKind),

    /// The key signing a DOT is not the DOT's issuer.
    #[error("DOT issuer {expected} cannot be signed for by {actual}")]
    IssuerMismatch {
        /// The issuer recorded in the DOT.
        expected: Vk,

        /// The verifying key of the signer.
        actual: Vk,
    },

    /// A chain needs at least one DOT.
    #[error("A delegation chain needs at least one DOT")]
    EmptyChain,

    /// A DOT in a chain is of the wrong kind.
    #[error("DOT {index} of the chain is a {actual:?} DOT, expected {expected:?}")]
    ChainKindMismatch {
        /// Position of the offending DOT.
        index: usize,

        /// The kind of the chain.
        expected: DotKind,

        /// The kind of the DOT.
        actual: DotKind,
    },

    /// The issuer of a DOT is not the receiver of the DOT before it.
    #[error("DOT {0} of the chain is not issued by the receiver of the previous DOT")]
    BrokenChainLinkage(usize),

    /// A relative expiry lies beyond the representable time range.
    #[error("Expiry {0:?} from now is out of range")]
    ExpiryOverflow(std::time::Duration),

    /// The chain hash does not match the DOT hashes it is said to cover.
    #[error("Chain hash {0} does not match its DOT hashes")]
    ChainHashMismatch(ObjectHash),

    /// Key errors
    #[error("Key error: {0}")]
    KeyError(#[from] trustbus_key::KeyError),

    /// Json (de)serialization errors
    #[error("Json serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Base64 decoding errors
    #[error("Base64 decoding error: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `ObjectResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> ObjectResult<T> {
    Result::Ok(value)
}
