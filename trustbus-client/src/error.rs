//! Error types of the trustbus-client crate.

use thiserror::Error;
use trustbus_objects::ObjectHash;

use crate::{MessageKind, StatusCode};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Defines the types of errors that can occur while assembling, sending or receiving messages.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The master verifying key is not 32 bytes long.
    #[error("Invalid master verifying key length: {0}")]
    InvalidMvkLength(usize),

    /// The topic suffix is malformed.
    #[error("Invalid topic suffix: {0}")]
    InvalidSuffix(#[from] trustbus_path::PathError),

    /// Wildcards are receive-only patterns.
    #[error("A {kind:?} message cannot target the wildcard suffix {suffix:?}")]
    WildcardNotPermitted {
        /// The kind of the message.
        kind: MessageKind,

        /// The offending suffix.
        suffix: String,
    },

    /// Elaboration was requested but the message has no access chain.
    #[error("The message has no primary access chain")]
    MissingAccessChain,

    /// The chain could not be elaborated.
    #[error("Unable to elaborate access chain {0}")]
    UnresolvableChain(ObjectHash),

    /// Some DOTs of the chain could not be found.
    #[error("Unable to resolve the DOTs of access chain {0}")]
    UnresolvableDots(ObjectHash),

    /// The verifier rejected the message.
    #[error("Message verification failed: {0}")]
    VerificationFailed(StatusCode),

    /// Object errors
    #[error("Object error: {0}")]
    ObjectError(#[from] trustbus_objects::ObjectError),

    /// Config errors
    #[error("Config error: {0}")]
    ConfigError(#[from] trustbus_config::ConfigError),

    /// Json serialization errors
    #[error("Json serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ClientError {
    /// Returns the status code callbacks receive for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ClientError::InvalidMvkLength(_) | ClientError::InvalidSuffix(_) => StatusCode::BadUri,
            ClientError::WildcardNotPermitted { .. } => StatusCode::BadOperation,
            ClientError::MissingAccessChain
            | ClientError::UnresolvableChain(_)
            | ClientError::UnresolvableDots(_) => StatusCode::Unresolvable,
            ClientError::VerificationFailed(status) => *status,
            ClientError::ObjectError(_)
            | ClientError::ConfigError(_)
            | ClientError::JsonError(_) => StatusCode::BadOperation,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `ClientResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> ClientResult<T> {
    Result::Ok(value)
}
