use std::fmt::Display;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The outcome reported to publish and subscribe callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// The operation succeeded.
    Okay,

    /// The target topic is malformed.
    BadUri,

    /// The operation is not allowed on the target topic.
    BadOperation,

    /// The access chain is missing or could not be resolved.
    Unresolvable,

    /// A signature on the message or one of its DOTs does not verify.
    BadSignature,

    /// The message or one of its DOTs has expired.
    Expired,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StatusCode {
    /// Returns whether this is [`StatusCode::Okay`].
    pub fn is_okay(&self) -> bool {
        *self == StatusCode::Okay
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            StatusCode::Okay => "okay",
            StatusCode::BadUri => "bad uri",
            StatusCode::BadOperation => "bad operation",
            StatusCode::Unresolvable => "unresolvable",
            StatusCode::BadSignature => "bad signature",
            StatusCode::Expired => "expired",
        };

        write!(f, "{text}")
    }
}
