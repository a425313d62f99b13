use crate::{MessageVerifier, SignedMessage, StatusCode};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Checks the signature and expiry of a message, then those of every resolved DOT of its
/// access chain.
///
/// It does not check that the chain actually grants the operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier;

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl MessageVerifier for SignatureVerifier {
    fn verify(&self, message: &SignedMessage) -> StatusCode {
        let Some(sender) = message.sender_vk() else {
            return StatusCode::Unresolvable;
        };

        if message.verify_signature(sender).is_err() {
            return StatusCode::BadSignature;
        }

        if message.expiry().is_some_and(|expiry| expiry.has_passed()) {
            return StatusCode::Expired;
        }

        for dot in message.pac().into_iter().flat_map(|pac| pac.resolved_dots()) {
            if dot.verify_signature().is_err() {
                return StatusCode::BadSignature;
            }

            if dot.is_expired() {
                return StatusCode::Expired;
            }
        }

        StatusCode::Okay
    }
}
