use std::sync::Arc;

use trustbus_objects::{DChain, RoutingObject};

use crate::{SignedMessage, StatusCode, UniqueMessageId};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Receives every message delivered on a subscription, in delivery order.
pub type DeliveryCallback = Box<dyn Fn(Arc<SignedMessage>) + Send + Sync + 'static>;

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Expands a hash-only chain into its ordered DOT hashes.
///
/// Implementations may do network or disk I/O and may block.
pub trait ChainElaborator: Send + Sync {
    /// Returns the elaborated form of `chain`, or `None` if it is unknown.
    fn elaborate(&self, chain: &DChain) -> Option<DChain>;
}

/// Fills in the DOTs of an elaborated chain.
pub trait DotResolver: Send + Sync {
    /// Resolves every DOT of `chain`, looking first among `available` routing objects.
    ///
    /// Returns `false` if any DOT could not be found.
    fn resolve_dots_in_chain(&self, chain: &mut DChain, available: &[RoutingObject]) -> bool;
}

/// Checks a signed message before it is sent.
pub trait MessageVerifier: Send + Sync {
    /// Returns [`StatusCode::Okay`] if the message may be sent.
    fn verify(&self, message: &SignedMessage) -> StatusCode;
}

/// Carries signed messages to the network and keeps the subscription registry.
pub trait Transport: Send + Sync {
    /// Delivers a message to the subscribers of its topic.
    fn publish(&self, message: SignedMessage);

    /// Registers a subscription and returns its id.
    ///
    /// A new subscription takes the unique id of `message`. When an equivalent subscription
    /// already exists its id is returned instead.
    fn subscribe(&self, message: SignedMessage, on_message: DeliveryCallback) -> UniqueMessageId;

    /// Tears a subscription down. Returns whether it existed.
    fn unsubscribe(&self, id: UniqueMessageId) -> bool;
}
