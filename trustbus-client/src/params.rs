use std::{
    collections::BTreeMap,
    time::{Duration, SystemTime},
};

use trustbus_objects::{DChain, Dot, DotKind, ExpirySpec, PayloadObject, RoutingObject};
use typed_builder::TypedBuilder;

use crate::ElaborationLevel;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The options of [`Client::publish`][crate::Client::publish].
#[derive(Debug, Clone, TypedBuilder)]
pub struct PublishParams {
    /// The master verifying key of the topic. Must be 32 bytes.
    #[builder(setter(into))]
    pub mvk: Vec<u8>,

    /// The topic suffix. Must not contain wildcards.
    #[builder(setter(into))]
    pub suffix: String,

    /// The chain authorizing the message. When absent the first access chain among the routing
    /// objects is used.
    #[builder(default, setter(strip_option))]
    pub primary_access_chain: Option<DChain>,

    /// Routing objects to attach before the access chain is resolved.
    #[builder(default)]
    pub routing_objects: Vec<RoutingObject>,

    /// The content of the message.
    #[builder(default)]
    pub payload_objects: Vec<PayloadObject>,

    /// Absolute expiry of the message.
    #[builder(default, setter(strip_option))]
    pub expiry: Option<SystemTime>,

    /// Expiry relative to sending. Takes precedence over `expiry`.
    #[builder(default, setter(strip_option))]
    pub expiry_delta: Option<Duration>,

    /// How much of the access chain to attach.
    #[builder(default)]
    pub elaborate_pac: ElaborationLevel,

    /// Whether to verify the signed message before sending it.
    #[builder(default)]
    pub verify: bool,

    /// Whether the network should keep the message for later subscribers.
    #[builder(default)]
    pub persist: bool,
}

/// The options of [`Client::subscribe`][crate::Client::subscribe].
#[derive(Debug, Clone, TypedBuilder)]
pub struct SubscribeParams {
    /// The master verifying key of the topic. Must be 32 bytes.
    #[builder(setter(into))]
    pub mvk: Vec<u8>,

    /// The topic suffix, which may contain wildcards.
    #[builder(setter(into))]
    pub suffix: String,

    /// The chain authorizing the subscription.
    #[builder(default, setter(strip_option))]
    pub primary_access_chain: Option<DChain>,

    /// Routing objects to attach before the access chain is resolved.
    #[builder(default)]
    pub routing_objects: Vec<RoutingObject>,

    /// How much of the access chain to attach.
    #[builder(default)]
    pub elaborate_pac: ElaborationLevel,

    /// Whether to verify the signed message before subscribing.
    #[builder(default)]
    pub verify: bool,

    /// Whether to observe the topic without consuming messages.
    #[builder(default)]
    pub tap: bool,
}

/// The options of [`Client::create_dot`][crate::Client::create_dot].
#[derive(Debug, Clone, TypedBuilder)]
pub struct CreateDotParams {
    /// Whether the DOT grants access to a topic or a permission map.
    pub kind: DotKind,

    /// The receiver. Must be 32 bytes.
    #[builder(setter(into))]
    pub to: Vec<u8>,

    /// How many more times the grant may be re-delegated.
    #[builder(default)]
    pub ttl: u8,

    /// Absolute expiry.
    #[builder(default, setter(strip_option))]
    pub expiry: Option<SystemTime>,

    /// Expiry relative to creation. Takes precedence over `expiry`.
    #[builder(default, setter(strip_option))]
    pub expiry_delta: Option<Duration>,

    /// Contact information of the issuer.
    #[builder(default, setter(into))]
    pub contact: String,

    /// Free-form comment.
    #[builder(default, setter(into))]
    pub comment: String,

    /// Delegated revokers. Each must be 32 bytes.
    #[builder(default)]
    pub revokers: Vec<Vec<u8>>,

    /// Leave the creation time out of the DOT.
    #[builder(default)]
    pub omit_creation_date: bool,

    /// The topic suffix of an access DOT.
    #[builder(default, setter(into))]
    pub suffix: String,

    /// The master verifying key of an access DOT. Must be 32 bytes.
    #[builder(default, setter(into))]
    pub mvk: Vec<u8>,

    /// The permission string of an access DOT, e.g. `C*P`.
    #[builder(default, setter(into))]
    pub access_permissions: String,

    /// The permission map of a permission DOT.
    #[builder(default)]
    pub permissions: BTreeMap<String, String>,
}

/// The options of [`Client::create_dot_chain`][crate::Client::create_dot_chain].
#[derive(Debug, Clone, TypedBuilder)]
pub struct CreateDotChainParams {
    /// The DOTs, from the one issued by the root authority to the one held by the end receiver.
    pub dots: Vec<Dot>,

    /// The kind every DOT must have.
    pub kind: DotKind,

    /// Whether to collapse the chain to its hash.
    #[builder(default)]
    pub unelaborate: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PublishParams {
    /// Returns the requested expiry.
    pub fn expiry_spec(&self) -> ExpirySpec {
        ExpirySpec {
            at: self.expiry,
            after: self.expiry_delta,
        }
    }
}

impl CreateDotParams {
    /// Returns the requested expiry.
    pub fn expiry_spec(&self) -> ExpirySpec {
        ExpirySpec {
            at: self.expiry,
            after: self.expiry_delta,
        }
    }
}
